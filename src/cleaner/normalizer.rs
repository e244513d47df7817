//! Character level fix-ups applied before any structural matching.

/// Unicode musical symbols and their ASCII spelling
const SYMBOL_MAPPINGS: &[(char, &str)] = &[
    ('♭', "b"),
    ('♯', "#"),
    ('°', "dim"),
    ('–', "-"),
];

/// Punctuation left over at the end of a token by the scraper
const TRAILING_LEFTOVERS: &[char] = &['*', '~', ',', '/'];

fn get_symbol_replacement(c: char) -> Option<&'static str> {
    SYMBOL_MAPPINGS
        .iter()
        .find(|(symbol, _)| *symbol == c)
        .map(|(_, replacement)| *replacement)
}

/// Map unicode musical symbols to ASCII, other characters pass through.
pub fn map_symbols(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match get_symbol_replacement(c) {
            Some(replacement) => result.push_str(replacement),
            None => result.push(c),
        }
    }
    result
}

const fn opener_for(closer: char) -> Option<char> {
    match closer {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

/// Closer without a matching opener inside the token, e.g. `G)` from `(Am - G)`
fn is_unbalanced_closer(token: &str, last: char) -> bool {
    opener_for(last).is_some_and(|opener| {
        let closers = token.chars().filter(|&c| c == last).count();
        let openers = token.chars().filter(|&c| c == opener).count();
        closers > openers
    })
}

/// Strip trailing leftovers and unbalanced closing brackets.
pub fn strip_trailing_leftovers(token: &str) -> &str {
    let mut token = token;
    while let Some(last) = token.chars().last() {
        if TRAILING_LEFTOVERS.contains(&last) || is_unbalanced_closer(token, last) {
            token = &token[..token.len() - last.len_utf8()];
        } else {
            break;
        }
    }
    token
}

/// Full token normalization: symbol mapping then trailing clean-up.
pub fn normalize_token(token: &str) -> String {
    let mapped = map_symbols(token);
    strip_trailing_leftovers(&mapped).to_string()
}

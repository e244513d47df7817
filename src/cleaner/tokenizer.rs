use crate::cleaner::is_root_note;
use regex::Regex;
use std::sync::LazyLock;

/// `(` opening a word right before a root note, as in `(Am - G)`
static LEADING_PARENTHESIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)\(([A-G])").unwrap());

/// Word that does not start with a root note
static NON_CHORD_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)[^A-G\s]\S*").unwrap());

/// Separators that glue chords together in scraped sheets, e.g. `Am,Cmaj7`
const SEPARATORS: &[char] = &[',', '^', '%'];

/// A comma inside parentheses stays when it lists extensions, e.g. `(b5,b13)`.
fn starts_extension(rest: &[char]) -> bool {
    match rest {
        [d, ..] if d.is_ascii_digit() => true,
        ['#' | 'b' | '+' | '-', d, ..] => d.is_ascii_digit(),
        _ => false,
    }
}

/// Replace separators sitting between two non-space characters by a space.
///
/// `-` and `/` are left alone, they carry meaning in slash chords and tabs.
pub fn split_separators(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut result = String::with_capacity(line.len());
    let mut depth = 0usize;
    for (index, &c) in chars.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        let between_words = index > 0
            && !chars[index - 1].is_whitespace()
            && chars.get(index + 1).is_some_and(|next| !next.is_whitespace());
        if SEPARATORS.contains(&c) && between_words {
            let extension_list = c == ',' && depth > 0 && starts_extension(&chars[index + 1..]);
            if !extension_list {
                result.push(' ');
                continue;
            }
        }
        result.push(c);
    }
    result
}

/// Split a raw line into ordered tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    split_separators(line)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Drop leading characters until the first root note.
///
/// Returns an empty string when the token has no root note at all.
pub fn erode(token: &str) -> &str {
    token
        .char_indices()
        .find(|(_, c)| is_root_note(*c))
        .map_or("", |(index, _)| &token[index..])
}

/// Line variant of [`erode`]: break enclosures like `(C - G)` open.
pub fn remove_leading_parentheses(line: &str) -> String {
    LEADING_PARENTHESIS_RE
        .replace_all(line, "${1}${2}")
        .into_owned()
}

/// Line variant of [`erode`]: drop every word not starting with a root note.
pub fn remove_non_chord_words(line: &str) -> String {
    NON_CHORD_WORD_RE.replace_all(line, "${1}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        let tokens = tokenize(" X1 X2  X3^X4 X5%X6  (X7,X8)    X9 ");
        assert_eq!(
            tokens,
            vec!["X1", "X2", "X3", "X4", "X5", "X6", "(X7", "X8)", "X9"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_split_commas() {
        assert_eq!(
            split_separators("Am,Cmaj7,Perospero Actii Cm"),
            "Am Cmaj7 Perospero Actii Cm"
        );
        // not between two words
        assert_eq!(split_separators("Am, C ,G"), "Am, C ,G");
    }

    #[test]
    fn test_keep_extension_lists() {
        assert_eq!(tokenize("Fb7sus4(b5,b13) A7(11,13)"), vec!["Fb7sus4(b5,b13)", "A7(11,13)"]);
        assert_eq!(tokenize("(D2,F,D2,F)"), vec!["(D2", "F", "D2", "F)"]);
    }

    #[test]
    fn test_keep_dash_and_slash() {
        assert_eq!(tokenize("A|---5-4-3---| Am/G"), vec!["A|---5-4-3---|", "Am/G"]);
    }

    #[test]
    fn test_erode_pos() {
        assert_eq!(erode("(((((Cmaj"), "Cmaj");
        assert_eq!(erode("Intro:Am"), "Am");
        assert_eq!(erode("Am"), "Am");
    }

    #[test]
    fn test_remove_leading_parentheses() {
        assert_eq!(
            remove_leading_parentheses("A B (C - D - E) F(9) G) (X("),
            "A B C - D - E) F(9) G) (X("
        );
    }

    #[test]
    fn test_remove_non_chord_words() {
        let line = "A#maj7 A# A#maj7(b13) C7sus4 Fb7sus4(b5,b13) Xm7 PM7";
        assert_eq!(
            remove_non_chord_words(line).trim(),
            "A#maj7 A# A#maj7(b13) C7sus4 Fb7sus4(b5,b13)"
        );
        assert_eq!(remove_non_chord_words("Hello I Am a chord").trim(), "Am");
    }

    #[test]
    fn test_erode_neg() {
        assert_eq!(erode("this-is-not-a-chord"), "");
        assert_eq!(erode("Hello"), "");
        assert_eq!(erode(""), "");
    }
}

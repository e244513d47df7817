//! Rewrites equivalent chord spellings into one canonical form.
//!
//! Rules run in a fixed order, later rules see the output of earlier ones:
//!
//! | # | pattern            | rewrite        | example              |
//! |---|--------------------|----------------|----------------------|
//! | 1 | `<root>7M`         | `<root>maj7`   | `C7M` -> `Cmaj7`     |
//! | 2 | `m5-`              | `dim`          | `Am5-` -> `Adim`     |
//! | 3 | `°`                | `dim`          | `A°` -> `Adim`       |
//! | 4 | `<root>-`          | `<root>dim`    | `A#-` -> `A#dim`     |
//! | 5 | `5-`               | `dim`          | `A5-` -> `Adim`      |
//! | 6 | `<root>+`          | `<root>aug`    | `A+` -> `Aaug`       |
//! | 7 | `<digit>+`         | `<digit>#`     | `A7(13+)` -> `A7(13#)` |
//! | 8 | `<digit>-`         | `<digit>b`     | `A7(11-)` -> `A7(11b)` |
//! | 9 | `(no3)` / `no5`... | removed        | `A(no3)` -> `A`      |
//! | 10| `<root>min`        | `<root>m`      | `Dmin` -> `Dm`       |
//!
//! `<root>` is a root note with its optional accidental. Rule 8 does not fire
//! when the dash is followed by a digit (`7-9` is a range, not a flat).

use crate::cleaner::ROOT_PATTERN;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

struct Rewrite {
    pattern: Regex,
    replacement: &'static str,
}

impl Rewrite {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, self.replacement)
    }
}

static QUALITY_RULES: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    vec![
        Rewrite::new(&format!("({ROOT_PATTERN})7M"), "${1}maj7"),
        Rewrite::new("m5-", "dim"),
        Rewrite::new("°", "dim"),
        Rewrite::new(&format!("({ROOT_PATTERN})-"), "${1}dim"),
        Rewrite::new("5-", "dim"),
        Rewrite::new(&format!(r"({ROOT_PATTERN})\+"), "${1}aug"),
        Rewrite::new(r"([0-9])\+", "${1}#"),
        Rewrite::new("([0-9])-([^0-9]|$)", "${1}b${2}"),
        Rewrite::new(r"\(?no[357]\)?", ""),
        Rewrite::new(&format!(r"({ROOT_PATTERN})min\b"), "${1}m"),
    ]
});

/// A chord carrying an extension, e.g. `Cmaj7`, `Am9`, `Dsus4`
const EXTENDED_CHORD: &str = "[A-G][#b]?[Majmdinsu]{0,3}[0-9]{1,2}";

static SECOND_EXTENSION_RULES: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    vec![
        // C7/13 -> C7(13), never C/E since the right side must be numeric
        Rewrite::new(&format!("({EXTENDED_CHORD})/([0-9]{{1,2}})"), "${1}(${2})"),
        // D7add9 -> D7(9)
        Rewrite::new(&format!("({EXTENDED_CHORD})add([0-9]{{1,2}})"), "${1}(${2})"),
    ]
});

fn apply_rules(rules: &[Rewrite], text: &str) -> String {
    let mut current = text.to_string();
    for rule in rules {
        if let Cow::Owned(rewritten) = rule.apply(&current) {
            current = rewritten;
        }
    }
    current
}

/// Apply the quality rules once, in order.
pub fn homogenize_qualities(text: &str) -> String {
    apply_rules(&QUALITY_RULES, text)
}

/// Put double extensions in parentheses: `A7/13` and `A7add13` become `A7(13)`.
pub fn homogenize_second_extensions(text: &str) -> String {
    apply_rules(&SECOND_EXTENSION_RULES, text)
}

/// Full homogenization of a token or a line.
///
/// Removing a `(no3)` may expose a new `+` or `-` next to a root, so the
/// rules are re-applied until the text is stable. Every rewrite consumes the
/// marker it matched, so this always ends.
pub fn homogenize(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = homogenize_second_extensions(&homogenize_qualities(&current));
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homogenize_qualities() {
        let text = "Am5- A° A+ A#+ A7(13+) A7(11-) A#- A5- Ano3 Ano5 A(no3) A(no5";
        assert_eq!(
            homogenize_qualities(text),
            "Adim Adim Aaug A#aug A7(13#) A7(11b) A#dim Adim A A A A"
        );
    }

    #[test]
    fn test_homogenize_empty() {
        assert_eq!(homogenize_qualities(""), "");
        assert_eq!(homogenize(""), "");
    }

    #[test]
    fn test_major_seventh_and_minor() {
        assert_eq!(homogenize("C7M G Dmin Ebmin Amin7"), "Cmaj7 G Dm Ebm Amin7");
    }

    #[test]
    fn test_dash_before_digit_is_kept() {
        assert_eq!(homogenize_qualities("C7-9"), "C7-9");
        assert_eq!(homogenize_qualities("C9-"), "C9b");
    }

    #[test]
    fn test_homogenize_second_extensions() {
        assert_eq!(
            homogenize_second_extensions("A7/13 D7add9 E9/11 Cmaj7add6"),
            "A7(13) D7(9) E9(11) Cmaj7(6)"
        );
    }

    #[test]
    fn test_slash_bass_untouched() {
        assert_eq!(homogenize("C/E Am7/G D/F#"), "C/E Am7/G D/F#");
    }

    #[test]
    fn test_homogenize_is_idempotent() {
        let samples = [
            "Am5- A° A+ A#+ A7(13+) A7(11-) A#- A5-",
            "C(no3)+ Dno3- Bno5+ C5--",
            "A7/13 D7add9 E9/11 Cmaj7add6 Emin",
            "Intro: Gm - Dm - C - C x2 C* Gm A# C* Gm",
        ];
        for sample in samples {
            let once = homogenize(sample);
            assert_eq!(homogenize(&once), once, "{sample}");
        }
    }

    #[test]
    fn test_exposed_sign_settles() {
        assert_eq!(homogenize("C(no3)+"), "Caug");
    }

    #[test]
    fn test_nested_removals_settle() {
        // every pass removes one level: C(n(n(no3)o3)o3)+
        let mut nested = "(no3)".to_string();
        for _ in 0..12 {
            nested = format!("(n{nested}o3)");
        }
        let text = format!("C{nested}+ G");
        let once = homogenize(&text);
        assert_eq!(once, "Caug G");
        assert_eq!(homogenize(&once), once);
    }
}

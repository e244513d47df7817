pub mod cleaner_config;
pub mod homogenizer;
pub mod noise_filter;
pub mod normalizer;
pub mod pipeline;
pub mod selection;
pub mod tokenizer;
pub mod validator;

/// Letters that can open a chord
pub const ROOT_NOTES: &str = "ABCDEFG";

/// Regex class for a root note followed by an optional accidental
pub(crate) const ROOT_PATTERN: &str = "[A-G][#b]?";

/// Regex class of the characters found in a tablature staff after the string name
pub(crate) const TAB_BODY_PATTERN: &str = r"[-0-9hpsbrv?/]";

pub(crate) fn is_root_note(c: char) -> bool {
    ROOT_NOTES.contains(c)
}

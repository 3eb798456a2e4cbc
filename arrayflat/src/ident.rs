//! Stable resource names derived from base-language item text.

use lazy_static::lazy_static;
use regex::Regex;

// Anything that is not a letter or a digit, in any script.
lazy_static! {
    static ref SEPARATOR_RUN: Regex = Regex::new(r"[^\p{L}\p{N}]+").unwrap();
}

/// Lowercases `text` and collapses every run of non-alphanumeric characters
/// into a single `_`, trimming underscores from both ends.
///
/// ```rust
/// assert_eq!(arrayflat::ident::snake_case("Light Blue!"), "light_blue");
/// ```
pub fn snake_case(text: &str) -> String {
    let lowered = text.to_lowercase();
    SEPARATOR_RUN
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

/// `{array}_{snake_case(text)}`. Text without letters or digits (empty,
/// `—`, `★★★`) leaves the suffix empty: `colors_`.
pub fn derive_identifier(array: &str, text: &str) -> String {
    format!("{array}_{}", snake_case(text))
}

/// The `@string/<identifier>` reference an array item is rewritten to.
pub fn reference_token(identifier: &str) -> String {
    format!("@string/{identifier}")
}

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_-]+").expect("valid slug charset regex"));

/// Turn display text into a lowercase, hyphenated, URL-safe token.
///
/// Whitespace runs become a single `-`; anything that is not an ASCII word
/// character or `-` is dropped. Applying it to its own output is a no-op.
///
/// ```
/// use menu_kit::slugify;
///
/// assert_eq!(slugify("Nasi Goreng Sehat"), "nasi-goreng-sehat");
/// assert_eq!(slugify("Es Teh (Tanpa Gula)!"), "es-teh-tanpa-gula");
/// ```
pub fn slugify(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let lowered = text.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lowered, "-");
    NON_SLUG_CHARS.replace_all(&hyphenated, "").into_owned()
}

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Placeholder used for path segments that would otherwise be empty.
pub const UNKNOWN: &str = "Unknown";

fn illegal_chars() -> &'static Regex {
    static ILLEGAL: OnceLock<Regex> = OnceLock::new();
    ILLEGAL.get_or_init(|| Regex::new(r#"[<>:"/\\|?*'\p{Cc}]"#).unwrap())
}

/// Turns a free-text title or artist name into a filesystem-safe path segment.
///
/// The input is NFC-composed, stripped of characters that are illegal in paths on common
/// platforms (`< > : " / \ | ? *`, the apostrophe and control characters) and trimmed.
/// Absent input, or input with nothing left after cleaning, becomes `"Unknown"`.
///
/// # Examples
///
/// ```
/// use musicdl::foundation::utils::sanitize;
///
/// assert_eq!(sanitize("AC/DC"), "ACDC");
/// assert_eq!(sanitize("The Razor's Edge"), "The Razors Edge");
/// assert_eq!(sanitize(""), "Unknown");
/// assert_eq!(sanitize(None), "Unknown");
/// ```
pub fn sanitize<'a>(input: impl Into<Option<&'a str>>) -> String {
    let Some(input) = input.into() else {
        return UNKNOWN.to_string();
    };

    let composed: String = input.nfc().collect();
    let cleaned = illegal_chars().replace_all(&composed, "");
    let trimmed = cleaned.trim();

    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_removes_illegal_characters() {
        assert_eq!(sanitize("AC/DC"), "ACDC");
        assert_eq!(sanitize(r#"a<b>c:d"e/f\g|h?i*j"#), "abcdefghij");
        assert_eq!(sanitize("Don't Stop"), "Dont Stop");
    }

    #[test]
    fn test_sanitize_empty_and_absent() {
        assert_eq!(sanitize(""), UNKNOWN);
        assert_eq!(sanitize("   "), UNKNOWN);
        assert_eq!(sanitize(None), UNKNOWN);
        assert_eq!(sanitize("???"), UNKNOWN);
    }

    #[test]
    fn test_sanitize_trims_after_cleaning() {
        assert_eq!(sanitize("  Intro / Outro  "), "Intro  Outro");
        assert_eq!(sanitize("Title?\t"), "Title");
    }

    #[test]
    fn test_sanitize_composes_unicode() {
        let decomposed = "Cafe\u{301}";
        assert_eq!(sanitize(decomposed), "Caf\u{e9}");
    }

    #[test]
    fn test_sanitize_keeps_regular_punctuation() {
        assert_eq!(sanitize("Hello, World! (Live) [2020]"), "Hello, World! (Live) [2020]");
    }
}

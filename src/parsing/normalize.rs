use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Punctuation classes replaced by a single space
fn symbol_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[|*+()\[\]{}:;]+").expect("valid symbol regex"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Anything outside word characters, whitespace, common Latin punctuation,
/// and the Arabic (U+0600..U+06FF) and Arabic Supplement (U+0750..U+077F) blocks
fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[^\w\s.,;!?\-\x{0600}-\x{06FF}\x{0750}-\x{077F}]")
            .expect("valid whitelist regex")
    })
}

/// Normalize OCR text for scoring and reconstruction.
///
/// Applies NFKC composition, turns pipes, asterisks, plus signs, brackets,
/// braces, colons and semicolons into spaces, collapses whitespace, then
/// drops characters outside the whitelist.
///
/// # Examples
///
/// ```
/// use article_joiner::parsing::normalize::normalize_text;
///
/// assert_eq!(normalize_text("Prix: 120 DH | (négociable)"), "Prix 120 DH négociable");
/// assert_eq!(normalize_text(""), "");
/// ```
#[must_use]
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let composed: String = text.nfkc().collect();
    let spaced = symbol_runs().replace_all(&composed, " ");
    let collapsed = whitespace_runs().replace_all(spaced.trim(), " ");
    disallowed_chars().replace_all(&collapsed, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_become_spaces() {
        assert_eq!(normalize_text("a|b*c[d]{e}f;g"), "a b c d e f g");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(normalize_text("  one\n\n two\t three  "), "one two three");
    }

    #[test]
    fn test_disallowed_symbols_dropped() {
        assert_eq!(normalize_text("cost € 5 # now!"), "cost  5  now!");
        assert_eq!(normalize_text("end-of-line, ok?"), "end-of-line, ok?");
    }

    #[test]
    fn test_arabic_text_kept() {
        let text = "إعلان عن بيع عقار";
        assert_eq!(normalize_text(text), text);
    }

    #[test]
    fn test_nfkc_composition() {
        // "ﬁ" ligature decomposes to "fi" under compatibility normalization
        assert_eq!(normalize_text("\u{FB01}nal"), "final");
        // e + combining acute composes to a single é
        assert_eq!(normalize_text("e\u{0301}t\u{0065}\u{0301}"), "été");
    }
}

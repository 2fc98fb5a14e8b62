use regex::Regex;
use std::sync::OnceLock;

/// Reference codes closing a classified ad, e.g. `$A12345`, `2025B`, `123456789`
fn reference_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:\$?[A-Z]?[0-9]{4,}[A-Z0-9]*|[0-9]{4,}[A-Z]+)\b")
            .expect("valid reference regex")
    })
}

fn date_patterns() -> &'static [Regex; 3] {
    static RE: OnceLock<[Regex; 3]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"\b\d{4}/\d{2}/\d{2}\b").expect("valid date regex"),
            Regex::new(r"\b\d{2}[-/]\d{2}[-/]\d{4}\b").expect("valid date regex"),
            Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("valid date regex"),
        ]
    })
}

/// Whether a line contains a numeric date, which would otherwise look like a reference
#[must_use]
pub fn looks_like_date(line: &str) -> bool {
    date_patterns().iter().any(|re| re.is_match(line))
}

/// Whether the article ends with a reference code.
///
/// Only the last two lines of the trimmed text are examined, blank lines
/// included, and lines that look like dates are ignored. An article without a trailing reference is considered
/// incomplete: its continuation was cut onto another segment.
///
/// ```
/// use article_joiner::detection::reference::has_trailing_reference;
///
/// assert!(has_trailing_reference("Vente d'un terrain\nRéf: 20931A"));
/// assert!(!has_trailing_reference("Vente d'un terrain\nle 12/03/2024"));
/// assert!(!has_trailing_reference("Vente d'un terrain situé à"));
/// ```
#[must_use]
pub fn has_trailing_reference(text: &str) -> bool {
    let lines: Vec<&str> = text.trim().lines().collect();
    let start = lines.len().saturating_sub(2);

    lines[start..]
        .iter()
        .filter(|line| !looks_like_date(line))
        .any(|line| reference_pattern().is_match(line))
}

/// First reference code on the last line of an article, if any
#[must_use]
pub fn extract_reference(text: &str) -> Option<String> {
    let last_line = text.trim().lines().last()?;
    reference_pattern()
        .find(last_line)
        .map(|m| m.as_str().to_string())
}

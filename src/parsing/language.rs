use crate::core::types::Language;

const FRENCH_STOPWORDS: &[&str] = &[
    "le", "la", "les", "de", "des", "du", "et", "en", "un", "une", "est", "pour", "dans", "par",
    "sur", "au", "aux", "avec", "que", "qui", "ce", "cette", "sont", "pas", "ne",
];

const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "of", "and", "to", "in", "is", "for", "on", "with", "that", "by", "this", "are", "be",
    "from", "at", "as", "an", "was", "it", "or", "not",
];

fn is_arabic(c: char) -> bool {
    matches!(c, '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' | '\u{08A0}'..='\u{08FF}')
}

/// Guess the language of raw OCR text.
///
/// Arabic script in the majority of letters yields `ar`. Otherwise Latin text is
/// scored against short French and English stop-word lists. Ties, empty input
/// and text with no stop words are `unknown`.
#[must_use]
pub fn detect_language(text: &str) -> Language {
    let mut arabic = 0usize;
    let mut letters = 0usize;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        letters += 1;
        if is_arabic(c) {
            arabic += 1;
        }
    }

    if letters == 0 {
        return Language::Unknown;
    }
    if arabic * 2 > letters {
        return Language::Arabic;
    }

    let mut french = 0usize;
    let mut english = 0usize;
    for word in text
        .split(|c: char| !c.is_alphabetic() && c != '\'')
        .filter(|w| !w.is_empty())
    {
        let word = word.to_lowercase();
        if FRENCH_STOPWORDS.contains(&word.as_str()) {
            french += 1;
        }
        if ENGLISH_STOPWORDS.contains(&word.as_str()) {
            english += 1;
        }
    }

    match french.cmp(&english) {
        std::cmp::Ordering::Greater => Language::French,
        std::cmp::Ordering::Less => Language::English,
        std::cmp::Ordering::Equal => Language::Unknown,
    }
}

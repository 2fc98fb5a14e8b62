//! Centralized validation and helper functions.

/// Maximum number of fragments loaded from a single pool directory (DOS protection)
pub const MAX_FRAGMENTS: usize = 100_000;

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Convert a count to f64 for ratio calculations
#[inline]
#[must_use]
pub fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Check if adding another fragment would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new fragment.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_fragment_limit(count: usize) -> Option<String> {
    if count >= MAX_FRAGMENTS {
        Some(format!(
            "Too many fragments: adding another would exceed maximum of {MAX_FRAGMENTS}"
        ))
    } else {
        None
    }
}

/// Bound `text` to at most `max_chars` characters, on a char boundary.
///
/// # Examples
///
/// ```
/// use article_joiner::utils::validation::truncate_chars;
///
/// assert_eq!(truncate_chars("abcdef", 3), "abc");
/// assert_eq!(truncate_chars("بيع عقار", 3), "بيع");
/// assert_eq!(truncate_chars("ab", 10), "ab");
/// ```
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Fragment name validation error types
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
}

/// Validate a fragment name before it is joined into an output path.
///
/// Rejects names that are empty, too long, contain path separators or `..`,
/// or contain control characters. Unicode letters are allowed since
/// journal names are not restricted to ASCII.
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the name is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_fragment_name(name: &str) -> Result<&str, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if name.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    // Prevent directory traversal
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if name.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(name)
}

use regex::Regex;
use std::sync::OnceLock;

/// Role token carried by head fragments
pub const HEAD_TOKEN: &str = "article_00";
/// Role token carried by tail fragments
pub const TAIL_TOKEN: &str = "article_01";
/// Token replacing the head token in reconstructed file names
pub const COMBINED_TOKEN: &str = "article_complet";

pub const TEXT_EXTENSION: &str = "txt";
/// Extension of page-segment images
pub const IMAGE_EXTENSION: &str = "png";

/// Tokens and extensions that tie fragment names to their roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentNaming {
    pub head_token: String,
    pub tail_token: String,
    pub combined_token: String,
    pub image_extension: String,
}

impl Default for FragmentNaming {
    fn default() -> Self {
        Self {
            head_token: HEAD_TOKEN.to_string(),
            tail_token: TAIL_TOKEN.to_string(),
            combined_token: COMBINED_TOKEN.to_string(),
            image_extension: IMAGE_EXTENSION.to_string(),
        }
    }
}

fn page_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_page_(\d+)_").expect("valid page regex"))
}

/// Page number embedded in a fragment name, zero-padded to three digits.
///
/// Returns `"000"` when the name carries no `_page_N_` marker.
///
/// ```
/// use article_joiner::parsing::naming::page_number;
///
/// assert_eq!(page_number("Daily_page_4_article_00_2.txt"), "004");
/// assert_eq!(page_number("Daily_page_1234_article_00_2.txt"), "1234");
/// assert_eq!(page_number("loose.txt"), "000");
/// ```
#[must_use]
pub fn page_number(name: &str) -> String {
    page_pattern()
        .captures(name)
        .and_then(|c| c.get(1))
        .map_or_else(|| "000".to_string(), |m| format!("{:0>3}", m.as_str()))
}

/// Per-page article index of a head fragment: the digits between
/// `_{head_token}_` and `.txt` at the end of the name (`"0"` when absent)
#[must_use]
pub fn article_index(head_name: &str, head_token: &str) -> String {
    let marker = format!("_{head_token}_");
    head_name
        .strip_suffix(&format!(".{TEXT_EXTENSION}"))
        .and_then(|stem| stem.rfind(&marker).map(|pos| &stem[pos + marker.len()..]))
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .map_or_else(|| "0".to_string(), str::to_string)
}

/// Whether `name` is a text fragment carrying `token`, i.e. matches `*{token}_*.txt`
#[must_use]
pub fn has_role_token(name: &str, token: &str) -> bool {
    let marker = format!("{token}_");
    name.ends_with(&format!(".{TEXT_EXTENSION}"))
        && name
            .find(&marker)
            .is_some_and(|pos| pos + marker.len() <= name.len() - TEXT_EXTENSION.len() - 1)
}

/// Stem of a file name (everything before the last `.`)
#[must_use]
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    }
}

/// File name of the reconstructed article for a head fragment
///
/// ```
/// use article_joiner::parsing::naming::combined_file_name;
///
/// assert_eq!(
///     combined_file_name("Daily_page_4_article_00_2.txt", "article_00", "article_complet"),
///     "Daily_page_4_article_complet_2.txt"
/// );
/// ```
#[must_use]
pub fn combined_file_name(head_name: &str, head_token: &str, combined_token: &str) -> String {
    format!(
        "{}.{TEXT_EXTENSION}",
        file_stem(head_name).replace(head_token, combined_token)
    )
}

/// Folder holding one reconstructed article, keyed only by the article index
#[must_use]
pub fn combined_folder_name(combined_token: &str, article_index: &str) -> String {
    format!("{combined_token}_{article_index}")
}

/// Companion image name: same stem, different extension
#[must_use]
pub fn image_file_name(name: &str, extension: &str) -> String {
    format!("{}.{extension}", file_stem(name))
}

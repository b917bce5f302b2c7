//! Slug generation for image filenames.
//!
//! Both helpers are pure functions of the heading text, so the same document
//! always produces the same filenames.

/// Maximum length of a run-classifier heading key.
pub const HEADING_KEY_LEN: usize = 30;

/// Generate a filename slug from heading text.
///
/// Lowercases ASCII letters, collapses every run of other characters into a
/// single hyphen, and trims leading/trailing hyphens.
///
/// # Examples
///
/// ```
/// use docmail::slug::slugify;
///
/// assert_eq!(slugify("Weekly Ride"), "weekly-ride");
/// assert_eq!(slugify("  Sun's ride!  "), "sun-s-ride");
/// ```
pub fn slugify(text: &str) -> String {
    collapse(text.trim())
        .trim_matches('-')
        .to_string()
}

/// Generate the section key used by the image run classifier.
///
/// Same character mapping as [`slugify`], but hyphens are kept at the edges
/// and the key is cut to [`HEADING_KEY_LEN`] characters.
///
/// # Examples
///
/// ```
/// use docmail::slug::heading_key;
///
/// assert_eq!(heading_key("Ride!"), "ride-");
/// ```
pub fn heading_key(text: &str) -> String {
    collapse(text.trim()).chars().take(HEADING_KEY_LEN).collect()
}

fn collapse(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('-');
            in_gap = true;
        }
    }
    out
}

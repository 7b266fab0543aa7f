//! Header normalization.
//!
//! Reduces an arbitrary header to a lowercase ASCII token made of
//! `[a-z0-9]` runs joined by single underscores, e.g.
//! `"  Prénom / Nom "` becomes `"prenom_nom"`.

use unicode_normalization::UnicodeNormalization;

/// Normalizes a raw header into a comparable token.
///
/// Applies NFKD and keeps only printable ASCII, `' '` through `'~'`.
/// Combining marks fall outside that range, so accents are stripped; so do
/// control characters such as tab and newline, which therefore do not
/// separate words. Returns an empty string when nothing Latin-comparable is left; this
/// function never fails.
pub fn normalize(header: &str) -> String {
    let ascii: String = header
        .nfkd()
        .filter(|ch| (' '..='~').contains(ch))
        .collect();

    let mut token = String::with_capacity(ascii.len());
    let mut pending_separator = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !token.is_empty() {
                token.push('_');
            }
            pending_separator = false;
            token.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    token
}

/// [`normalize`] for possibly-missing headers; `None` yields `""`.
pub fn normalize_opt(header: Option<&str>) -> String {
    header.map(normalize).unwrap_or_default()
}

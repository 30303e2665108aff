//! Category slug derivation and its reverse, for display
//!
//! Slugs are lowercase ASCII alphanumerics joined by underscores:
//! "Airport Transfer" → "airport_transfer".

use regex::Regex;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_ ]+").expect("valid regex"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").expect("valid regex"));

/// Derive the slug for a category name.
///
/// # Examples
/// ```
/// use gocab::services::slug::generate_slug;
///
/// assert_eq!(generate_slug("Airport Transfer"), "airport_transfer");
/// assert_eq!(generate_slug("Hourly Rental (4h+)"), "hourly_rental_4h");
/// ```
pub fn generate_slug(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let kept = NON_WORD.replace_all(&lower, "");
    SPACES
        .replace_all(kept.trim(), "_")
        .trim_matches('_')
        .to_string()
}

/// Best-effort display label for a slug: "airport_transfer" → "Airport Transfer".
pub fn humanize_slug(slug: &str) -> String {
    slug.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// Slug generation - URL-safe identifiers derived once from a title

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::strong_types::EntityId;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Title used for the slug when no translation carries one.
pub const PLACEHOLDER_TITLE: &str = "untitled";

/// Map Turkish letters onto their ASCII base letter.
///
/// Runs before lower-casing: `'İ'.to_lowercase()` yields `i` plus a combining
/// dot, which the character filter would otherwise split into garbage.
fn transliterate(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'ç' | 'Ç' => 'c',
            'ğ' | 'Ğ' => 'g',
            'ı' | 'İ' | 'I' => 'i',
            'ö' | 'Ö' => 'o',
            'ş' | 'Ş' => 's',
            'ü' | 'Ü' => 'u',
            'â' | 'Â' => 'a',
            'î' | 'Î' => 'i',
            'û' | 'Û' => 'u',
            other => other,
        })
        .collect()
}

/// Base slug without uniqueness salt. May be empty.
pub fn slugify(raw_title: &str) -> String {
    let lowered = transliterate(raw_title).to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let hyphenated = WHITESPACE.replace_all(stripped.trim(), "-");
    let collapsed = HYPHENS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Slug with a uniqueness salt appended.
///
/// An empty base is legal and yields the salt alone.
pub fn generate(raw_title: &str, salt: &str) -> String {
    let base = slugify(raw_title);
    let salt = slugify(salt);
    match (base.is_empty(), salt.is_empty()) {
        (_, true) => base,
        (true, false) => salt,
        (false, false) => format!("{}-{}", base, salt),
    }
}

/// Slug salted with the base-36 rendering of a freshly issued entity id.
pub fn generate_for(raw_title: &str, id: EntityId) -> String {
    generate(raw_title, &id.to_base36())
}

// Translation resolution - one fallback policy for every read path

use crate::core::Language;

/// Anything tagged with a language
pub trait Localized {
    fn language(&self) -> Language;
}

/// Pick the translation to surface for `requested`.
///
/// Order: exact match, then `default`, then the first translation in stored
/// order. `None` only when there are no translations at all.
pub fn resolve<'a, T: Localized>(
    translations: &'a [T],
    requested: Language,
    default: Language,
) -> Option<&'a T> {
    let by_language = |language: Language| translations.iter().find(|t| t.language() == language);

    by_language(requested)
        .or_else(|| {
            if default != requested {
                by_language(default)
            } else {
                None
            }
        })
        .or_else(|| translations.first())
}

//! Language type: the closed set of content languages.
//!
//! Tags are accepted case-insensitively (`"tr"`, `"Tr"`, `" EN "`) and always
//! rendered upper-case. Anything outside the set is rejected before it can
//! reach persistence.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Tr,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Tr, Language::En];

    /// Upper-case tag as stored and serialized.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Tr => "TR",
            Language::En => "EN",
        }
    }

    /// Pick the preferred supported language out of an `Accept-Language` header.
    ///
    /// Highest quality weight wins, ties go to the earlier tag. Tags with
    /// `q=0` are not acceptable and never chosen. Region subtags are dropped,
    /// so `en-GB` selects `EN`.
    pub fn from_accept_language(header: &str) -> Option<Language> {
        let mut best: Option<(f32, Language)> = None;

        for part in header.split(',') {
            let mut pieces = part.split(';');
            let tag = pieces.next().unwrap_or_default().trim();
            let Some(language) = tag
                .split(['-', '_'])
                .next()
                .and_then(|primary| primary.parse::<Language>().ok())
            else {
                continue;
            };

            let quality = pieces
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            if quality <= 0.0 {
                continue;
            }

            if best.map_or(true, |(q, _)| quality > q) {
                best = Some((quality, language));
            }
        }

        best.map(|(_, language)| language)
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TR" => Ok(Language::Tr),
            "EN" => Ok(Language::En),
            _ => Err(AppError::Validation(format!(
                "Unsupported language tag: '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("tr".parse::<Language>().unwrap(), Language::Tr);
        assert_eq!("Tr".parse::<Language>().unwrap(), Language::Tr);
        assert_eq!(" en ".parse::<Language>().unwrap(), Language::En);
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
    }

    #[test]
    fn test_parse_rejects_unknown_tags() {
        let err = "fr".parse::<Language>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!("".parse::<Language>().is_err());
        assert!("english".parse::<Language>().is_err());
    }

    #[test]
    fn test_code_is_uppercase() {
        for language in Language::ALL {
            assert_eq!(language.code(), language.code().to_ascii_uppercase());
            assert_eq!(language.to_string(), language.code());
        }
    }

    #[test]
    fn test_serde_roundtrip_normalizes() {
        let parsed: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Language::En);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"EN\"");
        assert!(serde_json::from_str::<Language>("\"de\"").is_err());
    }

    #[test]
    fn test_accept_language() {
        assert_eq!(
            Language::from_accept_language("en-GB,en;q=0.9,tr;q=0.8"),
            Some(Language::En)
        );
        assert_eq!(
            Language::from_accept_language("de-DE, tr;q=0.5"),
            Some(Language::Tr)
        );
        assert_eq!(Language::from_accept_language("de, fr"), None);
        assert_eq!(Language::from_accept_language(""), None);
    }

    #[test]
    fn test_accept_language_honours_weights() {
        assert_eq!(Language::from_accept_language("en;q=0, tr"), Some(Language::Tr));
        assert_eq!(Language::from_accept_language("en;q=0"), None);
        assert_eq!(
            Language::from_accept_language("en;q=0.3, tr;q=0.7"),
            Some(Language::Tr)
        );
        assert_eq!(
            Language::from_accept_language("tr;q=0.5, en;q=0.5"),
            Some(Language::Tr)
        );
    }
}

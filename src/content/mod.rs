//! Multilingual content model.
//!
//! Every content kind is stored as a language-neutral parent row plus one
//! translation row per language. A [`ContentKind`] describes both halves of a
//! kind: its neutral fields, its text fields, and how each maps onto columns.
//! The storage layer builds its SQL from that description, so the four kinds
//! share one code path for reads and writes.
//!
//! - `kinds`: the concrete kinds (lawyer, announcement, event, publication)
//! - `resolver`: picks which translation to surface for a language
//! - `projector`: flattens entity + translation into the outward record

pub mod kinds;
pub mod projector;
pub mod resolver;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::Sqlite;

use crate::core::{EntityId, EntityKind, Language};
use crate::error::AppResult;

pub use kinds::{
    Announcement, AnnouncementFields, ArticleText, Event, EventFields, Lawyer, LawyerFields,
    LawyerText, Publication, PublicationFields,
};
pub use projector::{project, OutwardRecord};
pub use resolver::{resolve, Localized};

pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Description of one translatable content kind.
pub trait ContentKind: Send + Sync + 'static {
    const KIND: EntityKind;

    /// Language-independent fields of the parent row
    type Fields: Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync;

    /// Language-specific fields of a translation row. `Default` must give
    /// empty strings; it is what a missing translation projects as.
    type Text: Serialize + DeserializeOwned + Clone + Default + std::fmt::Debug + PartialEq + Send + Sync;

    /// Column definitions for the neutral fields, in `FIELD_COLUMNS` order
    const FIELD_DDL: &'static str;
    const FIELD_COLUMNS: &'static [&'static str];

    /// Column definitions for the text fields, in `TEXT_COLUMNS` order
    const TEXT_DDL: &'static str;
    const TEXT_COLUMNS: &'static [&'static str];

    /// ORDER BY clause used for listings
    const LIST_ORDER: &'static str;

    /// Column holding the published flag, if the kind has one
    const PUBLISHED_COLUMN: Option<&'static str> = None;

    /// Binds the neutral fields in `FIELD_COLUMNS` order
    fn bind_fields<'q>(query: SqliteQuery<'q>, fields: &'q Self::Fields) -> SqliteQuery<'q>;

    fn fields_from_row(row: &SqliteRow) -> Result<Self::Fields, sqlx::Error>;

    /// Binds the text fields in `TEXT_COLUMNS` order
    fn bind_text<'q>(query: SqliteQuery<'q>, text: &'q Self::Text) -> SqliteQuery<'q>;

    fn text_from_row(row: &SqliteRow) -> Result<Self::Text, sqlx::Error>;

    /// The primary text of a translation (title, or name for lawyers).
    /// A translation whose primary text is blank counts as not provided.
    fn primary_text(text: &Self::Text) -> &str;

    /// Checks required neutral fields before anything is written
    fn validate(_fields: &Self::Fields) -> AppResult<()> {
        Ok(())
    }
}

/// A stored language-neutral parent row
#[derive(Debug, Clone)]
pub struct Entity<K: ContentKind> {
    pub id: EntityId,
    pub slug: String,
    pub fields: K::Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored translation row
#[derive(Debug, Clone)]
pub struct Translation<K: ContentKind> {
    pub entity_id: EntityId,
    pub language: Language,
    pub text: K::Text,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<K: ContentKind> Localized for Translation<K> {
    fn language(&self) -> Language {
        self.language
    }
}

/// Translation payload supplied by a caller: `{ "language": "tr", ...text }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TranslationInput<K: ContentKind> {
    pub language: Language,
    #[serde(flatten)]
    pub text: K::Text,
}

impl<K: ContentKind> TranslationInput<K> {
    pub fn new(language: Language, text: K::Text) -> Self {
        Self { language, text }
    }

    /// Whether the primary text carries anything besides whitespace
    pub fn is_provided(&self) -> bool {
        !K::primary_text(&self.text).trim().is_empty()
    }
}

/// Parent row together with all of its translations, in stored order
#[derive(Debug, Clone)]
pub struct ContentItem<K: ContentKind> {
    pub entity: Entity<K>,
    pub translations: Vec<Translation<K>>,
}

impl<K: ContentKind> ContentItem<K> {
    /// Resolve a translation for `requested` and flatten it onto the entity
    pub fn localize(&self, requested: Language, default: Language) -> OutwardRecord<K> {
        project(&self.entity, resolve(&self.translations, requested, default))
    }

    pub fn translation(&self, language: Language) -> Option<&Translation<K>> {
        self.translations.iter().find(|t| t.language == language)
    }

    pub fn languages(&self) -> Vec<Language> {
        self.translations.iter().map(|t| t.language).collect()
    }
}

/// Payload accepted by create: entity fields plus a translations array
#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "")]
pub struct CreateRequest<K: ContentKind> {
    #[serde(flatten)]
    pub fields: K::Fields,
    #[serde(default)]
    pub translations: Vec<TranslationInput<K>>,
}

/// Payload accepted by update.
///
/// `translation` is the primary (currently edited) language; `translations`
/// carries any additional languages saved in the same request.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "")]
pub struct UpdateRequest<K: ContentKind> {
    #[serde(flatten)]
    pub fields: K::Fields,
    #[serde(default)]
    pub translation: Option<TranslationInput<K>>,
    #[serde(default)]
    pub translations: Vec<TranslationInput<K>>,
}

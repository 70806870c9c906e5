// Read projection - flattens entity + resolved translation into one record

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::{ContentKind, Entity, Translation};
use crate::core::{EntityId, Language};

/// API-facing record: entity fields and translation fields side by side at
/// the top level. The translation collection itself never appears.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct OutwardRecord<K: ContentKind> {
    pub id: EntityId,
    pub slug: String,
    #[serde(flatten)]
    pub fields: K::Fields,
    #[serde(flatten)]
    pub text: K::Text,
    /// Language of the translation actually surfaced, if any
    pub language: Option<Language>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Merge `resolved` onto `entity`. Without a translation every text field
/// projects as an empty string.
pub fn project<K: ContentKind>(
    entity: &Entity<K>,
    resolved: Option<&Translation<K>>,
) -> OutwardRecord<K> {
    OutwardRecord {
        id: entity.id,
        slug: entity.slug.clone(),
        fields: entity.fields.clone(),
        text: resolved.map(|t| t.text.clone()).unwrap_or_default(),
        language: resolved.map(|t| t.language),
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

// Content Service - write coordination and localized reads for one content kind
//
// Writes run as one transaction each: parent row first, then every
// translation keyed by (entity id, language). Reads load the parent with its
// translations and hand them to the resolver/projector.

use chrono::Utc;
use sqlx::sqlite::SqliteConnection;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::content::{
    ContentItem, ContentKind, Entity, OutwardRecord, Translation, TranslationInput,
};
use crate::core::slug::{self, PLACEHOLDER_TITLE};
use crate::core::{EntityId, IdGenerator, Language};
use crate::error::{AppError, AppResult};
use crate::infrastructure::content_store::{ContentStore, ListFilter};
use crate::infrastructure::Database;

pub struct ContentService<K: ContentKind> {
    db: Database,
    ids: Arc<IdGenerator>,
    default_language: Language,
    _kind: PhantomData<K>,
}

impl<K: ContentKind> Clone for ContentService<K> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            ids: self.ids.clone(),
            default_language: self.default_language,
            _kind: PhantomData,
        }
    }
}

fn not_found<K: ContentKind>(id: EntityId) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", K::KIND, id))
}

impl<K: ContentKind> ContentService<K> {
    pub fn new(db: Database, ids: Arc<IdGenerator>, default_language: Language) -> Self {
        Self {
            db,
            ids,
            default_language,
            _kind: PhantomData,
        }
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    // ==================== Writes ====================

    /// Create an entity with its translations in one transaction.
    ///
    /// Translations with a blank primary text are dropped. The slug comes from
    /// the first remaining translation, in the order given.
    pub async fn create(
        &self,
        fields: K::Fields,
        translations: Vec<TranslationInput<K>>,
    ) -> AppResult<ContentItem<K>> {
        K::validate(&fields)?;

        let provided: Vec<TranslationInput<K>> =
            translations.into_iter().filter(|t| t.is_provided()).collect();

        let id = self.ids.next_id();
        let title = provided
            .first()
            .map(|t| K::primary_text(&t.text))
            .unwrap_or(PLACEHOLDER_TITLE);
        let now = Utc::now();
        let entity = Entity {
            id,
            slug: slug::generate_for(title, id),
            fields,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin().await?;

        ContentStore::<K>::insert_entity(&mut tx, &entity).await?;

        let mut stored = Vec::with_capacity(provided.len());
        for input in provided {
            ContentStore::<K>::insert_translation(&mut tx, id, &input, now).await?;
            stored.push(Translation {
                entity_id: id,
                language: input.language,
                text: input.text,
                created_at: now,
                updated_at: now,
            });
        }

        Database::commit(tx).await?;

        info!(
            "Created {} {} (slug: {}, translations: {})",
            K::KIND,
            id,
            entity.slug,
            stored.len()
        );

        Ok(ContentItem {
            entity,
            translations: stored,
        })
    }

    /// Replace the entity's fields and upsert the given translations.
    ///
    /// Languages not mentioned keep their stored translation. The slug is
    /// never regenerated.
    pub async fn update(
        &self,
        id: EntityId,
        fields: K::Fields,
        primary: Option<TranslationInput<K>>,
        additional: Vec<TranslationInput<K>>,
    ) -> AppResult<ContentItem<K>> {
        K::validate(&fields)?;

        let inputs: Vec<TranslationInput<K>> = primary
            .into_iter()
            .chain(additional)
            .filter(|t| t.is_provided())
            .collect();

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        if !ContentStore::<K>::update_entity(&mut tx, id, &fields, now).await? {
            return Err(not_found::<K>(id));
        }

        for input in &inputs {
            ContentStore::<K>::upsert_translation(&mut tx, id, input, now).await?;
        }

        let item = Self::load(&mut tx, id).await?;
        Database::commit(tx).await?;

        info!(
            "Updated {} {} ({} translation(s) written)",
            K::KIND,
            id,
            inputs.len()
        );
        Ok(item)
    }

    /// Hard delete; translations go with the parent
    pub async fn delete(&self, id: EntityId) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        if !ContentStore::<K>::delete_entity(&mut tx, id).await? {
            return Err(not_found::<K>(id));
        }

        Database::commit(tx).await?;
        info!("Deleted {} {}", K::KIND, id);
        Ok(())
    }

    // ==================== Reads ====================

    async fn load(conn: &mut SqliteConnection, id: EntityId) -> AppResult<ContentItem<K>> {
        let entity = ContentStore::<K>::fetch_entity(conn, id)
            .await?
            .ok_or_else(|| not_found::<K>(id))?;
        let translations = ContentStore::<K>::fetch_translations(conn, id).await?;
        Ok(ContentItem {
            entity,
            translations,
        })
    }

    pub async fn get(&self, id: EntityId) -> AppResult<ContentItem<K>> {
        let mut conn = self.db.pool().acquire().await?;
        Self::load(&mut conn, id).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> AppResult<ContentItem<K>> {
        let mut conn = self.db.pool().acquire().await?;
        let entity = ContentStore::<K>::fetch_entity_by_slug(&mut conn, slug)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("{} with slug '{}' not found", K::KIND, slug))
            })?;
        let translations = ContentStore::<K>::fetch_translations(&mut conn, entity.id).await?;
        Ok(ContentItem {
            entity,
            translations,
        })
    }

    pub async fn list(&self, filter: &ListFilter) -> AppResult<Vec<ContentItem<K>>> {
        let mut conn = self.db.pool().acquire().await?;
        let entities = ContentStore::<K>::list_entities(&mut conn, filter).await?;
        let ids: Vec<EntityId> = entities.iter().map(|e| e.id).collect();
        let mut grouped = ContentStore::<K>::fetch_translations_for(&mut conn, &ids).await?;

        let items: Vec<ContentItem<K>> = entities
            .into_iter()
            .map(|entity| {
                let translations = grouped.remove(&entity.id).unwrap_or_default();
                if translations.is_empty() {
                    warn!("{} {} has no translations", K::KIND, entity.id);
                }
                ContentItem {
                    entity,
                    translations,
                }
            })
            .collect();

        debug!("Listed {} {} item(s)", items.len(), K::KIND);
        Ok(items)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let mut conn = self.db.pool().acquire().await?;
        ContentStore::<K>::count_entities(&mut conn).await
    }

    // ==================== Localized reads ====================

    pub async fn get_localized(&self, id: EntityId, language: Language) -> AppResult<OutwardRecord<K>> {
        Ok(self.get(id).await?.localize(language, self.default_language))
    }

    pub async fn get_localized_by_slug(
        &self,
        slug: &str,
        language: Language,
    ) -> AppResult<OutwardRecord<K>> {
        Ok(self
            .get_by_slug(slug)
            .await?
            .localize(language, self.default_language))
    }

    pub async fn list_localized(
        &self,
        filter: &ListFilter,
        language: Language,
    ) -> AppResult<Vec<OutwardRecord<K>>> {
        Ok(self
            .list(filter)
            .await?
            .iter()
            .map(|item| item.localize(language, self.default_language))
            .collect())
    }
}

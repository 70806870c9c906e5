// Content Store - parent rows and the per-language translation side table
//
// SQL is assembled from the column lists of a `ContentKind`, so every kind
// gets the same statements. All functions take a connection; callers decide
// whether it belongs to a transaction.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::HashMap;
use std::marker::PhantomData;

use crate::content::{ContentKind, Entity, Translation, TranslationInput};
use crate::core::{EntityId, Language};
use crate::error::{AppError, AppResult};

/// Listing filter; `published` is ignored for kinds without the flag
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub published: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListFilter {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 500;

    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Default::default()
        }
    }

    fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

pub struct ContentStore<K: ContentKind> {
    _kind: PhantomData<K>,
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

impl<K: ContentKind> ContentStore<K> {
    fn entity_columns() -> String {
        let mut columns = vec!["id", "slug"];
        columns.extend_from_slice(K::FIELD_COLUMNS);
        columns.extend_from_slice(&["created_at", "updated_at"]);
        columns.join(", ")
    }

    fn translation_columns() -> String {
        let mut columns = vec!["entity_id", "language"];
        columns.extend_from_slice(K::TEXT_COLUMNS);
        columns.extend_from_slice(&["created_at", "updated_at"]);
        columns.join(", ")
    }

    fn entity_from_row(row: &SqliteRow) -> Result<Entity<K>, sqlx::Error> {
        Ok(Entity {
            id: row.try_get("id")?,
            slug: row.try_get("slug")?,
            fields: K::fields_from_row(row)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn translation_from_row(row: &SqliteRow) -> Result<Translation<K>, sqlx::Error> {
        let code: String = row.try_get("language")?;
        let language: Language = code
            .parse()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Translation {
            entity_id: row.try_get("entity_id")?,
            language,
            text: K::text_from_row(row)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Create the parent and translation tables for this kind
    pub async fn create_tables(conn: &mut SqliteConnection) -> AppResult<()> {
        let kind = K::KIND;
        let languages = Language::ALL
            .iter()
            .map(|l| format!("'{}'", l.code()))
            .collect::<Vec<_>>()
            .join(", ");

        let parent = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                {fields},
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            table = kind.table(),
            fields = K::FIELD_DDL,
        );
        sqlx::query(&parent).execute(&mut *conn).await?;

        // Own autoincrement id keeps "stored order" well defined
        let translations = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                entity_id INTEGER NOT NULL REFERENCES {parent}(id) ON DELETE CASCADE,
                language TEXT NOT NULL CHECK (language IN ({languages})),
                {text},
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (entity_id, language)
            )",
            table = kind.translation_table(),
            parent = kind.table(),
            languages = languages,
            text = K::TEXT_DDL,
        );
        sqlx::query(&translations).execute(&mut *conn).await?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_entity ON {table}(entity_id)",
            table = kind.translation_table(),
        );
        sqlx::query(&index).execute(&mut *conn).await?;

        Ok(())
    }

    pub async fn insert_entity(conn: &mut SqliteConnection, entity: &Entity<K>) -> AppResult<()> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            K::KIND.table(),
            Self::entity_columns(),
            placeholders(K::FIELD_COLUMNS.len() + 4),
        );

        let query = sqlx::query(&sql).bind(entity.id).bind(&entity.slug);
        K::bind_fields(query, &entity.fields)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Replace the neutral fields wholesale. The slug is never touched.
    /// Returns false when no row has `id`.
    pub async fn update_entity(
        conn: &mut SqliteConnection,
        id: EntityId,
        fields: &K::Fields,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let assignments = K::FIELD_COLUMNS
            .iter()
            .map(|c| format!("{} = ?", c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {}, updated_at = ? WHERE id = ?",
            K::KIND.table(),
            assignments
        );

        let result = K::bind_fields(sqlx::query(&sql), fields)
            .bind(now)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the parent and its translations. Returns false when no row has `id`.
    pub async fn delete_entity(conn: &mut SqliteConnection, id: EntityId) -> AppResult<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE entity_id = ?",
            K::KIND.translation_table()
        );
        sqlx::query(&sql).bind(id).execute(&mut *conn).await?;

        let sql = format!("DELETE FROM {} WHERE id = ?", K::KIND.table());
        let result = sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn fetch_entity(
        conn: &mut SqliteConnection,
        id: EntityId,
    ) -> AppResult<Option<Entity<K>>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            Self::entity_columns(),
            K::KIND.table()
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;
        Ok(row.as_ref().map(Self::entity_from_row).transpose()?)
    }

    pub async fn fetch_entity_by_slug(
        conn: &mut SqliteConnection,
        slug: &str,
    ) -> AppResult<Option<Entity<K>>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE slug = ?",
            Self::entity_columns(),
            K::KIND.table()
        );
        let row = sqlx::query(&sql).bind(slug).fetch_optional(&mut *conn).await?;
        Ok(row.as_ref().map(Self::entity_from_row).transpose()?)
    }

    pub async fn list_entities(
        conn: &mut SqliteConnection,
        filter: &ListFilter,
    ) -> AppResult<Vec<Entity<K>>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {}",
            Self::entity_columns(),
            K::KIND.table()
        ));

        if let (Some(column), Some(published)) = (K::PUBLISHED_COLUMN, filter.published) {
            qb.push(format!(" WHERE {} = ", column));
            qb.push_bind(published);
        }

        qb.push(format!(" ORDER BY {} LIMIT ", K::LIST_ORDER));
        qb.push_bind(filter.limit());
        qb.push(" OFFSET ");
        qb.push_bind(filter.offset());

        let rows = qb.build().fetch_all(&mut *conn).await?;
        rows.iter()
            .map(|row| Self::entity_from_row(row).map_err(AppError::from))
            .collect()
    }

    pub async fn count_entities(conn: &mut SqliteConnection) -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", K::KIND.table());
        let row = sqlx::query(&sql).fetch_one(&mut *conn).await?;
        Ok(row.try_get(0)?)
    }

    /// Plain insert: a second row for the same language is a uniqueness violation
    pub async fn insert_translation(
        conn: &mut SqliteConnection,
        entity_id: EntityId,
        input: &TranslationInput<K>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            K::KIND.translation_table(),
            Self::translation_columns(),
            placeholders(K::TEXT_COLUMNS.len() + 4),
        );

        let query = sqlx::query(&sql)
            .bind(entity_id)
            .bind(input.language.code());
        K::bind_text(query, &input.text)
            .bind(now)
            .bind(now)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Insert or update the row keyed by (entity_id, language)
    pub async fn upsert_translation(
        conn: &mut SqliteConnection,
        entity_id: EntityId,
        input: &TranslationInput<K>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let updates = K::TEXT_COLUMNS
            .iter()
            .map(|c| format!("{c} = excluded.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})
             ON CONFLICT (entity_id, language) DO UPDATE SET {}, updated_at = excluded.updated_at",
            K::KIND.translation_table(),
            Self::translation_columns(),
            placeholders(K::TEXT_COLUMNS.len() + 4),
            updates,
        );

        let query = sqlx::query(&sql)
            .bind(entity_id)
            .bind(input.language.code());
        K::bind_text(query, &input.text)
            .bind(now)
            .bind(now)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// All translations of one entity, in stored order
    pub async fn fetch_translations(
        conn: &mut SqliteConnection,
        entity_id: EntityId,
    ) -> AppResult<Vec<Translation<K>>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE entity_id = ? ORDER BY id ASC",
            Self::translation_columns(),
            K::KIND.translation_table()
        );
        let rows = sqlx::query(&sql).bind(entity_id).fetch_all(&mut *conn).await?;
        rows.iter()
            .map(|row| Self::translation_from_row(row).map_err(AppError::from))
            .collect()
    }

    /// Translations of many entities at once, grouped by entity, each group in stored order
    pub async fn fetch_translations_for(
        conn: &mut SqliteConnection,
        ids: &[EntityId],
    ) -> AppResult<HashMap<EntityId, Vec<Translation<K>>>> {
        let mut grouped: HashMap<EntityId, Vec<Translation<K>>> = HashMap::new();
        if ids.is_empty() {
            return Ok(grouped);
        }

        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {} WHERE entity_id IN (",
            Self::translation_columns(),
            K::KIND.translation_table()
        ));
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        qb.push(") ORDER BY id ASC");

        let rows = qb.build().fetch_all(&mut *conn).await?;
        for row in &rows {
            let translation = Self::translation_from_row(row)?;
            grouped
                .entry(translation.entity_id)
                .or_default()
                .push(translation);
        }
        Ok(grouped)
    }

    pub async fn count_translations(
        conn: &mut SqliteConnection,
        entity_id: EntityId,
    ) -> AppResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE entity_id = ?",
            K::KIND.translation_table()
        );
        let row = sqlx::query(&sql).bind(entity_id).fetch_one(&mut *conn).await?;
        Ok(row.try_get(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Lawyer, LawyerFields, LawyerText};
    use crate::infrastructure::Database;

    fn lawyer(id: i64, slug: &str) -> Entity<Lawyer> {
        let now = Utc::now();
        Entity {
            id: EntityId::new(id),
            slug: slug.to_string(),
            fields: LawyerFields {
                is_partner: true,
                rank: 3,
                ..Default::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_entity() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        ContentStore::<Lawyer>::insert_entity(&mut conn, &lawyer(1, "a-1")).await.unwrap();
        let fetched = ContentStore::<Lawyer>::fetch_entity(&mut conn, EntityId::new(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.slug, "a-1");
        assert!(fetched.fields.is_partner);
        assert_eq!(fetched.fields.rank, 3);

        let by_slug = ContentStore::<Lawyer>::fetch_entity_by_slug(&mut conn, "a-1")
            .await
            .unwrap();
        assert_eq!(by_slug.unwrap().id, EntityId::new(1));
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        ContentStore::<Lawyer>::insert_entity(&mut conn, &lawyer(1, "same")).await.unwrap();
        let err = ContentStore::<Lawyer>::insert_entity(&mut conn, &lawyer(2, "same"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_upsert_translation_updates_in_place() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        let id = EntityId::new(1);
        ContentStore::<Lawyer>::insert_entity(&mut conn, &lawyer(1, "x")).await.unwrap();

        let first = TranslationInput::<Lawyer>::new(Language::En, LawyerText::new("Old", "", ""));
        let second = TranslationInput::<Lawyer>::new(Language::En, LawyerText::new("New", "", ""));
        ContentStore::<Lawyer>::upsert_translation(&mut conn, id, &first, Utc::now()).await.unwrap();
        ContentStore::<Lawyer>::upsert_translation(&mut conn, id, &second, Utc::now()).await.unwrap();

        let rows = ContentStore::<Lawyer>::fetch_translations(&mut conn, id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text.name, "New");
    }

    #[tokio::test]
    async fn test_translation_requires_parent() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let input = TranslationInput::<Lawyer>::new(Language::Tr, LawyerText::new("Orphan", "", ""));
        let err = ContentStore::<Lawyer>::insert_translation(&mut conn, EntityId::new(99), &input, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_translations_for_groups_by_entity() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        for (id, slug) in [(1, "one"), (2, "two")] {
            ContentStore::<Lawyer>::insert_entity(&mut conn, &lawyer(id, slug)).await.unwrap();
        }
        let now = Utc::now();
        for (id, language, name) in [
            (1, Language::Tr, "Bir"),
            (2, Language::En, "Two"),
            (1, Language::En, "One"),
        ] {
            let input = TranslationInput::<Lawyer>::new(language, LawyerText::new(name, "", ""));
            ContentStore::<Lawyer>::insert_translation(&mut conn, EntityId::new(id), &input, now)
                .await
                .unwrap();
        }

        let grouped = ContentStore::<Lawyer>::fetch_translations_for(
            &mut conn,
            &[EntityId::new(1), EntityId::new(2)],
        )
        .await
        .unwrap();
        let first: Vec<_> = grouped[&EntityId::new(1)].iter().map(|t| t.language).collect();
        assert_eq!(first, vec![Language::Tr, Language::En]);
        assert_eq!(grouped[&EntityId::new(2)].len(), 1);

        let empty = ContentStore::<Lawyer>::fetch_translations_for(&mut conn, &[]).await.unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_list_filter_clamps() {
        let filter = ListFilter {
            published: None,
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(filter.limit(), ListFilter::MAX_LIMIT);
        assert_eq!(filter.offset(), 0);
        assert_eq!(ListFilter::default().limit(), ListFilter::DEFAULT_LIMIT);
    }
}

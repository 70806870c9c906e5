// Content kinds - lawyers, announcements, events, publications

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{ContentKind, SqliteQuery};
use crate::core::EntityKind;
use crate::error::{AppError, AppResult};

fn require_non_blank(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("'{}' is required", field)));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared text block for article-like content

/// Title / excerpt / body text shared by announcements, events and publications
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleText {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
}

impl ArticleText {
    pub fn new(title: &str, excerpt: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            content: content.to_string(),
        }
    }
}

const ARTICLE_TEXT_DDL: &str = "title TEXT NOT NULL DEFAULT '',
                excerpt TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL DEFAULT ''";
const ARTICLE_TEXT_COLUMNS: &[&str] = &["title", "excerpt", "content"];

fn bind_article_text<'q>(query: SqliteQuery<'q>, text: &'q ArticleText) -> SqliteQuery<'q> {
    query.bind(&text.title).bind(&text.excerpt).bind(&text.content)
}

fn article_text_from_row(row: &SqliteRow) -> Result<ArticleText, sqlx::Error> {
    Ok(ArticleText {
        title: row.try_get("title")?,
        excerpt: row.try_get("excerpt")?,
        content: row.try_get("content")?,
    })
}

// ---------------------------------------------------------------------------
// Lawyer

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lawyer;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawyerFields {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_partner: bool,
    #[serde(default)]
    pub is_founder: bool,
    #[serde(default)]
    pub is_intern: bool,
    #[serde(default)]
    pub has_phd: bool,
    /// Position on the team page, ascending
    #[serde(default)]
    pub rank: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawyerText {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
}

impl LawyerText {
    pub fn new(name: &str, title: &str, bio: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            bio: bio.to_string(),
        }
    }
}

impl ContentKind for Lawyer {
    const KIND: EntityKind = EntityKind::Lawyer;
    type Fields = LawyerFields;
    type Text = LawyerText;

    const FIELD_DDL: &'static str = "image TEXT,
                is_partner INTEGER NOT NULL DEFAULT 0,
                is_founder INTEGER NOT NULL DEFAULT 0,
                is_intern INTEGER NOT NULL DEFAULT 0,
                has_phd INTEGER NOT NULL DEFAULT 0,
                rank INTEGER NOT NULL DEFAULT 0";
    const FIELD_COLUMNS: &'static [&'static str] =
        &["image", "is_partner", "is_founder", "is_intern", "has_phd", "rank"];

    const TEXT_DDL: &'static str = "name TEXT NOT NULL DEFAULT '',
                title TEXT NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT ''";
    const TEXT_COLUMNS: &'static [&'static str] = &["name", "title", "bio"];

    const LIST_ORDER: &'static str = "rank ASC, id ASC";

    fn bind_fields<'q>(query: SqliteQuery<'q>, fields: &'q LawyerFields) -> SqliteQuery<'q> {
        query
            .bind(&fields.image)
            .bind(fields.is_partner)
            .bind(fields.is_founder)
            .bind(fields.is_intern)
            .bind(fields.has_phd)
            .bind(fields.rank)
    }

    fn fields_from_row(row: &SqliteRow) -> Result<LawyerFields, sqlx::Error> {
        Ok(LawyerFields {
            image: row.try_get("image")?,
            is_partner: row.try_get("is_partner")?,
            is_founder: row.try_get("is_founder")?,
            is_intern: row.try_get("is_intern")?,
            has_phd: row.try_get("has_phd")?,
            rank: row.try_get("rank")?,
        })
    }

    fn bind_text<'q>(query: SqliteQuery<'q>, text: &'q LawyerText) -> SqliteQuery<'q> {
        query.bind(&text.name).bind(&text.title).bind(&text.bio)
    }

    fn text_from_row(row: &SqliteRow) -> Result<LawyerText, sqlx::Error> {
        Ok(LawyerText {
            name: row.try_get("name")?,
            title: row.try_get("title")?,
            bio: row.try_get("bio")?,
        })
    }

    fn primary_text(text: &LawyerText) -> &str {
        &text.name
    }

    fn validate(fields: &LawyerFields) -> AppResult<()> {
        if fields.rank < 0 {
            return Err(AppError::Validation("'rank' must not be negative".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Announcement

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Announcement;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementFields {
    pub date: NaiveDate,
    pub year: i32,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
    /// Rendered on the dark card theme
    #[serde(default)]
    pub is_dark: bool,
    #[serde(default)]
    pub published: bool,
}

impl ContentKind for Announcement {
    const KIND: EntityKind = EntityKind::Announcement;
    type Fields = AnnouncementFields;
    type Text = ArticleText;

    const FIELD_DDL: &'static str = "date TEXT NOT NULL,
                year INTEGER NOT NULL,
                image TEXT,
                category TEXT NOT NULL,
                is_dark INTEGER NOT NULL DEFAULT 0,
                published INTEGER NOT NULL DEFAULT 0";
    const FIELD_COLUMNS: &'static [&'static str] =
        &["date", "year", "image", "category", "is_dark", "published"];

    const TEXT_DDL: &'static str = ARTICLE_TEXT_DDL;
    const TEXT_COLUMNS: &'static [&'static str] = ARTICLE_TEXT_COLUMNS;

    const LIST_ORDER: &'static str = "date DESC, id DESC";
    const PUBLISHED_COLUMN: Option<&'static str> = Some("published");

    fn bind_fields<'q>(query: SqliteQuery<'q>, fields: &'q AnnouncementFields) -> SqliteQuery<'q> {
        query
            .bind(fields.date)
            .bind(fields.year)
            .bind(&fields.image)
            .bind(&fields.category)
            .bind(fields.is_dark)
            .bind(fields.published)
    }

    fn fields_from_row(row: &SqliteRow) -> Result<AnnouncementFields, sqlx::Error> {
        Ok(AnnouncementFields {
            date: row.try_get("date")?,
            year: row.try_get("year")?,
            image: row.try_get("image")?,
            category: row.try_get("category")?,
            is_dark: row.try_get("is_dark")?,
            published: row.try_get("published")?,
        })
    }

    fn bind_text<'q>(query: SqliteQuery<'q>, text: &'q ArticleText) -> SqliteQuery<'q> {
        bind_article_text(query, text)
    }

    fn text_from_row(row: &SqliteRow) -> Result<ArticleText, sqlx::Error> {
        article_text_from_row(row)
    }

    fn primary_text(text: &ArticleText) -> &str {
        &text.title
    }

    fn validate(fields: &AnnouncementFields) -> AppResult<()> {
        require_non_blank(&fields.category, "category")?;
        if !(1900..=9999).contains(&fields.year) {
            return Err(AppError::Validation(format!(
                "'year' out of range: {}",
                fields.year
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Event

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Event;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    pub date: NaiveDate,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub published: bool,
}

impl ContentKind for Event {
    const KIND: EntityKind = EntityKind::Event;
    type Fields = EventFields;
    type Text = ArticleText;

    const FIELD_DDL: &'static str = "date TEXT NOT NULL,
                location TEXT NOT NULL DEFAULT '',
                image TEXT,
                category TEXT NOT NULL DEFAULT '',
                published INTEGER NOT NULL DEFAULT 0";
    const FIELD_COLUMNS: &'static [&'static str] =
        &["date", "location", "image", "category", "published"];

    const TEXT_DDL: &'static str = ARTICLE_TEXT_DDL;
    const TEXT_COLUMNS: &'static [&'static str] = ARTICLE_TEXT_COLUMNS;

    const LIST_ORDER: &'static str = "date DESC, id DESC";
    const PUBLISHED_COLUMN: Option<&'static str> = Some("published");

    fn bind_fields<'q>(query: SqliteQuery<'q>, fields: &'q EventFields) -> SqliteQuery<'q> {
        query
            .bind(fields.date)
            .bind(&fields.location)
            .bind(&fields.image)
            .bind(&fields.category)
            .bind(fields.published)
    }

    fn fields_from_row(row: &SqliteRow) -> Result<EventFields, sqlx::Error> {
        Ok(EventFields {
            date: row.try_get("date")?,
            location: row.try_get("location")?,
            image: row.try_get("image")?,
            category: row.try_get("category")?,
            published: row.try_get("published")?,
        })
    }

    fn bind_text<'q>(query: SqliteQuery<'q>, text: &'q ArticleText) -> SqliteQuery<'q> {
        bind_article_text(query, text)
    }

    fn text_from_row(row: &SqliteRow) -> Result<ArticleText, sqlx::Error> {
        article_text_from_row(row)
    }

    fn primary_text(text: &ArticleText) -> &str {
        &text.title
    }
}

// ---------------------------------------------------------------------------
// Publication

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Publication;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationFields {
    pub date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Link to the full document (PDF) hosted elsewhere
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl ContentKind for Publication {
    const KIND: EntityKind = EntityKind::Publication;
    type Fields = PublicationFields;
    type Text = ArticleText;

    const FIELD_DDL: &'static str = "date TEXT NOT NULL,
                category TEXT NOT NULL,
                image TEXT,
                document_url TEXT,
                published INTEGER NOT NULL DEFAULT 0";
    const FIELD_COLUMNS: &'static [&'static str] =
        &["date", "category", "image", "document_url", "published"];

    const TEXT_DDL: &'static str = ARTICLE_TEXT_DDL;
    const TEXT_COLUMNS: &'static [&'static str] = ARTICLE_TEXT_COLUMNS;

    const LIST_ORDER: &'static str = "date DESC, id DESC";
    const PUBLISHED_COLUMN: Option<&'static str> = Some("published");

    fn bind_fields<'q>(query: SqliteQuery<'q>, fields: &'q PublicationFields) -> SqliteQuery<'q> {
        query
            .bind(fields.date)
            .bind(&fields.category)
            .bind(&fields.image)
            .bind(&fields.document_url)
            .bind(fields.published)
    }

    fn fields_from_row(row: &SqliteRow) -> Result<PublicationFields, sqlx::Error> {
        Ok(PublicationFields {
            date: row.try_get("date")?,
            category: row.try_get("category")?,
            image: row.try_get("image")?,
            document_url: row.try_get("document_url")?,
            published: row.try_get("published")?,
        })
    }

    fn bind_text<'q>(query: SqliteQuery<'q>, text: &'q ArticleText) -> SqliteQuery<'q> {
        bind_article_text(query, text)
    }

    fn text_from_row(row: &SqliteRow) -> Result<ArticleText, sqlx::Error> {
        article_text_from_row(row)
    }

    fn primary_text(text: &ArticleText) -> &str {
        &text.title
    }

    fn validate(fields: &PublicationFields) -> AppResult<()> {
        require_non_blank(&fields.category, "category")
    }
}

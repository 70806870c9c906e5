// Inbox Service - contact form messages and newsletter subscriptions

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

use crate::core::Language;
use crate::error::{AppError, AppResult};
use crate::infrastructure::Database;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    if !EMAIL.is_match(&email) {
        return Err(AppError::Validation(format!("Invalid email address: '{}'", raw)));
    }
    Ok(email)
}

fn require(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            subject: row.try_get("subject")?,
            message: row.try_get("message")?,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Subscriber {
    pub email: String,
    pub language: Language,
    pub subscribed_at: DateTime<Utc>,
    pub first_subscribed_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Subscriber {
    fn from_row(row: &SqliteRow) -> AppResult<Self> {
        let language: String = row.try_get("language")?;
        Ok(Self {
            email: row.try_get("email")?,
            language: language.parse()?,
            subscribed_at: row.try_get("subscribed_at")?,
            first_subscribed_at: row.try_get("first_subscribed_at")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeOutcome {
    Created,
    Reactivated,
    AlreadySubscribed,
}

impl SubscribeOutcome {
    pub fn is_new(&self) -> bool {
        !matches!(self, SubscribeOutcome::AlreadySubscribed)
    }
}

#[derive(Clone)]
pub struct InboxService {
    db: Database,
}

impl InboxService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ==================== Contact messages ====================

    pub async fn submit(&self, submission: ContactSubmission) -> AppResult<ContactMessage> {
        require(&submission.name, "name")?;
        require(&submission.message, "message")?;
        let email = normalize_email(&submission.email)?;

        let message = ContactMessage {
            id: Uuid::new_v4(),
            name: submission.name.trim().to_string(),
            email,
            phone: submission
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            subject: submission.subject.trim().to_string(),
            message: submission.message,
            is_read: false,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO contact_messages (id, name, email, phone, subject, message, is_read, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.is_read)
        .bind(message.created_at)
        .execute(self.db.pool())
        .await?;

        info!("Contact message {} received from {}", message.id, message.email);
        Ok(message)
    }

    /// Newest first
    pub async fn list_messages(&self, unread_only: bool) -> AppResult<Vec<ContactMessage>> {
        let sql = if unread_only {
            "SELECT * FROM contact_messages WHERE is_read = 0 ORDER BY created_at DESC"
        } else {
            "SELECT * FROM contact_messages ORDER BY created_at DESC"
        };
        let rows = sqlx::query(sql).fetch_all(self.db.pool()).await?;
        rows.iter()
            .map(|row| ContactMessage::from_row(row).map_err(AppError::from))
            .collect()
    }

    pub async fn mark_read(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE contact_messages SET is_read = 1 WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Contact message {} not found", id)));
        }
        Ok(())
    }

    pub async fn delete_message(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Contact message {} not found", id)));
        }
        info!("Deleted contact message {}", id);
        Ok(())
    }

    // ==================== Newsletter ====================

    async fn find_subscriber(&self, email: &str) -> AppResult<Option<Subscriber>> {
        let row = sqlx::query("SELECT * FROM newsletter_subscribers WHERE email = ?")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;
        row.as_ref().map(Subscriber::from_row).transpose()
    }

    pub async fn subscribe(
        &self,
        email: &str,
        language: Language,
    ) -> AppResult<(Subscriber, SubscribeOutcome)> {
        let email = normalize_email(email)?;
        let now = Utc::now();

        let outcome = match self.find_subscriber(&email).await? {
            None => SubscribeOutcome::Created,
            Some(existing) if !existing.is_active => SubscribeOutcome::Reactivated,
            Some(_) => SubscribeOutcome::AlreadySubscribed,
        };

        // Single upsert keyed by email; a concurrent subscribe for the same
        // address can only change the reported outcome, never fail the write.
        sqlx::query(
            "INSERT INTO newsletter_subscribers (email, language, subscribed_at, first_subscribed_at, is_active)
             VALUES (?, ?, ?, ?, 1)
             ON CONFLICT (email) DO UPDATE SET
                language = excluded.language,
                subscribed_at = CASE WHEN newsletter_subscribers.is_active = 1
                    THEN newsletter_subscribers.subscribed_at
                    ELSE excluded.subscribed_at END,
                is_active = 1",
        )
        .bind(&email)
        .bind(language.code())
        .bind(now)
        .bind(now)
        .execute(self.db.pool())
        .await?;

        let subscriber = self
            .find_subscriber(&email)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Subscriber {} vanished", email)))?;

        info!("Newsletter subscribe {} ({:?})", email, outcome);
        Ok((subscriber, outcome))
    }

    /// Soft unsubscribe. Returns false when the address was not active.
    pub async fn unsubscribe(&self, email: &str) -> AppResult<bool> {
        let email = normalize_email(email)?;
        let result = sqlx::query(
            "UPDATE newsletter_subscribers SET is_active = 0 WHERE email = ? AND is_active = 1",
        )
        .bind(&email)
        .execute(self.db.pool())
        .await?;

        let changed = result.rows_affected() > 0;
        if changed {
            info!("Newsletter unsubscribe {}", email);
        }
        Ok(changed)
    }

    pub async fn list_active(&self) -> AppResult<Vec<Subscriber>> {
        let rows = sqlx::query(
            "SELECT * FROM newsletter_subscribers WHERE is_active = 1 ORDER BY first_subscribed_at ASC",
        )
        .fetch_all(self.db.pool())
        .await?;
        rows.iter().map(Subscriber::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> InboxService {
        InboxService::new(Database::connect_in_memory().await.unwrap())
    }

    fn submission(email: &str) -> ContactSubmission {
        ContactSubmission {
            name: "Mehmet Demir".to_string(),
            email: email.to_string(),
            phone: Some("  ".to_string()),
            subject: "Danışmanlık".to_string(),
            message: "Merhaba, randevu almak istiyorum.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_and_list_messages() {
        let inbox = service().await;
        let message = inbox.submit(submission("Mehmet@Example.com")).await.unwrap();
        assert_eq!(message.email, "mehmet@example.com");
        assert_eq!(message.phone, None);
        assert!(!message.is_read);

        let all = inbox.list_messages(false).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, message.id);
    }

    #[tokio::test]
    async fn test_submit_validates() {
        let inbox = service().await;
        let err = inbox.submit(submission("not-an-email")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut blank = submission("a@b.co");
        blank.message = "   ".to_string();
        assert!(matches!(
            inbox.submit(blank).await,
            Err(AppError::Validation(_))
        ));
        assert!(inbox.list_messages(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_read_and_delete() {
        let inbox = service().await;
        let first = inbox.submit(submission("a@b.co")).await.unwrap();
        let second = inbox.submit(submission("c@d.co")).await.unwrap();

        inbox.mark_read(first.id).await.unwrap();
        let unread = inbox.list_messages(true).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, second.id);

        inbox.delete_message(first.id).await.unwrap();
        assert!(matches!(
            inbox.delete_message(first.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            inbox.mark_read(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_subscribe_lifecycle() {
        let inbox = service().await;

        let (sub, outcome) = inbox.subscribe("reader@example.com", Language::Tr).await.unwrap();
        assert_eq!(outcome, SubscribeOutcome::Created);
        assert!(sub.is_active);

        let (sub, outcome) = inbox.subscribe("READER@example.com", Language::En).await.unwrap();
        assert_eq!(outcome, SubscribeOutcome::AlreadySubscribed);
        assert!(!outcome.is_new());
        assert_eq!(sub.language, Language::En);

        assert!(inbox.unsubscribe("reader@example.com").await.unwrap());
        assert!(!inbox.unsubscribe("reader@example.com").await.unwrap());
        assert!(inbox.list_active().await.unwrap().is_empty());

        let (sub, outcome) = inbox.subscribe("reader@example.com", Language::Tr).await.unwrap();
        assert_eq!(outcome, SubscribeOutcome::Reactivated);
        assert!(outcome.is_new());
        assert!(sub.subscribed_at >= sub.first_subscribed_at);
        assert_eq!(inbox.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_subscribes_for_one_address() {
        let inbox = service().await;

        let attempts = (0..8).map(|i| {
            let inbox = inbox.clone();
            let language = if i % 2 == 0 { Language::Tr } else { Language::En };
            async move { inbox.subscribe("same@example.com", language).await }
        });
        let results = futures::future::join_all(attempts).await;

        for result in &results {
            assert!(result.is_ok(), "subscribe failed: {:?}", result);
        }
        let active = inbox.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].email, "same@example.com");
    }

    #[tokio::test]
    async fn test_subscribe_rejects_bad_email() {
        let inbox = service().await;
        assert!(matches!(
            inbox.subscribe("nope", Language::Tr).await,
            Err(AppError::Validation(_))
        ));
    }
}

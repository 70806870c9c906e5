// Application services - business rules on top of the storage layer
pub mod content_service;
pub mod inbox_service;

pub use content_service::ContentService;
pub use inbox_service::{ContactMessage, ContactSubmission, InboxService, SubscribeOutcome, Subscriber};

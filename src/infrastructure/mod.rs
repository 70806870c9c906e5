// Persistence infrastructure
pub mod content_store;         // Generic entity + translation tables per content kind
pub mod database;              // SQLite pool, schema bootstrap, transactions

pub use content_store::{ContentStore, ListFilter};
pub use database::Database;

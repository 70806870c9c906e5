// Core types and primitives - ids, languages, slugs

pub mod id_generator;
pub mod language;
pub mod slug;
pub mod strong_types;

// Re-export commonly used types
pub use id_generator::IdGenerator;
pub use language::Language;
pub use strong_types::{EntityId, EntityKind};

// Strong Types - newtypes for identifiers and content kinds

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Strongly-typed content entity ID - prevents confusion with other numeric types.
///
/// Generated ids exceed 2^53, so on the wire they are decimal strings.
/// Deserialization also takes a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Check if this is a valid ID (positive)
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }

    /// Lower-case base-36 rendering, used as the uniqueness salt of slugs
    pub fn to_base36(self) -> String {
        let mut n = self.0.unsigned_abs();
        if n == 0 {
            return "0".to_string();
        }

        let mut digits = Vec::new();
        while n > 0 {
            let d = (n % 36) as u32;
            // d < 36 so from_digit never fails
            digits.push(std::char::from_digit(d, 36).unwrap_or('0'));
            n /= 36;
        }
        digits.iter().rev().collect()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(EntityId)
            .map_err(|_| AppError::Validation(format!("Invalid entity id: '{}'", s)))
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct EntityIdVisitor;

impl<'de> de::Visitor<'de> for EntityIdVisitor {
    type Value = EntityId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an entity id as a decimal string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<EntityId, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<EntityId, E> {
        Ok(EntityId(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<EntityId, E> {
        i64::try_from(v)
            .map(EntityId)
            .map_err(|_| E::custom(format!("entity id {} out of range", v)))
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntityIdVisitor)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// The closed set of translatable content kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Lawyer,
    Announcement,
    Event,
    Publication,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Lawyer => "lawyer",
            EntityKind::Announcement => "announcement",
            EntityKind::Event => "event",
            EntityKind::Publication => "publication",
        }
    }

    /// Parent table name
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Lawyer => "lawyers",
            EntityKind::Announcement => "announcements",
            EntityKind::Event => "events",
            EntityKind::Publication => "publications",
        }
    }

    /// Translation side table name
    pub fn translation_table(&self) -> &'static str {
        match self {
            EntityKind::Lawyer => "lawyer_translations",
            EntityKind::Announcement => "announcement_translations",
            EntityKind::Event => "event_translations",
            EntityKind::Publication => "publication_translations",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

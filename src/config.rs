use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::core::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Language surfaced when the requested one has no translation
    pub default_language: Language,
    /// Node id baked into generated entity ids (0..1024)
    pub node_id: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/lawfirm_cms.db".to_string(),
                max_connections: 5,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            content: ContentConfig {
                default_language: Language::Tr,
                node_id: 0,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_language = match lookup("DEFAULT_LANGUAGE") {
            Some(raw) => raw
                .parse::<Language>()
                .map_err(|e| anyhow::anyhow!("DEFAULT_LANGUAGE: {}", e))?,
            None => defaults.content.default_language,
        };

        let node_id: u16 = lookup("NODE_ID")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.content.node_id);
        if node_id >= 1024 {
            anyhow::bail!("NODE_ID must be below 1024, got {}", node_id);
        }

        Ok(Self {
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.database.max_connections),
            },
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: lookup("SERVER_PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            content: ContentConfig {
                default_language,
                node_id,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    /// Filesystem path of a file-backed SQLite url, None for in-memory
    pub fn file_path(&self) -> Option<PathBuf> {
        let rest = self.url.strip_prefix("sqlite:")?;
        let rest = rest.trim_start_matches("//");
        let path = rest.split('?').next().unwrap_or(rest);
        if path.is_empty() || path.starts_with(":memory:") {
            return None;
        }
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database.url, "sqlite:data/lawfirm_cms.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert_eq!(config.content.default_language, Language::Tr);
        assert_eq!(config.content.node_id, 0);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SERVER_PORT", "8080"),
            ("DEFAULT_LANGUAGE", "en"),
            ("NODE_ID", "12"),
        ]))
        .unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.content.default_language, Language::En);
        assert_eq!(config.content.node_id, 12);
    }

    #[test]
    fn test_unparsable_port_falls_back() {
        let config = Config::from_lookup(lookup(&[("SERVER_PORT", "http")])).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_invalid_default_language_is_error() {
        assert!(Config::from_lookup(lookup(&[("DEFAULT_LANGUAGE", "de")])).is_err());
    }

    #[test]
    fn test_node_id_out_of_range_is_error() {
        assert!(Config::from_lookup(lookup(&[("NODE_ID", "2048")])).is_err());
    }

    #[test]
    fn test_file_path() {
        let mut db = Config::default().database;
        assert_eq!(db.file_path(), Some(PathBuf::from("data/lawfirm_cms.db")));

        db.url = "sqlite://var/cms.db?mode=rwc".to_string();
        assert_eq!(db.file_path(), Some(PathBuf::from("var/cms.db")));

        db.url = "sqlite::memory:".to_string();
        assert_eq!(db.file_path(), None);
    }
}

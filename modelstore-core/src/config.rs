//! Store configuration loaded from a JSON file.
//!
//! ```json
//! {
//!   "backend": "mongodb",
//!   "dsn": "mongodb://localhost:27017",
//!   "database": "app",
//!   "language": "pt",
//!   "translations": {
//!     "pt": { "required": "%s é obrigatório", "name": "Nome" }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    validation::MessageCatalog,
};

/// Which storage driver a [`StoreConfig`] selects.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    #[serde(rename = "mongodb")]
    MongoDb,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Connection string for remote backends.
    pub dsn: Option<String>,
    /// Database name for remote backends.
    pub database: Option<String>,
    /// Language whose translations localize validation messages.
    pub language: String,
    /// Language -> key -> message template or field display name.
    pub translations: HashMap<String, HashMap<String, String>>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            dsn: None,
            database: None,
            language: Self::DEFAULT_LANGUAGE.to_string(),
            translations: HashMap::new(),
        }
    }
}

impl StoreConfig {
    pub const DEFAULT_PATH: &'static str = "config.json";
    pub const DEFAULT_LANGUAGE: &'static str = "pt";

    /// Reads the configuration at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> DocumentStoreResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            DocumentStoreError::Configuration(format!("failed to read {}: {err}", path.display()))
        })?;

        Self::from_json(&contents)
    }

    /// Reads `config.json` from the working directory.
    pub fn load() -> DocumentStoreResult<Self> {
        Self::from_file(Self::DEFAULT_PATH)
    }

    pub fn from_json(contents: &str) -> DocumentStoreResult<Self> {
        serde_json::from_str(contents)
            .map_err(|err| DocumentStoreError::Configuration(format!("invalid configuration: {err}")))
    }

    /// Validation messages for the configured language.
    pub fn message_catalog(&self) -> MessageCatalog {
        MessageCatalog::for_language(&self.translations, &self.language)
    }

    /// The `(dsn, database)` pair a remote backend connects with.
    pub fn remote_target(&self) -> DocumentStoreResult<(&str, &str)> {
        let dsn = self
            .dsn
            .as_deref()
            .filter(|dsn| !dsn.is_empty())
            .ok_or_else(|| DocumentStoreError::Configuration("missing dsn".to_string()))?;
        let database = self
            .database
            .as_deref()
            .filter(|database| !database.is_empty())
            .ok_or_else(|| DocumentStoreError::Configuration("missing database".to_string()))?;

        Ok((dsn, database))
    }
}

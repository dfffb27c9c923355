//! Main modelstore crate providing a generic data-access layer for document databases.
//!
//! This crate is the primary entry point for users of the modelstore framework.
//! It re-exports the core types and functionality from various sub-crates and provides
//! convenient access to different storage backends.
//!
//! # Features
//!
//! - **One implementation for every entity** - Storage operations are written once against the [`Model`] trait
//! - **Client-driven queries** - [`Payload`](payload::Payload) filters with textual values coerced to booleans, numbers and dates
//! - **Substring search** - Search terms expanded into a stored index on every sync
//! - **Multiple backends** - In-memory and MongoDB storage, selected in code or from `config.json`
//!
//! # Quick Start
//!
//! ```ignore
//! use modelstore::{prelude::*, memory::InMemoryStore};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize, Model)]
//! #[model(collection = "users")]
//! pub struct User {
//!     #[serde(flatten)]
//!     #[model(record)]
//!     pub record: Record,
//!     #[model(search)]
//!     pub name: String,
//!     pub active: bool,
//! }
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     let store = DocumentStore::new(InMemoryStore::new());
//!     let users = store.typed_collection::<User>();
//!
//!     let mut user = User { name: "Alice".to_string(), active: true, ..Default::default() };
//!     user.record.id = users.new_id();
//!     users.sync(&user).await?;
//!
//!     let page = users
//!         .list(
//!             &Payload::new()
//!                 .with_filter(Filter::boolean("active", Operator::Equal, "true"))
//!                 .with_filter(Filter::string("raw_index", Operator::ArrayContains, "lic"))
//!                 .with_order(Order::asc("name")),
//!         )
//!         .await;
//!
//!     println!("{} matching users", page.count);
//!
//!     store.shutdown().await
//! }
//! ```
//!
//! # Runtime backend selection
//!
//! [`connect`] reads the backend from a [`StoreConfig`](config::StoreConfig) and
//! returns a [`DynDocumentStore`](store::DynDocumentStore):
//!
//! ```ignore
//! use modelstore::{prelude::*, config::StoreConfig};
//!
//! let config = StoreConfig::load()?;
//! let store = modelstore::connect(&config).await?;
//!
//! let total = store
//!     .scoped(async |store| store.typed_collection::<User>().count(&[]).await)
//!     .await?;
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - `mongodb` - MongoDB backend (requires the `mongodb` feature)

pub mod prelude;

pub use modelstore_core::{
    backend, batch, collection, config, error, model, page, payload, predicate, query, search, store,
    validation,
};
pub use modelstore_macros::Model;

// Re-export BSON types for convenience
pub use bson;
pub use async_trait::async_trait;

use tracing::info;

use crate::{
    backend::StoreBackendBuilder,
    config::{BackendKind, StoreConfig},
    error::DocumentStoreResult,
    store::{DocumentStore, DynDocumentStore, IntoDynDocumentStore},
};

/// In-memory storage backend implementations.
pub mod memory {
    pub use modelstore_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use modelstore_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}

/// Builds the backend `config` selects.
///
/// Selecting `mongodb` fails with [`DocumentStoreError::Configuration`](error::DocumentStoreError::Configuration) when
/// the crate was built without the `mongodb` feature, or when the DSN or
/// database is missing.
pub async fn connect(config: &StoreConfig) -> DocumentStoreResult<DynDocumentStore> {
    match config.backend {
        BackendKind::Memory => {
            info!(backend = "memory", "connecting model store");

            let backend = memory::InMemoryStore::builder().build().await?;
            Ok(DocumentStore::new(backend).into_dyn())
        }
        BackendKind::MongoDb => connect_mongodb(config).await,
    }
}

#[cfg(feature = "mongodb")]
async fn connect_mongodb(config: &StoreConfig) -> DocumentStoreResult<DynDocumentStore> {
    let builder = mongodb::MongoDbStoreBuilder::from_config(config)?;
    info!(backend = "mongodb", database = ?config.database, "connecting model store");

    let backend = builder.build().await?;
    Ok(DocumentStore::new(backend).into_dyn())
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongodb(_config: &StoreConfig) -> DocumentStoreResult<DynDocumentStore> {
    Err(error::DocumentStoreError::Configuration(
        "the mongodb backend requires the `mongodb` feature".to_string(),
    ))
}

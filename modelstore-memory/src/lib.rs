//! In-memory document storage backend for modelstore.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is meant for development
//! and testing.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Type-erased storage** - Stores documents as BSON for flexibility
//! - **Full query support** - Filtering, multi-key sorting and pagination with the same
//!   semantics as the remote backends
//! - **Atomic batches** - A batch of merges is applied entirely or not at all
//!
//! # Quick Start
//!
//! ```ignore
//! use modelstore::{prelude::*, memory::InMemoryStore};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize, Model)]
//! #[model(collection = "users")]
//! pub struct User {
//!     #[model(id)]
//!     pub id: String,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::new());
//!     let users = store.typed_collection::<User>();
//!
//!     let user = User { id: users.new_id(), name: "Alice".to_string() };
//!     users.sync(&user).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};

//! MongoDB backend implementation for modelstore.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! storing each model as one document keyed by its string id in `_id`.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! modelstore = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to MongoDB Atlas or self-hosted MongoDB
//! - **Server-side queries** - Filters, counts, sorting and paging run in MongoDB
//! - **Atomic batches** - Batch updates run inside a client session transaction
//!   (requires a replica set or sharded cluster)
//!
//! # Example
//!
//! ```ignore
//! use modelstore::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "my_database")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};

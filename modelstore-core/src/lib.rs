//! A generic data-access layer for JSON document databases.
//!
//! This crate is the core of the modelstore project and provides:
//!
//! - **Model contract** ([`model`]) - The trait every persisted entity implements, plus the embedded [`Record`](model::Record) header
//! - **Request payloads** ([`payload`]) - Filters, orders and paging as received from clients
//! - **Predicate building** ([`predicate`]) - Type coercion of textual filter values into backend queries
//! - **Query AST** ([`query`]) - Backend-neutral filter expressions and sort keys
//! - **Search indexing** ([`search`]) - Substring expansion of searchable terms
//! - **Store backend abstraction** ([`backend`], [`batch`]) - Traits for implementing different storage drivers
//! - **Storage operations** ([`collection`]) - get, count, sync, delete, list, batch update and sum for any model
//! - **Document store** ([`store`]) - The store handle owning a backend
//! - **Results** ([`page`]) - Paged list results
//! - **Configuration** ([`config`]) - JSON configuration file
//! - **Validation** ([`validation`]) - Localized field validation errors
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use modelstore_core::{model::{Model, Record}, payload::{Filter, Operator, Payload}};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! pub struct User {
//!     #[serde(flatten)]
//!     pub record: Record,
//!     pub name: String,
//!     pub active: bool,
//! }
//!
//! impl Model for User {
//!     fn collection_name() -> &'static str {
//!         "users"
//!     }
//!
//!     fn document_id(&self) -> &str {
//!         &self.record.id
//!     }
//! }
//!
//! let users = store.typed_collection::<User>();
//! let active = users
//!     .list(&Payload::new().with_filter(Filter::boolean("active", Operator::Equal, "true")))
//!     .await;
//! ```

pub mod backend;
pub mod batch;
pub mod collection;
pub mod config;
pub mod error;
pub mod model;
pub mod page;
pub mod payload;
pub mod predicate;
pub mod query;
pub mod search;
pub mod store;
pub mod validation;

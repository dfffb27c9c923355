//! Convenient re-exports of commonly used types from modelstore.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use modelstore::prelude::*;
//! ```
//!
//! This provides access to:
//! - The model trait, its derive and the embedded record
//! - Request payloads and list results
//! - Stores, collections and backend traits
//! - Error types

pub use modelstore_macros::Model;
pub use modelstore_core::{
    model::{Model, ModelExt, Record},
    payload::{Filter, Operator, Order, Payload, ValueType},
    page::ResultList,
    collection::{Lookup, TypedCollection},
    store::{DocumentStore, DynDocumentStore, IntoDynDocumentStore, AsStaticDocumentStore},
    backend::{StoreBackend, DynStoreBackend, StoreBackendBuilder},
    validation::FieldError,
    error::{DocumentStoreError, DocumentStoreResult},
};
pub use serde::{Deserialize, Serialize};

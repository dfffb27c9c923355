//! Storage backend abstraction for the model store.
//!
//! [`StoreBackend`] is the boundary to the remote document database driver:
//! point reads and upserts keyed by string document ids, aggregate counts,
//! filtered/sorted/paged queries and atomic batch merges. Implementations must
//! be thread-safe (`Send + Sync`); the store shares one backend across every
//! operation without further locking.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: Boxed shutdown and downcasting for runtime-selected backends
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Semantics shared by all backends
//!
//! - Comparisons are type-strict and a missing field never matches, `Ne` included.
//! - `ArrayContains` only matches array fields.
//! - Queries without sort keys return documents in document id order.

use async_trait::async_trait;
use bson::Bson;
use std::{any::Any, fmt::Debug};

use crate::{batch::WriteBatch, error::DocumentStoreResult, query::{Expr, Query}};

#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Allocates a fresh document id in `collection`'s id space.
    fn new_id(&self, collection: &str) -> String;

    /// Fetches one document, `None` if it does not exist.
    async fn get_document(&self, id: &str, collection: &str) -> DocumentStoreResult<Option<Bson>>;

    /// Creates or fully replaces the document `id`.
    async fn set_document(&self, id: &str, document: Bson, collection: &str) -> DocumentStoreResult<()>;

    /// Removes the document `id`. Removing a missing document succeeds.
    async fn delete_document(&self, id: &str, collection: &str) -> DocumentStoreResult<()>;

    /// Counts documents matching `filter` without fetching them.
    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<usize>;

    /// Runs `query`, returning `(document id, document)` pairs.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<(String, Bson)>>;

    /// Applies every write in `batch` atomically.
    async fn commit_batch(&self, batch: WriteBatch, collection: &str) -> DocumentStoreResult<()>;

    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    fn new_id(&self, collection: &str) -> String {
        (*self).new_id(collection)
    }

    async fn get_document(&self, id: &str, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        (*self)
            .get_document(id, collection)
            .await
    }

    async fn set_document(&self, id: &str, document: Bson, collection: &str) -> DocumentStoreResult<()> {
        (*self)
            .set_document(id, document, collection)
            .await
    }

    async fn delete_document(&self, id: &str, collection: &str) -> DocumentStoreResult<()> {
        (*self)
            .delete_document(id, collection)
            .await
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<usize> {
        (*self)
            .count_documents(filter, collection)
            .await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<(String, Bson)>> {
        (*self)
            .query_documents(query, collection)
            .await
    }

    async fn commit_batch(&self, batch: WriteBatch, collection: &str) -> DocumentStoreResult<()> {
        (*self)
            .commit_batch(batch, collection)
            .await
    }
}

/// Object-safe companion of [`StoreBackend`] for backends chosen at runtime.
///
/// Every `StoreBackend + 'static` implements it, so a
/// `Box<dyn DynStoreBackend>` exposes the full backend API plus a shutdown that
/// works through the box.
#[async_trait]
pub trait DynStoreBackend: StoreBackend {
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;

    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

#[async_trait]
impl<B: StoreBackend + 'static> DynStoreBackend for B {
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        (*self).shutdown().await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}

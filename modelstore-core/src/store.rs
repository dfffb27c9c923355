//! The store handle owning a backend connection.
//!
//! A store is created once at startup, shared by reference with every
//! operation, and shut down once:
//!
//! - [`DocumentStore`] - Store over a statically known backend type
//! - [`DynDocumentStore`] - Store over a backend selected at runtime (e.g. from configuration)
//!
//! Both hand out [`TypedCollection`]s, which carry the storage operations.
//! [`DocumentStore::scoped`] and [`DynDocumentStore::scoped`] run a block of
//! work and always shut the backend down afterwards.
//!
//! # Example
//!
//! ```ignore
//! use modelstore::{prelude::*, memory::InMemoryStore};
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let users = store.typed_collection::<User>();
//! let total = users.count(&[]).await;
//! store.shutdown().await?;
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::TypedCollection,
    error::DocumentStoreResult,
    model::Model,
};

#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the storage operations for model `M`.
    pub fn typed_collection<'a, M: Model>(&'a self) -> TypedCollection<'a, B, M> {
        TypedCollection::new(&self.backend)
    }

    /// Runs `work` against this store, then shuts the backend down.
    ///
    /// The shutdown happens whatever `work` returns; its value is passed
    /// through once the backend has closed.
    pub async fn scoped<T, F>(self, work: F) -> DocumentStoreResult<T>
    where
        F: AsyncFnOnce(&DocumentStore<B>) -> T,
    {
        let output = work(&self).await;
        self.shutdown().await?;

        Ok(output)
    }

    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await?;

        Ok(())
    }
}

#[derive(Debug)]
pub struct DynDocumentStore {
    backend: Box<dyn DynStoreBackend>,
}

impl DynDocumentStore {
    pub fn new(backend: Box<dyn DynStoreBackend>) -> Self {
        Self { backend }
    }

    /// Returns the storage operations for model `M`.
    pub fn typed_collection<'a, M: Model>(&'a self) -> TypedCollection<'a, dyn DynStoreBackend, M> {
        TypedCollection::new(&*self.backend)
    }

    /// Runs `work` against this store, then shuts the backend down.
    pub async fn scoped<T, F>(self, work: F) -> DocumentStoreResult<T>
    where
        F: AsyncFnOnce(&DynDocumentStore) -> T,
    {
        let output = work(&self).await;
        self.shutdown().await?;

        Ok(output)
    }

    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown_boxed().await
    }
}

pub trait IntoDynDocumentStore {
    fn into_dyn(self) -> DynDocumentStore;
}

impl<B: StoreBackend + 'static> IntoDynDocumentStore for DocumentStore<B> {
    fn into_dyn(self) -> DynDocumentStore {
        DynDocumentStore::new(Box::new(self.backend))
    }
}

impl IntoDynDocumentStore for DynDocumentStore {
    fn into_dyn(self) -> DynDocumentStore {
        self
    }
}

/// Recovers a statically typed view of a runtime-selected backend.
pub trait AsStaticDocumentStore {
    fn as_static<'a, B>(&'a self) -> Option<DocumentStore<&'a B>>
    where
        B: StoreBackend + 'static;
}

impl AsStaticDocumentStore for DynDocumentStore {
    fn as_static<'a, B>(&'a self) -> Option<DocumentStore<&'a B>>
    where
        B: StoreBackend + 'static,
    {
        self.backend
            .as_any()
            .downcast_ref::<B>()
            .map(|b| DocumentStore::new(b))
    }
}

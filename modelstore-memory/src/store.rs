//! In-memory storage implementation for document stores.
//!
//! Documents are kept as BSON in ordered maps behind an async-aware
//! read-write lock, so unordered queries come back in document id order.

use std::{collections::{BTreeMap, HashMap}, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document};
use uuid::Uuid;

use modelstore_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    batch::WriteBatch,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query},
};

use crate::evaluator::{DocumentEvaluator, compare_documents};

type CollectionMap = BTreeMap<String, Document>;
type StoreMap = HashMap<String, CollectionMap>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state;
/// clones share the same underlying data.
///
/// Queries scan every document of a collection (no indexing).
///
/// # Example
///
/// ```ignore
/// use modelstore_memory::InMemoryStore;
/// use modelstore::backend::StoreBackend;
/// use bson::{Bson, doc};
///
/// let store = InMemoryStore::new();
/// let id = store.new_id("users");
/// store.set_document(&id, Bson::Document(doc! { "name": "Alice" }), "users").await?;
/// assert!(store.get_document(&id, "users").await?.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    fn matching<'a>(collection: &'a CollectionMap, filter: Option<&'a Expr>) -> impl Iterator<Item = (&'a String, &'a Document)> {
        collection
            .iter()
            .filter(move |(_, document)| match filter {
                Some(expr) => DocumentEvaluator::matches(document, expr),
                None => true,
            })
    }
}

fn into_document(document: Bson, id: &str) -> DocumentStoreResult<Document> {
    match document {
        Bson::Document(document) => Ok(document),
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "document {id} must be a map, got {:?}",
            other.element_type(),
        ))),
    }
}

/// Sets `path` in `document`, creating intermediate maps along dotted paths.
fn merge_field(document: &mut Document, path: &str, value: Bson) -> DocumentStoreResult<()> {
    if document.contains_key(path) || !path.contains('.') {
        document.insert(path, value);
        return Ok(());
    }

    let (head, rest) = path.split_once('.').unwrap_or((path, ""));
    if !document.contains_key(head) {
        document.insert(head, Document::new());
    }

    match document.get_mut(head) {
        Some(Bson::Document(child)) => merge_field(child, rest, value),
        _ => Err(DocumentStoreError::InvalidDocument(format!(
            "cannot set {path}: {head} is not a map",
        ))),
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    fn new_id(&self, _collection: &str) -> String {
        Uuid::new_v4().simple().to_string()
    }

    async fn get_document(&self, id: &str, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        Ok(
            self.store
                .read()
                .await
                .get(collection)
                .and_then(|collection_map| collection_map.get(id))
                .cloned()
                .map(Bson::Document)
        )
    }

    async fn set_document(&self, id: &str, document: Bson, collection: &str) -> DocumentStoreResult<()> {
        let document = into_document(document, id)?;

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);

        Ok(())
    }

    async fn delete_document(&self, id: &str, collection: &str) -> DocumentStoreResult<()> {
        if let Some(collection_map) = self.store.write().await.get_mut(collection) {
            collection_map.remove(id);
        }

        Ok(())
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<usize> {
        let store = self.store.read().await;

        Ok(match store.get(collection) {
            Some(collection_map) => Self::matching(collection_map, filter.as_ref()).count(),
            None => 0,
        })
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<(String, Bson)>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut documents = Self::matching(collection_map, query.filter.as_ref()).collect::<Vec<_>>();

        // Stable, so ties keep id order.
        if !query.sort.is_empty() {
            documents.sort_by(|(_, a), (_, b)| compare_documents(a, b, &query.sort));
        }

        Ok(
            documents
                .into_iter()
                .skip(query.offset.unwrap_or(0))
                .take(query.limit.unwrap_or(usize::MAX))
                .map(|(id, document)| (id.clone(), Bson::Document(document.clone())))
                .collect()
        )
    }

    async fn commit_batch(&self, batch: WriteBatch, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;

        // Applied to a copy and swapped in, so a failed write leaves nothing behind.
        let mut staged = store.get(collection).cloned().unwrap_or_default();

        for write in batch.into_writes() {
            let document = staged.entry(write.id).or_default();

            for (field, value) in write.fields {
                merge_field(document, &field, value)?;
            }
        }

        store.insert(collection.to_string(), staged);

        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use modelstore_memory::InMemoryStore;
/// use modelstore::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().build().await?;
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

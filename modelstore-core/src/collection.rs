//! Typed storage operations for one model's collection.
//!
//! [`TypedCollection`] implements every storage operation once, generically
//! over the [`Model`] type and the [`StoreBackend`]. Obtain one from
//! [`DocumentStore::typed_collection`](crate::store::DocumentStore::typed_collection)
//! or [`DynDocumentStore::typed_collection`](crate::store::DynDocumentStore::typed_collection).
//!
//! # Failure contract
//!
//! Operations deliberately differ in how backend failures reach the caller:
//!
//! | operation                 | on failure                                       |
//! |---------------------------|--------------------------------------------------|
//! | `get`                     | logged, returns `M::default()`                   |
//! | `lookup`                  | returned as [`Lookup::NotFound`] / [`Lookup::Failed`] |
//! | `count`, `list`, `sum`    | logged, returns zero / empty                     |
//! | `sync`, `delete`          | error returned unchanged                         |
//! | `sync_list`               | logged, nothing returned                         |
//!
//! # Example
//!
//! ```ignore
//! let users = store.typed_collection::<User>();
//!
//! let mut user = User::default();
//! user.record.id = users.new_id();
//! users.sync(&user).await?;
//!
//! let page = users
//!     .list(&Payload::new().with_filter(Filter::boolean("active", Operator::Equal, "true")))
//!     .await;
//! ```

use bson::{Bson, doc};
use std::marker::PhantomData;
use tracing::{debug, warn};

use crate::{
    backend::StoreBackend,
    batch::WriteBatch,
    error::{DocumentStoreError, DocumentStoreResult},
    model::{Model, ModelExt},
    page::{PaginationParams, ResultList},
    payload::{Filter, Payload},
    predicate::build_filter,
    query::{Query, resolve_field},
    search::searchify,
};

/// Outcome of a point read, keeping "missing" and "broken" apart.
#[derive(Debug)]
pub enum Lookup<M> {
    /// The document exists and decoded into a model.
    Found(M),
    /// No document has the requested id.
    NotFound,
    /// The backend failed or the document did not decode.
    Failed(DocumentStoreError),
}

impl<M> Lookup<M> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Returns the model if found.
    pub fn found(self) -> Option<M> {
        match self {
            Lookup::Found(model) => Some(model),
            _ => None,
        }
    }
}

impl<M: Default> Lookup<M> {
    /// Returns the model if found, the default value otherwise.
    pub fn unwrap_or_default(self) -> M {
        self.found().unwrap_or_default()
    }
}

/// Storage operations for model `M` against backend `B`.
///
/// The collection name always comes from `M::collection_name()`.
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend + ?Sized, M: Model> {
    backend: &'a B,
    _marker: PhantomData<M>,
}

impl<'a, B: StoreBackend + ?Sized, M: Model> TypedCollection<'a, B, M> {
    pub(crate) fn new(backend: &'a B) -> Self {
        Self { backend, _marker: PhantomData }
    }

    pub fn name(&self) -> &'static str {
        M::collection_name()
    }

    /// Fetches one model, reporting why nothing was returned.
    pub async fn lookup(&self, id: &str) -> Lookup<M> {
        match self.backend.get_document(id, self.name()).await {
            Ok(Some(document)) => match M::from_bson(document) {
                Ok(model) => Lookup::Found(model),
                Err(err) => Lookup::Failed(err),
            },
            Ok(None) => Lookup::NotFound,
            Err(err) => Lookup::Failed(err),
        }
    }

    /// Fetches one model by document id.
    ///
    /// A missing document or one that fails to decode yields `M::default()`;
    /// use [`lookup`](Self::lookup) to tell those cases apart.
    pub async fn get(&self, id: &str) -> M {
        match self.lookup(id).await {
            Lookup::Found(model) => model,
            Lookup::NotFound => {
                debug!(collection = self.name(), id, "document not found");
                M::default()
            }
            Lookup::Failed(err) => {
                warn!(collection = self.name(), id, error = %err, "failed to load document");
                M::default()
            }
        }
    }

    /// Allocates a fresh document id from the backend.
    pub fn new_id(&self) -> String {
        self.backend.new_id(self.name())
    }

    /// Counts the documents matching `filters`.
    pub async fn count(&self, filters: &[Filter]) -> usize {
        self.count_matching(filters).await
    }

    /// Upserts `entity` at its document id, storing its expanded search index.
    pub async fn sync(&self, entity: &M) -> DocumentStoreResult<()> {
        let mut document = match entity.to_bson()? {
            Bson::Document(document) => document,
            other => {
                return Err(DocumentStoreError::InvalidDocument(format!(
                    "model for collection {} serialized to {:?}, expected a document",
                    self.name(),
                    other.element_type(),
                )));
            }
        };

        document.insert(M::search_index_field(), searchify(&entity.search_terms()));

        self.backend
            .set_document(entity.document_id(), Bson::Document(document), self.name())
            .await
    }

    /// Removes `entity`'s document.
    pub async fn delete(&self, entity: &M) -> DocumentStoreResult<()> {
        self.backend
            .delete_document(entity.document_id(), self.name())
            .await
    }

    /// Lists one page of models matching the payload's filters.
    ///
    /// The total is counted first; when nothing matches no page query is sent.
    /// Documents that do not decode are logged and left out of `data`.
    pub async fn list(&self, payload: &Payload) -> ResultList<M> {
        let count = self.count_matching(&payload.filters).await;
        if count == 0 {
            debug!(collection = self.name(), "no documents match, skipping page query");
            return ResultList::empty();
        }

        let paging = PaginationParams::new(payload.page, payload.page_size);
        let mut builder = Query::builder()
            .filters(&payload.filters)
            .orders(&payload.orders);

        if let Some(limit) = paging.limit() {
            builder = builder.limit(limit);
        }
        if let Some(offset) = paging.offset() {
            builder = builder.offset(offset);
        }

        let documents = match self.backend.query_documents(builder.build(), self.name()).await {
            Ok(documents) => documents,
            Err(err) => {
                warn!(collection = self.name(), error = %err, "failed to fetch page");
                Vec::new()
            }
        };

        let data = documents
            .into_iter()
            .filter_map(|(id, document)| match M::from_bson(document) {
                Ok(model) => Some(model),
                Err(err) => {
                    warn!(collection = self.name(), id = %id, error = %err, "dropping undecodable document");
                    None
                }
            })
            .collect();

        ResultList::new(count, data)
    }

    /// Sets `field` to `value` on every document matching `filters`, in one
    /// atomic batch.
    ///
    /// Nothing is committed when no document matches. A failed commit is
    /// logged and otherwise ignored.
    pub async fn sync_list(&self, filters: &[Filter], field: &str, value: impl Into<Bson>) {
        let value = value.into();
        let matches = self.fetch_matching(filters).await;

        if matches.is_empty() {
            debug!(collection = self.name(), field, "no documents match, skipping batch update");
            return;
        }

        let mut batch = WriteBatch::new();
        for (id, _) in matches {
            batch.merge(id, doc! { field: value.clone() });
        }

        let size = batch.len();
        if let Err(err) = self.backend.commit_batch(batch, self.name()).await {
            warn!(collection = self.name(), field, size, error = %err, "batch update failed");
        }
    }

    /// Sums the numeric values of `field` over the documents matching `filters`.
    ///
    /// Values are read as text and parsed as floats, so numeric strings count
    /// and anything else (missing, boolean, non-numeric text) is skipped.
    pub async fn sum(&self, filters: &[Filter], field: &str) -> f64 {
        self.fetch_matching(filters)
            .await
            .iter()
            .filter_map(|(_, document)| {
                document
                    .as_document()
                    .and_then(|document| resolve_field(document, field))
                    .and_then(numeric_value)
            })
            .fold(0.0, |total, value| total + value)
    }

    async fn count_matching(&self, filters: &[Filter]) -> usize {
        match self.backend.count_documents(build_filter(filters), self.name()).await {
            Ok(count) => count,
            Err(err) => {
                warn!(collection = self.name(), error = %err, "failed to count documents");
                0
            }
        }
    }

    async fn fetch_matching(&self, filters: &[Filter]) -> Vec<(String, Bson)> {
        let query = Query::builder().filters(filters).build();

        match self.backend.query_documents(query, self.name()).await {
            Ok(documents) => documents,
            Err(err) => {
                warn!(collection = self.name(), error = %err, "failed to fetch matching documents");
                Vec::new()
            }
        }
    }
}

fn numeric_value(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(value) => Some(*value),
        Bson::Int32(value) => Some(f64::from(*value)),
        Bson::Int64(value) => Some(*value as f64),
        Bson::String(text) => text.parse().ok(),
        _ => None,
    }
}

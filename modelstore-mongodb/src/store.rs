use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, doc, oid::ObjectId};
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions},
};
use tracing::{debug, warn};
use modelstore_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    batch::WriteBatch,
    config::StoreConfig,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query},
};

use crate::query::MongoQueryTranslator;

/// MongoDB backend.
///
/// Batch updates run in a multi-document transaction, so the server must be a
/// replica set or a sharded cluster. Against a standalone `mongod` every
/// `commit_batch` fails, and `sync_list` only logs that failure.
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn prepare_document(&self, id: &str, document: Bson) -> DocumentStoreResult<Document> {
        let mut document = match document {
            Bson::Document(document) => document,
            other => {
                return Err(DocumentStoreError::InvalidDocument(format!(
                    "document {id} must be a map, got {:?}",
                    other.element_type(),
                )));
            }
        };

        document.insert("_id", id);

        Ok(document)
    }

    /// Splits a stored document into its id and its body without `_id`.
    fn restore_document(&self, mut document: Document) -> (String, Bson) {
        let id = match document.remove("_id") {
            Some(Bson::String(id)) => id,
            Some(Bson::ObjectId(id)) => id.to_hex(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        (id, Bson::Document(document))
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

fn backend_error(err: mongodb::error::Error) -> DocumentStoreError {
    DocumentStoreError::Backend(err.to_string())
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    fn new_id(&self, _collection: &str) -> String {
        ObjectId::new().to_hex()
    }

    async fn get_document(&self, id: &str, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        Ok(
            self.get_collection(collection)
                .find_one(doc! { "_id": id })
                .await
                .map_err(backend_error)?
                .map(|document| self.restore_document(document).1)
        )
    }

    async fn set_document(&self, id: &str, document: Bson, collection: &str) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .replace_one(doc! { "_id": id }, self.prepare_document(id, document)?)
            .upsert(true)
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn delete_document(&self, id: &str, collection: &str) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .delete_one(doc! { "_id": id })
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<usize> {
        let count = self.get_collection(collection)
            .count_documents(MongoQueryTranslator::filter(filter.as_ref())?)
            .await
            .map_err(backend_error)?;

        usize::try_from(count)
            .map_err(|_| DocumentStoreError::Backend(format!("count {count} does not fit in usize")))
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<(String, Bson)>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        if let Some(skip) = query.offset {
            options.skip = Some(skip as u64);
        }
        options.sort = Some(MongoQueryTranslator::sort(&query.sort));

        Ok(
            self.get_collection(collection)
                .find(MongoQueryTranslator::filter(query.filter.as_ref())?)
                .with_options(options)
                .await
                .map_err(backend_error)?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(backend_error)?
                .into_iter()
                .map(|document| self.restore_document(document))
                .collect()
        )
    }

    async fn commit_batch(&self, batch: WriteBatch, collection: &str) -> DocumentStoreResult<()> {
        let target = self.get_collection(collection);
        let mut session = self.client
            .start_session()
            .await
            .map_err(backend_error)?;

        session
            .start_transaction()
            .await
            .map_err(backend_error)?;

        for write in batch.into_writes() {
            if write.fields.is_empty() {
                continue;
            }

            let result = target
                .update_one(doc! { "_id": &write.id }, doc! { "$set": write.fields })
                .upsert(true)
                .session(&mut session)
                .await;

            if let Err(err) = result {
                if let Err(abort_err) = session.abort_transaction().await {
                    warn!(collection, error = %abort_err, "failed to abort batch transaction");
                }

                return Err(backend_error(err));
            }
        }

        session
            .commit_transaction()
            .await
            .map_err(backend_error)
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }

    /// Reads the DSN and database from `config`.
    pub fn from_config(config: &StoreConfig) -> DocumentStoreResult<Self> {
        let (dsn, database) = config.remote_target()?;

        Ok(Self::new(dsn, database))
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let client = Client::with_options(
            ClientOptions::parse(&self.dsn)
                .await
                .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
        )
        .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        debug!(database = %self.database, "mongodb client ready");

        Ok(MongoDbStore::new(client, self.database))
    }
}

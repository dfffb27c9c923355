#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use modelstore::{
    async_trait,
    batch::WriteBatch,
    bson::{Bson, DateTime},
    memory::InMemoryStore,
    prelude::*,
    query::{Expr, Query},
};
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "people")]
pub struct Person {
    #[model(id)]
    pub id: String,
    #[model(search)]
    pub name: String,
    pub age: i32,
    pub active: bool,
    pub since: Option<DateTime>,
}

impl Person {
    pub fn new(id: &str, name: &str, age: i32, active: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            age,
            active,
            since: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, Model)]
#[model(collection = "accounts", validate)]
pub struct Account {
    #[serde(flatten)]
    #[model(record)]
    pub record: Record,
    #[model(search)]
    #[validate(length(min = 3))]
    pub name: String,
    #[model(search)]
    pub tags: Vec<String>,
    pub nickname: Option<String>,
}

/// Wraps the in-memory backend, counting the calls a test needs to observe.
#[derive(Debug, Default)]
pub struct CountingBackend {
    inner: InMemoryStore,
    queries: AtomicUsize,
    commits: AtomicUsize,
}

impl CountingBackend {
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreBackend for CountingBackend {
    fn new_id(&self, collection: &str) -> String {
        self.inner.new_id(collection)
    }

    async fn get_document(&self, id: &str, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        self.inner.get_document(id, collection).await
    }

    async fn set_document(&self, id: &str, document: Bson, collection: &str) -> DocumentStoreResult<()> {
        self.inner.set_document(id, document, collection).await
    }

    async fn delete_document(&self, id: &str, collection: &str) -> DocumentStoreResult<()> {
        self.inner.delete_document(id, collection).await
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<usize> {
        self.inner.count_documents(filter, collection).await
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<(String, Bson)>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query_documents(query, collection).await
    }

    async fn commit_batch(&self, batch: WriteBatch, collection: &str) -> DocumentStoreResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.inner.commit_batch(batch, collection).await
    }
}

/// Five people, ids `p1`..`p5`, ages 20, 30, 40, 50, 60; `p5` inactive.
pub async fn seed_people<B: StoreBackend>(store: &DocumentStore<B>) {
    let people = store.typed_collection::<Person>();
    let seed = [
        Person::new("p1", "Ana", 20, true),
        Person::new("p2", "Bruno", 30, true),
        Person::new("p3", "Carla", 40, true),
        Person::new("p4", "Davi", 50, true),
        Person::new("p5", "Elisa", 60, false),
    ];

    for person in &seed {
        people.sync(person).await.unwrap();
    }
}

mod common;

use modelstore::{
    bson::{Bson, DateTime, doc},
    collection::Lookup,
    memory::InMemoryStore,
    model::SEARCH_INDEX_FIELD,
    prelude::*,
};

use common::{Account, CountingBackend, Person, seed_people};

fn ids(people: &[Person]) -> Vec<&str> {
    people.iter().map(|person| person.id.as_str()).collect()
}

#[tokio::test]
async fn sync_then_get_returns_the_entity() {
    let store = DocumentStore::new(InMemoryStore::new());
    let people = store.typed_collection::<Person>();

    let person = Person::new("p1", "Ana", 20, true);
    people.sync(&person).await.unwrap();

    assert_eq!(people.get("p1").await, person);
    assert!(people.lookup("p1").await.is_found());
}

#[tokio::test]
async fn sync_overwrites_the_whole_document() {
    let store = DocumentStore::new(InMemoryStore::new());
    let people = store.typed_collection::<Person>();

    people.sync(&Person::new("p1", "Ana", 20, true)).await.unwrap();
    people.sync(&Person::new("p1", "Ana Maria", 21, false)).await.unwrap();

    assert_eq!(people.get("p1").await, Person::new("p1", "Ana Maria", 21, false));
    assert_eq!(people.count(&[]).await, 1);
}

#[tokio::test]
async fn get_of_unknown_id_returns_default() {
    let store = DocumentStore::new(InMemoryStore::new());
    let people = store.typed_collection::<Person>();

    let id = people.new_id();
    assert_eq!(people.get(&id).await, Person::default());
    assert!(matches!(people.lookup(&id).await, Lookup::NotFound));
}

#[tokio::test]
async fn get_of_undecodable_document_returns_default() {
    let store = DocumentStore::new(InMemoryStore::new());
    store
        .backend()
        .set_document("p1", Bson::Document(doc! { "id": "p1", "age": "old" }), "people")
        .await
        .unwrap();

    let people = store.typed_collection::<Person>();
    assert_eq!(people.get("p1").await, Person::default());
    assert!(matches!(people.lookup("p1").await, Lookup::Failed(_)));
}

#[tokio::test]
async fn new_ids_are_distinct() {
    let store = DocumentStore::new(InMemoryStore::new());
    let people = store.typed_collection::<Person>();

    assert_ne!(people.new_id(), people.new_id());
}

#[tokio::test]
async fn delete_removes_the_entity() {
    let store = DocumentStore::new(InMemoryStore::new());
    seed_people(&store).await;

    let people = store.typed_collection::<Person>();
    let person = people.get("p2").await;
    people.delete(&person).await.unwrap();
    people.delete(&person).await.unwrap();

    assert_eq!(people.get("p2").await, Person::default());
    assert_eq!(people.count(&[]).await, 4);
}

#[tokio::test]
async fn count_applies_coerced_filters() {
    let store = DocumentStore::new(InMemoryStore::new());
    seed_people(&store).await;
    let people = store.typed_collection::<Person>();

    assert_eq!(people.count(&[]).await, 5);
    assert_eq!(people.count(&[Filter::boolean("active", Operator::Equal, "t")]).await, 4);
    assert_eq!(
        people
            .count(&[
                Filter::number("age", Operator::GreaterOrEqual, "30"),
                Filter::number("age", Operator::Less, "60"),
            ])
            .await,
        3,
    );
    assert_eq!(people.count(&[Filter::string("name", Operator::NotEqual, "Ana")]).await, 4);
}

#[tokio::test]
async fn unparseable_filters_are_skipped() {
    let store = DocumentStore::new(InMemoryStore::new());
    seed_people(&store).await;
    let people = store.typed_collection::<Person>();

    let filters = [
        Filter::number("age", Operator::Greater, "thirty"),
        Filter::boolean("active", Operator::Equal, "yes"),
        Filter::timestamp("since", Operator::Greater, "01/02/2024"),
    ];
    assert_eq!(people.count(&filters).await, 5);

    let filters = [
        Filter::number("age", Operator::Greater, "thirty"),
        Filter::boolean("active", Operator::Equal, "false"),
    ];
    assert_eq!(people.count(&filters).await, 1);
}

#[tokio::test]
async fn timestamp_filters_compare_dates() {
    let store = DocumentStore::new(InMemoryStore::new());
    let people = store.typed_collection::<Person>();

    // 2024-03-01T00:00:00Z and 2024-01-01T00:00:00Z
    let mut recent = Person::new("p1", "Ana", 20, true);
    recent.since = Some(DateTime::from_millis(1_709_251_200_000));
    let mut older = Person::new("p2", "Bruno", 30, true);
    older.since = Some(DateTime::from_millis(1_704_067_200_000));

    people.sync(&recent).await.unwrap();
    people.sync(&older).await.unwrap();
    people.sync(&Person::new("p3", "Carla", 40, true)).await.unwrap();

    let page = people
        .list(&Payload::new().with_filter(Filter::timestamp("since", Operator::GreaterOrEqual, "2024-02-01")))
        .await;
    assert_eq!(ids(&page.data), vec!["p1"]);

    let page = people
        .list(&Payload::new().with_filter(Filter::timestamp("since", Operator::LessOrEqual, "2024-03-01")))
        .await;
    assert_eq!(ids(&page.data), vec!["p1", "p2"]);
}

#[tokio::test]
async fn list_pages_are_zero_based() {
    let store = DocumentStore::new(InMemoryStore::new());
    seed_people(&store).await;
    let people = store.typed_collection::<Person>();

    let payload = Payload::new().with_page(1, 2).with_order(Order::asc("age"));
    let page = people.list(&payload).await;

    assert_eq!(page.count, 5);
    assert_eq!(ids(&page.data), vec!["p3", "p4"]);

    let last = people.list(&Payload::new().with_page(2, 2).with_order(Order::asc("age"))).await;
    assert_eq!(ids(&last.data), vec!["p5"]);
}

#[tokio::test]
async fn list_without_page_size_returns_everything() {
    let store = DocumentStore::new(InMemoryStore::new());
    seed_people(&store).await;
    let people = store.typed_collection::<Person>();

    let page = people.list(&Payload::new().with_order(Order::desc("age"))).await;

    assert_eq!(page.count, 5);
    assert_eq!(ids(&page.data), vec!["p5", "p4", "p3", "p2", "p1"]);
}

#[tokio::test]
async fn list_count_ignores_paging() {
    let store = DocumentStore::new(InMemoryStore::new());
    seed_people(&store).await;
    let people = store.typed_collection::<Person>();

    let payload = Payload::new()
        .with_page(0, 1)
        .with_filter(Filter::boolean("active", Operator::Equal, "true"))
        .with_order(Order::desc("age"));
    let page = people.list(&payload).await;

    assert_eq!(page.count, 4);
    assert_eq!(ids(&page.data), vec!["p4"]);
}

#[tokio::test]
async fn list_with_no_matches_skips_the_page_query() {
    let store = DocumentStore::new(CountingBackend::default());
    seed_people(&store).await;
    let people = store.typed_collection::<Person>();

    let page = people
        .list(&Payload::new().with_filter(Filter::number("age", Operator::Greater, "100")))
        .await;

    assert_eq!(page, ResultList::empty());
    assert_eq!(store.backend().queries(), 0);

    people.list(&Payload::new()).await;
    assert_eq!(store.backend().queries(), 1);
}

#[tokio::test]
async fn list_drops_undecodable_documents_but_counts_them() {
    let store = DocumentStore::new(InMemoryStore::new());
    seed_people(&store).await;
    store
        .backend()
        .set_document(
            "p0",
            Bson::Document(doc! { "id": "p0", "name": "Broken", "age": "old", "active": true, "since": null }),
            "people",
        )
        .await
        .unwrap();

    let people = store.typed_collection::<Person>();
    let page = people.list(&Payload::new()).await;

    assert_eq!(page.count, 6);
    assert_eq!(ids(&page.data), vec!["p1", "p2", "p3", "p4", "p5"]);
}

#[tokio::test]
async fn sync_list_updates_every_match_in_one_batch() {
    let store = DocumentStore::new(CountingBackend::default());
    seed_people(&store).await;
    let people = store.typed_collection::<Person>();

    people
        .sync_list(&[Filter::number("age", Operator::GreaterOrEqual, "40")], "active", false)
        .await;

    assert_eq!(store.backend().commits(), 1);
    assert_eq!(people.count(&[Filter::boolean("active", Operator::Equal, "false")]).await, 3);
    assert!(people.get("p2").await.active);
    assert!(!people.get("p3").await.active);
}

#[tokio::test]
async fn sync_list_without_matches_commits_nothing() {
    let store = DocumentStore::new(CountingBackend::default());
    seed_people(&store).await;
    let people = store.typed_collection::<Person>();

    people
        .sync_list(&[Filter::string("name", Operator::Equal, "Nobody")], "active", false)
        .await;

    assert_eq!(store.backend().commits(), 0);
    assert_eq!(people.count(&[Filter::boolean("active", Operator::Equal, "true")]).await, 4);
}

#[tokio::test]
async fn sum_adds_numeric_values_only() {
    let store = DocumentStore::new(InMemoryStore::new());
    let backend = store.backend();

    let rows = [
        ("e1", doc! { "kind": "sale", "amount": 10 }),
        ("e2", doc! { "kind": "sale", "amount": 2.5 }),
        ("e3", doc! { "kind": "sale", "amount": "7.5" }),
        ("e4", doc! { "kind": "sale", "amount": "n/a" }),
        ("e5", doc! { "kind": "sale", "amount": true }),
        ("e6", doc! { "kind": "sale" }),
        ("e7", doc! { "kind": "refund", "amount": 100 }),
    ];
    for (id, row) in rows {
        backend.set_document(id, Bson::Document(row), "people").await.unwrap();
    }

    let people = store.typed_collection::<Person>();
    let sales = [Filter::string("kind", Operator::Equal, "sale")];

    assert_eq!(people.sum(&sales, "amount").await, 20.0);
    assert_eq!(people.sum(&[], "amount").await, 120.0);
    assert_eq!(people.sum(&[Filter::string("kind", Operator::Equal, "void")], "amount").await, 0.0);
}

#[tokio::test]
async fn sync_stores_the_expanded_search_index() {
    let store = DocumentStore::new(InMemoryStore::new());
    let accounts = store.typed_collection::<Account>();

    let mut account = Account {
        record: Record::new(accounts.new_id()),
        name: "Alice".to_string(),
        tags: vec!["VIP".to_string()],
        nickname: None,
    };
    account.record.created_by = "admin".to_string();
    accounts.sync(&account).await.unwrap();

    let stored = accounts.get(account.document_id()).await;
    assert_eq!(stored.name, "Alice");
    assert_eq!(stored.record.created_by, "admin");
    assert!(stored.record.raw_index.contains(&"alice".to_string()));
    assert!(stored.record.raw_index.contains(&"lic".to_string()));
    assert!(stored.record.raw_index.contains(&"vip".to_string()));

    let found = accounts
        .list(&Payload::new().with_filter(Filter::string(SEARCH_INDEX_FIELD, Operator::ArrayContains, "lic")))
        .await;
    assert_eq!(found.count, 1);

    let missing = accounts
        .list(&Payload::new().with_filter(Filter::string(SEARCH_INDEX_FIELD, Operator::ArrayContains, "bob")))
        .await;
    assert_eq!(missing.count, 0);
}

#[test]
fn derived_model_validates_through_validator() {
    let account = Account { name: "Al".to_string(), ..Default::default() };
    let errors = account.validate();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "name");
    assert!(Person::new("p1", "A", 1, true).validate().is_empty());
}

#[test]
fn derived_model_collects_search_terms() {
    let account = Account {
        name: "Alice".to_string(),
        tags: vec!["a".to_string(), "b".to_string()],
        ..Default::default()
    };

    assert_eq!(Account::collection_name(), "accounts");
    assert_eq!(account.search_terms(), vec!["Alice", "a", "b"]);
    assert_eq!(Person::new("p1", "Ana", 1, true).search_terms(), vec!["Ana"]);
}

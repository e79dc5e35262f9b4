//! Behaviour every `OrderRepository` implementation must share.
//!
//! Each case expects a repository over an empty collection.

use makeline::deadline::Deadline;
use makeline::error::RepositoryError;
use makeline::model::{Order, OrderStatus, UpdateOutcome};
use makeline::storage::OrderRepository;
use mongodb::bson::{Bson, doc};
use std::time::Duration;

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(10))
}

fn sample_order(id: &str) -> Order {
    Order::pending(id)
        .with_field("customerid", "c-1042")
        .with_field(
            "items",
            vec![
                Bson::Document(doc! { "productid": 1, "quantity": 2, "price": 4.99 }),
                Bson::Document(doc! { "productid": 7, "quantity": 1, "price": 12.5 }),
            ],
        )
        .with_field("priority", true)
        .with_field("sequence", 9_007_199_254_740_993_i64)
        .with_field("shipping", doc! { "city": "Seattle", "zip": "98101" })
}

async fn pending_ids(repository: &dyn OrderRepository) -> Vec<String> {
    let mut ids: Vec<String> = repository
        .get_pending_orders(deadline())
        .await
        .unwrap()
        .into_iter()
        .map(|order| order.order_id)
        .collect();
    ids.sort();
    ids
}

pub async fn round_trip_preserves_payload(repository: &dyn OrderRepository) {
    let orders = vec![sample_order("RT-1"), sample_order("RT-2").with_status(OrderStatus::Processing)];

    let inserted = repository.insert_orders(&orders, deadline()).await.unwrap();
    assert_eq!(inserted, 2);

    for order in &orders {
        let fetched = repository.get_order(&order.order_id, deadline()).await.unwrap();
        assert_eq!(&fetched, order);
    }
}

pub async fn empty_insert_is_noop(repository: &dyn OrderRepository) {
    repository
        .insert_orders(&[Order::pending("E-1")], deadline())
        .await
        .unwrap();
    let before = pending_ids(repository).await;

    let inserted = repository.insert_orders(&[], deadline()).await.unwrap();

    assert_eq!(inserted, 0);
    assert_eq!(pending_ids(repository).await, before);
}

pub async fn pending_filter_selects_exact_subset(repository: &dyn OrderRepository) {
    let orders = vec![
        Order::pending("P-1"),
        Order::new("P-2", OrderStatus::Processed),
        Order::new("P-3", OrderStatus::Processing),
        Order::pending("P-4").with_field("customerid", "c-9"),
    ];
    repository.insert_orders(&orders, deadline()).await.unwrap();

    let pending = repository.get_pending_orders(deadline()).await.unwrap();

    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|order| order.status == OrderStatus::Pending));
    assert_eq!(pending_ids(repository).await, vec!["P-1", "P-4"]);
}

pub async fn pending_query_on_empty_collection_succeeds(repository: &dyn OrderRepository) {
    let pending = repository.get_pending_orders(deadline()).await.unwrap();
    assert!(pending.is_empty());
}

pub async fn update_touches_only_status(repository: &dyn OrderRepository) {
    let original = sample_order("U-1");
    repository
        .insert_orders(std::slice::from_ref(&original), deadline())
        .await
        .unwrap();

    // The update carries no payload; stored payload must survive.
    let outcome = repository
        .update_order(&Order::new("U-1", OrderStatus::Processed), deadline())
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });
    let fetched = repository.get_order("U-1", deadline()).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Processed);
    assert_eq!(fetched.payload, original.payload);
}

pub async fn update_without_match_returns_zero(repository: &dyn OrderRepository) {
    repository
        .insert_orders(&[Order::pending("Z-1")], deadline())
        .await
        .unwrap();

    let outcome = repository
        .update_order(&Order::new("Z-404", OrderStatus::Processed), deadline())
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::default());
    assert_eq!(pending_ids(repository).await, vec!["Z-1"]);
}

pub async fn missing_order_is_not_found(repository: &dyn OrderRepository) {
    let result = repository.get_order("does-not-exist", deadline()).await;

    match result {
        Err(RepositoryError::NotFound(id)) => assert_eq!(id, "does-not-exist"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

pub async fn pending_then_processed_scenario(repository: &dyn OrderRepository) {
    repository
        .insert_orders(
            &[Order::pending("A"), Order::new("B", OrderStatus::Processed)],
            deadline(),
        )
        .await
        .unwrap();

    let pending = repository.get_pending_orders(deadline()).await.unwrap();
    assert_eq!(pending, vec![Order::pending("A")]);

    repository
        .update_order(&Order::new("A", OrderStatus::Processed), deadline())
        .await
        .unwrap();

    let a = repository.get_order("A", deadline()).await.unwrap();
    assert_eq!(a.status, OrderStatus::Processed);
    assert!(pending_ids(repository).await.is_empty());
}

pub async fn duplicate_ids_are_all_updated(repository: &dyn OrderRepository) {
    repository
        .insert_orders(
            &[
                Order::pending("DUP").with_field("copy", 1),
                Order::pending("DUP").with_field("copy", 2),
                Order::pending("SOLO"),
            ],
            deadline(),
        )
        .await
        .unwrap();

    let outcome = repository
        .update_order(&Order::new("DUP", OrderStatus::Processed), deadline())
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome { matched: 2, modified: 2 });
    assert_eq!(pending_ids(repository).await, vec!["SOLO"]);
}

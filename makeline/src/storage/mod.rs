pub mod in_memory;
pub mod mongo;

pub use in_memory::InMemoryOrderRepository;
pub use mongo::MongoOrderRepository;

use crate::deadline::Deadline;
use crate::error::RepositoryError;
use crate::model::{Order, UpdateOutcome};
use async_trait::async_trait;

/// Read/write access to the order collection for pipeline stages.
///
/// Implementations hold no per-call state and are shared as
/// `Arc<dyn OrderRepository>` between the intake and fulfillment paths.
/// Nothing is retried; every call is a single round trip to the store.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders whose status is `Pending`, in store order.
    ///
    /// A decode failure on any document fails the whole call.
    async fn get_pending_orders(&self, deadline: Deadline) -> Result<Vec<Order>, RepositoryError>;

    /// First order with the given id, or `RepositoryError::NotFound`.
    async fn get_order(&self, id: &str, deadline: Deadline) -> Result<Order, RepositoryError>;

    /// Inserts the batch in one request and returns the inserted count.
    ///
    /// An empty batch returns `Ok(0)` without touching the store. When the
    /// store rejects part of a batch the error is returned as is; which
    /// documents made it in is not reported.
    async fn insert_orders(&self, orders: &[Order], deadline: Deadline) -> Result<u64, RepositoryError>;

    /// Sets `status` on every document whose order id equals `order.order_id`.
    ///
    /// No other field is written and no transition rules are checked. If
    /// several documents share the id, all of them are updated. Zero matches
    /// is not an error.
    async fn update_order(&self, order: &Order, deadline: Deadline) -> Result<UpdateOutcome, RepositoryError>;
}

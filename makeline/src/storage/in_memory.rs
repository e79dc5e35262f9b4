use crate::deadline::Deadline;
use crate::error::RepositoryError;
use crate::model::{Order, OrderStatus, UpdateOutcome};
use crate::storage::OrderRepository;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

// In-memory implementation, orders kept in insertion order
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<Mutex<Vec<Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: Arc::new(Mutex::new(orders)),
        }
    }

    pub async fn len(&self) -> usize {
        self.orders.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.lock().await.is_empty()
    }

    pub async fn snapshot(&self) -> Vec<Order> {
        self.orders.lock().await.clone()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn get_pending_orders(&self, deadline: Deadline) -> Result<Vec<Order>, RepositoryError> {
        deadline
            .run("get_pending_orders", async {
                let orders = self.orders.lock().await;
                let pending: Vec<Order> = orders
                    .iter()
                    .filter(|order| order.status == OrderStatus::Pending)
                    .cloned()
                    .collect();
                debug!(count = pending.len(), "fetched pending orders");
                Ok(pending)
            })
            .await
    }

    async fn get_order(&self, id: &str, deadline: Deadline) -> Result<Order, RepositoryError> {
        deadline
            .run("get_order", async {
                self.orders
                    .lock()
                    .await
                    .iter()
                    .find(|order| order.order_id == id)
                    .cloned()
                    .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
            })
            .await
    }

    async fn insert_orders(&self, orders: &[Order], deadline: Deadline) -> Result<u64, RepositoryError> {
        if orders.is_empty() {
            info!("no orders to insert into order store");
            return Ok(0);
        }

        deadline
            .run("insert_orders", async {
                self.orders.lock().await.extend_from_slice(orders);
                let inserted = orders.len() as u64;
                info!(inserted, "inserted orders into order store");
                Ok(inserted)
            })
            .await
    }

    async fn update_order(&self, order: &Order, deadline: Deadline) -> Result<UpdateOutcome, RepositoryError> {
        deadline
            .run("update_order", async {
                let mut orders = self.orders.lock().await;
                let mut outcome = UpdateOutcome::default();
                for stored in orders
                    .iter_mut()
                    .filter(|stored| stored.order_id == order.order_id)
                {
                    outcome.matched += 1;
                    if stored.status != order.status {
                        stored.status = order.status;
                        outcome.modified += 1;
                    }
                }

                info!(
                    order_id = %order.order_id,
                    matched = outcome.matched,
                    modified = outcome.modified,
                    "updated order status"
                );
                Ok(outcome)
            })
            .await
    }
}

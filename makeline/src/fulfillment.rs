use crate::{
    deadline::Deadline,
    error::RepositoryError,
    model::{Order, OrderStatus, UpdateOutcome},
    storage::OrderRepository,
};
use common::config::WorkerConfig;
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, error, info, trace, warn};

/// Downstream pipeline stage: claims pending orders and completes them.
///
/// Owns polling cadence and retry timing; the repository does neither.
pub struct Fulfillment {
    repository: Arc<dyn OrderRepository>,
    config: WorkerConfig,
}

impl Fulfillment {
    pub fn new(repository: Arc<dyn OrderRepository>, config: WorkerConfig) -> Self {
        info!(
            poll_interval_ms = config.poll_interval_ms,
            operation_timeout_ms = config.operation_timeout_ms,
            "initializing fulfillment worker"
        );
        Self { repository, config }
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(Duration::from_millis(self.config.operation_timeout_ms))
    }

    /// Fetches pending orders and moves each one to `Processing`.
    ///
    /// Orders whose claim matched nothing or failed are left out of the
    /// result; a failed claim leaves the order pending for the next poll.
    /// Orders claimed before a failure are still returned.
    pub async fn poll_once(&self) -> Result<Vec<Order>, RepositoryError> {
        trace!("polling for pending orders");
        let pending = self.repository.get_pending_orders(self.deadline()).await?;

        let mut claimed = Vec::with_capacity(pending.len());
        for order in pending {
            let order = order.with_status(OrderStatus::Processing);
            let outcome = match self.repository.update_order(&order, self.deadline()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(order_id = %order.order_id, error = %e, "failed to claim order");
                    continue;
                }
            };
            if outcome.matched == 0 {
                warn!(order_id = %order.order_id, "pending order vanished before it was claimed");
                continue;
            }
            debug!(order_id = %order.order_id, "claimed order");
            claimed.push(order);
        }

        if !claimed.is_empty() {
            info!(count = claimed.len(), "claimed pending orders");
        }
        Ok(claimed)
    }

    pub async fn complete(&self, order_id: &str) -> Result<UpdateOutcome, RepositoryError> {
        let order = Order::new(order_id, OrderStatus::Processed);
        self.repository.update_order(&order, self.deadline()).await
    }

    /// Polls until `shutdown` resolves, completing every claimed order.
    ///
    /// Failures are logged and retried on the next tick. A claimed order
    /// whose completion fails is kept and completed again on later ticks,
    /// since it no longer shows up as pending.
    pub async fn run<S>(&self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let mut unfinished: Vec<String> = Vec::new();

        loop {
            let mut to_complete = std::mem::take(&mut unfinished);
            match self.poll_once().await {
                Ok(claimed) => to_complete.extend(claimed.into_iter().map(|order| order.order_id)),
                Err(e) => error!(error = %e, "failed to poll pending orders"),
            }

            for order_id in to_complete {
                if let Err(e) = self.complete(&order_id).await {
                    error!(order_id = %order_id, error = %e, "failed to complete order");
                    unfinished.push(order_id);
                }
            }

            tokio::select! {
                _ = &mut shutdown => {
                    if !unfinished.is_empty() {
                        warn!(count = unfinished.len(), "stopping with claimed orders left in processing");
                    }
                    info!("fulfillment worker stopping");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}

use crate::deadline::Deadline;
use crate::error::RepositoryError;
use crate::model::{ORDER_ID_FIELD, Order, OrderStatus, STATUS_FIELD, UpdateOutcome};
use crate::storage::OrderRepository;
use async_trait::async_trait;
use common::config::{
    ORDER_DB_COLLECTION_NAME, ORDER_DB_NAME, ORDER_DB_PASSWORD, ORDER_DB_URI, ORDER_DB_USERNAME,
    OrderDbConfig,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::options::{ClientOptions, Credential, Tls, TlsOptions};
use mongodb::{Client, Collection};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Order repository backed by a MongoDB collection.
///
/// Cloning is cheap; clones share the driver's connection pool.
#[derive(Clone)]
pub struct MongoOrderRepository {
    collection: Collection<Document>,
}

impl MongoOrderRepository {
    /// Builds a client for the configured collection and pings the server.
    ///
    /// Missing settings fail before any network activity. A failed or
    /// timed-out ping is only logged: the driver keeps trying to reach the
    /// server in the background, so later calls may still succeed.
    pub async fn connect(config: &OrderDbConfig) -> Result<Self, RepositoryError> {
        let uri = config
            .uri()
            .ok_or(RepositoryError::ConfigurationMissing(ORDER_DB_URI))?;
        let db_name = config
            .database()
            .ok_or(RepositoryError::ConfigurationMissing(ORDER_DB_NAME))?;
        let collection_name = config
            .collection()
            .ok_or(RepositoryError::ConfigurationMissing(ORDER_DB_COLLECTION_NAME))?;
        let credential = Self::credential(config, db_name)?;

        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.into()))?;
        if let Some(credential) = credential {
            options.credential = Some(credential);
            options.tls = Some(Tls::Enabled(TlsOptions::default()));
        }

        info!(db = db_name, collection = collection_name, "connecting to order store");
        let client = Client::with_options(options)
            .map_err(|e| RepositoryError::ConnectionFailed(e.into()))?;
        let database = client.database(db_name);

        let ping = async { database.run_command(doc! { "ping": 1 }).await };
        match tokio::time::timeout(Duration::from_millis(config.ping_timeout_ms), ping).await {
            Ok(Ok(_)) => info!("pong from order store"),
            Ok(Err(e)) => warn!(error = %e, "failed to ping order store"),
            Err(_) => warn!(
                timeout_ms = config.ping_timeout_ms,
                "ping to order store timed out"
            ),
        }

        Ok(Self {
            collection: database.collection(collection_name),
        })
    }

    /// Wraps an existing collection handle, skipping configuration and ping.
    pub fn from_collection(collection: Collection<Document>) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    // Username and password go together; auth is scoped to the order database.
    fn credential(
        config: &OrderDbConfig,
        db_name: &str,
    ) -> Result<Option<Credential>, RepositoryError> {
        match (config.username(), config.password()) {
            (None, None) => Ok(None),
            (Some(username), Some(password)) => Ok(Some(
                Credential::builder()
                    .username(username.to_string())
                    .password(password.to_string())
                    .source(db_name.to_string())
                    .build(),
            )),
            (Some(_), None) => Err(RepositoryError::ConfigurationMissing(ORDER_DB_PASSWORD)),
            (None, Some(_)) => Err(RepositoryError::ConfigurationMissing(ORDER_DB_USERNAME)),
        }
    }

    fn decode(document: Document) -> Result<Order, RepositoryError> {
        bson::from_document(document).map_err(|e| {
            error!(error = %e, "failed to decode order");
            RepositoryError::decode(e)
        })
    }

    // The store's own _id never reaches the order payload.
    fn projection() -> Document {
        doc! { "_id": 0 }
    }

    fn single_field(key: &str, value: impl Into<Bson>) -> Document {
        let mut document = Document::new();
        document.insert(key, value);
        document
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    async fn get_pending_orders(&self, deadline: Deadline) -> Result<Vec<Order>, RepositoryError> {
        deadline
            .run("get_pending_orders", async {
                let filter = Self::single_field(STATUS_FIELD, OrderStatus::Pending.code());
                let mut cursor = self
                    .collection
                    .find(filter)
                    .projection(Self::projection())
                    .await
                    .map_err(RepositoryError::query)
                    .inspect_err(|e| error!(error = %e, "failed to find pending orders"))?;

                let mut orders = Vec::new();
                while let Some(document) = cursor
                    .try_next()
                    .await
                    .map_err(RepositoryError::query)
                    .inspect_err(|e| error!(error = %e, "failed to read pending orders"))?
                {
                    orders.push(Self::decode(document)?);
                }

                debug!(count = orders.len(), "fetched pending orders");
                Ok(orders)
            })
            .await
    }

    async fn get_order(&self, id: &str, deadline: Deadline) -> Result<Order, RepositoryError> {
        deadline
            .run("get_order", async {
                let document = self
                    .collection
                    .find_one(Self::single_field(ORDER_ID_FIELD, id))
                    .projection(Self::projection())
                    .await
                    .map_err(RepositoryError::query)
                    .inspect_err(|e| error!(order_id = %id, error = %e, "failed to find order"))?
                    .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

                Self::decode(document)
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
                let documents = orders
                    .iter()
                    .map(bson::to_document)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(RepositoryError::write)?;

                let result = self
                    .collection
                    .insert_many(documents)
                    .await
                    .map_err(RepositoryError::write)
                    .inspect_err(|e| error!(count = orders.len(), error = %e, "failed to insert orders"))?;

                let inserted = result.inserted_ids.len() as u64;
                info!(inserted, "inserted orders into order store");
                Ok(inserted)
            })
            .await
    }

    async fn update_order(&self, order: &Order, deadline: Deadline) -> Result<UpdateOutcome, RepositoryError> {
        debug!(order_id = %order.order_id, status = %order.status, "updating order");

        deadline
            .run("update_order", async {
                let result = self
                    .collection
                    .update_many(
                        Self::single_field(ORDER_ID_FIELD, order.order_id.as_str()),
                        doc! { "$set": Self::single_field(STATUS_FIELD, order.status.code()) },
                    )
                    .await
                    .map_err(RepositoryError::write)
                    .inspect_err(|e| {
                        error!(order_id = %order.order_id, error = %e, "failed to update order")
                    })?;

                let outcome = UpdateOutcome {
                    matched: result.matched_count,
                    modified: result.modified_count,
                };
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

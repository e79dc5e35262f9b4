use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use std::error::Error;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use thiserror::Error as ThisError;

pub type GenericError = Box<dyn Error + Send + Sync>;

/// Wire name of the order identifier field.
pub const ORDER_ID_FIELD: &str = "orderid";
/// Wire name of the status field.
pub const STATUS_FIELD: &str = "status";

/// Workflow state of an order.
///
/// Persisted as its integer code; the codes are shared with every service
/// that reads the order collection and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum OrderStatus {
    Pending,
    Processing,
    Processed,
}

#[derive(Debug, ThisError, PartialEq, Eq)]
#[error("unknown order status code {0}")]
pub struct UnknownStatus(pub i32);

impl OrderStatus {
    pub fn code(self) -> i32 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Processed => 2,
        }
    }
}

impl From<OrderStatus> for i32 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for OrderStatus {
    type Error = UnknownStatus;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        OrderStatus::iter()
            .find(|status| status.code() == code)
            .ok_or(UnknownStatus(code))
    }
}

/// An order as stored in the order collection.
///
/// Only `order_id` and `status` are interpreted. Every other field of the
/// stored document (customer, items, timestamps, ...) travels in `payload`
/// untouched. `payload` must not carry the `orderid` or `status` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "orderid")]
    pub order_id: String,
    pub status: OrderStatus,
    #[serde(flatten)]
    pub payload: Document,
}

impl Order {
    pub fn new(order_id: impl Into<String>, status: OrderStatus) -> Self {
        Self {
            order_id: order_id.into(),
            status,
            payload: Document::new(),
        }
    }

    pub fn pending(order_id: impl Into<String>) -> Self {
        Self::new(order_id, OrderStatus::Pending)
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.payload.insert(key, value);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn field(&self, key: &str) -> Option<&Bson> {
        self.payload.get(key)
    }
}

/// Counts reported by a status update.
///
/// `matched` can exceed one when several documents share an order id; all of
/// them are updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

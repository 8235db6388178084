//! Domain events
//!
//! Serialized messages describing order lifecycle changes, published to the
//! message bus when one is configured. Consumers (notifications, analytics)
//! are outside this service.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::order::OrderStatus;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed {
        order_id: Uuid,
        order_number: String,
        user_id: Uuid,
        total_amount: Decimal,
    },
    StatusChanged {
        order_id: Uuid,
        status: OrderStatus,
    },
    Cancelled {
        order_id: Uuid,
        order_number: String,
    },
}

impl OrderEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Placed { .. } => "orders.placed",
            Self::StatusChanged { .. } => "orders.status_changed",
            Self::Cancelled { .. } => "orders.cancelled",
        }
    }
}

//! Error taxonomy for the order subsystem.
//!
//! Every variant is recoverable at the request boundary; none is fatal to
//! the process. Builder failures must leave zero side effects, so variants
//! carry enough detail for the caller to surface a message tied to the
//! specific failing field or item.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::aggregates::order::OrderStatus;

#[derive(Debug, Error)]
pub enum Error {
    #[error("order must contain at least one item")]
    EmptyCart,

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("product {0} not found")]
    ProductNotFound(Uuid),

    #[error("order {0} not found")]
    OrderNotFound(Uuid),

    #[error("category {0} not found")]
    CategoryNotFound(Uuid),

    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: Uuid,
        requested: u32,
        available: u32,
    },

    #[error("price changed for product {product_id}: cart has {cart_price}, current is {current_price}")]
    PriceChanged {
        product_id: Uuid,
        cart_price: Decimal,
        current_price: Decimal,
    },

    #[error("order cannot be {action} while {status}")]
    IllegalState {
        action: &'static str,
        status: OrderStatus,
    },

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl Error {
    /// True for failures the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

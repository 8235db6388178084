//! Persistence boundary for the catalog and order records.
//!
//! The service layer only sees the [`Store`] trait. Stock mutations are the
//! contract's sharp edge: `decrement_stock` verifies and applies in one
//! atomic step per product, so two concurrent checkouts can never both pass
//! the check and drive stock below zero.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::aggregates::order::Order;
use crate::domain::aggregates::product::{Category, Product};
use crate::error::Result;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Clone, Debug)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub include_inactive: bool,
    pub page: u32,
    pub per_page: u32,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            include_inactive: false,
            page: 1,
            per_page: 20,
        }
    }
}

impl ProductFilter {
    pub fn limit_offset(&self) -> (i64, i64) {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, 100);
        (per_page as i64, ((page - 1) * per_page) as i64)
    }
}

#[derive(Clone, Debug)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: i64,
    pub page: u32,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn product(&self, id: Uuid) -> Result<Option<Product>>;
    async fn products(&self, filter: &ProductFilter) -> Result<ProductPage>;
    async fn categories(&self) -> Result<Vec<Category>>;

    /// Atomically subtracts `qty` from the product's stock, failing with
    /// `InsufficientStock` (and no mutation) when not enough is available.
    async fn decrement_stock(&self, product_id: Uuid, qty: u32) -> Result<()>;

    /// Inverse of `decrement_stock`, applied on cancellation and rollback.
    async fn restore_stock(&self, product_id: Uuid, qty: u32) -> Result<()>;

    /// Persists a new order; fails with `Conflict` when the order number is
    /// already taken.
    async fn insert_order(&self, order: &Order) -> Result<()>;
    async fn order(&self, id: Uuid) -> Result<Option<Order>>;
    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>>;
    async fn all_orders(&self) -> Result<Vec<Order>>;
    async fn update_order(&self, order: &Order) -> Result<()>;
}

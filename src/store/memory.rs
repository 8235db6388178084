//! In-memory store
//!
//! Backs the service tests and local development. A single mutex guards the
//! whole state, so the check-and-subtract in `decrement_stock` is atomic
//! per call, matching the conditional-update semantics of the Postgres
//! store.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::aggregates::order::Order;
use crate::domain::aggregates::product::{Category, Product};
use crate::error::{Error, Result};
use crate::store::{ProductFilter, ProductPage, Store};

#[derive(Default)]
struct Inner {
    products: HashMap<Uuid, Product>,
    categories: Vec<Category>,
    orders: HashMap<Uuid, Order>,
    order_numbers: HashSet<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_product(&self, product: Product) {
        self.lock().products.insert(product.id, product);
    }

    pub fn put_category(&self, category: Category) {
        self.lock().categories.push(category);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn product(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.lock().products.get(&id).cloned())
    }

    async fn products(&self, filter: &ProductFilter) -> Result<ProductPage> {
        let inner = self.lock();
        let mut items: Vec<Product> = inner
            .products
            .values()
            .filter(|p| filter.include_inactive || p.is_active)
            .filter(|p| {
                filter
                    .category
                    .as_ref()
                    .map(|c| p.category.eq_ignore_ascii_case(c))
                    .unwrap_or(true)
            })
            .filter(|p| {
                filter
                    .search
                    .as_ref()
                    .map(|s| p.name.to_lowercase().contains(&s.to_lowercase()))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len() as i64;
        let (limit, offset) = filter.limit_offset();
        let items = items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok(ProductPage {
            items,
            total,
            page: filter.page.max(1),
        })
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn decrement_stock(&self, product_id: Uuid, qty: u32) -> Result<()> {
        let mut inner = self.lock();
        let product = inner
            .products
            .get_mut(&product_id)
            .ok_or(Error::ProductNotFound(product_id))?;
        product.decrement_stock(qty)
    }

    async fn restore_stock(&self, product_id: Uuid, qty: u32) -> Result<()> {
        let mut inner = self.lock();
        let product = inner
            .products
            .get_mut(&product_id)
            .ok_or(Error::ProductNotFound(product_id))?;
        product.restore_stock(qty);
        Ok(())
    }

    async fn insert_order(&self, order: &Order) -> Result<()> {
        let mut inner = self.lock();
        let number = order.order_number.as_str().to_string();
        if inner.order_numbers.contains(&number) {
            return Err(Error::Conflict(format!(
                "order number {number} already exists"
            )));
        }
        inner.order_numbers.insert(number);
        inner.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn order(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self.lock().orders.get(&id).cloned())
    }

    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let inner = self.lock();
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn all_orders(&self) -> Result<Vec<Order>> {
        let inner = self.lock();
        let mut orders: Vec<Order> = inner.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_order(&self, order: &Order) -> Result<()> {
        let mut inner = self.lock();
        if !inner.orders.contains_key(&order.id) {
            return Err(Error::OrderNotFound(order.id));
        }
        inner.orders.insert(order.id, order.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_decrement_is_conditional() {
        let store = MemoryStore::new();
        let product = Product::new("Azithromycin", Decimal::new(120, 0), 3);
        let id = product.id;
        store.put_product(product);

        store.decrement_stock(id, 2).await.unwrap();
        let err = store.decrement_stock(id, 2).await.unwrap_err();
        assert!(matches!(err, Error::InsufficientStock { available: 1, .. }));
        assert_eq!(
            store
                .product(id)
                .await
                .unwrap()
                .unwrap()
                .stock_quantity
                .value(),
            1
        );
    }

    #[tokio::test]
    async fn test_product_filter() {
        let store = MemoryStore::new();
        let mut a = Product::new("Paracetamol", Decimal::new(25, 0), 5);
        a.category = "Pain Relief".to_string();
        let mut b = Product::new("Cough Syrup", Decimal::new(90, 0), 5);
        b.category = "Cold & Flu".to_string();
        let mut c = Product::new("Old Stock", Decimal::new(10, 0), 0);
        c.is_active = false;
        store.put_product(a);
        store.put_product(b);
        store.put_product(c);

        let page = store.products(&ProductFilter::default()).await.unwrap();
        assert_eq!(page.total, 2);

        let filtered = store
            .products(&ProductFilter {
                search: Some("para".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(filtered.total, 1);
        assert_eq!(filtered.items[0].name, "Paracetamol");
    }
}

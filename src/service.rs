//! Order lifecycle service
//!
//! Coordinates the order builder, the status state machine and cancellation
//! over a [`Store`]. The builder is two-phase: every cart line is validated
//! against the live catalog before any stock moves, then the stock plan is
//! committed with per-product conditional decrements. A decrement lost to a
//! concurrent checkout rolls back the lines already taken, so a failed
//! build leaves no trace.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::aggregates::cart::Cart;
use crate::domain::aggregates::order::{
    Address, DeliveryType, Order, OrderLine, OrderStatus, PaymentMethod, PaymentStatus,
    TimelineStep,
};
use crate::domain::aggregates::product::{Category, Product};
use crate::domain::value_objects::OrderNumber;
use crate::error::{Error, Result};
use crate::pricing;
use crate::store::{ProductFilter, ProductPage, Store};

/// One checkout line. `unit_price` is the price the cart captured; when
/// present it is re-validated against the live catalog and a mismatch
/// rejects the build instead of silently repricing.
#[derive(Clone, Debug, Deserialize)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: Option<Decimal>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    #[serde(default)]
    pub delivery_type: DeliveryType,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

impl CheckoutRequest {
    /// Builds a checkout request from an accumulated cart, carrying the
    /// captured prices along for build-time re-validation.
    pub fn from_cart(
        cart: &Cart,
        delivery_type: DeliveryType,
        shipping_address: Address,
        billing_address: Address,
        payment_method: PaymentMethod,
        notes: Option<String>,
    ) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CheckoutItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: Some(line.unit_price),
                })
                .collect(),
            delivery_type,
            shipping_address,
            billing_address,
            payment_method,
            notes,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TrackingInfo {
    pub order: TrackingSummary,
    pub timeline: Vec<TimelineStep>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TrackingSummary {
    pub order_number: OrderNumber,
    pub status: OrderStatus,
    pub delivery_type: DeliveryType,
    pub estimated_delivery: chrono::DateTime<Utc>,
    pub actual_delivery: Option<chrono::DateTime<Utc>>,
    pub tracking_number: Option<String>,
}

#[derive(Clone)]
pub struct OrderService<S> {
    store: S,
}

impl<S: Store> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // ---- catalog reads ----

    pub async fn get_product(&self, id: Uuid) -> Result<Product> {
        self.store
            .product(id)
            .await?
            .ok_or(Error::ProductNotFound(id))
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage> {
        self.store.products(filter).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.store.categories().await
    }

    // ---- order builder ----

    pub async fn place_order(&self, user_id: Uuid, req: CheckoutRequest) -> Result<Order> {
        if req.items.is_empty() {
            return Err(Error::EmptyCart);
        }
        let mut field_errors = address_errors("shipping_address", &req.shipping_address);
        field_errors.extend(address_errors("billing_address", &req.billing_address));
        if !field_errors.is_empty() {
            return Err(Error::Validation(field_errors));
        }

        // Phase 1: validate every line before touching stock.
        let mut lines = Vec::with_capacity(req.items.len());
        let mut subtotal = Decimal::ZERO;
        for item in &req.items {
            if item.quantity == 0 {
                return Err(Error::Validation(vec![format!(
                    "quantity for product {} must be positive",
                    item.product_id
                )]));
            }
            let product = self
                .store
                .product(item.product_id)
                .await?
                .ok_or(Error::ProductNotFound(item.product_id))?;
            if !product.is_active {
                return Err(Error::Validation(vec![format!(
                    "{} is no longer available",
                    product.name
                )]));
            }
            if let Some(cart_price) = item.unit_price {
                if cart_price != product.price {
                    return Err(Error::PriceChanged {
                        product_id: product.id,
                        cart_price,
                        current_price: product.price,
                    });
                }
            }
            if product.stock_quantity.value() < item.quantity {
                return Err(Error::InsufficientStock {
                    product_id: product.id,
                    requested: item.quantity,
                    available: product.stock_quantity.value(),
                });
            }
            let total_price = product.price * Decimal::from(item.quantity);
            subtotal += total_price;
            lines.push(OrderLine {
                product_id: product.id,
                product_name: product.name.clone(),
                product_price: product.price,
                quantity: item.quantity,
                total_price,
                prescription_required: product.prescription_required,
            });
        }

        // Phase 2: commit the stock plan. A line lost to a concurrent
        // checkout rolls back everything taken so far.
        self.commit_stock(&lines).await?;

        let totals = pricing::quote(subtotal, req.delivery_type);
        let now = Utc::now();
        let mut order = Order {
            id: Uuid::now_v7(),
            order_number: OrderNumber::generate(now),
            user_id,
            status: OrderStatus::Pending,
            delivery_type: req.delivery_type,
            delivery_time_min: req.delivery_type.delivery_minutes(),
            estimated_delivery: now + chrono::Duration::minutes(req.delivery_type.delivery_minutes()),
            actual_delivery: None,
            tracking_number: None,
            items: lines,
            subtotal: totals.subtotal,
            shipping_fee: totals.shipping_fee,
            tax: totals.tax,
            total_amount: totals.total_amount,
            shipping_address: req.shipping_address,
            billing_address: req.billing_address,
            payment_method: req.payment_method,
            payment_status: PaymentStatus::Pending,
            notes: req.notes,
            created_at: now,
            updated_at: now,
        };

        // The random suffix can collide within a day; regenerate and retry.
        let mut attempts = 0;
        loop {
            match self.store.insert_order(&order).await {
                Ok(()) => break,
                Err(Error::Conflict(_)) if attempts < 3 => {
                    attempts += 1;
                    order.order_number = OrderNumber::generate(Utc::now());
                }
                Err(e) => {
                    self.restore_lines(&order.items).await;
                    return Err(e);
                }
            }
        }

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = %order.total_amount,
            "order placed"
        );
        if order.payment_method.requires_payment_step() {
            info!(order_id = %order.id, method = order.payment_method.as_str(), "order awaits payment step");
        }
        Ok(order)
    }

    async fn commit_stock(&self, lines: &[OrderLine]) -> Result<()> {
        for (idx, line) in lines.iter().enumerate() {
            if let Err(e) = self
                .store
                .decrement_stock(line.product_id, line.quantity)
                .await
            {
                self.restore_lines(&lines[..idx]).await;
                return Err(e);
            }
        }
        Ok(())
    }

    async fn restore_lines(&self, lines: &[OrderLine]) {
        for line in lines {
            if let Err(e) = self
                .store
                .restore_stock(line.product_id, line.quantity)
                .await
            {
                warn!(product_id = %line.product_id, error = %e, "failed to restore stock");
            }
        }
    }

    // ---- order reads ----

    pub async fn order_for_user(&self, order_id: Uuid, user_id: Uuid) -> Result<Order> {
        self.store
            .order(order_id)
            .await?
            .filter(|o| o.user_id == user_id)
            .ok_or(Error::OrderNotFound(order_id))
    }

    pub async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        self.store.orders_for_user(user_id).await
    }

    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        self.store.all_orders().await
    }

    pub async fn tracking(&self, order_id: Uuid, user_id: Uuid) -> Result<TrackingInfo> {
        let order = self.order_for_user(order_id, user_id).await?;
        Ok(TrackingInfo {
            timeline: order.tracking_timeline(),
            order: TrackingSummary {
                order_number: order.order_number,
                status: order.status,
                delivery_type: order.delivery_type,
                estimated_delivery: order.estimated_delivery,
                actual_delivery: order.actual_delivery,
                tracking_number: order.tracking_number,
            },
        })
    }

    // ---- transitions ----

    /// Privileged status update. A change to `cancelled` routes through the
    /// cancellation path so stock is restored exactly once.
    pub async fn set_status(
        &self,
        order_id: Uuid,
        next: OrderStatus,
        tracking_number: Option<String>,
    ) -> Result<Order> {
        let mut order = self
            .store
            .order(order_id)
            .await?
            .ok_or(Error::OrderNotFound(order_id))?;

        if next == OrderStatus::Cancelled {
            order.cancel()?;
            self.store.update_order(&order).await?;
            self.restore_lines(&order.items).await;
        } else {
            order.set_status(next, tracking_number)?;
            self.store.update_order(&order).await?;
        }

        info!(order_id = %order.id, status = %order.status, "order status updated");
        Ok(order)
    }

    /// User-triggered cancellation: owner-scoped, only before fulfilment,
    /// and the exact inverse of the builder's stock decrement.
    pub async fn cancel_order(&self, order_id: Uuid, user_id: Uuid) -> Result<Order> {
        let mut order = self.order_for_user(order_id, user_id).await?;
        order.cancel()?;
        self.store.update_order(&order).await?;
        self.restore_lines(&order.items).await;

        info!(order_id = %order.id, order_number = %order.order_number, "order cancelled");
        Ok(order)
    }
}

fn address_errors(prefix: &str, address: &Address) -> Vec<String> {
    match address.validate() {
        Ok(()) => vec![],
        Err(errors) => errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{prefix}.{field}: {message}"),
                    None => format!("{prefix}.{field}: invalid"),
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn address() -> Address {
        Address {
            full_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            address_line1: "12 MG Road".to_string(),
            address_line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            country: "India".to_string(),
        }
    }

    fn request(items: Vec<CheckoutItem>, delivery: DeliveryType) -> CheckoutRequest {
        CheckoutRequest {
            items,
            delivery_type: delivery,
            shipping_address: address(),
            billing_address: address(),
            payment_method: PaymentMethod::Cod,
            notes: None,
        }
    }

    fn item(product: &Product, quantity: u32) -> CheckoutItem {
        CheckoutItem {
            product_id: product.id,
            quantity,
            unit_price: None,
        }
    }

    async fn stock_of(svc: &OrderService<MemoryStore>, id: Uuid) -> u32 {
        svc.store
            .product(id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
            .value()
    }

    #[tokio::test]
    async fn test_place_order_happy_path() {
        let store = MemoryStore::new();
        let mut a = Product::new("Paracetamol 500mg", Decimal::from(250), 10);
        a.prescription_required = false;
        let mut b = Product::new("Insulin Glargine", Decimal::from(500), 5);
        b.prescription_required = true;
        let (a_id, b_id) = (a.id, b.id);
        store.put_product(a.clone());
        store.put_product(b.clone());
        let svc = OrderService::new(store);

        let user = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_line(&a, 2);
        cart.add_line(&b, 1);
        let req = CheckoutRequest::from_cart(
            &cart,
            DeliveryType::Normal,
            address(),
            address(),
            PaymentMethod::Cod,
            Some("leave at door".to_string()),
        );

        let order = svc.place_order(user, req).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.subtotal, Decimal::from(1000));
        assert_eq!(order.shipping_fee, Decimal::from(50));
        assert_eq!(order.tax, Decimal::from(180));
        assert_eq!(order.total_amount, Decimal::from(1230));
        assert_eq!(order.delivery_time_min, 90);
        assert_eq!(order.items.len(), 2);
        assert!(order.items[1].prescription_required);
        assert_eq!(
            order.order_number.date_segment(),
            Utc::now().format("%y%m%d").to_string()
        );

        assert_eq!(stock_of(&svc, a_id).await, 8);
        assert_eq!(stock_of(&svc, b_id).await, 4);

        let fetched = svc.order_for_user(order.id, user).await.unwrap();
        assert_eq!(fetched.order_number, order.order_number);
    }

    #[tokio::test]
    async fn test_drone_delivery_pricing_and_eta() {
        let store = MemoryStore::new();
        let p = Product::new("Thermometer", Decimal::from(1000), 3);
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let order = svc
            .place_order(
                Uuid::new_v4(),
                request(vec![item(&p, 1)], DeliveryType::Drone),
            )
            .await
            .unwrap();
        assert_eq!(order.shipping_fee, Decimal::from(100));
        assert_eq!(order.total_amount, Decimal::from(1280));
        assert_eq!(order.delivery_time_min, 45);
        let eta_minutes = (order.estimated_delivery - order.created_at).num_minutes();
        assert_eq!(eta_minutes, 45);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let svc = OrderService::new(MemoryStore::new());
        let err = svc
            .place_order(Uuid::new_v4(), request(vec![], DeliveryType::Normal))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyCart));
    }

    #[tokio::test]
    async fn test_address_validation_has_field_messages() {
        let store = MemoryStore::new();
        let p = Product::new("Bandages", Decimal::from(60), 10);
        let p_id = p.id;
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let mut req = request(vec![item(&p, 1)], DeliveryType::Normal);
        req.shipping_address.city = String::new();
        req.billing_address.postal_code = String::new();

        let err = svc.place_order(Uuid::new_v4(), req).await.unwrap_err();
        match err {
            Error::Validation(messages) => {
                assert!(messages
                    .iter()
                    .any(|m| m.contains("shipping_address.city")));
                assert!(messages
                    .iter()
                    .any(|m| m.contains("billing_address.postal_code")));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Validation failures must leave stock untouched.
        assert_eq!(stock_of(&svc, p_id).await, 10);
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let svc = OrderService::new(MemoryStore::new());
        let ghost = Uuid::new_v4();
        let err = svc
            .place_order(
                Uuid::new_v4(),
                request(
                    vec![CheckoutItem {
                        product_id: ghost,
                        quantity: 1,
                        unit_price: None,
                    }],
                    DeliveryType::Normal,
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProductNotFound(id) if id == ghost));
    }

    #[tokio::test]
    async fn test_insufficient_stock_aborts_with_no_side_effects() {
        let store = MemoryStore::new();
        let a = Product::new("Syringes", Decimal::from(20), 50);
        let b = Product::new("Rare Serum", Decimal::from(900), 1);
        let (a_id, b_id) = (a.id, b.id);
        store.put_product(a.clone());
        store.put_product(b.clone());
        let svc = OrderService::new(store);

        let err = svc
            .place_order(
                Uuid::new_v4(),
                request(vec![item(&a, 10), item(&b, 2)], DeliveryType::Normal),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientStock {
                requested: 2,
                available: 1,
                ..
            }
        ));
        // The first line validated fine, but nothing may have been taken.
        assert_eq!(stock_of(&svc, a_id).await, 50);
        assert_eq!(stock_of(&svc, b_id).await, 1);
    }

    #[tokio::test]
    async fn test_price_change_rejected() {
        let store = MemoryStore::new();
        let p = Product::new("Multivitamin", Decimal::from(300), 10);
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let stale = CheckoutItem {
            product_id: p.id,
            quantity: 1,
            unit_price: Some(Decimal::from(250)),
        };
        let err = svc
            .place_order(Uuid::new_v4(), request(vec![stale], DeliveryType::Normal))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PriceChanged { cart_price, current_price, .. }
                if cart_price == Decimal::from(250) && current_price == Decimal::from(300)
        ));
    }

    #[tokio::test]
    async fn test_inactive_product_rejected() {
        let store = MemoryStore::new();
        let mut p = Product::new("Recalled Tonic", Decimal::from(80), 10);
        p.is_active = false;
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let err = svc
            .place_order(Uuid::new_v4(), request(vec![item(&p, 1)], DeliveryType::Normal))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_concurrent_builds_oversell_nothing() {
        let store = MemoryStore::new();
        let p = Product::new("Last Vial", Decimal::from(500), 1);
        let p_id = p.id;
        store.put_product(p.clone());
        let svc = Arc::new(OrderService::new(store));

        let spawn = |svc: Arc<OrderService<MemoryStore>>, req: CheckoutRequest| {
            tokio::spawn(async move { svc.place_order(Uuid::new_v4(), req).await })
        };
        let first = spawn(svc.clone(), request(vec![item(&p, 1)], DeliveryType::Normal));
        let second = spawn(svc.clone(), request(vec![item(&p, 1)], DeliveryType::Normal));

        let results = [first.await.unwrap(), second.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(Error::InsufficientStock { .. })
        )));
        assert_eq!(stock_of(&svc, p_id).await, 0);
    }

    #[tokio::test]
    async fn test_cancel_restores_stock_exactly_once() {
        let store = MemoryStore::new();
        let p = Product::new("Cough Syrup", Decimal::from(90), 10);
        let p_id = p.id;
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let user = Uuid::new_v4();
        let order = svc
            .place_order(user, request(vec![item(&p, 3)], DeliveryType::Normal))
            .await
            .unwrap();
        assert_eq!(stock_of(&svc, p_id).await, 7);

        let cancelled = svc.cancel_order(order.id, user).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(stock_of(&svc, p_id).await, 10);

        // Cancelling again must not restore a second time.
        let err = svc.cancel_order(order.id, user).await.unwrap_err();
        assert!(matches!(err, Error::IllegalState { .. }));
        assert_eq!(stock_of(&svc, p_id).await, 10);
    }

    #[tokio::test]
    async fn test_cancel_requires_ownership() {
        let store = MemoryStore::new();
        let p = Product::new("Eye Drops", Decimal::from(110), 5);
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let owner = Uuid::new_v4();
        let order = svc
            .place_order(owner, request(vec![item(&p, 1)], DeliveryType::Normal))
            .await
            .unwrap();

        let stranger = Uuid::new_v4();
        let err = svc.cancel_order(order.id, stranger).await.unwrap_err();
        assert!(matches!(err, Error::OrderNotFound(_)));
    }

    #[tokio::test]
    async fn test_cancel_shipped_order_rejected() {
        let store = MemoryStore::new();
        let p = Product::new("Crutches", Decimal::from(700), 4);
        let p_id = p.id;
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let user = Uuid::new_v4();
        let order = svc
            .place_order(user, request(vec![item(&p, 1)], DeliveryType::Normal))
            .await
            .unwrap();
        svc.set_status(order.id, OrderStatus::Confirmed, None)
            .await
            .unwrap();
        svc.set_status(order.id, OrderStatus::Processing, None)
            .await
            .unwrap();
        svc.set_status(order.id, OrderStatus::Shipped, None)
            .await
            .unwrap();

        let err = svc.cancel_order(order.id, user).await.unwrap_err();
        assert!(matches!(
            err,
            Error::IllegalState {
                status: OrderStatus::Shipped,
                ..
            }
        ));
        let unchanged = svc.order_for_user(order.id, user).await.unwrap();
        assert_eq!(unchanged.status, OrderStatus::Shipped);
        assert_eq!(stock_of(&svc, p_id).await, 3);
    }

    #[tokio::test]
    async fn test_set_status_enforces_adjacency() {
        let store = MemoryStore::new();
        let p = Product::new("Gauze", Decimal::from(30), 10);
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let order = svc
            .place_order(Uuid::new_v4(), request(vec![item(&p, 1)], DeliveryType::Normal))
            .await
            .unwrap();

        let err = svc
            .set_status(order.id, OrderStatus::Delivered, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));

        let updated = svc
            .set_status(order.id, OrderStatus::Confirmed, Some("TRK-7".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Confirmed);
        assert_eq!(updated.tracking_number.as_deref(), Some("TRK-7"));
    }

    #[tokio::test]
    async fn test_admin_cancel_via_set_status_restores_stock() {
        let store = MemoryStore::new();
        let p = Product::new("Nebulizer", Decimal::from(2200), 2);
        let p_id = p.id;
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let order = svc
            .place_order(Uuid::new_v4(), request(vec![item(&p, 2)], DeliveryType::Normal))
            .await
            .unwrap();
        assert_eq!(stock_of(&svc, p_id).await, 0);

        let cancelled = svc
            .set_status(order.id, OrderStatus::Cancelled, None)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(stock_of(&svc, p_id).await, 2);
    }

    #[tokio::test]
    async fn test_tracking_view() {
        let store = MemoryStore::new();
        let p = Product::new("Face Masks", Decimal::from(150), 20);
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let user = Uuid::new_v4();
        let order = svc
            .place_order(user, request(vec![item(&p, 2)], DeliveryType::Drone))
            .await
            .unwrap();
        svc.set_status(order.id, OrderStatus::Confirmed, None)
            .await
            .unwrap();

        let info = svc.tracking(order.id, user).await.unwrap();
        assert_eq!(info.order.status, OrderStatus::Confirmed);
        assert_eq!(info.order.delivery_type, DeliveryType::Drone);
        assert_eq!(info.timeline.len(), 5);
        assert!(info.timeline[1].completed);
        assert!(!info.timeline[2].completed);
    }

    #[tokio::test]
    async fn test_orders_listed_newest_first() {
        let store = MemoryStore::new();
        let p = Product::new("Zinc Tablets", Decimal::from(95), 50);
        store.put_product(p.clone());
        let svc = OrderService::new(store);

        let user = Uuid::new_v4();
        let first = svc
            .place_order(user, request(vec![item(&p, 1)], DeliveryType::Normal))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = svc
            .place_order(user, request(vec![item(&p, 1)], DeliveryType::Normal))
            .await
            .unwrap();

        let orders = svc.orders_for_user(user).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, second.id);
        assert_eq!(orders[1].id, first.id);
    }
}

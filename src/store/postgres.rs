//! Postgres store
//!
//! Orders persist document-style: one row per order with the line snapshots
//! and both addresses embedded as JSONB, so historical orders never depend
//! on the live products table. Stock decrements ride a single conditional
//! `UPDATE ... WHERE stock_quantity >= n`, which is what keeps concurrent
//! checkouts from overselling.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::aggregates::order::{
    Address, DeliveryType, Order, OrderLine, OrderStatus, PaymentMethod, PaymentStatus,
};
use crate::domain::aggregates::product::{Category, Product};
use crate::domain::value_objects::{OrderNumber, Quantity};
use crate::error::{Error, Result};
use crate::store::{ProductFilter, ProductPage, Store};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    original_price: Option<Decimal>,
    category: String,
    subcategory: Option<String>,
    images: Vec<String>,
    composition: Option<String>,
    dosage: Option<String>,
    manufacturer: Option<String>,
    prescription_required: bool,
    stock_quantity: i32,
    is_featured: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            original_price: row.original_price,
            category: row.category,
            subcategory: row.subcategory,
            images: row.images,
            composition: row.composition,
            dosage: row.dosage,
            manufacturer: row.manufacturer,
            prescription_required: row.prescription_required,
            stock_quantity: Quantity::new(row.stock_quantity.max(0) as u32),
            is_featured: row.is_featured,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    user_id: Uuid,
    status: String,
    delivery_type: String,
    delivery_time_min: i64,
    estimated_delivery: DateTime<Utc>,
    actual_delivery: Option<DateTime<Utc>>,
    tracking_number: Option<String>,
    items: Json<Vec<OrderLine>>,
    subtotal: Decimal,
    shipping_fee: Decimal,
    tax: Decimal,
    total_amount: Decimal,
    shipping_address: Json<Address>,
    billing_address: Json<Address>,
    payment_method: String,
    payment_status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn decode_err(detail: String) -> Error {
    Error::Storage(sqlx::Error::Decode(detail.into()))
}

impl TryFrom<OrderRow> for Order {
    type Error = Error;

    fn try_from(row: OrderRow) -> Result<Self> {
        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| decode_err(format!("unknown order status: {}", row.status)))?;
        let delivery_type = DeliveryType::parse(&row.delivery_type)
            .ok_or_else(|| decode_err(format!("unknown delivery type: {}", row.delivery_type)))?;
        let payment_method = PaymentMethod::parse(&row.payment_method)
            .ok_or_else(|| decode_err(format!("unknown payment method: {}", row.payment_method)))?;
        let payment_status = PaymentStatus::parse(&row.payment_status)
            .ok_or_else(|| decode_err(format!("unknown payment status: {}", row.payment_status)))?;
        let order_number = OrderNumber::parse(row.order_number)
            .map_err(|e| decode_err(e.to_string()))?;

        Ok(Order {
            id: row.id,
            order_number,
            user_id: row.user_id,
            status,
            delivery_type,
            delivery_time_min: row.delivery_time_min,
            estimated_delivery: row.estimated_delivery,
            actual_delivery: row.actual_delivery,
            tracking_number: row.tracking_number,
            items: row.items.0,
            subtotal: row.subtotal,
            shipping_fee: row.shipping_fee,
            tax: row.tax,
            total_amount: row.total_amount,
            shipping_address: row.shipping_address.0,
            billing_address: row.billing_address.0,
            payment_method,
            payment_status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn product(&self, id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn products(&self, filter: &ProductFilter) -> Result<ProductPage> {
        let (limit, offset) = filter.limit_offset();
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM products \
             WHERE ($1::text IS NULL OR category ILIKE $1) \
               AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%') \
               AND (is_active OR $3) \
             ORDER BY created_at DESC LIMIT $4 OFFSET $5",
        )
        .bind(&filter.category)
        .bind(&filter.search)
        .bind(filter.include_inactive)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM products \
             WHERE ($1::text IS NULL OR category ILIKE $1) \
               AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%') \
               AND (is_active OR $3)",
        )
        .bind(&filter.category)
        .bind(&filter.search)
        .bind(filter.include_inactive)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProductPage {
            items: rows.into_iter().map(Product::from).collect(),
            total: total.0,
            page: filter.page.max(1),
        })
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, CategoryRow>("SELECT * FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories.into_iter().map(Category::from).collect())
    }

    async fn decrement_stock(&self, product_id: Uuid, qty: u32) -> Result<()> {
        let result = sqlx::query(
            "UPDATE products \
             SET stock_quantity = stock_quantity - $2, updated_at = NOW() \
             WHERE id = $1 AND stock_quantity >= $2",
        )
        .bind(product_id)
        .bind(qty as i32)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 1 {
            return Ok(());
        }

        // Distinguish "gone" from "short" for the error surface.
        let available: Option<(i32,)> =
            sqlx::query_as("SELECT stock_quantity FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(&self.pool)
                .await?;
        match available {
            None => Err(Error::ProductNotFound(product_id)),
            Some((stock,)) => Err(Error::InsufficientStock {
                product_id,
                requested: qty,
                available: stock.max(0) as u32,
            }),
        }
    }

    async fn restore_stock(&self, product_id: Uuid, qty: u32) -> Result<()> {
        let result = sqlx::query(
            "UPDATE products \
             SET stock_quantity = stock_quantity + $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(product_id)
        .bind(qty as i32)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::ProductNotFound(product_id));
        }
        Ok(())
    }

    async fn insert_order(&self, order: &Order) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO orders (id, order_number, user_id, status, delivery_type, \
             delivery_time_min, estimated_delivery, actual_delivery, tracking_number, items, \
             subtotal, shipping_fee, tax, total_amount, shipping_address, billing_address, \
             payment_method, payment_status, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21)",
        )
        .bind(order.id)
        .bind(order.order_number.as_str())
        .bind(order.user_id)
        .bind(order.status.as_str())
        .bind(order.delivery_type.as_str())
        .bind(order.delivery_time_min)
        .bind(order.estimated_delivery)
        .bind(order.actual_delivery)
        .bind(&order.tracking_number)
        .bind(Json(&order.items))
        .bind(order.subtotal)
        .bind(order.shipping_fee)
        .bind(order.tax)
        .bind(order.total_amount)
        .bind(Json(&order.shipping_address))
        .bind(Json(&order.billing_address))
        .bind(order.payment_method.as_str())
        .bind(order.payment_status.as_str())
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(Error::Conflict(
                format!("order number {} already exists", order.order_number),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn order(&self, id: Uuid) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Order::try_from).transpose()
    }

    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn all_orders(&self) -> Result<Vec<Order>> {
        let rows =
            sqlx::query_as::<_, OrderRow>("SELECT * FROM orders ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn update_order(&self, order: &Order) -> Result<()> {
        let result = sqlx::query(
            "UPDATE orders \
             SET status = $2, payment_status = $3, tracking_number = $4, \
                 actual_delivery = $5, updated_at = $6 \
             WHERE id = $1",
        )
        .bind(order.id)
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(&order.tracking_number)
        .bind(order.actual_delivery)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::OrderNotFound(order.id));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    parent_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            parent_id: row.parent_id,
            created_at: row.created_at,
        }
    }
}

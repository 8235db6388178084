//! Cart accumulator
//!
//! The cart is session-scoped client state: a list of (product, quantity)
//! lines that snapshot the product's name and price at add time. Stock is
//! not checked here; the order builder re-validates every line against the
//! live catalog at checkout. Totals always use the captured price, so a
//! mid-session price edit surfaces as an explicit rejection at build time
//! instead of a silently different total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::aggregates::product::Product;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: Decimal,
    pub prescription_required: bool,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds `quantity` of a product; merges into an existing line when the
    /// product is already in the cart. Returns the line's id.
    pub fn add_line(&mut self, product: &Product, quantity: u32) -> Uuid {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += quantity;
            return line.id;
        }
        let id = Uuid::new_v4();
        self.lines.push(CartLine {
            id,
            product_id: product.id,
            product_name: product.name.clone(),
            unit_price: product.price,
            prescription_required: product.prescription_required,
            quantity,
        });
        id
    }

    pub fn remove_line(&mut self, line_id: Uuid) {
        self.lines.retain(|l| l.id != line_id);
    }

    /// Overwrites a line's quantity; zero removes the line.
    pub fn set_quantity(&mut self, line_id: Uuid, quantity: u32) -> Result<(), CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(CartError::LineNotFound)?;
        if quantity == 0 {
            self.lines.retain(|l| l.id != line_id);
        } else {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Subtotal over captured line prices.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[derive(Debug, Clone)]
pub enum CartError {
    LineNotFound,
}
impl std::error::Error for CartError {}
impl fmt::Display for CartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cart line not found")
    }
}

/// Caller-supplied cart persistence, keyed by session id.
///
/// Callers load at session start and save after every mutation; nothing in
/// the service layer holds cart state between requests.
pub trait CartStore {
    fn load(&self, session_id: &str) -> Result<Option<Cart>, CartStoreError>;
    fn save(&self, session_id: &str, cart: &Cart) -> Result<(), CartStoreError>;
    fn clear(&self, session_id: &str) -> Result<(), CartStoreError>;
}

#[derive(Debug, Clone)]
pub struct CartStoreError(pub String);
impl std::error::Error for CartStoreError {}
impl fmt::Display for CartStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cart store error: {}", self.0)
    }
}

/// In-memory [`CartStore`] holding carts as serialized JSON, the same shape
/// a device-local storage backend would persist.
#[derive(Default)]
pub struct MemoryCartStore {
    carts: Mutex<HashMap<String, String>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self, session_id: &str) -> Result<Option<Cart>, CartStoreError> {
        let carts = self.carts.lock().expect("cart store lock poisoned");
        match carts.get(session_id) {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| CartStoreError(e.to_string())),
            None => Ok(None),
        }
    }

    fn save(&self, session_id: &str, cart: &Cart) -> Result<(), CartStoreError> {
        let raw = serde_json::to_string(cart).map_err(|e| CartStoreError(e.to_string()))?;
        self.carts
            .lock()
            .expect("cart store lock poisoned")
            .insert(session_id.to_string(), raw);
        Ok(())
    }

    fn clear(&self, session_id: &str) -> Result<(), CartStoreError> {
        self.carts
            .lock()
            .expect("cart store lock poisoned")
            .remove(session_id);
        Ok(())
    }
}

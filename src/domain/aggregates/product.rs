//! Product and category records for the pharmacy catalog

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Quantity;
use crate::error::{Error, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub category: String,
    pub subcategory: Option<String>,
    pub images: Vec<String>,
    pub composition: Option<String>,
    pub dosage: Option<String>,
    pub manufacturer: Option<String>,
    pub prescription_required: bool,
    pub stock_quantity: Quantity,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: String::new(),
            price,
            original_price: None,
            category: String::new(),
            subcategory: None,
            images: vec![],
            composition: None,
            dosage: None,
            manufacturer: None,
            prescription_required: false,
            stock_quantity: Quantity::new(stock),
            is_featured: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_stock(&self) -> bool {
        !self.stock_quantity.is_zero()
    }

    /// Conditional decrement: succeeds only if the full quantity is
    /// available, otherwise leaves stock untouched.
    pub fn decrement_stock(&mut self, qty: u32) -> Result<()> {
        match self.stock_quantity.subtract(qty) {
            Some(remaining) => {
                self.stock_quantity = remaining;
                self.touch();
                Ok(())
            }
            None => Err(Error::InsufficientStock {
                product_id: self.id,
                requested: qty,
                available: self.stock_quantity.value(),
            }),
        }
    }

    /// Inverse of [`Product::decrement_stock`], applied on cancellation.
    pub fn restore_stock(&mut self, qty: u32) {
        self.stock_quantity = self.stock_quantity.add(qty);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = name.to_lowercase().replace(' ', "-");
        Self {
            id: Uuid::now_v7(),
            name,
            slug,
            description: None,
            parent_id: None,
            created_at: Utc::now(),
        }
    }
}

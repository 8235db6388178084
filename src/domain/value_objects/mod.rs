//! Value objects for the pharmacy storefront

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-readable order number: `PF` + two-digit year/month/day + a
/// four-digit random suffix, e.g. `PF2608061234`.
///
/// The suffix makes same-day collisions possible; uniqueness is enforced by
/// the store, and callers regenerate on conflict.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
        Self(format!("PF{}{:04}", now.format("%y%m%d"), suffix))
    }

    pub fn parse(value: impl Into<String>) -> Result<Self, OrderNumberError> {
        let value = value.into();
        if value.len() != 12 || !value.starts_with("PF") {
            return Err(OrderNumberError::InvalidFormat);
        }
        if !value[2..].bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderNumberError::InvalidFormat);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `%y%m%d` date segment of the number.
    pub fn date_segment(&self) -> &str {
        &self.0[2..8]
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum OrderNumberError {
    InvalidFormat,
}
impl std::error::Error for OrderNumberError {}
impl fmt::Display for OrderNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order number must be PF followed by ten digits")
    }
}

/// Stock quantity value object
///
/// Non-negative by construction; `subtract` refuses to go below zero, which
/// is the invariant the whole order/cancel cycle leans on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self {
        Self(value)
    }
    pub fn value(&self) -> u32 {
        self.0
    }
    pub fn add(&self, other: u32) -> Self {
        Self(self.0.saturating_add(other))
    }
    pub fn subtract(&self, other: u32) -> Option<Self> {
        if other > self.0 {
            None
        } else {
            Some(Self(self.0 - other))
        }
    }
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let now = Utc::now();
        let n = OrderNumber::generate(now);
        assert_eq!(n.as_str().len(), 12);
        assert!(n.as_str().starts_with("PF"));
        assert_eq!(n.date_segment(), now.format("%y%m%d").to_string());
        assert!(n.as_str()[2..].bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_order_number_parse() {
        assert!(OrderNumber::parse("PF2608061234").is_ok());
        assert!(OrderNumber::parse("PF26080612").is_err());
        assert!(OrderNumber::parse("XX2608061234").is_err());
        assert!(OrderNumber::parse("PF26080612ab").is_err());
    }

    #[test]
    fn test_quantity() {
        let q = Quantity::new(5);
        assert_eq!(q.subtract(3), Some(Quantity::new(2)));
        assert_eq!(q.subtract(6), None);
        assert_eq!(q.add(1).value(), 6);
        assert!(Quantity::default().is_zero());
    }
}

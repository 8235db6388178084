//! Checkout money math
//!
//! All amounts are bare decimals in the store's single currency (rupees).
//! Shipping is a flat fee keyed by delivery type; tax is a single-rate 18%
//! GST on the subtotal. Delivery ETAs are fixed per tier, not computed from
//! distance.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::aggregates::order::DeliveryType;

pub fn tax_rate() -> Decimal {
    Decimal::new(18, 2)
}

impl DeliveryType {
    pub fn shipping_fee(&self) -> Decimal {
        match self {
            Self::Drone => Decimal::from(100),
            Self::Normal => Decimal::from(50),
        }
    }

    pub fn delivery_minutes(&self) -> i64 {
        match self {
            Self::Drone => 45,
            Self::Normal => 90,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub tax: Decimal,
    pub total_amount: Decimal,
}

/// Computes the order totals for a given subtotal and delivery tier.
pub fn quote(subtotal: Decimal, delivery: DeliveryType) -> Totals {
    let shipping_fee = delivery.shipping_fee();
    let tax = (subtotal * tax_rate()).round_dp(2);
    Totals {
        subtotal,
        shipping_fee,
        tax,
        total_amount: subtotal + shipping_fee + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_delivery_totals() {
        let t = quote(Decimal::from(1000), DeliveryType::Normal);
        assert_eq!(t.shipping_fee, Decimal::from(50));
        assert_eq!(t.tax, Decimal::from(180));
        assert_eq!(t.total_amount, Decimal::from(1230));
    }

    #[test]
    fn test_drone_delivery_totals() {
        let t = quote(Decimal::from(1000), DeliveryType::Drone);
        assert_eq!(t.shipping_fee, Decimal::from(100));
        assert_eq!(t.total_amount, Decimal::from(1280));
    }

    #[test]
    fn test_tax_rounds_to_paise() {
        let t = quote(Decimal::new(9999, 2), DeliveryType::Normal);
        assert_eq!(t.tax, Decimal::new(1800, 2));
    }

    #[test]
    fn test_delivery_minutes() {
        assert_eq!(DeliveryType::Drone.delivery_minutes(), 45);
        assert_eq!(DeliveryType::Normal.delivery_minutes(), 90);
    }
}

//! Order aggregate and status state machine
//!
//! An order exclusively owns its line snapshots: product name, price and
//! prescription flag are copied at placement so later catalog edits never
//! rewrite order history. Status changes go through [`Order::set_status`],
//! which only accepts adjacent transitions in the lifecycle graph.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::domain::value_objects::OrderNumber;
use crate::error::{Error, Result};

/// Lifecycle states.
///
/// ```text
/// pending -> confirmed -> processing -> shipped -> delivered
///    |           |
///    +-----------+--> cancelled
/// ```
///
/// `delivered` and `cancelled` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Processing)
                | (Confirmed, Cancelled)
                | (Processing, Shipped)
                | (Shipped, Delivered)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Users may only cancel before fulfilment starts.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Position on the pending..delivered track; `None` for cancelled.
    fn progress_rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Processing => Some(2),
            Self::Shipped => Some(3),
            Self::Delivered => Some(4),
            Self::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    #[default]
    Normal,
    Drone,
}

impl DeliveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Drone => "drone",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "drone" => Some(Self::Drone),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cod,
    Card,
    Upi,
    Netbanking,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cod => "cod",
            Self::Card => "card",
            Self::Upi => "upi",
            Self::Netbanking => "netbanking",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cod" => Some(Self::Cod),
            "card" => Some(Self::Card),
            "upi" => Some(Self::Upi),
            "netbanking" => Some(Self::Netbanking),
            _ => None,
        }
    }

    /// Cash-on-delivery orders are complete at creation; anything else
    /// routes to a separate (simulated) payment step.
    pub fn requires_payment_step(&self) -> bool {
        !matches!(self, Self::Cod)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "failed" => Some(Self::Failed),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }
}

fn default_country() -> String {
    "India".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 1, message = "full name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "address line 1 is required"))]
    pub address_line1: String,
    pub address_line2: Option<String>,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "postal code is required"))]
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

/// Snapshot of one product at the moment the order was placed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: u32,
    pub total_price: Decimal,
    pub prescription_required: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: OrderNumber,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub delivery_type: DeliveryType,
    pub delivery_time_min: i64,
    pub estimated_delivery: DateTime<Utc>,
    pub actual_delivery: Option<DateTime<Utc>>,
    pub tracking_number: Option<String>,
    pub items: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub tax: Decimal,
    pub total_amount: Decimal,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Applies a status transition, enforcing the lifecycle graph.
    ///
    /// Entering `delivered` stamps `actual_delivery` exactly once; a
    /// tracking number, when supplied, is stored on any transition.
    pub fn set_status(&mut self, next: OrderStatus, tracking_number: Option<String>) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if let Some(tracking) = tracking_number {
            self.tracking_number = Some(tracking);
        }
        if next == OrderStatus::Delivered && self.actual_delivery.is_none() {
            self.actual_delivery = Some(Utc::now());
        }
        self.touch();
        Ok(())
    }

    /// User-facing cancellation guard; stock restoration is the service's
    /// side of the contract.
    pub fn cancel(&mut self) -> Result<()> {
        if !self.status.is_cancellable() {
            return Err(Error::IllegalState {
                action: "cancelled",
                status: self.status,
            });
        }
        self.status = OrderStatus::Cancelled;
        self.touch();
        Ok(())
    }

    /// Derived 5-step tracking view. Not a persisted event log: intermediate
    /// steps borrow `updated_at` as a coarse timestamp because per-step
    /// times are not stored.
    pub fn tracking_timeline(&self) -> Vec<TimelineStep> {
        let rank = self.status.progress_rank();
        let reached = |step: u8| rank.map(|r| r >= step).unwrap_or(false);
        let step_time = |step: u8| reached(step).then_some(self.updated_at);

        vec![
            TimelineStep {
                label: "Order Placed",
                timestamp: Some(self.created_at),
                completed: true,
                description: format!("Order #{} has been placed", self.order_number),
            },
            TimelineStep {
                label: "Order Confirmed",
                timestamp: step_time(1),
                completed: reached(1),
                description: "Your order has been confirmed and is being processed".to_string(),
            },
            TimelineStep {
                label: "Processing",
                timestamp: step_time(2),
                completed: reached(2),
                description: "Your order is being prepared for delivery".to_string(),
            },
            TimelineStep {
                label: "Shipped",
                timestamp: step_time(3),
                completed: reached(3),
                description: format!(
                    "Your order is on its way via {} delivery",
                    self.delivery_type
                ),
            },
            TimelineStep {
                label: "Delivered",
                timestamp: self.actual_delivery,
                completed: reached(4),
                description: "Your order has been delivered successfully".to_string(),
            },
        ]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TimelineStep {
    pub label: &'static str,
    pub timestamp: Option<DateTime<Utc>>,
    pub completed: bool,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_address() -> Address {
        Address {
            full_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            address_line1: "12 MG Road".to_string(),
            address_line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            country: default_country(),
        }
    }

    fn sample_order() -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::now_v7(),
            order_number: OrderNumber::generate(now),
            user_id: Uuid::new_v4(),
            status: OrderStatus::Pending,
            delivery_type: DeliveryType::Normal,
            delivery_time_min: 90,
            estimated_delivery: now + chrono::Duration::minutes(90),
            actual_delivery: None,
            tracking_number: None,
            items: vec![OrderLine {
                product_id: Uuid::new_v4(),
                product_name: "Paracetamol 500mg".to_string(),
                product_price: Decimal::new(25, 0),
                quantity: 2,
                total_price: Decimal::new(50, 0),
                prescription_required: false,
            }],
            subtotal: Decimal::new(50, 0),
            shipping_fee: Decimal::new(50, 0),
            tax: Decimal::new(9, 0),
            total_amount: Decimal::new(109, 0),
            shipping_address: sample_address(),
            billing_address: sample_address(),
            payment_method: PaymentMethod::Cod,
            payment_status: PaymentStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_full_lifecycle() {
        let mut order = sample_order();
        order.set_status(OrderStatus::Confirmed, None).unwrap();
        order.set_status(OrderStatus::Processing, None).unwrap();
        order
            .set_status(OrderStatus::Shipped, Some("TRK-42".to_string()))
            .unwrap();
        order.set_status(OrderStatus::Delivered, None).unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.tracking_number.as_deref(), Some("TRK-42"));
        assert!(order.actual_delivery.is_some());
    }

    #[test]
    fn test_illegal_jump_rejected() {
        let mut order = sample_order();
        let err = order
            .set_status(OrderStatus::Delivered, None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered
            }
        ));
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.actual_delivery.is_none());
    }

    #[test]
    fn test_delivered_stamp_set_once() {
        let mut order = sample_order();
        order.set_status(OrderStatus::Confirmed, None).unwrap();
        order.set_status(OrderStatus::Processing, None).unwrap();
        order.set_status(OrderStatus::Shipped, None).unwrap();
        order.set_status(OrderStatus::Delivered, None).unwrap();
        let stamped = order.actual_delivery;
        assert!(stamped.is_some());

        // A repeat delivery is not a legal transition and must not restamp.
        assert!(order.set_status(OrderStatus::Delivered, None).is_err());
        assert_eq!(order.actual_delivery, stamped);
    }

    #[test]
    fn test_cancel_guard() {
        let mut order = sample_order();
        order.set_status(OrderStatus::Confirmed, None).unwrap();
        order.set_status(OrderStatus::Processing, None).unwrap();
        order.set_status(OrderStatus::Shipped, None).unwrap();
        let err = order.cancel().unwrap_err();
        assert!(matches!(
            err,
            Error::IllegalState {
                status: OrderStatus::Shipped,
                ..
            }
        ));
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[test]
    fn test_cancel_from_pending_and_confirmed_only() {
        let mut order = sample_order();
        order.cancel().unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        // Terminal: cancelling again is rejected.
        assert!(order.cancel().is_err());
    }

    #[test]
    fn test_timeline_mid_flight() {
        let mut order = sample_order();
        order.set_status(OrderStatus::Confirmed, None).unwrap();
        order.set_status(OrderStatus::Processing, None).unwrap();
        let timeline = order.tracking_timeline();
        assert_eq!(timeline.len(), 5);
        let completed: Vec<bool> = timeline.iter().map(|s| s.completed).collect();
        assert_eq!(completed, vec![true, true, true, false, false]);
        assert!(timeline[2].timestamp.is_some());
        assert!(timeline[3].timestamp.is_none());
        assert!(timeline[4].timestamp.is_none());
    }

    #[test]
    fn test_timeline_for_cancelled_order() {
        let mut order = sample_order();
        order.cancel().unwrap();
        let timeline = order.tracking_timeline();
        assert!(timeline[0].completed);
        assert!(timeline.iter().skip(1).all(|s| !s.completed));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("refunded"), None);
    }
}

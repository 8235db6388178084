//! Aggregates module
pub mod cart;
pub mod order;
pub mod product;

pub use cart::{Cart, CartError, CartLine, CartStore, MemoryCartStore};
pub use order::{
    Address, DeliveryType, Order, OrderLine, OrderStatus, PaymentMethod, PaymentStatus,
    TimelineStep,
};
pub use product::{Category, Product};

//! `buildledger-parties` — customers and the properties they own.

pub mod customer;
pub mod property;

pub use customer::{Customer, NewCustomer};
pub use property::{NewProperty, Property};

//! `buildledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, strongly-typed identifiers, and the fixed-point monetary
//! value types shared by every other crate in the workspace.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    AccountId, CustomerId, EstimateId, InvoiceId, JobId, JobMaterialId, MaterialId, PaymentId,
    PropertyId,
};
pub use money::{Money, Quantity};
pub use value_object::ValueObject;

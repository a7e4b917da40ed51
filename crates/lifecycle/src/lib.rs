//! `buildledger-lifecycle` — the operations that move an estimate through its
//! lifecycle into a job, an invoice and payments.
//!
//! Transition legality lives on the entities themselves; this crate
//! orchestrates them against the store, one atomic transaction per
//! operation.

pub mod service;

pub use service::{LaborCostPolicy, LifecycleService, NoLaborCost};

//! `buildledger-jobs` — estimates, scheduled jobs, the material catalog and
//! job material lines, plus the costing engine that rolls lines up into job
//! and invoice amounts.
//!
//! Estimate and job statuses are closed finite-state machines: the only way
//! to move a record between states is through the named transition methods,
//! each of which validates the current state first.

pub mod costing;
pub mod estimate;
pub mod job;
pub mod material;

pub use estimate::{Estimate, EstimateStatus, NewEstimate};
pub use job::{Job, JobStatus};
pub use material::{JobMaterial, Material, NewMaterial};

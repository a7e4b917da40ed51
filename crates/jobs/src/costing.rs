//! Costing engine: rolls job material lines up into job and invoice amounts.

use rust_decimal::Decimal;

use buildledger_core::{DomainResult, Money, Quantity};

use crate::material::JobMaterial;

/// Quantity × unit price for a single line.
///
/// Fails with a validation error when either input is negative; nothing is
/// clamped.
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> DomainResult<Money> {
    Quantity::new(quantity)?.times(Money::new(unit_price)?)
}

/// Sum of `total_price` over a job's material lines.
///
/// Zero (not an error) when the job has no lines.
pub fn job_materials_cost<'a>(
    lines: impl IntoIterator<Item = &'a JobMaterial>,
) -> DomainResult<Money> {
    Money::sum(lines.into_iter().map(JobMaterial::total_price))
}

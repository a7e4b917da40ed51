use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use buildledger_core::{CustomerId, DomainError, DomainResult, JobId, Money};
use buildledger_invoicing::Invoice;
use buildledger_jobs::JobStatus;
use buildledger_store::{InMemoryStore, Tables};

/// Revenue recognised in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// First day of the month.
    pub month: NaiveDate,
    /// Display label, e.g. "March 2026".
    pub label: String,
    pub total: Money,
}

/// Revenue per month for the trailing 12 calendar months ending at
/// `reference`'s month, oldest first.
///
/// Sums the amounts of **paid** invoices by issue month. Months with no paid
/// invoices are reported as zero entries, never omitted: the sequence always
/// has exactly 12 elements.
pub fn monthly_revenue(
    store: &InMemoryStore,
    reference: NaiveDate,
) -> DomainResult<Vec<MonthlyRevenue>> {
    let anchor = reference
        .with_day(1)
        .ok_or_else(|| DomainError::validation("invalid reference date"))?;

    let mut months = Vec::with_capacity(12);
    for back in (0..12).rev() {
        let month = anchor
            .checked_sub_months(Months::new(back))
            .ok_or_else(|| DomainError::validation("reference date out of range"))?;
        months.push(month);
    }

    store.read(|tables| {
        months
            .into_iter()
            .map(|month| {
                let total = Money::sum(
                    tables
                        .invoices()
                        .filter(|i| i.is_paid() && issued_in_month(i, month))
                        .map(Invoice::amount),
                )?;
                Ok(MonthlyRevenue {
                    month,
                    label: month.format("%B %Y").to_string(),
                    total,
                })
            })
            .collect()
    })?
}

fn issued_in_month(invoice: &Invoice, month: NaiveDate) -> bool {
    invoice.issue_date().year() == month.year() && invoice.issue_date().month() == month.month()
}

/// Count of jobs per status.
///
/// Statuses with zero jobs are omitted (deliberately asymmetric with
/// [`monthly_revenue`], which reports empty months as zero); the counts
/// always sum to the total number of jobs.
pub fn job_status_distribution(store: &InMemoryStore) -> DomainResult<BTreeMap<JobStatus, u64>> {
    store.read(|tables| {
        let mut counts = BTreeMap::new();
        for job in tables.jobs() {
            *counts.entry(job.status()).or_insert(0u64) += 1;
        }
        counts
    })
}

/// The headline figures on the staff dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_customers: u64,
    pub pending_estimates: u64,
    pub accepted_estimates: u64,
    pub active_jobs: u64,
    pub completed_jobs: u64,
    /// Sum of paid invoice amounts, all time.
    pub total_revenue: Money,
    /// Unpaid invoices past their due date as of `today`.
    pub overdue_invoices: u64,
    /// Most recent five of each, newest first.
    pub recent_customers: Vec<CustomerId>,
    pub recent_jobs: Vec<JobId>,
}

pub fn dashboard_summary(store: &InMemoryStore, today: NaiveDate) -> DomainResult<DashboardSummary> {
    store.read(|tables| build_summary(tables, today))?
}

fn build_summary(tables: &Tables, today: NaiveDate) -> DomainResult<DashboardSummary> {
    use buildledger_jobs::EstimateStatus;

    let total_revenue = Money::sum(
        tables
            .invoices()
            .filter(|i| i.is_paid())
            .map(Invoice::amount),
    )?;

    let mut recent_customers: Vec<CustomerId> =
        tables.customers().map(|c| c.id_typed()).collect();
    recent_customers.reverse();
    recent_customers.truncate(5);

    let mut recent_jobs: Vec<JobId> = tables.jobs().map(|j| j.id_typed()).collect();
    recent_jobs.reverse();
    recent_jobs.truncate(5);

    Ok(DashboardSummary {
        total_customers: tables.customers().count() as u64,
        pending_estimates: tables
            .estimates()
            .filter(|e| e.status() == EstimateStatus::Pending)
            .count() as u64,
        accepted_estimates: tables
            .estimates()
            .filter(|e| e.status() == EstimateStatus::Accepted)
            .count() as u64,
        active_jobs: tables
            .jobs()
            .filter(|j| j.status() == JobStatus::InProgress)
            .count() as u64,
        completed_jobs: tables
            .jobs()
            .filter(|j| j.status() == JobStatus::Completed)
            .count() as u64,
        total_revenue,
        overdue_invoices: tables.invoices().filter(|i| i.is_overdue(today)).count() as u64,
        recent_customers,
        recent_jobs,
    })
}

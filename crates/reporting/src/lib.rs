//! `buildledger-reporting` — read-only aggregates for dashboards and
//! reports: trailing-twelve-month revenue, job status distribution, and the
//! staff dashboard summary.

pub mod report;

pub use report::{
    dashboard_summary, job_status_distribution, monthly_revenue, DashboardSummary,
    MonthlyRevenue,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use buildledger_core::{DomainError, DomainResult, Entity, EstimateId, JobId, Money};

/// Job status lifecycle. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Human-readable label used by dashboards.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "Scheduled",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
            JobStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }
}

/// Scheduled work against an accepted estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    estimate_id: EstimateId,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    scheduled_date: NaiveDate,
    status: JobStatus,
    actual_cost: Option<Money>,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a job in `Scheduled`. Estimate-status legality is checked by
    /// the lifecycle service, which holds both records.
    pub fn schedule(
        estimate_id: EstimateId,
        start_date: NaiveDate,
        scheduled_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: JobId::new(),
            estimate_id,
            start_date,
            end_date: None,
            scheduled_date,
            status: JobStatus::Scheduled,
            actual_cost: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_typed(&self) -> JobId {
        self.id
    }

    pub fn estimate_id(&self) -> EstimateId {
        self.estimate_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_date
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn actual_cost(&self) -> Option<Money> {
        self.actual_cost
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether material lines may still be added to this job.
    pub fn accepts_materials(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Whether an invoice may be issued for this job.
    pub fn is_invoiceable(&self) -> bool {
        self.status == JobStatus::Completed
    }

    pub fn set_notes(&mut self, notes: String, now: DateTime<Utc>) {
        self.notes = notes;
        self.updated_at = now;
    }

    /// Scheduled → InProgress.
    pub fn start(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != JobStatus::Scheduled {
            return Err(self.bad_transition("started"));
        }
        self.status = JobStatus::InProgress;
        self.updated_at = now;
        Ok(())
    }

    /// InProgress (or Scheduled, when work was never formally started) →
    /// Completed. Records the end date and the rolled-up material cost.
    pub fn complete(
        &mut self,
        on: NaiveDate,
        actual_cost: Money,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        match self.status {
            JobStatus::InProgress | JobStatus::Scheduled => {}
            _ => return Err(self.bad_transition("completed")),
        }
        self.status = JobStatus::Completed;
        self.end_date = Some(on);
        self.actual_cost = Some(actual_cost);
        self.updated_at = now;
        Ok(())
    }

    /// Any non-terminal state → Cancelled.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(self.bad_transition("cancelled"));
        }
        self.status = JobStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }

    fn bad_transition(&self, verb: &str) -> DomainError {
        DomainError::invalid_transition(format!(
            "job {} cannot be {verb} from status '{}'",
            self.id,
            self.status.as_str()
        ))
    }
}

impl Entity for Job {
    type Id = JobId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use buildledger_core::{DomainError, DomainResult, Entity, InvoiceId, JobId, Money};

/// Payment terms: invoices fall due this many days after issue.
pub const PAYMENT_TERMS_DAYS: u64 = 30;

/// An invoice issued for a completed job.
///
/// `amount` is fixed at issue time (the job's material cost rollup at that
/// moment) and is independent of any later change to the job's lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    job_id: JobId,
    amount: Money,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    paid_date: Option<NaiveDate>,
    is_paid: bool,
    notes: String,
    created_at: DateTime<Utc>,
}

impl Invoice {
    /// Issues an invoice with `due_date = issue_date + 30 days`.
    pub fn issue(
        job_id: JobId,
        amount: Money,
        issue_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let due_date = issue_date
            .checked_add_days(Days::new(PAYMENT_TERMS_DAYS))
            .ok_or_else(|| DomainError::validation("issue date out of range"))?;

        Ok(Self {
            id: InvoiceId::new(),
            job_id,
            amount,
            issue_date,
            due_date,
            paid_date: None,
            is_paid: false,
            notes: String::new(),
            created_at: now,
        })
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn paid_date(&self) -> Option<NaiveDate> {
        self.paid_date
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: String) {
        self.notes = notes;
    }

    /// Whether the invoice is overdue as of `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_paid && self.due_date < today
    }

    /// Settles the invoice against the cumulative amount paid so far.
    ///
    /// Flips `is_paid` (and records `paid_date`) once cumulative payments
    /// reach or exceed the invoice amount. The flip is one-way: an invoice
    /// never becomes unpaid again, and an already-paid invoice keeps its
    /// original paid date.
    pub fn settle(&mut self, cumulative_paid: Money, on: NaiveDate) {
        if self.is_paid {
            return;
        }
        if cumulative_paid >= self.amount {
            self.is_paid = true;
            self.paid_date = Some(on);
        }
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

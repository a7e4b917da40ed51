use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use buildledger_core::{
    CustomerId, DomainError, DomainResult, Entity, EstimateId, Money, PropertyId,
};

/// Estimate status lifecycle.
///
/// `InProgress` and `Completed` are legacy tokens carried by historical data;
/// no transition produces them, and a job may still be scheduled against an
/// estimate only while it is `Accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStatus {
    Pending,
    Sent,
    Accepted,
    Rejected,
    InProgress,
    Completed,
}

impl EstimateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateStatus::Pending => "pending",
            EstimateStatus::Sent => "sent",
            EstimateStatus::Accepted => "accepted",
            EstimateStatus::Rejected => "rejected",
            EstimateStatus::InProgress => "in_progress",
            EstimateStatus::Completed => "completed",
        }
    }
}

/// Input record for creating an estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEstimate {
    pub customer_id: CustomerId,
    /// The property the work was quoted for, when one is on file.
    pub property_id: Option<PropertyId>,
    pub visit_date: NaiveDate,
    pub initial_outline: String,
    pub detailed_estimate: String,
    pub total_cost: Money,
}

/// A quoted estimate for work at a customer's property.
///
/// The linked customer is immutable through the normal lifecycle; see
/// [`Estimate::reassign_customer`] for the data-correction escape hatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    id: EstimateId,
    customer_id: CustomerId,
    property_id: Option<PropertyId>,
    visit_date: NaiveDate,
    initial_outline: String,
    detailed_estimate: String,
    total_cost: Money,
    status: EstimateStatus,
    estimate_date: NaiveDate,
    sent_date: Option<NaiveDate>,
    accepted_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Estimate {
    pub fn new(input: NewEstimate, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id: EstimateId::new(),
            customer_id: input.customer_id,
            property_id: input.property_id,
            visit_date: input.visit_date,
            initial_outline: input.initial_outline,
            detailed_estimate: input.detailed_estimate,
            total_cost: input.total_cost,
            status: EstimateStatus::Pending,
            estimate_date: now.date_naive(),
            sent_date: None,
            accepted_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> EstimateId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn property_id(&self) -> Option<PropertyId> {
        self.property_id
    }

    pub fn visit_date(&self) -> NaiveDate {
        self.visit_date
    }

    pub fn initial_outline(&self) -> &str {
        &self.initial_outline
    }

    pub fn detailed_estimate(&self) -> &str {
        &self.detailed_estimate
    }

    pub fn total_cost(&self) -> Money {
        self.total_cost
    }

    pub fn status(&self) -> EstimateStatus {
        self.status
    }

    pub fn estimate_date(&self) -> NaiveDate {
        self.estimate_date
    }

    pub fn sent_date(&self) -> Option<NaiveDate> {
        self.sent_date
    }

    pub fn accepted_date(&self) -> Option<NaiveDate> {
        self.accepted_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether a job may be scheduled against this estimate.
    pub fn is_schedulable(&self) -> bool {
        self.status == EstimateStatus::Accepted
    }

    /// Pending → Sent. Records the sent date.
    pub fn send(&mut self, on: NaiveDate, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != EstimateStatus::Pending {
            return Err(DomainError::invalid_transition(format!(
                "estimate {} cannot be sent from status '{}'",
                self.id,
                self.status.as_str()
            )));
        }
        self.status = EstimateStatus::Sent;
        self.sent_date = Some(on);
        self.updated_at = now;
        Ok(())
    }

    /// Sent (or, permissively, Pending) → Accepted. Records the accepted date.
    pub fn accept(&mut self, on: NaiveDate, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_decidable("accepted")?;
        self.status = EstimateStatus::Accepted;
        self.accepted_date = Some(on);
        self.updated_at = now;
        Ok(())
    }

    /// Sent (or, permissively, Pending) → Rejected.
    pub fn reject(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_decidable("rejected")?;
        self.status = EstimateStatus::Rejected;
        self.updated_at = now;
        Ok(())
    }

    fn ensure_decidable(&self, verb: &str) -> DomainResult<()> {
        match self.status {
            EstimateStatus::Pending | EstimateStatus::Sent => Ok(()),
            _ => Err(DomainError::invalid_transition(format!(
                "estimate {} cannot be {verb} from status '{}'",
                self.id,
                self.status.as_str()
            ))),
        }
    }

    /// Data-correction operation: relink the estimate to a different customer.
    ///
    /// This is not part of the lifecycle; it exists for fixing records filed
    /// against the wrong customer.
    pub fn reassign_customer(&mut self, customer_id: CustomerId, now: DateTime<Utc>) {
        self.customer_id = customer_id;
        self.updated_at = now;
    }
}

impl Entity for Estimate {
    type Id = EstimateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use buildledger_core::{
    DomainError, DomainResult, EstimateId, InvoiceId, JobId, JobMaterialId, MaterialId, Money,
    Quantity,
};
use buildledger_invoicing::{Invoice, Payment};
use buildledger_jobs::{costing, Estimate, Job, JobMaterial, NewEstimate};
use buildledger_store::InMemoryStore;

/// Configuration point for labor costing.
///
/// The original pricing model bills materials only; whether invoices should
/// carry a labor component is an open policy question, so it is surfaced
/// here instead of hard-coded. The shipped default adds nothing.
pub trait LaborCostPolicy: Send + Sync {
    /// Extra amount to add to an invoice, given the job's materials cost.
    fn labor_cost(&self, job: &Job, materials_cost: Money) -> DomainResult<Money>;
}

/// Default policy: no labor component.
#[derive(Debug, Default)]
pub struct NoLaborCost;

impl LaborCostPolicy for NoLaborCost {
    fn labor_cost(&self, _job: &Job, _materials_cost: Money) -> DomainResult<Money> {
        Ok(Money::ZERO)
    }
}

/// The estimate → job → invoice → payment lifecycle.
///
/// Every operation runs inside one store transaction: the read of the target
/// entity, the transition check and the write commit together or not at all.
/// Callers are assumed to be already authorized; nothing here branches on
/// caller identity.
pub struct LifecycleService {
    store: Arc<InMemoryStore>,
    labor_policy: Box<dyn LaborCostPolicy>,
}

impl LifecycleService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self {
            store,
            labor_policy: Box::new(NoLaborCost),
        }
    }

    pub fn with_labor_policy(
        store: Arc<InMemoryStore>,
        labor_policy: Box<dyn LaborCostPolicy>,
    ) -> Self {
        Self {
            store,
            labor_policy,
        }
    }

    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    // --- estimates ---

    /// Creates an estimate in `Pending`.
    pub fn create_estimate(&self, input: NewEstimate) -> DomainResult<Estimate> {
        let estimate = Estimate::new(input, Utc::now())?;
        let estimate = self.store.transaction(|tables| {
            tables.insert_estimate(estimate.clone())?;
            Ok(estimate.clone())
        })?;
        info!(estimate_id = %estimate.id_typed(), customer_id = %estimate.customer_id(), "estimate created");
        Ok(estimate)
    }

    /// Pending → Sent.
    pub fn send_estimate(&self, id: EstimateId, on: NaiveDate) -> DomainResult<Estimate> {
        let estimate = self.store.transaction(|tables| {
            let estimate = tables.estimate_mut(id)?;
            estimate.send(on, Utc::now())?;
            Ok(estimate.clone())
        })?;
        info!(estimate_id = %id, "estimate sent");
        Ok(estimate)
    }

    /// Sent (or Pending) → Accepted.
    pub fn accept_estimate(&self, id: EstimateId, on: NaiveDate) -> DomainResult<Estimate> {
        let estimate = self.store.transaction(|tables| {
            let estimate = tables.estimate_mut(id)?;
            estimate.accept(on, Utc::now())?;
            Ok(estimate.clone())
        })?;
        info!(estimate_id = %id, "estimate accepted");
        Ok(estimate)
    }

    /// Sent (or Pending) → Rejected.
    pub fn reject_estimate(&self, id: EstimateId) -> DomainResult<Estimate> {
        let estimate = self.store.transaction(|tables| {
            let estimate = tables.estimate_mut(id)?;
            estimate.reject(Utc::now())?;
            Ok(estimate.clone())
        })?;
        info!(estimate_id = %id, "estimate rejected");
        Ok(estimate)
    }

    // --- jobs ---

    /// Creates a job in `Scheduled` against an accepted estimate.
    pub fn schedule_job(
        &self,
        estimate_id: EstimateId,
        start_date: NaiveDate,
        scheduled_date: NaiveDate,
    ) -> DomainResult<Job> {
        let job = self.store.transaction(|tables| {
            let estimate = tables.estimate(estimate_id)?;
            if !estimate.is_schedulable() {
                return Err(DomainError::invalid_transition(format!(
                    "estimate {estimate_id} is '{}', only accepted estimates can be scheduled",
                    estimate.status().as_str()
                )));
            }
            let job = Job::schedule(estimate_id, start_date, scheduled_date, Utc::now());
            tables.insert_job(job.clone())?;
            Ok(job)
        })?;
        info!(job_id = %job.id_typed(), estimate_id = %estimate_id, "job scheduled");
        Ok(job)
    }

    /// Scheduled → InProgress.
    pub fn start_job(&self, id: JobId) -> DomainResult<Job> {
        let job = self.store.transaction(|tables| {
            let job = tables.job_mut(id)?;
            job.start(Utc::now())?;
            Ok(job.clone())
        })?;
        info!(job_id = %id, "job started");
        Ok(job)
    }

    /// InProgress (or Scheduled) → Completed; rolls the job's material lines
    /// up into `actual_cost`.
    pub fn complete_job(&self, id: JobId, on: NaiveDate) -> DomainResult<Job> {
        let job = self.store.transaction(|tables| {
            let actual_cost = costing::job_materials_cost(tables.materials_of_job(id))?;
            let job = tables.job_mut(id)?;
            job.complete(on, actual_cost, Utc::now())?;
            Ok(job.clone())
        })?;
        info!(job_id = %id, actual_cost = %job.actual_cost().unwrap_or(Money::ZERO), "job completed");
        Ok(job)
    }

    /// Any non-terminal state → Cancelled.
    pub fn cancel_job(&self, id: JobId) -> DomainResult<Job> {
        let job = self.store.transaction(|tables| {
            let job = tables.job_mut(id)?;
            job.cancel(Utc::now())?;
            Ok(job.clone())
        })?;
        info!(job_id = %id, "job cancelled");
        Ok(job)
    }

    // --- job material lines ---

    /// Adds a material line to a non-terminal job, snapshotting the
    /// material's current catalog price into the line.
    pub fn add_job_material(
        &self,
        job_id: JobId,
        material_id: MaterialId,
        quantity: Quantity,
    ) -> DomainResult<JobMaterial> {
        let line = self.store.transaction(|tables| {
            let job = tables.job(job_id)?;
            if !job.accepts_materials() {
                return Err(DomainError::invalid_transition(format!(
                    "job {job_id} is '{}', materials can no longer be added",
                    job.status().as_str()
                )));
            }
            let unit_price = tables.material(material_id)?.unit_price();
            let line = JobMaterial::new(job_id, material_id, quantity, unit_price)?;
            tables.insert_job_material(line.clone())?;
            Ok(line)
        })?;
        info!(job_id = %job_id, material_id = %material_id, total = %line.total_price(), "material line added");
        Ok(line)
    }

    /// Changes a line's quantity; the line total is recomputed from its own
    /// snapshot price.
    pub fn update_job_material_quantity(
        &self,
        line_id: JobMaterialId,
        quantity: Quantity,
    ) -> DomainResult<JobMaterial> {
        let line = self.store.transaction(|tables| {
            let job_id = tables.job_material(line_id)?.job_id();
            let job = tables.job(job_id)?;
            if !job.accepts_materials() {
                return Err(DomainError::invalid_transition(format!(
                    "job {job_id} is '{}', material lines can no longer be edited",
                    job.status().as_str()
                )));
            }
            let line = tables.job_material_mut(line_id)?;
            line.set_quantity(quantity)?;
            Ok(line.clone())
        })?;
        info!(line_id = %line_id, total = %line.total_price(), "material line updated");
        Ok(line)
    }

    // --- invoices and payments ---

    /// Issues an invoice for a completed job: amount is the materials-cost
    /// rollup (plus whatever the labor policy contributes), due 30 days after
    /// `on`.
    pub fn issue_invoice(&self, job_id: JobId, on: NaiveDate) -> DomainResult<Invoice> {
        let labor_policy = &self.labor_policy;
        let invoice = self.store.transaction(|tables| {
            let job = tables.job(job_id)?;
            if !job.is_invoiceable() {
                return Err(DomainError::invalid_transition(format!(
                    "job {job_id} is '{}', only completed jobs can be invoiced",
                    job.status().as_str()
                )));
            }
            let materials_cost = costing::job_materials_cost(tables.materials_of_job(job_id))?;
            let labor = labor_policy.labor_cost(job, materials_cost)?;
            let amount = materials_cost.checked_add(labor)?;
            let invoice = Invoice::issue(job_id, amount, on, Utc::now())?;
            tables.insert_invoice(invoice.clone())?;
            Ok(invoice)
        })?;
        info!(invoice_id = %invoice.id_typed(), job_id = %job_id, amount = %invoice.amount(), "invoice issued");
        Ok(invoice)
    }

    /// Appends a payment and settles the invoice against the new cumulative
    /// total; the paid flip is one-way.
    pub fn record_payment(
        &self,
        invoice_id: InvoiceId,
        amount: Money,
        payment_method: String,
        reference_number: Option<String>,
        on: NaiveDate,
    ) -> DomainResult<(Payment, Invoice)> {
        let (payment, invoice) = self.store.transaction(|tables| {
            tables.invoice(invoice_id)?;
            let payment = Payment::new(invoice_id, amount, payment_method, reference_number, on)?;
            tables.insert_payment(payment.clone())?;
            let cumulative = tables.paid_total(invoice_id)?;
            let invoice = tables.invoice_mut(invoice_id)?;
            invoice.settle(cumulative, on);
            Ok((payment, invoice.clone()))
        })?;
        info!(
            invoice_id = %invoice_id,
            amount = %amount,
            is_paid = invoice.is_paid(),
            "payment recorded"
        );
        Ok((payment, invoice))
    }
}

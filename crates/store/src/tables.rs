//! Entity tables with referential integrity and cascade semantics.

use std::collections::BTreeMap;

use buildledger_core::{
    CustomerId, DomainError, DomainResult, EstimateId, InvoiceId, JobId, JobMaterialId,
    MaterialId, Money, PaymentId, PropertyId,
};
use buildledger_invoicing::{Invoice, Payment};
use buildledger_jobs::{Estimate, Job, JobMaterial, Material};
use buildledger_parties::{Customer, Property};

/// One map per entity, keyed by UUIDv7 id (key order is creation order).
///
/// All writes are immediately visible to subsequent reads; there is no
/// caching layer in front of these maps.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    customers: BTreeMap<CustomerId, Customer>,
    properties: BTreeMap<PropertyId, Property>,
    estimates: BTreeMap<EstimateId, Estimate>,
    jobs: BTreeMap<JobId, Job>,
    materials: BTreeMap<MaterialId, Material>,
    job_materials: BTreeMap<JobMaterialId, JobMaterial>,
    invoices: BTreeMap<InvoiceId, Invoice>,
    payments: BTreeMap<PaymentId, Payment>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    // --- customers ---

    pub fn insert_customer(&mut self, customer: Customer) -> DomainResult<()> {
        let id = customer.id_typed();
        if self.customers.contains_key(&id) {
            return Err(DomainError::conflict(format!("customer {id} already exists")));
        }
        self.customers.insert(id, customer);
        Ok(())
    }

    pub fn customer(&self, id: CustomerId) -> DomainResult<&Customer> {
        self.customers
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("customer {id}")))
    }

    pub fn customer_mut(&mut self, id: CustomerId) -> DomainResult<&mut Customer> {
        self.customers
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("customer {id}")))
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    /// Deletes a customer and, transitively, every property, estimate, job,
    /// job material line, invoice and payment hanging off it.
    pub fn delete_customer(&mut self, id: CustomerId) -> DomainResult<()> {
        if self.customers.remove(&id).is_none() {
            return Err(DomainError::not_found(format!("customer {id}")));
        }

        let property_ids: Vec<PropertyId> = self
            .properties
            .values()
            .filter(|p| p.customer_id() == id)
            .map(Property::id_typed)
            .collect();
        for property_id in property_ids {
            self.properties.remove(&property_id);
            self.cascade_delete_estimates_of_property(property_id);
        }

        let estimate_ids: Vec<EstimateId> = self
            .estimates
            .values()
            .filter(|e| e.customer_id() == id)
            .map(Estimate::id_typed)
            .collect();
        for estimate_id in estimate_ids {
            self.cascade_delete_estimate(estimate_id);
        }

        Ok(())
    }

    // --- properties ---

    pub fn insert_property(&mut self, property: Property) -> DomainResult<()> {
        self.customer(property.customer_id())?;
        let id = property.id_typed();
        if self.properties.contains_key(&id) {
            return Err(DomainError::conflict(format!("property {id} already exists")));
        }
        self.properties.insert(id, property);
        Ok(())
    }

    pub fn property(&self, id: PropertyId) -> DomainResult<&Property> {
        self.properties
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("property {id}")))
    }

    pub fn property_mut(&mut self, id: PropertyId) -> DomainResult<&mut Property> {
        self.properties
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("property {id}")))
    }

    pub fn properties_of(&self, customer_id: CustomerId) -> Vec<&Property> {
        self.properties
            .values()
            .filter(|p| p.customer_id() == customer_id)
            .collect()
    }

    /// Deletes a property and every estimate filed against it (cascading to
    /// jobs, lines, invoices and payments).
    pub fn delete_property(&mut self, id: PropertyId) -> DomainResult<()> {
        if self.properties.remove(&id).is_none() {
            return Err(DomainError::not_found(format!("property {id}")));
        }
        self.cascade_delete_estimates_of_property(id);
        Ok(())
    }

    fn cascade_delete_estimates_of_property(&mut self, property_id: PropertyId) {
        let estimate_ids: Vec<EstimateId> = self
            .estimates
            .values()
            .filter(|e| e.property_id() == Some(property_id))
            .map(Estimate::id_typed)
            .collect();
        for estimate_id in estimate_ids {
            self.cascade_delete_estimate(estimate_id);
        }
    }

    // --- estimates ---

    pub fn insert_estimate(&mut self, estimate: Estimate) -> DomainResult<()> {
        self.customer(estimate.customer_id())?;
        if let Some(property_id) = estimate.property_id() {
            let property = self.property(property_id)?;
            if property.customer_id() != estimate.customer_id() {
                return Err(DomainError::validation(format!(
                    "property {property_id} does not belong to customer {}",
                    estimate.customer_id()
                )));
            }
        }
        let id = estimate.id_typed();
        if self.estimates.contains_key(&id) {
            return Err(DomainError::conflict(format!("estimate {id} already exists")));
        }
        self.estimates.insert(id, estimate);
        Ok(())
    }

    pub fn estimate(&self, id: EstimateId) -> DomainResult<&Estimate> {
        self.estimates
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("estimate {id}")))
    }

    pub fn estimate_mut(&mut self, id: EstimateId) -> DomainResult<&mut Estimate> {
        self.estimates
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("estimate {id}")))
    }

    pub fn estimates(&self) -> impl Iterator<Item = &Estimate> {
        self.estimates.values()
    }

    pub fn estimates_of(&self, customer_id: CustomerId) -> Vec<&Estimate> {
        self.estimates
            .values()
            .filter(|e| e.customer_id() == customer_id)
            .collect()
    }

    pub fn delete_estimate(&mut self, id: EstimateId) -> DomainResult<()> {
        if !self.estimates.contains_key(&id) {
            return Err(DomainError::not_found(format!("estimate {id}")));
        }
        self.cascade_delete_estimate(id);
        Ok(())
    }

    fn cascade_delete_estimate(&mut self, id: EstimateId) {
        self.estimates.remove(&id);
        let job_ids: Vec<JobId> = self
            .jobs
            .values()
            .filter(|j| j.estimate_id() == id)
            .map(Job::id_typed)
            .collect();
        for job_id in job_ids {
            self.cascade_delete_job(job_id);
        }
    }

    // --- jobs ---

    pub fn insert_job(&mut self, job: Job) -> DomainResult<()> {
        self.estimate(job.estimate_id())?;
        let id = job.id_typed();
        if self.jobs.contains_key(&id) {
            return Err(DomainError::conflict(format!("job {id} already exists")));
        }
        self.jobs.insert(id, job);
        Ok(())
    }

    pub fn job(&self, id: JobId) -> DomainResult<&Job> {
        self.jobs
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("job {id}")))
    }

    pub fn job_mut(&mut self, id: JobId) -> DomainResult<&mut Job> {
        self.jobs
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("job {id}")))
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn jobs_of_estimate(&self, estimate_id: EstimateId) -> Vec<&Job> {
        self.jobs
            .values()
            .filter(|j| j.estimate_id() == estimate_id)
            .collect()
    }

    pub fn delete_job(&mut self, id: JobId) -> DomainResult<()> {
        if !self.jobs.contains_key(&id) {
            return Err(DomainError::not_found(format!("job {id}")));
        }
        self.cascade_delete_job(id);
        Ok(())
    }

    fn cascade_delete_job(&mut self, id: JobId) {
        self.jobs.remove(&id);
        self.job_materials.retain(|_, line| line.job_id() != id);
        let invoice_ids: Vec<InvoiceId> = self
            .invoices
            .values()
            .filter(|i| i.job_id() == id)
            .map(Invoice::id_typed)
            .collect();
        for invoice_id in invoice_ids {
            self.cascade_delete_invoice(invoice_id);
        }
    }

    // --- materials ---

    pub fn insert_material(&mut self, material: Material) -> DomainResult<()> {
        let id = material.id_typed();
        if self.materials.contains_key(&id) {
            return Err(DomainError::conflict(format!("material {id} already exists")));
        }
        self.materials.insert(id, material);
        Ok(())
    }

    pub fn material(&self, id: MaterialId) -> DomainResult<&Material> {
        self.materials
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("material {id}")))
    }

    pub fn material_mut(&mut self, id: MaterialId) -> DomainResult<&mut Material> {
        self.materials
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("material {id}")))
    }

    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    /// Deletes a catalog material.
    ///
    /// Refused while any job material line references it: cascading here
    /// would destroy historical billing lines, and silently orphaning them
    /// would break the snapshot invariant. Delete the dependent jobs first
    /// if the cascade is really wanted.
    pub fn delete_material(&mut self, id: MaterialId) -> DomainResult<()> {
        if !self.materials.contains_key(&id) {
            return Err(DomainError::not_found(format!("material {id}")));
        }
        let references = self
            .job_materials
            .values()
            .filter(|line| line.material_id() == id)
            .count();
        if references > 0 {
            return Err(DomainError::conflict(format!(
                "material {id} is referenced by {references} job material line(s)"
            )));
        }
        self.materials.remove(&id);
        Ok(())
    }

    // --- job material lines ---

    pub fn insert_job_material(&mut self, line: JobMaterial) -> DomainResult<()> {
        self.job(line.job_id())?;
        self.material(line.material_id())?;
        let id = line.id_typed();
        if self.job_materials.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "job material line {id} already exists"
            )));
        }
        self.job_materials.insert(id, line);
        Ok(())
    }

    pub fn job_material(&self, id: JobMaterialId) -> DomainResult<&JobMaterial> {
        self.job_materials
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("job material line {id}")))
    }

    pub fn job_material_mut(&mut self, id: JobMaterialId) -> DomainResult<&mut JobMaterial> {
        self.job_materials
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("job material line {id}")))
    }

    pub fn materials_of_job(&self, job_id: JobId) -> Vec<&JobMaterial> {
        self.job_materials
            .values()
            .filter(|line| line.job_id() == job_id)
            .collect()
    }

    pub fn delete_job_material(&mut self, id: JobMaterialId) -> DomainResult<()> {
        self.job_materials
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("job material line {id}")))
    }

    // --- invoices ---

    pub fn insert_invoice(&mut self, invoice: Invoice) -> DomainResult<()> {
        self.job(invoice.job_id())?;
        let id = invoice.id_typed();
        if self.invoices.contains_key(&id) {
            return Err(DomainError::conflict(format!("invoice {id} already exists")));
        }
        self.invoices.insert(id, invoice);
        Ok(())
    }

    pub fn invoice(&self, id: InvoiceId) -> DomainResult<&Invoice> {
        self.invoices
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("invoice {id}")))
    }

    pub fn invoice_mut(&mut self, id: InvoiceId) -> DomainResult<&mut Invoice> {
        self.invoices
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("invoice {id}")))
    }

    pub fn invoices(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.values()
    }

    pub fn invoices_of_job(&self, job_id: JobId) -> Vec<&Invoice> {
        self.invoices
            .values()
            .filter(|i| i.job_id() == job_id)
            .collect()
    }

    pub fn delete_invoice(&mut self, id: InvoiceId) -> DomainResult<()> {
        if !self.invoices.contains_key(&id) {
            return Err(DomainError::not_found(format!("invoice {id}")));
        }
        self.cascade_delete_invoice(id);
        Ok(())
    }

    fn cascade_delete_invoice(&mut self, id: InvoiceId) {
        self.invoices.remove(&id);
        self.payments.retain(|_, p| p.invoice_id() != id);
    }

    // --- payments ---

    pub fn insert_payment(&mut self, payment: Payment) -> DomainResult<()> {
        self.invoice(payment.invoice_id())?;
        let id = payment.id_typed();
        if self.payments.contains_key(&id) {
            return Err(DomainError::conflict(format!("payment {id} already exists")));
        }
        self.payments.insert(id, payment);
        Ok(())
    }

    pub fn payment(&self, id: PaymentId) -> DomainResult<&Payment> {
        self.payments
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("payment {id}")))
    }

    pub fn payments(&self) -> impl Iterator<Item = &Payment> {
        self.payments.values()
    }

    pub fn payments_of_invoice(&self, invoice_id: InvoiceId) -> Vec<&Payment> {
        self.payments
            .values()
            .filter(|p| p.invoice_id() == invoice_id)
            .collect()
    }

    pub fn delete_payment(&mut self, id: PaymentId) -> DomainResult<()> {
        self.payments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("payment {id}")))
    }

    /// Cumulative amount paid against an invoice.
    pub fn paid_total(&self, invoice_id: InvoiceId) -> DomainResult<Money> {
        Money::sum(
            self.payments
                .values()
                .filter(|p| p.invoice_id() == invoice_id)
                .map(Payment::amount),
        )
    }
}

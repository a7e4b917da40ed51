//! In-memory entity store.
//!
//! A single `RwLock` over [`Tables`]. `transaction` runs its closure against
//! a working copy under the write lock and commits only on success, so a
//! failing operation leaves the store untouched and two racing operations
//! serialize instead of losing updates.

use std::sync::RwLock;

use chrono::Utc;

use buildledger_core::{
    CustomerId, DomainError, DomainResult, EstimateId, InvoiceId, JobId, JobMaterialId,
    MaterialId, Money, PaymentId, PropertyId,
};
use buildledger_invoicing::{Invoice, Payment};
use buildledger_jobs::{Estimate, Job, JobMaterial, Material, NewMaterial};
use buildledger_parties::{Customer, NewCustomer, NewProperty, Property};

use crate::tables::Tables;

/// Thread-safe in-memory store. Intended for tests, tools and single-process
/// deployments; a database-backed store would implement the same surface.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` as one atomic read-modify-write.
    ///
    /// The closure receives a working copy of the tables; the copy replaces
    /// the live tables only when the closure succeeds. All-or-nothing.
    pub fn transaction<R>(
        &self,
        f: impl FnOnce(&mut Tables) -> DomainResult<R>,
    ) -> DomainResult<R> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| DomainError::conflict("store lock poisoned"))?;
        let mut working = guard.clone();
        let result = f(&mut working)?;
        *guard = working;
        Ok(result)
    }

    /// Runs a read-only closure under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> DomainResult<R> {
        let guard = self
            .tables
            .read()
            .map_err(|_| DomainError::conflict("store lock poisoned"))?;
        Ok(f(&guard))
    }

    // --- customers ---

    pub fn create_customer(&self, input: NewCustomer) -> DomainResult<Customer> {
        let customer = Customer::new(input, Utc::now())?;
        self.transaction(|tables| {
            tables.insert_customer(customer.clone())?;
            Ok(customer.clone())
        })
    }

    pub fn get_customer(&self, id: CustomerId) -> DomainResult<Customer> {
        self.read(|tables| tables.customer(id).cloned())?
    }

    pub fn update_customer_contact(
        &self,
        id: CustomerId,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> DomainResult<Customer> {
        self.transaction(|tables| {
            let customer = tables.customer_mut(id)?;
            customer.update_contact(email, phone, address, Utc::now())?;
            Ok(customer.clone())
        })
    }

    pub fn delete_customer(&self, id: CustomerId) -> DomainResult<()> {
        self.transaction(|tables| tables.delete_customer(id))
    }

    // --- properties ---

    pub fn create_property(&self, input: NewProperty) -> DomainResult<Property> {
        let property = Property::new(input, Utc::now())?;
        self.transaction(|tables| {
            tables.insert_property(property.clone())?;
            Ok(property.clone())
        })
    }

    pub fn get_property(&self, id: PropertyId) -> DomainResult<Property> {
        self.read(|tables| tables.property(id).cloned())?
    }

    pub fn delete_property(&self, id: PropertyId) -> DomainResult<()> {
        self.transaction(|tables| tables.delete_property(id))
    }

    // --- materials ---

    pub fn create_material(&self, input: NewMaterial) -> DomainResult<Material> {
        let material = Material::new(input, Utc::now())?;
        self.transaction(|tables| {
            tables.insert_material(material.clone())?;
            Ok(material.clone())
        })
    }

    pub fn get_material(&self, id: MaterialId) -> DomainResult<Material> {
        self.read(|tables| tables.material(id).cloned())?
    }

    /// Updates the catalog price. Existing job material lines keep their
    /// snapshot.
    pub fn set_material_price(&self, id: MaterialId, unit_price: Money) -> DomainResult<Material> {
        self.transaction(|tables| {
            let material = tables.material_mut(id)?;
            material.set_unit_price(unit_price);
            Ok(material.clone())
        })
    }

    pub fn delete_material(&self, id: MaterialId) -> DomainResult<()> {
        self.transaction(|tables| tables.delete_material(id))
    }

    // --- lifecycle-owned records (read + delete here, mutation via the
    // lifecycle service) ---

    pub fn get_estimate(&self, id: EstimateId) -> DomainResult<Estimate> {
        self.read(|tables| tables.estimate(id).cloned())?
    }

    pub fn delete_estimate(&self, id: EstimateId) -> DomainResult<()> {
        self.transaction(|tables| tables.delete_estimate(id))
    }

    /// Data-correction operation: relink an estimate to another customer.
    /// Not a lifecycle transition.
    pub fn reassign_estimate_customer(
        &self,
        id: EstimateId,
        customer_id: CustomerId,
    ) -> DomainResult<Estimate> {
        self.transaction(|tables| {
            tables.customer(customer_id)?;
            let estimate = tables.estimate_mut(id)?;
            estimate.reassign_customer(customer_id, Utc::now());
            Ok(estimate.clone())
        })
    }

    pub fn get_job(&self, id: JobId) -> DomainResult<Job> {
        self.read(|tables| tables.job(id).cloned())?
    }

    pub fn delete_job(&self, id: JobId) -> DomainResult<()> {
        self.transaction(|tables| tables.delete_job(id))
    }

    pub fn get_job_material(&self, id: JobMaterialId) -> DomainResult<JobMaterial> {
        self.read(|tables| tables.job_material(id).cloned())?
    }

    pub fn get_invoice(&self, id: InvoiceId) -> DomainResult<Invoice> {
        self.read(|tables| tables.invoice(id).cloned())?
    }

    pub fn delete_invoice(&self, id: InvoiceId) -> DomainResult<()> {
        self.transaction(|tables| tables.delete_invoice(id))
    }

    pub fn get_payment(&self, id: PaymentId) -> DomainResult<Payment> {
        self.read(|tables| tables.payment(id).cloned())?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn customer_input() -> NewCustomer {
        NewCustomer {
            first_name: "Juma".to_string(),
            last_name: "Kilonzo".to_string(),
            email: "juma@example.com".to_string(),
            phone: "+254722000000".to_string(),
            address: "Mombasa Road".to_string(),
            account: None,
        }
    }

    #[test]
    fn writes_are_visible_to_subsequent_reads() {
        let store = InMemoryStore::new();
        let customer = store.create_customer(customer_input()).unwrap();
        let read_back = store.get_customer(customer.id_typed()).unwrap();
        assert_eq!(customer, read_back);
    }

    #[test]
    fn failed_transaction_leaves_store_untouched() {
        let store = InMemoryStore::new();
        let customer = store.create_customer(customer_input()).unwrap();
        let id = customer.id_typed();

        let err = store
            .transaction(|tables| {
                tables.delete_customer(id)?;
                Err::<(), _>(DomainError::validation("forced failure"))
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // Delete was rolled back with the rest of the transaction.
        assert!(store.get_customer(id).is_ok());
    }

    #[test]
    fn customer_cascade_removes_property() {
        let store = InMemoryStore::new();
        let customer = store.create_customer(customer_input()).unwrap();
        let property = store
            .create_property(NewProperty {
                customer_id: customer.id_typed(),
                address: "Plot 3".to_string(),
                property_type: "residential".to_string(),
                description: String::new(),
            })
            .unwrap();

        store.delete_customer(customer.id_typed()).unwrap();
        let err = store.get_property(property.id_typed()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn material_price_update_is_visible() {
        let store = InMemoryStore::new();
        let material = store
            .create_material(NewMaterial {
                name: "Cement".to_string(),
                unit_price: Money::new(dec!(25.00)).unwrap(),
                unit: "bag".to_string(),
                supplier: "Bamburi".to_string(),
            })
            .unwrap();

        store
            .set_material_price(material.id_typed(), Money::new(dec!(30.00)).unwrap())
            .unwrap();
        let read_back = store.get_material(material.id_typed()).unwrap();
        assert_eq!(read_back.unit_price(), Money::new(dec!(30.00)).unwrap());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use buildledger_core::{
    DomainError, DomainResult, Entity, JobId, JobMaterialId, MaterialId, Money, Quantity,
};

/// Input record for a material catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMaterial {
    pub name: String,
    pub unit_price: Money,
    /// Unit label, e.g. "bag", "m", "tonne".
    pub unit: String,
    pub supplier: String,
}

/// A catalog material, reusable across many job material lines.
///
/// Catalog price changes never touch existing lines; lines keep the price
/// snapshot taken when they were created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    id: MaterialId,
    name: String,
    unit_price: Money,
    unit: String,
    supplier: String,
    created_at: DateTime<Utc>,
}

impl Material {
    pub fn new(input: NewMaterial, now: DateTime<Utc>) -> DomainResult<Self> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("material name cannot be empty"));
        }

        Ok(Self {
            id: MaterialId::new(),
            name: input.name,
            unit_price: input.unit_price,
            unit: input.unit,
            supplier: input.supplier,
            created_at: now,
        })
    }

    pub fn id_typed(&self) -> MaterialId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Updates the catalog price. Existing job material lines are unaffected.
    pub fn set_unit_price(&mut self, unit_price: Money) {
        self.unit_price = unit_price;
    }
}

impl Entity for Material {
    type Id = MaterialId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A material line on a job: quantity, a unit-price snapshot, and the line
/// total.
///
/// `total_price` is always `quantity × unit_price` over this line's own
/// fields; it is recomputed whenever the line is saved and never re-derived
/// from the catalog, preserving historical billing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMaterial {
    id: JobMaterialId,
    job_id: JobId,
    material_id: MaterialId,
    quantity: Quantity,
    unit_price: Money,
    total_price: Money,
}

impl JobMaterial {
    /// Creates a line, snapshotting `unit_price` (the material's price at
    /// this moment, copied by value).
    pub fn new(
        job_id: JobId,
        material_id: MaterialId,
        quantity: Quantity,
        unit_price: Money,
    ) -> DomainResult<Self> {
        let total_price = quantity.times(unit_price)?;
        Ok(Self {
            id: JobMaterialId::new(),
            job_id,
            material_id,
            quantity,
            unit_price,
            total_price,
        })
    }

    pub fn id_typed(&self) -> JobMaterialId {
        self.id
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn material_id(&self) -> MaterialId {
        self.material_id
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn set_quantity(&mut self, quantity: Quantity) -> DomainResult<()> {
        self.total_price = quantity.times(self.unit_price)?;
        self.quantity = quantity;
        Ok(())
    }

    /// Corrects the snapshot price on this line (not the catalog price).
    pub fn set_unit_price(&mut self, unit_price: Money) -> DomainResult<()> {
        self.total_price = self.quantity.times(unit_price)?;
        self.unit_price = unit_price;
        Ok(())
    }
}

impl Entity for JobMaterial {
    type Id = JobMaterialId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

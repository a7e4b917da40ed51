use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use buildledger_core::{CustomerId, DomainError, DomainResult, Entity, PropertyId};

/// Input record for registering a property against a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    pub customer_id: CustomerId,
    pub address: String,
    pub property_type: String,
    pub description: String,
}

/// A property belonging to exactly one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    id: PropertyId,
    customer_id: CustomerId,
    address: String,
    property_type: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl Property {
    pub fn new(input: NewProperty, now: DateTime<Utc>) -> DomainResult<Self> {
        if input.address.trim().is_empty() {
            return Err(DomainError::validation("property address cannot be empty"));
        }

        Ok(Self {
            id: PropertyId::new(),
            customer_id: input.customer_id,
            address: input.address,
            property_type: input.property_type,
            description: input.description,
            created_at: now,
        })
    }

    pub fn id_typed(&self) -> PropertyId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn property_type(&self) -> &str {
        &self.property_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_description(&mut self, description: String) {
        self.description = description;
    }
}

impl Entity for Property {
    type Id = PropertyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

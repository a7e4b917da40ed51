use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use buildledger_core::{AccountId, CustomerId, DomainError, DomainResult, Entity};

/// Input record for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Optional link to a login account managed by the authentication layer.
    pub account: Option<AccountId>,
}

/// A customer of the firm. Owns zero or more properties and estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    address: String,
    account: Option<AccountId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(input: NewCustomer, now: DateTime<Utc>) -> DomainResult<Self> {
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        if input.email.trim().is_empty() {
            return Err(DomainError::validation("customer email cannot be empty"));
        }

        Ok(Self {
            id: CustomerId::new(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            account: input.account,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> CustomerId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn account(&self) -> Option<AccountId> {
        self.account
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces contact details. Name and email stay required.
    pub fn update_contact(
        &mut self,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if let Some(email) = email {
            if email.trim().is_empty() {
                return Err(DomainError::validation("customer email cannot be empty"));
            }
            self.email = email;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(address) = address {
            self.address = address;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewCustomer {
        NewCustomer {
            first_name: "Wanjiku".to_string(),
            last_name: "Mwangi".to_string(),
            email: "wanjiku@example.com".to_string(),
            phone: "+254700000000".to_string(),
            address: "12 Riverside Drive".to_string(),
            account: None,
        }
    }

    #[test]
    fn new_customer_builds_full_name() {
        let customer = Customer::new(input(), Utc::now()).unwrap();
        assert_eq!(customer.full_name(), "Wanjiku Mwangi");
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut bad = input();
        bad.first_name = "  ".to_string();
        let err = Customer::new(bad, Utc::now()).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn update_contact_rejects_blank_email() {
        let mut customer = Customer::new(input(), Utc::now()).unwrap();
        let err = customer
            .update_contact(Some(String::new()), None, None, Utc::now())
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
        // Unchanged on failure.
        assert_eq!(customer.email(), "wanjiku@example.com");
    }
}

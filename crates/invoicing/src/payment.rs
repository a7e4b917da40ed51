use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use buildledger_core::{DomainError, DomainResult, Entity, InvoiceId, Money, PaymentId};

/// A payment recorded against an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    invoice_id: InvoiceId,
    amount: Money,
    payment_date: NaiveDate,
    payment_method: String,
    reference_number: Option<String>,
}

impl Payment {
    /// Records a payment. Amount must be strictly positive.
    pub fn new(
        invoice_id: InvoiceId,
        amount: Money,
        payment_method: String,
        reference_number: Option<String>,
        payment_date: NaiveDate,
    ) -> DomainResult<Self> {
        if amount.is_zero() {
            return Err(DomainError::validation("payment amount must be positive"));
        }

        Ok(Self {
            id: PaymentId::new(),
            invoice_id,
            amount,
            payment_date,
            payment_method,
            reference_number,
        })
    }

    pub fn id_typed(&self) -> PaymentId {
        self.id
    }

    pub fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn reference_number(&self) -> Option<&str> {
        self.reference_number.as_deref()
    }
}

impl Entity for Payment {
    type Id = PaymentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

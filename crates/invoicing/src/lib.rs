//! `buildledger-invoicing` — invoices issued for completed jobs and the
//! payments recorded against them.

pub mod invoice;
pub mod payment;

pub use invoice::Invoice;
pub use payment::Payment;

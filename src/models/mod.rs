//! Typed records mirroring the Fakturoid v3 schema.
//!
//! Money and quantities are [`rust_decimal::Decimal`] and travel as JSON
//! strings, dates are [`chrono::NaiveDate`], timestamps keep the server's
//! UTC offset. Server-owned fields are read but left out of write payloads.

mod account;
mod bank_account;
mod expense;
mod generator;
mod invoice;
mod line;
mod message;
mod payment;
mod subject;

pub use account::Account;
pub use bank_account::BankAccount;
pub use expense::{Expense, ExpenseStatus};
pub use generator::Generator;
pub use invoice::{DocumentType, Invoice, InvoiceStatus};
pub use line::InvoiceLine;
pub use message::InvoiceMessage;
pub use payment::InvoicePayment;
pub use subject::{Subject, SubjectType};

//! # fakturoid
//!
//! Blocking client for the [Fakturoid](https://www.fakturoid.cz/) v3 REST API:
//! subjects, invoices, expenses, generators, bank accounts and the account
//! profile.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! They are sent as JSON strings, so `"4.60"` stays `"4.60"`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use fakturoid::*;
//! use rust_decimal_macros::dec;
//!
//! # fn main() -> fakturoid::Result<()> {
//! let fa = Fakturoid::new(Config::new("mycompany", "me@example.com", "client-id", "client-secret"))?;
//!
//! let invoice = Invoice::new(16)
//!     .add_line(InvoiceLine::new("Hosting", dec!(499.00)).vat_rate(dec!(21)));
//! let invoice = fa.save(&invoice)?;
//!
//! fa.fire_event(
//!     invoice.id.unwrap(),
//!     &InvoiceEvent::pay(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), dec!(605.79)),
//! )?;
//!
//! for overdue in fa.invoices(&InvoiceFilter::new().status(InvoiceStatus::Overdue)) {
//!     println!("{}", overdue?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pagination
//!
//! List calls return [`Pages`], which fetches pages only when an index,
//! slice or iteration reaches them. Negative indices count from the end.

mod auth;
mod client;
mod config;
mod error;
mod events;
mod filters;
pub mod models;
pub mod paging;
mod resource;

pub use client::Fakturoid;
pub use config::{Config, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use events::{ExpenseEvent, InvoiceEvent};
pub use filters::{DateBound, ExpenseFilter, GeneratorFilter, InvoiceFilter, SubjectFilter};
pub use models::*;
pub use paging::{Page, PageSource, Pages};
pub use resource::Resource;

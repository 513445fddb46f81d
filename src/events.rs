//! Named state transitions fired via `POST /{collection}/{id}/fire`.
//!
//! The request body carries the event name under `event` next to the
//! event's own arguments, e.g. `{"event":"pay","paid_at":"2024-03-01","paid_amount":"2000"}`.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Error;

/// Events accepted by an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InvoiceEvent {
    MarkAsSent,
    Deliver,
    Pay {
        #[serde(skip_serializing_if = "Option::is_none")]
        paid_at: Option<NaiveDate>,
        /// Defaults to the remaining amount on the server.
        #[serde(skip_serializing_if = "Option::is_none")]
        paid_amount: Option<Decimal>,
    },
    PayProforma,
    PayPartialProforma,
    RemovePayment,
    DeliverReminder,
    Cancel,
    UndoCancel,
    Lock,
    Unlock,
    MarkAsUncollectible,
    UndoUncollectible,
}

impl InvoiceEvent {
    pub const NAMES: &'static [&'static str] = &[
        "mark_as_sent",
        "deliver",
        "pay",
        "pay_proforma",
        "pay_partial_proforma",
        "remove_payment",
        "deliver_reminder",
        "cancel",
        "undo_cancel",
        "lock",
        "unlock",
        "mark_as_uncollectible",
        "undo_uncollectible",
    ];

    /// `pay` with both arguments set.
    pub fn pay(paid_at: NaiveDate, paid_amount: Decimal) -> Self {
        Self::Pay {
            paid_at: Some(paid_at),
            paid_amount: Some(paid_amount),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MarkAsSent => "mark_as_sent",
            Self::Deliver => "deliver",
            Self::Pay { .. } => "pay",
            Self::PayProforma => "pay_proforma",
            Self::PayPartialProforma => "pay_partial_proforma",
            Self::RemovePayment => "remove_payment",
            Self::DeliverReminder => "deliver_reminder",
            Self::Cancel => "cancel",
            Self::UndoCancel => "undo_cancel",
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::MarkAsUncollectible => "mark_as_uncollectible",
            Self::UndoUncollectible => "undo_uncollectible",
        }
    }
}

impl FromStr for InvoiceEvent {
    type Err = Error;

    /// Parse a wire name. `pay` parses without arguments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "mark_as_sent" => Self::MarkAsSent,
            "deliver" => Self::Deliver,
            "pay" => Self::Pay {
                paid_at: None,
                paid_amount: None,
            },
            "pay_proforma" => Self::PayProforma,
            "pay_partial_proforma" => Self::PayPartialProforma,
            "remove_payment" => Self::RemovePayment,
            "deliver_reminder" => Self::DeliverReminder,
            "cancel" => Self::Cancel,
            "undo_cancel" => Self::UndoCancel,
            "lock" => Self::Lock,
            "unlock" => Self::Unlock,
            "mark_as_uncollectible" => Self::MarkAsUncollectible,
            "undo_uncollectible" => Self::UndoUncollectible,
            other => return Err(unknown_event(other, Self::NAMES)),
        })
    }
}

/// Events accepted by an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExpenseEvent {
    RemovePayment,
    Deliver,
    Pay {
        #[serde(skip_serializing_if = "Option::is_none")]
        paid_on: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        paid_amount: Option<Decimal>,
        #[serde(skip_serializing_if = "Option::is_none")]
        variable_symbol: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bank_account_id: Option<u64>,
    },
    Lock,
    Unlock,
}

impl ExpenseEvent {
    pub const NAMES: &'static [&'static str] =
        &["remove_payment", "deliver", "pay", "lock", "unlock"];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RemovePayment => "remove_payment",
            Self::Deliver => "deliver",
            Self::Pay { .. } => "pay",
            Self::Lock => "lock",
            Self::Unlock => "unlock",
        }
    }
}

impl FromStr for ExpenseEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "remove_payment" => Self::RemovePayment,
            "deliver" => Self::Deliver,
            "pay" => Self::Pay {
                paid_on: None,
                paid_amount: None,
                variable_symbol: None,
                bank_account_id: None,
            },
            "lock" => Self::Lock,
            "unlock" => Self::Unlock,
            other => return Err(unknown_event(other, Self::NAMES)),
        })
    }
}

fn unknown_event(name: &str, valid: &[&str]) -> Error {
    Error::InvalidArgument(format!(
        "invalid event {name:?}, expected one of {}",
        valid.join(", ")
    ))
}

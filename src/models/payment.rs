use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payment recorded against an invoice.
///
/// Created through [`Fakturoid::create_invoice_payment`](crate::Fakturoid::create_invoice_payment).
/// See <https://www.fakturoid.cz/api/v3/invoice-payments>.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoicePayment {
    #[serde(skip_serializing)]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Defaults to the remaining amount when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing)]
    pub native_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_document_as_paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proforma_followup_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_thank_you_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_id: Option<u64>,
    #[serde(skip_serializing)]
    pub tax_document_id: Option<u64>,
    #[serde(skip_serializing)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl InvoicePayment {
    pub fn new(paid_on: NaiveDate, amount: Decimal) -> Self {
        Self {
            paid_on: Some(paid_on),
            amount: Some(amount),
            ..Self::default()
        }
    }
}

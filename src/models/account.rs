use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Profile and settings of the account the client is bound to. Read-only.
///
/// See <https://www.fakturoid.cz/api/v3/account>.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub subdomain: String,
    pub plan: Option<String>,
    pub plan_price: Option<Decimal>,
    pub plan_paid_users: Option<u32>,
    pub email: Option<String>,
    pub invoice_email: Option<String>,
    pub phone: Option<String>,
    pub web: Option<String>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub registration_no: Option<String>,
    pub vat_no: Option<String>,
    pub vat_mode: Option<String>,
    pub vat_price_mode: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub unit_name: Option<String>,
    pub vat_rate: Option<Decimal>,
    pub displayed_note: Option<String>,
    pub invoice_note: Option<String>,
    pub due: Option<u32>,
    pub invoice_language: Option<String>,
    pub invoice_payment_method: Option<String>,
    pub invoice_proforma: Option<bool>,
    pub invoice_hide_bank_account_for_payments: Option<Vec<String>>,
    pub fixed_exchange_rate: Option<bool>,
    pub invoice_selfbilling: Option<bool>,
    pub send_overdue_email: Option<bool>,
    pub overdue_email_days: Option<u32>,
    pub send_repeated_reminders: Option<bool>,
    pub send_invoice_from_proforma_email: Option<bool>,
    pub send_thank_you_email: Option<bool>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or(&self.subdomain))
    }
}

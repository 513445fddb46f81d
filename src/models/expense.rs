use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::line::{InvoiceLine, append_destroyed_lines, loaded_line_ids};
use crate::error::Result;
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Open,
    Overdue,
    Paid,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Overdue => "overdue",
            Self::Paid => "paid",
        }
    }
}

/// A received supplier document (bill, invoice, receipt).
///
/// See <https://www.fakturoid.cz/api/v3/expenses>.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expense {
    #[serde(skip_serializing)]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_symbol: Option<String>,
    /// `invoice`, `bill` or `other`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,

    #[serde(skip_serializing)]
    pub supplier_name: Option<String>,
    #[serde(skip_serializing)]
    pub supplier_street: Option<String>,
    #[serde(skip_serializing)]
    pub supplier_city: Option<String>,
    #[serde(skip_serializing)]
    pub supplier_zip: Option<String>,
    #[serde(skip_serializing)]
    pub supplier_country: Option<String>,
    #[serde(skip_serializing)]
    pub supplier_registration_no: Option<String>,
    #[serde(skip_serializing)]
    pub supplier_vat_no: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<u64>,
    #[serde(skip_serializing)]
    pub status: Option<ExpenseStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxable_fulfillment_due: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remind_due_date: Option<bool>,
    #[serde(skip_serializing)]
    pub paid_on: Option<NaiveDate>,
    #[serde(skip_serializing)]
    pub locked_at: Option<DateTime<FixedOffset>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swift_bic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transferred_tax_liability: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_price_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proportional_vat_deduction: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_deductible: Option<bool>,

    #[serde(skip_serializing)]
    pub subtotal: Option<Decimal>,
    #[serde(skip_serializing)]
    pub total: Option<Decimal>,
    #[serde(skip_serializing)]
    pub native_subtotal: Option<Decimal>,
    #[serde(skip_serializing)]
    pub native_total: Option<Decimal>,

    pub lines: Vec<InvoiceLine>,

    #[serde(skip_serializing)]
    pub html_url: Option<String>,
    #[serde(skip_serializing)]
    pub url: Option<String>,
    #[serde(skip_serializing)]
    pub subject_url: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing)]
    pub updated_at: Option<DateTime<FixedOffset>>,

    #[serde(skip)]
    loaded_lines: Vec<u64>,
}

impl Expense {
    /// New, unsaved expense from the given supplier.
    pub fn new(subject_id: u64) -> Self {
        Self {
            subject_id: Some(subject_id),
            ..Self::default()
        }
    }

    pub fn add_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }
}

impl Resource for Expense {
    const COLLECTION: &'static str = "expenses";

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn payload(&self) -> Result<Value> {
        let mut payload = serde_json::to_value(self)?;
        append_destroyed_lines(&mut payload, &self.loaded_lines, &self.lines);
        Ok(payload)
    }

    fn mark_loaded(&mut self) {
        self.loaded_lines = loaded_line_ids(&self.lines);
    }
}

impl std::fmt::Display for Expense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.number, self.id) {
            (Some(number), _) => f.write_str(number),
            (None, Some(id)) => write!(f, "expense #{id}"),
            (None, None) => f.write_str("unsaved expense"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn supplier_snapshot_is_not_written() {
        let json = r#"{
            "id": 5,
            "number": "N20240201",
            "supplier_name": "Dodavatel s.r.o.",
            "subject_id": 9,
            "status": "paid",
            "paid_on": "2024-02-10",
            "total": "1210.0",
            "lines": [{"id": 77, "name": "Paper", "quantity": "10", "unit_price": "121"}]
        }"#;
        let mut expense: Expense = serde_json::from_str(json).unwrap();
        expense.mark_loaded();
        assert_eq!(expense.status, Some(ExpenseStatus::Paid));
        assert_eq!(expense.total, Some(dec!(1210)));

        expense.lines.clear();
        let payload = expense.payload().unwrap();
        assert!(payload.get("supplier_name").is_none());
        assert!(payload.get("paid_on").is_none());
        assert_eq!(payload["lines"][0]["_destroy"], true);
        assert_eq!(payload["lines"][0]["id"], 77);
    }
}

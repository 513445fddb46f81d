use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::line::{InvoiceLine, append_destroyed_lines, loaded_line_ids};
use crate::error::Result;
use crate::resource::Resource;

/// Invoice template, optionally issuing invoices on a recurring schedule.
///
/// See <https://www.fakturoid.cz/api/v3/generators>.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Generator {
    #[serde(skip_serializing)]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<u64>,
    /// `true` for a recurring generator, `false` for a one-off template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proforma: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_occurrence_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_day_in_month: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_price_mode: Option<String>,

    #[serde(skip_serializing)]
    pub legacy_bank_details: Option<Value>,
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

impl Generator {
    pub fn new(name: impl Into<String>, subject_id: u64) -> Self {
        Self {
            name: name.into(),
            subject_id: Some(subject_id),
            ..Self::default()
        }
    }

    /// Issue every `months` months starting at `start`.
    pub fn recurring(mut self, start: NaiveDate, months: u32) -> Self {
        self.recurring = Some(true);
        self.start_date = Some(start);
        self.months_period = Some(months);
        self
    }

    pub fn add_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring.unwrap_or(false)
    }
}

impl Resource for Generator {
    const COLLECTION: &'static str = "generators";

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

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn recurring_generator_payload() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let generator = Generator::new("Monthly hosting", 16)
            .recurring(start, 1)
            .add_line(InvoiceLine::new("Hosting", dec!(499.00)).vat_rate(dec!(21)));
        assert!(generator.is_recurring());

        let payload = generator.payload().unwrap();
        assert_eq!(payload["recurring"], true);
        assert_eq!(payload["start_date"], "2024-01-01");
        assert_eq!(payload["months_period"], 1);
        assert_eq!(payload["lines"][0]["unit_price"], "499.00");
        assert!(payload.get("id").is_none());
    }
}

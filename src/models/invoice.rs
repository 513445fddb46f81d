use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::line::{InvoiceLine, append_destroyed_lines, loaded_line_ids};
use super::payment::InvoicePayment;
use crate::error::Result;
use crate::resource::Resource;

/// Invoice status as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Open,
    Sent,
    Overdue,
    Paid,
    Cancelled,
    Uncollectible,
}

impl InvoiceStatus {
    /// Wire name, as used in the `status` list filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Sent => "sent",
            Self::Overdue => "overdue",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Uncollectible => "uncollectible",
        }
    }
}

/// Kind of invoice document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    Regular,
    /// Non-binding preliminary invoice.
    Proforma,
    PartialProforma,
    Correction,
    TaxDocument,
    FinalInvoice,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Proforma => "proforma",
            Self::PartialProforma => "partial_proforma",
            Self::Correction => "correction",
            Self::TaxDocument => "tax_document",
            Self::FinalInvoice => "final_invoice",
        }
    }

    pub fn is_proforma(&self) -> bool {
        matches!(self, Self::Proforma | Self::PartialProforma)
    }
}

/// An issued invoice.
///
/// Fields the server computes (totals, status, seller/client snapshots,
/// URLs, timestamps) are read but never written back. Status changes go
/// through [`InvoiceEvent`](crate::InvoiceEvent)s instead.
///
/// See <https://www.fakturoid.cz/api/v3/invoices> for the full field reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    #[serde(skip_serializing)]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proforma_followup_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_format_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_symbol: Option<String>,

    #[serde(skip_serializing)]
    pub your_name: Option<String>,
    #[serde(skip_serializing)]
    pub your_street: Option<String>,
    #[serde(skip_serializing)]
    pub your_city: Option<String>,
    #[serde(skip_serializing)]
    pub your_zip: Option<String>,
    #[serde(skip_serializing)]
    pub your_country: Option<String>,
    #[serde(skip_serializing)]
    pub your_registration_no: Option<String>,
    #[serde(skip_serializing)]
    pub your_vat_no: Option<String>,
    #[serde(skip_serializing)]
    pub client_name: Option<String>,
    #[serde(skip_serializing)]
    pub client_street: Option<String>,
    #[serde(skip_serializing)]
    pub client_city: Option<String>,
    #[serde(skip_serializing)]
    pub client_zip: Option<String>,
    #[serde(skip_serializing)]
    pub client_country: Option<String>,
    #[serde(skip_serializing)]
    pub client_registration_no: Option<String>,
    #[serde(skip_serializing)]
    pub client_vat_no: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_custom_id: Option<String>,
    #[serde(skip_serializing)]
    pub generator_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<u64>,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    #[serde(skip_serializing)]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxable_fulfillment_due: Option<NaiveDate>,
    /// Payment term in days; the server derives `due_on` from it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<u32>,
    #[serde(skip_serializing)]
    pub due_on: Option<NaiveDate>,
    #[serde(skip_serializing)]
    pub sent_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing)]
    pub paid_on: Option<NaiveDate>,
    #[serde(skip_serializing)]
    pub reminder_sent_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing)]
    pub cancelled_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing)]
    pub uncollectible_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing)]
    pub locked_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing)]
    pub webinvoice_seen_on: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swift_bic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_bank_account: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transferred_tax_liability: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_price_mode: Option<String>,

    #[serde(skip_serializing)]
    pub subtotal: Option<Decimal>,
    #[serde(skip_serializing)]
    pub total: Option<Decimal>,
    #[serde(skip_serializing)]
    pub native_subtotal: Option<Decimal>,
    #[serde(skip_serializing)]
    pub native_total: Option<Decimal>,
    #[serde(skip_serializing)]
    pub remaining_amount: Option<Decimal>,
    #[serde(skip_serializing)]
    pub remaining_native_amount: Option<Decimal>,

    pub lines: Vec<InvoiceLine>,
    #[serde(skip_serializing)]
    pub payments: Vec<InvoicePayment>,

    #[serde(skip_serializing)]
    pub html_url: Option<String>,
    #[serde(skip_serializing)]
    pub public_html_url: Option<String>,
    #[serde(skip_serializing)]
    pub url: Option<String>,
    #[serde(skip_serializing)]
    pub pdf_url: Option<String>,
    #[serde(skip_serializing)]
    pub subject_url: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing)]
    pub updated_at: Option<DateTime<FixedOffset>>,

    #[serde(skip)]
    loaded_lines: Vec<u64>,
}

impl Invoice {
    /// New, unsaved invoice for the given subject.
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

    pub fn is_proforma(&self) -> bool {
        self.document_type.is_some_and(|t| t.is_proforma())
    }
}

impl Resource for Invoice {
    const COLLECTION: &'static str = "invoices";

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

impl std::fmt::Display for Invoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.number, self.id) {
            (Some(number), _) => f.write_str(number),
            (None, Some(id)) => write!(f, "invoice #{id}"),
            (None, None) => f.write_str("unsaved invoice"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ECHO: &str = r#"{
        "id": 1234,
        "document_type": "regular",
        "number": "2023-0021",
        "your_name": "Alexandr Hejsek",
        "client_name": "Apple Czech s.r.o.",
        "subject_id": 16,
        "status": "open",
        "issued_on": "2023-11-30",
        "taxable_fulfillment_due": "2023-11-30",
        "due": 14,
        "due_on": "2023-12-14",
        "sent_at": null,
        "subtotal": "9.2",
        "total": "11.13",
        "tags": ["mkt"],
        "lines": [
            {"id": 1304, "name": "Beer", "quantity": "2.0", "unit_name": "pcs",
             "unit_price": "4.60", "vat_rate": 21, "total_vat": "1.93"},
            {"id": 1305, "name": "Nachos", "quantity": "1.0",
             "unit_price": "0", "vat_rate": 21}
        ],
        "created_at": "2023-11-30T13:50:45.848+01:00",
        "updated_at": "2023-11-30T13:50:45.848+01:00"
    }"#;

    fn loaded() -> Invoice {
        let mut invoice: Invoice = serde_json::from_str(ECHO).unwrap();
        invoice.mark_loaded();
        invoice
    }

    #[test]
    fn decodes_vendor_fields() {
        let invoice = loaded();
        assert_eq!(invoice.id(), Some(1234));
        assert_eq!(invoice.status, Some(InvoiceStatus::Open));
        assert_eq!(invoice.due_on, NaiveDate::from_ymd_opt(2023, 12, 14));
        assert_eq!(invoice.total, Some(dec!(11.13)));
        assert_eq!(invoice.lines.len(), 2);
        assert_eq!(invoice.created_at.unwrap().offset().local_minus_utc(), 3600);
        assert!(!invoice.is_proforma());
        assert_eq!(invoice.to_string(), "2023-0021");
    }

    #[test]
    fn unit_price_keeps_its_scale_through_a_round_trip() {
        let invoice = loaded();
        let payload = invoice.payload().unwrap();
        assert_eq!(payload["lines"][0]["unit_price"], "4.60");

        let echoed: Invoice = serde_json::from_value(payload).unwrap();
        assert_eq!(echoed.lines[0].unit_price.to_string(), "4.60");
        assert_eq!(echoed.lines[0].unit_price, dec!(4.60));
    }

    #[test]
    fn payload_skips_read_only_fields() {
        let payload = loaded().payload().unwrap();
        for key in [
            "id", "your_name", "client_name", "status", "due_on", "subtotal", "total",
            "created_at", "payments", "sent_at",
        ] {
            assert!(payload.get(key).is_none(), "{key} must not be written");
        }
        assert_eq!(payload["subject_id"], 16);
        assert_eq!(payload["issued_on"], "2023-11-30");
        assert_eq!(payload["lines"][0]["id"], 1304);
    }

    #[test]
    fn removing_a_loaded_line_destroys_it() {
        let mut invoice = loaded();
        invoice.lines.remove(1);
        invoice
            .lines
            .push(InvoiceLine::new("Chips", dec!(1.50)).quantity(dec!(3)));

        let payload = invoice.payload().unwrap();
        let lines = payload["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], 1304);
        assert!(lines[1].get("id").is_none());
        assert_eq!(lines[2], serde_json::json!({ "id": 1305, "_destroy": true }));
    }

    #[test]
    fn unsaved_invoice_payload() {
        let invoice = Invoice::new(16).add_line(InvoiceLine::new("Work", dec!(1000)));
        assert_eq!(invoice.id(), None);
        let payload = invoice.payload().unwrap();
        assert_eq!(payload["subject_id"], 16);
        assert_eq!(payload["lines"][0]["quantity"], "1");
        assert!(payload.get("tags").is_none());
        assert_eq!(invoice.to_string(), "unsaved invoice");
    }
}

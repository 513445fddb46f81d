use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One line of an invoice, expense or generator.
///
/// See <https://www.fakturoid.cz/api/v3/invoices#attributes> for the full field reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceLine {
    /// Present on lines loaded from the server; sent back so the line is updated in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    pub unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_item_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing)]
    pub unit_price_without_vat: Option<Decimal>,
    #[serde(skip_serializing)]
    pub unit_price_with_vat: Option<Decimal>,
    #[serde(skip_serializing)]
    pub total_price_without_vat: Option<Decimal>,
    #[serde(skip_serializing)]
    pub total_vat: Option<Decimal>,
    #[serde(skip_serializing)]
    pub native_total_price_without_vat: Option<Decimal>,
    #[serde(skip_serializing)]
    pub native_total_vat: Option<Decimal>,
}

impl Default for InvoiceLine {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            quantity: Decimal::ONE,
            unit_name: None,
            unit_price: Decimal::ZERO,
            vat_rate: None,
            inventory_item_id: None,
            sku: None,
            unit_price_without_vat: None,
            unit_price_with_vat: None,
            total_price_without_vat: None,
            total_vat: None,
            native_total_price_without_vat: None,
            native_total_vat: None,
        }
    }
}

impl InvoiceLine {
    /// A single unit of `name` at `unit_price`.
    pub fn new(name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            unit_price,
            ..Self::default()
        }
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn unit_name(mut self, unit_name: impl Into<String>) -> Self {
        self.unit_name = Some(unit_name.into());
        self
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = Some(rate);
        self
    }
}

impl fmt::Display for InvoiceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit_name {
            Some(unit) => write!(f, "{} {} {}", self.quantity, unit, self.name),
            None if self.quantity == Decimal::ONE => f.write_str(&self.name),
            None => write!(f, "{} {}", self.quantity, self.name),
        }
    }
}

/// Ids of the lines a document had when it was loaded.
pub(crate) fn loaded_line_ids(lines: &[InvoiceLine]) -> Vec<u64> {
    lines.iter().filter_map(|l| l.id).collect()
}

/// Append `{"id": .., "_destroy": true}` to `payload.lines` for every loaded
/// line that is no longer part of the document.
pub(crate) fn append_destroyed_lines(payload: &mut Value, loaded: &[u64], lines: &[InvoiceLine]) {
    let removed: Vec<Value> = loaded
        .iter()
        .filter(|id| !lines.iter().any(|l| l.id == Some(**id)))
        .map(|id| json!({ "id": id, "_destroy": true }))
        .collect();
    if removed.is_empty() {
        return;
    }
    if let Some(obj) = payload.as_object_mut() {
        let entry = obj
            .entry("lines")
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Some(array) = entry.as_array_mut() {
            array.extend(removed);
        }
    }
}

//! Query filters for list endpoints.
//!
//! Each filter renders to plain query parameters. The client does not check
//! combinations; whatever the server does not understand it rejects.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::models::{DocumentType, ExpenseStatus, InvoiceStatus};

/// Lower or upper bound of a date-range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl DateBound {
    /// ISO 8601 rendering used on the wire.
    pub fn to_iso(&self) -> String {
        match self {
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.to_rfc3339(),
        }
    }
}

impl From<NaiveDate> for DateBound {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for DateBound {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<DateTime<chrono::Utc>> for DateBound {
    fn from(dt: DateTime<chrono::Utc>) -> Self {
        Self::DateTime(dt.fixed_offset())
    }
}

pub(crate) type Query = Vec<(String, String)>;

fn push(query: &mut Query, key: &str, value: impl ToString) {
    query.push((key.to_string(), value.to_string()));
}

fn push_opt<T: ToString>(query: &mut Query, key: &str, value: &Option<T>) {
    if let Some(v) = value {
        push(query, key, v.to_string());
    }
}

fn push_date(query: &mut Query, key: &str, value: &Option<DateBound>) {
    if let Some(v) = value {
        push(query, key, v.to_iso());
    }
}

/// Filters for `subjects.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectFilter {
    pub since: Option<DateBound>,
    pub updated_since: Option<DateBound>,
    pub custom_id: Option<String>,
}

impl SubjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, since: impl Into<DateBound>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn updated_since(mut self, since: impl Into<DateBound>) -> Self {
        self.updated_since = Some(since.into());
        self
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub(crate) fn to_query(&self) -> Query {
        let mut q = Query::new();
        push_date(&mut q, "since", &self.since);
        push_date(&mut q, "updated_since", &self.updated_since);
        push_opt(&mut q, "custom_id", &self.custom_id);
        q
    }
}

/// Filters for `invoices.json`.
///
/// ```
/// use chrono::NaiveDate;
/// use fakturoid::{InvoiceFilter, InvoiceStatus};
///
/// let filter = InvoiceFilter::new()
///     .since(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .status(InvoiceStatus::Paid)
///     .proforma(false);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceFilter {
    pub since: Option<DateBound>,
    pub until: Option<DateBound>,
    pub updated_since: Option<DateBound>,
    pub updated_until: Option<DateBound>,
    pub number: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub custom_id: Option<String>,
    pub subject_id: Option<u64>,
    pub document_type: Option<DocumentType>,
}

impl InvoiceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, since: impl Into<DateBound>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn until(mut self, until: impl Into<DateBound>) -> Self {
        self.until = Some(until.into());
        self
    }

    pub fn updated_since(mut self, since: impl Into<DateBound>) -> Self {
        self.updated_since = Some(since.into());
        self
    }

    pub fn updated_until(mut self, until: impl Into<DateBound>) -> Self {
        self.updated_until = Some(until.into());
        self
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn subject_id(mut self, subject_id: u64) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn document_type(mut self, document_type: DocumentType) -> Self {
        self.document_type = Some(document_type);
        self
    }

    /// Shortcut for `document_type(Proforma)` / `document_type(Regular)`.
    pub fn proforma(self, proforma: bool) -> Self {
        self.document_type(if proforma {
            DocumentType::Proforma
        } else {
            DocumentType::Regular
        })
    }

    pub(crate) fn to_query(&self) -> Query {
        let mut q = Query::new();
        push_opt(&mut q, "subject_id", &self.subject_id);
        push_date(&mut q, "since", &self.since);
        push_date(&mut q, "until", &self.until);
        push_date(&mut q, "updated_since", &self.updated_since);
        push_date(&mut q, "updated_until", &self.updated_until);
        push_opt(&mut q, "number", &self.number);
        push_opt(&mut q, "custom_id", &self.custom_id);
        if let Some(status) = self.status {
            push(&mut q, "status", status.as_str());
        }
        if let Some(kind) = self.document_type {
            push(&mut q, "document_type", kind.as_str());
        }
        q
    }
}

/// Filters for `expenses.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub since: Option<DateBound>,
    pub updated_since: Option<DateBound>,
    pub number: Option<String>,
    pub status: Option<ExpenseStatus>,
    pub custom_id: Option<String>,
    pub subject_id: Option<u64>,
    pub variable_symbol: Option<String>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, since: impl Into<DateBound>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn updated_since(mut self, since: impl Into<DateBound>) -> Self {
        self.updated_since = Some(since.into());
        self
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn status(mut self, status: ExpenseStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn subject_id(mut self, subject_id: u64) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn variable_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.variable_symbol = Some(symbol.into());
        self
    }

    pub(crate) fn to_query(&self) -> Query {
        let mut q = Query::new();
        push_opt(&mut q, "subject_id", &self.subject_id);
        push_date(&mut q, "since", &self.since);
        push_date(&mut q, "updated_since", &self.updated_since);
        push_opt(&mut q, "number", &self.number);
        push_opt(&mut q, "custom_id", &self.custom_id);
        if let Some(status) = self.status {
            push(&mut q, "status", status.as_str());
        }
        push_opt(&mut q, "variable_symbol", &self.variable_symbol);
        q
    }
}

/// Filters for generators. `recurring` selects the endpoint rather than a
/// query parameter: `generators/recurring`, `generators/template`, or all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorFilter {
    pub recurring: Option<bool>,
    pub subject_id: Option<u64>,
    pub since: Option<DateBound>,
}

impl GeneratorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = Some(recurring);
        self
    }

    pub fn subject_id(mut self, subject_id: u64) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn since(mut self, since: impl Into<DateBound>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub(crate) fn endpoint(&self) -> &'static str {
        match self.recurring {
            None => "generators",
            Some(true) => "generators/recurring",
            Some(false) => "generators/template",
        }
    }

    pub(crate) fn to_query(&self) -> Query {
        let mut q = Query::new();
        push_opt(&mut q, "subject_id", &self.subject_id);
        push_date(&mut q, "since", &self.since);
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn get<'a>(q: &'a Query, key: &str) -> Option<&'a str> {
        q.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn empty_filter_has_no_params() {
        assert!(InvoiceFilter::new().to_query().is_empty());
        assert!(SubjectFilter::new().to_query().is_empty());
    }

    #[test]
    fn invoice_filter_renders_all_params() {
        let since: DateTime<FixedOffset> =
            DateTime::parse_from_rfc3339("2024-01-01T08:00:00+01:00").unwrap();
        let q = InvoiceFilter::new()
            .since(since)
            .until(date(2024, 12, 31))
            .status(InvoiceStatus::Overdue)
            .subject_id(16)
            .custom_id("X-1")
            .number("2024-0001")
            .proforma(true)
            .to_query();
        assert_eq!(get(&q, "since"), Some("2024-01-01T08:00:00+01:00"));
        assert_eq!(get(&q, "until"), Some("2024-12-31"));
        assert_eq!(get(&q, "status"), Some("overdue"));
        assert_eq!(get(&q, "subject_id"), Some("16"));
        assert_eq!(get(&q, "custom_id"), Some("X-1"));
        assert_eq!(get(&q, "number"), Some("2024-0001"));
        assert_eq!(get(&q, "document_type"), Some("proforma"));
    }

    #[test]
    fn proforma_false_means_regular() {
        let q = InvoiceFilter::new().proforma(false).to_query();
        assert_eq!(get(&q, "document_type"), Some("regular"));
    }

    #[test]
    fn generator_recurring_selects_endpoint() {
        assert_eq!(GeneratorFilter::new().endpoint(), "generators");
        assert_eq!(
            GeneratorFilter::new().recurring(true).endpoint(),
            "generators/recurring"
        );
        assert_eq!(
            GeneratorFilter::new().recurring(false).endpoint(),
            "generators/template"
        );
        let q = GeneratorFilter::new().recurring(true).to_query();
        assert!(get(&q, "recurring").is_none());
    }

    #[test]
    fn expense_filter_variable_symbol() {
        let q = ExpenseFilter::new()
            .variable_symbol("20240001")
            .status(ExpenseStatus::Open)
            .to_query();
        assert_eq!(get(&q, "variable_symbol"), Some("20240001"));
        assert_eq!(get(&q, "status"), Some("open"));
    }

    #[test]
    fn utc_datetimes_keep_zero_offset() {
        let dt = DateTime::parse_from_rfc3339("2024-05-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        assert_eq!(DateBound::from(dt).to_iso(), "2024-05-01T00:00:00+00:00");
    }
}

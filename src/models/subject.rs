use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::resource::Resource;

/// Whether a subject is billed, bills us, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Customer,
    Supplier,
    Both,
}

/// A customer or supplier party.
///
/// See <https://www.fakturoid.cz/api/v3/subjects> for the full field reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subject {
    #[serde(skip_serializing)]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(skip_serializing)]
    pub user_id: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub subject_type: Option<SubjectType>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_copy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// ISO 3166-1 alpha-2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// IČO.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_no: Option<String>,
    /// DIČ.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_vat_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swift_bic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_symbol: Option<String>,
    /// Payment term in days for invoices issued to this subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setting_update_from_ares: Option<String>,
    #[serde(skip_serializing)]
    pub unreliable: Option<bool>,
    #[serde(skip_serializing)]
    pub unreliable_checked_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing)]
    pub html_url: Option<String>,
    #[serde(skip_serializing)]
    pub url: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl Subject {
    /// New, unsaved subject.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Resource for Subject {
    const COLLECTION: &'static str = "subjects";

    fn id(&self) -> Option<u64> {
        self.id
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_omits_server_fields() {
        let json = r#"{
            "id": 16,
            "user_id": 3,
            "type": "customer",
            "name": "Apple Czech s.r.o.",
            "street": "Klimentská 1216/46",
            "city": "Praha",
            "zip": "11000",
            "country": "CZ",
            "registration_no": "28897501",
            "unreliable": false,
            "html_url": "https://app.fakturoid.cz/applecorp/subjects/16",
            "created_at": "2023-08-22T10:59:00.330+02:00",
            "updated_at": "2023-08-22T10:59:00.330+02:00"
        }"#;
        let subject: Subject = serde_json::from_str(json).unwrap();
        assert_eq!(subject.id, Some(16));
        assert_eq!(subject.subject_type, Some(SubjectType::Customer));
        assert!(subject.created_at.is_some());

        let payload = subject.payload().unwrap();
        assert_eq!(payload["name"], "Apple Czech s.r.o.");
        assert_eq!(payload["type"], "customer");
        for key in ["id", "user_id", "unreliable", "html_url", "created_at", "updated_at"] {
            assert!(payload.get(key).is_none(), "{key} must not be written");
        }
        assert!(payload.get("email").is_none());
    }

    #[test]
    fn new_subject_is_unsaved() {
        assert_eq!(Subject::new("Kunde s.r.o.").id(), None);
    }
}

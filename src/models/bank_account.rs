use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A bank account configured in the Fakturoid account. Read-only.
///
/// See <https://www.fakturoid.cz/api/v3/bank-accounts>.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankAccount {
    pub id: u64,
    pub name: String,
    pub currency: Option<String>,
    pub number: Option<String>,
    pub iban: Option<String>,
    pub swift_bic: Option<String>,
    pub pairing: Option<bool>,
    pub expense_pairing: Option<bool>,
    pub payment_adjustment: Option<bool>,
    pub default: Option<bool>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl std::fmt::Display for BankAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

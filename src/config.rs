use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://app.fakturoid.cz/api/v3";

/// Connection parameters for a [`Fakturoid`](crate::Fakturoid) client.
///
/// ```
/// use fakturoid::Config;
///
/// let config = Config::new("mycompany", "me@example.com", "client-id", "client-secret")
///     .user_agent("Billing Sync (me@example.com)");
/// assert_eq!(config.slug(), "mycompany");
/// ```
#[derive(Clone)]
pub struct Config {
    slug: String,
    email: String,
    client_id: String,
    client_secret: String,
    user_agent: Option<String>,
    base_url: String,
    timeout: Option<Duration>,
}

impl Config {
    pub fn new(
        slug: impl Into<String>,
        email: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            email: email.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Override the `User-Agent` header. Fakturoid expects an application
    /// name followed by a contact address in parentheses.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Point the client at a different API root (staging, mock server).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Per-request timeout. Without it the transport default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub(crate) fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The `User-Agent` sent with every request.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("fakturoid-rs ({})", self.email))
    }

    pub(crate) fn token_url(&self) -> String {
        format!("{}/oauth/token", self.base_url)
    }

    /// URL of an account-scoped endpoint, e.g. `invoices/12` →
    /// `.../accounts/{slug}/invoices/12.json`.
    pub(crate) fn resource_url(&self, endpoint: &str) -> String {
        format!("{}/accounts/{}/{}.json", self.base_url, self.slug, endpoint)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.slug.trim().is_empty() {
            return Err(Error::Config("account slug is required".into()));
        }
        if !self
            .slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::Config(format!(
                "account slug may only contain letters, digits, '-' and '_', got {:?}",
                self.slug
            )));
        }
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(Error::Config(
                "client id and client secret are required".into(),
            ));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "base url must be http(s), got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("slug", &self.slug)
            .field("email", &self.email)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

//! OAuth2 client-credentials token handling.
//!
//! The token is fetched with HTTP Basic credentials and cached on the client
//! until shortly before it expires. A 401 from any resource call drops the
//! cached token so the next request fetches a fresh one.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};

/// Tokens are treated as expired this long before the server says so.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: Option<Instant>,
}

impl AccessToken {
    fn from_response(resp: TokenResponse, now: Instant) -> Self {
        let expires_at = resp
            .expires_in
            .map(|secs| now + Duration::from_secs(secs).saturating_sub(EXPIRY_MARGIN));
        Self {
            value: resp.access_token,
            expires_at,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Holds the bearer token for one client instance.
pub(crate) struct TokenCache {
    current: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Return a valid token, fetching a new one if none is cached or the
    /// cached one is about to expire.
    pub(crate) fn token(&self, http: &HttpClient, config: &Config) -> Result<String> {
        let mut current = self.current.lock();
        if let Some(token) = current.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }
        let token = fetch_token(http, config)?;
        let value = token.value.clone();
        *current = Some(token);
        Ok(value)
    }

    /// Forget the cached token.
    pub(crate) fn invalidate(&self) {
        *self.current.lock() = None;
    }
}

fn fetch_token(http: &HttpClient, config: &Config) -> Result<AccessToken> {
    let url = config.token_url();
    debug!(url = %url, "requesting access token");

    let requested_at = Instant::now();
    let resp = http
        .post(&url)
        .basic_auth(config.client_id(), Some(config.client_secret()))
        .form(&[("grant_type", "client_credentials")])
        .send()?;

    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        return Err(Error::Auth { status, body });
    }

    let parsed: TokenResponse = serde_json::from_str(&body).map_err(|_| Error::Auth {
        status,
        body: body.clone(),
    })?;
    if let Some(kind) = parsed.token_type.as_deref() {
        if !kind.eq_ignore_ascii_case("bearer") {
            return Err(Error::Auth { status, body });
        }
    }

    info!(expires_in = ?parsed.expires_in, "access token acquired");
    Ok(AccessToken::from_response(parsed, requested_at))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in: Option<u64>) -> TokenResponse {
        TokenResponse {
            access_token: "abc".into(),
            token_type: Some("Bearer".into()),
            expires_in,
        }
    }

    #[test]
    fn token_expires_before_server_deadline() {
        let now = Instant::now();
        let token = AccessToken::from_response(response(Some(7200)), now);
        assert!(token.is_fresh(now + Duration::from_secs(7000)));
        assert!(!token.is_fresh(now + Duration::from_secs(7150)));
    }

    #[test]
    fn short_lived_token_is_immediately_stale() {
        let now = Instant::now();
        let token = AccessToken::from_response(response(Some(30)), now);
        assert!(!token.is_fresh(now));
    }

    #[test]
    fn token_without_expiry_stays_fresh() {
        let now = Instant::now();
        let token = AccessToken::from_response(response(None), now);
        assert!(token.is_fresh(now + Duration::from_secs(86_400)));
    }

    #[test]
    fn token_response_parses_vendor_shape() {
        let json = r#"{"access_token":"xyz","token_type":"Bearer","expires_in":7200}"#;
        let parsed: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.access_token, "xyz");
        assert_eq!(parsed.expires_in, Some(7200));
    }
}

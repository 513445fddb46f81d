//! The Fakturoid API client.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::auth::TokenCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{ExpenseEvent, InvoiceEvent};
use crate::filters::{ExpenseFilter, GeneratorFilter, InvoiceFilter, Query, SubjectFilter};
use crate::models::{
    Account, BankAccount, Expense, Generator, Invoice, InvoiceMessage, InvoicePayment, Subject,
};
use crate::paging::{Page, PageSource, Pages};
use crate::resource::{Resource, member_path};

static LINK_LAST_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[?&]page=(\d+)[^>]*>;\s*rel="last""#).expect("valid link header pattern")
});

/// Raw successful response.
struct Reply {
    status: StatusCode,
    body: String,
    last_page: Option<u32>,
}

impl Reply {
    fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Blocking client bound to one Fakturoid account.
///
/// ```no_run
/// use fakturoid::{Config, Fakturoid, InvoiceFilter};
///
/// # fn main() -> fakturoid::Result<()> {
/// let fa = Fakturoid::new(Config::new("mycompany", "me@example.com", "id", "secret"))?;
/// let mut invoices = fa.invoices(&InvoiceFilter::new());
/// let newest = invoices.get(0)?;
/// let oldest = invoices.get(-1)?;
/// println!("{newest} .. {oldest}");
/// # Ok(())
/// # }
/// ```
pub struct Fakturoid {
    config: Config,
    http: HttpClient,
    token: TokenCache,
}

impl Fakturoid {
    /// Build the client and obtain an access token.
    ///
    /// # Errors
    ///
    /// `Error::Config` for unusable parameters, `Error::Auth` when the
    /// credentials are rejected, `Error::Transport` when the token endpoint
    /// cannot be reached.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let user_agent = HeaderValue::from_str(&config.effective_user_agent())
            .map_err(|e| Error::Config(format!("invalid user agent: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let client = Self {
            config,
            http,
            token: TokenCache::new(),
        };
        client.token.token(&client.http, &client.config)?;
        Ok(client)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ------------------------------------------------------------------
    // Account & bank accounts
    // ------------------------------------------------------------------

    pub fn account(&self) -> Result<Account> {
        self.request(Method::GET, "account", &[], None)?.decode()
    }

    pub fn bank_accounts(&self) -> Result<Vec<BankAccount>> {
        self.request(Method::GET, "bank_accounts", &[], None)?
            .decode()
    }

    // ------------------------------------------------------------------
    // Subjects
    // ------------------------------------------------------------------

    pub fn subject(&self, id: u64) -> Result<Subject> {
        self.get(id)
    }

    pub fn subjects(&self, filter: &SubjectFilter) -> Pages<'_, Subject> {
        self.list_at(Subject::COLLECTION, filter.to_query())
    }

    /// Full-text search over name, full name, email, registration and VAT numbers.
    pub fn search_subjects(&self, query: &str) -> Pages<'_, Subject> {
        self.list_at(
            "subjects/search",
            vec![("query".to_string(), query.to_string())],
        )
    }

    // ------------------------------------------------------------------
    // Invoices
    // ------------------------------------------------------------------

    pub fn invoice(&self, id: u64) -> Result<Invoice> {
        self.get(id)
    }

    /// Invoices matching `filter`, newest first.
    pub fn invoices(&self, filter: &InvoiceFilter) -> Pages<'_, Invoice> {
        self.list_at(Invoice::COLLECTION, filter.to_query())
    }

    /// Fire a state transition on an invoice.
    ///
    /// # Errors
    ///
    /// `Error::Validation` when the server rejects the transition.
    pub fn fire_event(&self, invoice_id: u64, event: &InvoiceEvent) -> Result<()> {
        debug!(invoice_id, event = event.name(), "firing invoice event");
        self.fire(&member_path::<Invoice>(invoice_id), event)
    }

    pub fn send_invoice_message(&self, invoice_id: u64, message: &InvoiceMessage) -> Result<()> {
        let body = serde_json::to_value(message)?;
        self.request(
            Method::POST,
            &format!("{}/message", member_path::<Invoice>(invoice_id)),
            &[],
            Some(&body),
        )?;
        Ok(())
    }

    /// Record a payment; returns the payment as stored by the server.
    pub fn create_invoice_payment(
        &self,
        invoice_id: u64,
        payment: &InvoicePayment,
    ) -> Result<InvoicePayment> {
        let body = serde_json::to_value(payment)?;
        self.request(
            Method::POST,
            &payments_path(invoice_id),
            &[],
            Some(&body),
        )?
        .decode()
    }

    pub fn delete_invoice_payment(&self, invoice_id: u64, payment_id: u64) -> Result<()> {
        self.request(
            Method::DELETE,
            &format!("{}/{}", payments_path(invoice_id), payment_id),
            &[],
            None,
        )?;
        Ok(())
    }

    /// Issue a tax document for a payment on a proforma invoice.
    pub fn create_tax_document(&self, invoice_id: u64, payment_id: u64) -> Result<InvoicePayment> {
        self.request(
            Method::POST,
            &format!(
                "{}/{}/create_tax_document",
                payments_path(invoice_id),
                payment_id
            ),
            &[],
            None,
        )?
        .decode()
    }

    // ------------------------------------------------------------------
    // Expenses
    // ------------------------------------------------------------------

    pub fn expense(&self, id: u64) -> Result<Expense> {
        self.get(id)
    }

    pub fn expenses(&self, filter: &ExpenseFilter) -> Pages<'_, Expense> {
        self.list_at(Expense::COLLECTION, filter.to_query())
    }

    pub fn fire_expense_event(&self, expense_id: u64, event: &ExpenseEvent) -> Result<()> {
        debug!(expense_id, event = event.name(), "firing expense event");
        self.fire(&member_path::<Expense>(expense_id), event)
    }

    // ------------------------------------------------------------------
    // Generators
    // ------------------------------------------------------------------

    pub fn generator(&self, id: u64) -> Result<Generator> {
        self.get(id)
    }

    pub fn generators(&self, filter: &GeneratorFilter) -> Pages<'_, Generator> {
        self.list_at(filter.endpoint(), filter.to_query())
    }

    // ------------------------------------------------------------------
    // Generic resource operations
    // ------------------------------------------------------------------

    /// Fetch one resource by id.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` when no such resource exists.
    pub fn get<R: Resource>(&self, id: u64) -> Result<R> {
        let reply = self.request(Method::GET, &member_path::<R>(id), &[], None)?;
        let mut resource: R = reply.decode()?;
        resource.mark_loaded();
        Ok(resource)
    }

    /// Lazily paged list of a resource's collection with raw query parameters.
    pub fn list<R: Resource + Clone + PartialEq>(
        &self,
        params: &[(&str, &str)],
    ) -> Pages<'_, R> {
        let query = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.list_at(R::COLLECTION, query)
    }

    /// Create `resource` if it has no id, otherwise update it. Returns the
    /// server's copy, which carries the id, totals and other derived fields.
    ///
    /// # Errors
    ///
    /// `Error::Validation` when the server rejects the payload.
    pub fn save<R: Resource>(&self, resource: &R) -> Result<R> {
        let body = resource.payload()?;
        let reply = match resource.id() {
            None => self.request(Method::POST, R::COLLECTION, &[], Some(&body))?,
            Some(id) => self.request(Method::PATCH, &member_path::<R>(id), &[], Some(&body))?,
        };
        let mut saved: R = reply.decode()?;
        saved.mark_loaded();
        Ok(saved)
    }

    /// Delete a persisted resource.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` for an unsaved resource, `Error::NotFound`
    /// when the server no longer has it.
    pub fn delete<R: Resource>(&self, resource: &R) -> Result<()> {
        let id = resource.id().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "cannot delete an unsaved {} entry",
                R::COLLECTION
            ))
        })?;
        self.delete_id::<R>(id)
    }

    pub fn delete_id<R: Resource>(&self, id: u64) -> Result<()> {
        self.request(Method::DELETE, &member_path::<R>(id), &[], None)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn list_at<R: Resource + Clone + PartialEq>(
        &self,
        endpoint: &str,
        query: Query,
    ) -> Pages<'_, R> {
        Pages::new(ListRequest {
            client: self,
            endpoint: endpoint.to_string(),
            query,
        })
    }

    fn fire<E: Serialize>(&self, member: &str, event: &E) -> Result<()> {
        let body = serde_json::to_value(event)?;
        self.request(Method::POST, &format!("{member}/fire"), &[], Some(&body))?;
        Ok(())
    }

    /// Send one request, refreshing the token once if the server answers 401.
    #[instrument(level = "debug", skip(self, query, body), fields(slug = %self.config.slug()))]
    fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Reply> {
        let url = self.config.resource_url(endpoint);
        let mut refreshed = false;
        loop {
            let token = self.token.token(&self.http, &self.config)?;
            debug!(%method, url = %url, "sending request");

            let mut req = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(token)
                .query(query);
            if let Some(body) = body {
                req = req.json(body);
            }
            let resp = req.send()?;

            if resp.status() == StatusCode::UNAUTHORIZED && !refreshed {
                warn!(url = %url, "access token rejected, requesting a new one");
                self.token.invalidate();
                refreshed = true;
                continue;
            }
            return read_reply(resp);
        }
    }
}

impl std::fmt::Debug for Fakturoid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fakturoid")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn payments_path(invoice_id: u64) -> String {
    format!("{}/payments", member_path::<Invoice>(invoice_id))
}

fn read_reply(resp: Response) -> Result<Reply> {
    let status = resp.status();
    let last_page = resp
        .headers()
        .get(header::LINK)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_last_page);
    let body = resp.text()?;
    if !status.is_success() {
        debug!(%status, "request failed");
        return Err(Error::from_response(status, body));
    }
    Ok(Reply {
        status,
        body,
        last_page,
    })
}

fn parse_last_page(link: &str) -> Option<u32> {
    LINK_LAST_PAGE
        .captures(link)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A list endpoint plus its filter, fetched one page at a time.
struct ListRequest<'a> {
    client: &'a Fakturoid,
    endpoint: String,
    query: Query,
}

impl<R: Resource> PageSource<R> for ListRequest<'_> {
    fn fetch_page(&self, page: u32) -> Result<Page<R>> {
        let mut query = self.query.clone();
        query.push(("page".to_string(), page.to_string()));
        let reply = self
            .client
            .request(Method::GET, &self.endpoint, &query, None)?;
        if reply.status == StatusCode::NO_CONTENT || reply.body.trim().is_empty() {
            return Ok(Page {
                items: Vec::new(),
                last_page: reply.last_page,
            });
        }
        let mut items: Vec<R> = reply.decode()?;
        items.iter_mut().for_each(R::mark_loaded);
        Ok(Page {
            items,
            last_page: reply.last_page,
        })
    }
}

//! Client layer: the Twilio gateway, mapping admin intents onto REST calls.

mod account;
mod config;
mod logs;
mod numbers;
#[cfg(test)]
pub(crate) mod testing;

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{AccountSid, AuthToken, ValidationError};
use crate::transport::{Page, TransportError};

const DEFAULT_API_ENDPOINT: &str = "https://api.twilio.com/2010-04-01";
const DEFAULT_MONITOR_ENDPOINT: &str = "https://monitor.twilio.com/v1";
const DEFAULT_PRICING_ENDPOINT: &str = "https://pricing.twilio.com/v1";
const DEFAULT_USER_AGENT: &str = concat!("twilio-admin/", env!("CARGO_PKG_VERSION"));

/// Upper bound on pages fetched by one list call.
const MAX_PAGES: usize = 100;

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

/// One outbound call. GET and DELETE send `params` as a query string, POST as a form body.
#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) params: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let url = url::Url::parse(&request.url)?;
            let builder = match request.method {
                Method::Get => self.client.get(with_query(url, &request.params)),
                Method::Delete => self.client.delete(with_query(url, &request.params)),
                Method::Post => self.client.post(url).form(&request.params),
            };

            let response = builder
                .basic_auth(
                    credentials.account_sid.as_str(),
                    Some(credentials.auth_token.as_str()),
                )
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

fn with_query(mut url: url::Url, params: &[(String, String)]) -> url::Url {
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    url
}

/// Account SID and auth token used for HTTP basic auth on every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    account_sid: AccountSid,
    auth_token: AuthToken,
}

impl Credentials {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            account_sid: AccountSid::new(account_sid)?,
            auth_token: AuthToken::new(auth_token)?,
        })
    }

    pub fn account_sid(&self) -> &AccountSid {
        &self.account_sid
    }

    pub fn auth_token(&self) -> &AuthToken {
        &self.auth_token
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`TwilioGateway`].
pub enum GatewayError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status without a Twilio error body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Twilio rejected the request with an error document.
    #[error("Twilio API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    #[error("no phone numbers found on the account")]
    NoNumbers,

    /// Export could not be serialized.
    #[error("export error: {0}")]
    Export(#[from] serde_json::Error),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
struct Endpoints {
    api: String,
    monitor: String,
    pricing: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_ENDPOINT.to_owned(),
            monitor: DEFAULT_MONITOR_ENDPOINT.to_owned(),
            pricing: DEFAULT_PRICING_ENDPOINT.to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`TwilioGateway`].
pub struct TwilioGatewayBuilder {
    credentials: Credentials,
    endpoints: Endpoints,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TwilioGatewayBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoints: Endpoints::default(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the core REST API base (`https://api.twilio.com/2010-04-01`).
    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.api = trim_base(endpoint.into());
        self
    }

    /// Override the Monitor API base (`https://monitor.twilio.com/v1`).
    pub fn monitor_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.monitor = trim_base(endpoint.into());
        self
    }

    /// Override the Pricing API base (`https://pricing.twilio.com/v1`).
    pub fn pricing_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.pricing = trim_base(endpoint.into());
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<TwilioGateway, GatewayError> {
        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| GatewayError::Transport(Box::new(err)))?;

        Ok(TwilioGateway::with_transport(
            self.credentials,
            self.endpoints,
            Arc::new(ReqwestTransport { client }),
        ))
    }
}

fn trim_base(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_owned()
}

#[derive(Clone)]
/// Gateway to the Twilio REST APIs.
///
/// Every operation issues its provider calls in sequence, performs no retries,
/// and returns either the typed payload or a [`GatewayError`]. Calls are routed
/// to the active account, which starts as the authenticated one and can be
/// changed with [`TwilioGateway::switch_account`].
pub struct TwilioGateway {
    credentials: Credentials,
    active_account: AccountSid,
    endpoints: Endpoints,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for TwilioGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioGateway")
            .field("credentials", &self.credentials)
            .field("active_account", &self.active_account)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl TwilioGateway {
    /// Create a gateway using the default endpoints.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(
            credentials,
            Endpoints::default(),
            Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        )
    }

    pub fn builder(credentials: Credentials) -> TwilioGatewayBuilder {
        TwilioGatewayBuilder::new(credentials)
    }

    fn with_transport(
        credentials: Credentials,
        endpoints: Endpoints,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            active_account: credentials.account_sid.clone(),
            credentials,
            endpoints,
            http,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Account that subsequent calls are routed to.
    pub fn active_account(&self) -> &AccountSid {
        &self.active_account
    }

    fn accounts_url(&self) -> String {
        format!("{}/Accounts.json", self.endpoints.api)
    }

    fn account_root_url(&self, sid: &AccountSid) -> String {
        format!("{}/Accounts/{}.json", self.endpoints.api, sid.as_str())
    }

    /// URL of a resource under the active account, `path` without a leading slash.
    fn account_url(&self, path: &str) -> String {
        format!(
            "{}/Accounts/{}/{}",
            self.endpoints.api,
            self.active_account.as_str(),
            path
        )
    }

    fn monitor_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoints.monitor, path)
    }

    fn pricing_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoints.pricing, path)
    }

    async fn call(
        &self,
        method: Method,
        url: String,
        params: Vec<(String, String)>,
    ) -> Result<String, GatewayError> {
        log::debug!("{method} {url}");
        let request = HttpRequest {
            method,
            url,
            params,
        };
        let response = self
            .http
            .send(request, &self.credentials)
            .await
            .map_err(GatewayError::Transport)?;
        log::debug!("HTTP {}", response.status);

        if !(200..=299).contains(&response.status) {
            if let Some(failure) = crate::transport::decode_api_failure(&response.body) {
                return Err(GatewayError::Api {
                    status: response.status,
                    code: failure.code,
                    message: failure.message,
                });
            }
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(GatewayError::HttpStatus {
                status: response.status,
                body,
            });
        }

        Ok(response.body)
    }

    async fn get(
        &self,
        url: String,
        params: Vec<(String, String)>,
    ) -> Result<String, GatewayError> {
        self.call(Method::Get, url, params).await
    }

    async fn post(
        &self,
        url: String,
        params: Vec<(String, String)>,
    ) -> Result<String, GatewayError> {
        self.call(Method::Post, url, params).await
    }

    async fn delete(&self, url: String) -> Result<(), GatewayError> {
        self.call(Method::Delete, url, Vec::new()).await.map(|_| ())
    }

    /// Fetch every page of a list resource, following the next-page cursor.
    async fn fetch_all<T, F>(
        &self,
        url: String,
        params: Vec<(String, String)>,
        decode: F,
    ) -> Result<Vec<T>, GatewayError>
    where
        F: Fn(&str) -> Result<Page<T>, TransportError>,
    {
        let mut items = Vec::new();
        let mut next = Some((url, params));
        let mut pages = 0;

        while let Some((url, params)) = next.take() {
            if pages == MAX_PAGES {
                log::warn!("stopped after {MAX_PAGES} pages of {url}");
                break;
            }
            pages += 1;

            let body = self.get(url, params).await?;
            let page = decode(&body).map_err(parse_error)?;
            items.extend(page.items);
            next = match page.next {
                Some(cursor) => Some((self.resolve_cursor(&cursor)?, Vec::new())),
                None => None,
            };
        }

        Ok(items)
    }

    /// Core API cursors are host-relative URIs; v1 APIs return absolute URLs.
    fn resolve_cursor(&self, cursor: &str) -> Result<String, GatewayError> {
        if cursor.starts_with("http://") || cursor.starts_with("https://") {
            return Ok(cursor.to_owned());
        }
        let base = url::Url::parse(&self.endpoints.api).map_err(parse_error)?;
        let joined = base.join(cursor).map_err(parse_error)?;
        Ok(joined.into())
    }
}

fn parse_error(err: impl StdError + Send + Sync + 'static) -> GatewayError {
    GatewayError::Parse(Box::new(err))
}

//! In-memory transport shared by gateway and CLI tests.

use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use super::{
    BoxFuture, Credentials, Endpoints, HttpRequest, HttpResponse, HttpTransport, Method,
    TwilioGateway,
};

const NOT_FOUND_BODY: &str =
    r#"{"code": 20404, "message": "The requested resource was not found", "status": 404}"#;

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    pattern: String,
    reply: Option<(u16, String)>,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) params: Vec<(String, String)>,
    pub(crate) account_sid: String,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    routes: Vec<Route>,
    requests: Vec<RecordedRequest>,
}

/// Serves canned responses by method and URL substring; the longest matching
/// pattern wins. GET patterns also see the query as `url?key=value&...`.
/// Unrouted requests get a Twilio-style 404.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(
        self,
        method: Method,
        pattern: &str,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.push(method, pattern, Some((status, body.into())));
        self
    }

    /// Requests matching `pattern` fail before reaching the server.
    pub(crate) fn fail(self, method: Method, pattern: &str) -> Self {
        self.push(method, pattern, None);
        self
    }

    fn push(&self, method: Method, pattern: &str, reply: Option<(u16, String)>) {
        self.state.lock().unwrap().routes.push(Route {
            method,
            pattern: pattern.to_owned(),
            reply,
        });
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }

    pub(crate) fn last_account_sid(&self) -> Option<String> {
        self.last_request().map(|request| request.account_sid)
    }

    /// Requests whose method matches and whose URL contains `pattern`.
    pub(crate) fn requests_to(&self, method: Method, pattern: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method && request.url.contains(pattern))
            .collect()
    }
}

impl HttpTransport for FakeTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let target = match_target(&request);
            let reply = {
                let mut state = self.state.lock().unwrap();
                let reply = state
                    .routes
                    .iter()
                    .filter(|route| {
                        route.method == request.method && target.contains(&route.pattern)
                    })
                    .max_by_key(|route| route.pattern.len())
                    .map(|route| route.reply.clone())
                    .unwrap_or_else(|| Some((404, NOT_FOUND_BODY.to_owned())));
                state.requests.push(RecordedRequest {
                    method: request.method,
                    url: request.url,
                    params: request.params,
                    account_sid: credentials.account_sid().as_str().to_owned(),
                });
                reply
            };

            match reply {
                Some((status, body)) => Ok(HttpResponse { status, body }),
                None => Err("connection refused".into()),
            }
        })
    }
}

fn match_target(request: &HttpRequest) -> String {
    if request.method != Method::Get || request.params.is_empty() {
        return request.url.clone();
    }
    let query: Vec<String> = request
        .params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    format!("{}?{}&", request.url, query.join("&"))
}

/// Gateway for account `AC123` wired to `transport` and `example.invalid` endpoints.
pub(crate) fn gateway(transport: &FakeTransport) -> TwilioGateway {
    TwilioGateway::with_transport(
        Credentials::new("AC123", "test_token").unwrap(),
        Endpoints {
            api: "https://example.invalid/2010-04-01".to_owned(),
            monitor: "https://monitor.example.invalid/v1".to_owned(),
            pricing: "https://pricing.example.invalid/v1".to_owned(),
        },
        Arc::new(transport.clone()),
    )
}

pub(crate) fn assert_param(params: &[(String, String)], key: &str, value: &str) {
    assert!(
        params.iter().any(|(k, v)| k == key && v == value),
        "missing param {key}={value}; got: {params:?}"
    );
}

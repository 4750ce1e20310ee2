//! HTTP transport for the Vultr v2 API.
//!
//! The transport owns the base endpoint and the bearer credential. It returns
//! raw responses; turning a response into a typed record (or an error) is the
//! job of [`decode_response`], the single place where status codes are
//! classified.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::VultrError;

/// Base endpoint of the public Vultr v2 API.
pub const DEFAULT_BASE_URL: &str = "https://api.vultr.com/v2";

/// Status set accepted by plain read operations.
pub const STATUS_OK: &[u16] = &[200];
/// Status set accepted by instance creation.
pub const STATUS_ACCEPTED: &[u16] = &[202];
/// Status set accepted by deletions.
pub const STATUS_NO_CONTENT: &[u16] = &[204];

const AUTHORIZATION: &str = "Authorization";

/// API key presented as a bearer token.
#[derive(Clone, Eq, PartialEq)]
pub struct Credential(String);

impl Credential {
    /// Wraps an API key, returning `None` when the key is blank.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let key = value.into().trim().to_owned();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    /// Returns the `Authorization` header value for this key.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// HTTP verb used by a [`Request`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
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

/// A request relative to the transport's base endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    /// HTTP verb.
    pub method: Method,
    /// Path appended to the base endpoint, for example `/regions`.
    pub path: String,
    /// Query string parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// Caller supplied headers, merged over the authorisation header.
    pub headers: Vec<(String, String)>,
    /// JSON body, sent only for `POST`.
    pub body: Option<Value>,
}

impl Request {
    const fn new(method: Method, path: String, body: Option<Value>) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            headers: Vec::new(),
            body,
        }
    }

    /// Builds a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path.into(), None)
    }

    /// Builds a `POST` request carrying a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path.into(), Some(body))
    }

    /// Builds a `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path.into(), None)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a caller supplied header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status code and body of an HTTP response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Future returned by [`Transport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RawResponse, VultrError>> + Send + 'a>>;

/// One network round trip per call; no retries.
pub trait Transport {
    /// Sends the request and returns the raw response.
    fn send(&self, request: Request) -> TransportFuture<'_>;
}

/// Builds the final header list: the bearer header first, then caller
/// headers, where a caller header replaces any earlier header of the same
/// name (compared case-insensitively).
#[must_use]
pub fn merge_headers(
    credential: Option<&Credential>,
    extra: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = credential
        .map(|key| (AUTHORIZATION.to_owned(), key.bearer()))
        .into_iter()
        .collect();
    for (name, value) in extra {
        merged.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        merged.push((name.clone(), value.clone()));
    }
    merged
}

/// Returns the decoded body when `response.status` is in `accepted`.
///
/// # Errors
///
/// Returns [`VultrError::Remote`] carrying the raw body when the status is not
/// accepted, and [`VultrError::Decode`] when the body does not match `T`.
pub fn decode_response<T: DeserializeOwned>(
    response: RawResponse,
    accepted: &[u16],
) -> Result<T, VultrError> {
    let body = expect_status(response, accepted)?;
    serde_json::from_str(&body).map_err(VultrError::decode)
}

/// Checks the status against `accepted` without decoding, returning the body.
///
/// # Errors
///
/// Returns [`VultrError::Remote`] when the status is not accepted.
pub fn expect_status(response: RawResponse, accepted: &[u16]) -> Result<String, VultrError> {
    if accepted.contains(&response.status) {
        Ok(response.body)
    } else {
        Err(VultrError::Remote {
            status: response.status,
            body: response.body,
        })
    }
}

/// [`Transport`] backed by `reqwest`.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    credential: Option<Credential>,
}

impl HttpTransport {
    /// Creates a transport for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError::Transport`] when the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        credential: Option<Credential>,
        timeout: Duration,
    ) -> Result<Self, VultrError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(VultrError::transport)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            credential,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> TransportFuture<'_> {
        Box::pin(async move {
            let url = self.url(&request.path);
            let mut builder = match request.method {
                Method::Get => self.http.get(&url),
                Method::Post => self.http.post(&url),
                Method::Delete => self.http.delete(&url),
            };
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            for (name, value) in merge_headers(self.credential.as_ref(), &request.headers) {
                builder = builder.header(name, value);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            debug!(method = %request.method, path = %request.path, "sending request");
            let response = builder.send().await.map_err(VultrError::transport)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(VultrError::transport)?;
            debug!(method = %request.method, path = %request.path, status, "received response");
            Ok(RawResponse { status, body })
        })
    }
}

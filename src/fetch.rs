use crate::Error;
use crate::SPOTIFY_API_BASE_URL;
use crate::SpotifyApiError;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// A single request handed to a [`Fetch`] implementation.
///
/// `params` are sent as the query string, `body` as a JSON request body.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub method: Method,
    pub params: Option<Value>,
    pub body: Option<Value>,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl FetchRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            params: None,
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Set the query parameters. `null` members are dropped.
    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(strip_nulls(params));
        self
    }

    /// Set the JSON body. `null` members of an object body are dropped.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(strip_nulls(body));
        self
    }
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => other,
    }
}

/// The HTTP collaborator every manager goes through.
///
/// Implementations return `Ok(None)` for a successful response without
/// content and `Err` for transport failures or error statuses. They must not
/// retry or reinterpret failures.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, path: &str, request: FetchRequest) -> Result<Option<Value>, Error>;
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: SpotifyApiError,
}

/// [`Fetch`] implementation on top of `reqwest`, authenticating every
/// request with a bearer token.
///
/// # Example
///
/// ```no_run
/// use spotrs::HttpFetcher;
///
/// let custom_client = reqwest::Client::builder()
///     .timeout(std::time::Duration::from_secs(30))
///     .build()
///     .unwrap();
///
/// let fetcher = HttpFetcher::new("access_token").with_client(custom_client);
/// ```
pub struct HttpFetcher {
    pub client: reqwest::Client,
    base_url: Url,
    token: ArcSwapOption<String>,
}

impl HttpFetcher {
    /// Create a fetcher for the public Spotify Web API.
    pub fn new(access_token: impl Into<String>) -> Self {
        let token: String = access_token.into();
        let token = if token.is_empty() {
            None
        } else {
            Some(Arc::new(token))
        };

        Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(SPOTIFY_API_BASE_URL).expect("static base URL is valid"),
            token: ArcSwapOption::from(token),
        }
    }

    /// Set a custom HTTP client using the builder pattern.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point the fetcher at another API root, e.g. a proxy or a mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        self.base_url = base_url;
        Ok(self)
    }

    /// Replace the bearer token, e.g. after the caller refreshed it.
    ///
    /// Requests already in flight keep the token they started with.
    pub fn set_token(&self, access_token: impl Into<String>) {
        self.token.store(Some(Arc::new(access_token.into())));
    }

    /// Get the current bearer token.
    pub fn get_token(&self) -> Option<Arc<String>> {
        self.token.load_full()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Each segment of `path` is percent-encoded, so ids cannot inject a
    // query or fragment.
    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));

        Ok(url)
    }
}

// Query strings carry scalars only; strings go in unquoted.
fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Some(map) = params.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, path: &str, request: FetchRequest) -> Result<Option<Value>, Error> {
        let url = self.endpoint(path)?;
        let token = self.get_token().ok_or(Error::NoAccessTokenAvailable)?;

        let mut req = self
            .client
            .request(request.method.clone(), url.clone())
            .bearer_auth(token.as_str());

        if let Some(params) = request.params.as_ref() {
            req = req.query(&query_pairs(params));
        }

        if let Some(body) = request.body.as_ref() {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            let body = resp.bytes().await?;

            // Empty but successful, distinct from a failure
            if status == StatusCode::NO_CONTENT || body.is_empty() {
                return Ok(None);
            }

            let value: Value = serde_json::from_slice(&body)?;

            if log::log_enabled!(log::Level::Trace) {
                if let Ok(pretty_value) = serde_json::to_string_pretty(&value) {
                    log::trace!("Requested URL: {}", url);
                    log::trace!("Response {}", pretty_value);
                }
            }

            if value.is_null() {
                return Ok(None);
            }

            Ok(Some(value))
        } else {
            let body = resp.bytes().await?;

            let err = match serde_json::from_slice::<ErrorResponse>(&body) {
                Ok(resp) => resp.error,
                Err(_) => SpotifyApiError {
                    status: status.as_u16(),
                    message: String::from_utf8_lossy(&body).into_owned(),
                },
            };

            log::debug!("Requested URL: {}", url);
            log::debug!("Spotify API Error: {}", err);

            Err(Error::SpotifyApiError(err))
        }
    }
}

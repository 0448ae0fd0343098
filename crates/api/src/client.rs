use std::env;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Method, RequestBuilder, Response, Url, header};
use serde::de::DeserializeOwned;
use tracing::debug;
use uploadvalidator_types::{ConfigInfo, ConfigInput};

use crate::credentials::{Credentials, resolve_credentials};
use crate::error::ApiError;

/// Environment variable naming the Gerrit server base URL.
pub const BASE_URL_ENV: &str = "GERRIT_URL";

/// Prefix Gerrit puts in front of every JSON response to defeat XSSI.
pub const XSSI_PREFIX: &str = ")]}'";

/// Hostnames allowed to use plain http.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Characters escaped in a project name used as one path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Read and write access to a project's plugin configuration.
///
/// Implemented by [`GerritClient`] for real servers and by in-memory fakes in
/// tests.
#[async_trait]
pub trait ProjectConfigApi: Send + Sync {
    /// `GET /projects/{repo}/config`
    async fn fetch_project_config(&self, repo: &str) -> Result<ConfigInfo, ApiError>;

    /// `PUT /projects/{repo}/config`
    async fn store_project_config(&self, repo: &str, input: &ConfigInput) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for Gerrit REST access.
///
/// With credentials every request is sent with HTTP basic auth under the
/// authenticated `/a/` prefix; without them requests are anonymous.
pub struct GerritClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
    credentials: Option<Credentials>,
}

impl GerritClient {
    /// Build a client for `base_url` with explicit credentials.
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self, ApiError> {
        let parsed = validate_base_url(base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            http,
            user_agent: format!("uvadmin/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
            credentials,
        })
    }

    /// Build a client from an optional URL override, `GERRIT_URL`, and the
    /// credentials discovered for the server host.
    pub fn from_env(base_url: Option<String>) -> Result<Self, ApiError> {
        let base_url = base_url
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::InvalidBaseUrl {
                url: String::new(),
                reason: format!("no server configured; pass --url or set {BASE_URL_ENV}"),
            })?;
        let parsed = validate_base_url(&base_url)?;
        let credentials = parsed.host_str().and_then(resolve_credentials);
        Self::new(&base_url, credentials)
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Build a request for a REST path such as `/projects/foo/config`.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let prefix = if self.is_authenticated() { "/a" } else { "" };
        let url = format!("{}{}{}", self.base_url, prefix, path);
        debug!(%method, %url, "building request");

        let builder = self
            .http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent);
        match &self.credentials {
            Some(credentials) => builder.basic_auth(&credentials.username, Some(&credentials.password)),
            None => builder,
        }
    }
}

#[async_trait]
impl ProjectConfigApi for GerritClient {
    async fn fetch_project_config(&self, repo: &str) -> Result<ConfigInfo, ApiError> {
        let response = self.request(Method::GET, &project_config_path(repo)).send().await?;
        decode_json(response).await
    }

    async fn store_project_config(&self, repo: &str, input: &ConfigInput) -> Result<(), ApiError> {
        let response = self
            .request(Method::PUT, &project_config_path(repo))
            .json(input)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }
}

/// `/projects/{repo}/config` with the repository encoded as one path segment.
pub fn project_config_path(repo: &str) -> String {
    format!("/projects/{}/config", utf8_percent_encode(repo, PATH_SEGMENT))
}

/// Remove Gerrit's `)]}'` guard line, if present.
pub fn strip_xssi_prefix(body: &str) -> &str {
    body.strip_prefix(XSSI_PREFIX).map(str::trim_start).unwrap_or(body)
}

async fn ensure_success(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            body: text.trim().to_string(),
        });
    }
    Ok(text)
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = ensure_success(response).await?;
    Ok(serde_json::from_str(strip_xssi_prefix(&text))?)
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<Url, ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let parsed = Url::parse(base).map_err(|error| invalid(error.to_string()))?;
    let host = parsed.host_str().ok_or_else(|| invalid("URL must include a host".into()))?;

    if LOCALHOST_DOMAINS.iter().any(|allowed| host.eq_ignore_ascii_case(allowed)) {
        return Ok(parsed);
    }
    if parsed.scheme() != "https" {
        return Err(invalid(format!(
            "must use https for non-localhost hosts; got '{}://'",
            parsed.scheme()
        )));
    }
    Ok(parsed)
}

use std::fmt;
use std::sync::Arc;

use reqwest::header::LINK;
use reqwest::{Client as HttpClient, RequestBuilder};
use serde_json::Value;
use tower::{Service, ServiceBuilder};
use tracing::debug;
use url::Url;

use crate::creds::{Creds, ProxyConfig};
use crate::error::ApiError;
use crate::services::link;

pub const TOKEN_HEADER: &str = "Canvas-Token";
pub const BASE_URL_HEADER: &str = "Canvas-Base-Url";

/// HTTP client for the LMS REST API, reached through a local proxy. Responsible for attaching the
/// credential, mapping failures onto [`ApiError`], and reporting where the next page lives, but
/// not for following pagination or decoding resources.
pub fn service(creds: Creds, config: ProxyConfig) -> Result<impl LmsService, ApiError> {
    let proxy_url = parse_url(config.proxy_url())?;
    let base_url = parse_url(creds.base_url())?;

    // Next-page links may point at either the LMS itself or at the proxy
    let prefixes: Arc<[String]> = [&proxy_url, &base_url]
        .iter()
        .map(|url| url.path().trim_end_matches('/').to_owned())
        .filter(|prefix| !prefix.is_empty())
        .collect();

    let http_client = HttpClient::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|source| ApiError::Network {
            path: String::new(),
            source,
        })?;
    let proxy = config.proxy_url().trim_end_matches('/').to_owned();

    Ok(ServiceBuilder::new()
        .map_request(move |request: LmsRequest| {
            let builder = request.request_builder(&http_client, &proxy, &creds);
            (request, builder)
        })
        .service_fn(move |(request, builder): (LmsRequest, RequestBuilder)| {
            send(request, builder, Arc::clone(&prefixes))
        }))
}

pub trait LmsService:
    Service<LmsRequest, Response = LmsResponse, Error = ApiError> + Clone
{
}
impl<T: Service<LmsRequest, Response = LmsResponse, Error = ApiError> + Clone> LmsService for T {}

#[tracing::instrument(level = "debug", skip(request, builder, prefixes), fields(%request))]
async fn send(
    request: LmsRequest,
    builder: RequestBuilder,
    prefixes: Arc<[String]>,
) -> Result<LmsResponse, ApiError> {
    let network = |source: reqwest::Error| ApiError::Network {
        path: request.path().to_owned(),
        source,
    };

    let response = builder.send().await.map_err(network)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::status(request.path(), status));
    }

    let next = response
        .headers()
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .and_then(link::next_url)
        .and_then(|url| LmsRequest::from_link(&url, &prefixes));
    debug!(?next, "next page");

    let bytes = response.bytes().await.map_err(network)?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            path: request.path().to_owned(),
            source,
        })?
    };

    Ok(LmsResponse::new(body, next))
}

fn parse_url(url: &str) -> Result<Url, ApiError> {
    Url::parse(url).map_err(|source| ApiError::InvalidUrl {
        url: url.to_owned(),
        source,
    })
}

/// A GET against an LMS API path such as `/courses/7/assignments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LmsRequest {
    path: String,
    query: Vec<(String, String)>,
}

impl LmsRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    pub fn with_query_all<V: ToString>(
        mut self,
        key: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.query.extend(
            values
                .into_iter()
                .map(|value| (key.to_owned(), value.to_string())),
        );
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// First value for `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn request_builder(
        &self,
        http_client: &HttpClient,
        proxy_url: &str,
        creds: &Creds,
    ) -> RequestBuilder {
        http_client
            .get(format!("{proxy_url}{}", self.path))
            .query(&self.query)
            .header(TOKEN_HEADER, creds.token())
            .header(BASE_URL_HEADER, creds.base_url())
    }

    /// Rebuilds a request from an absolute next-page URL, stripping the first matching API prefix.
    fn from_link(url: &Url, prefixes: &[String]) -> Option<Self> {
        let full_path = url.path();
        let path = prefixes
            .iter()
            .find_map(|prefix| full_path.strip_prefix(prefix.as_str()))
            .filter(|path| path.starts_with('/'))
            .unwrap_or(full_path);
        if path.is_empty() {
            return None;
        }

        let query = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Some(Self {
            path: path.to_owned(),
            query,
        })
    }
}

impl fmt::Display for LmsRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.path.fmt(f)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

/// One page of JSON, plus the request for the page after it.
#[derive(Debug, Clone)]
pub struct LmsResponse {
    body: Value,
    next: Option<LmsRequest>,
}

impl LmsResponse {
    pub fn new(body: Value, next: Option<LmsRequest>) -> Self {
        Self { body, next }
    }

    pub fn last(body: Value) -> Self {
        Self::new(body, None)
    }

    pub fn into_parts(self) -> (Value, Option<LmsRequest>) {
        (self.body, self.next)
    }
}

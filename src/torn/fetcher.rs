//! Authenticated GETs against the Torn v2 API and continuation-link paging.
//!
//! [Fetcher::pages] turns a first request into a stream of record batches,
//! following `_metadata.links.next` until a page comes back empty or carries
//! no further link. There is no retry or backoff; failures surface as
//! [ApiError] to the caller.

use std::future::Future;

use futures_util::stream::{self, Stream};
use futures_util::{pin_mut, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Request/response primitive underneath the fetcher.
pub trait Transport: Send + Sync {
    /// GET `url` with the given credential and return the decoded JSON body.
    fn get_json(&self, url: &str, api_key: &str) -> impl Future<Output = ApiResult<Value>> + Send;
}

/// [Transport] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, url: &str, api_key: &str) -> ApiResult<Value> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::AUTHORIZATION, format!("ApiKey {api_key}"))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

/// Path plus query parameters, relative to the API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl PageRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn param_if(self, condition: bool, key: &'static str, value: impl ToString) -> Self {
        if condition {
            self.param(key, value)
        } else {
            self
        }
    }

    pub fn url(&self, base: &str) -> String {
        let mut url = format!("{base}{}", self.path.trim_start_matches('/'));
        for (index, (key, value)) in self.query.iter().enumerate() {
            url.push(if index == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }
}

/// A paginated response body: its records and the optional continuation link.
pub trait Page: DeserializeOwned {
    type Record;

    fn into_parts(self) -> (Vec<Self::Record>, Option<String>);
}

#[derive(Debug, Clone)]
pub struct Fetcher<T> {
    transport: T,
    api_key: String,
    base_url: String,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Absolute links are used verbatim; anything else is joined to the base.
    pub fn resolve(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}{}", self.base_url, link.trim_start_matches('/'))
        }
    }

    pub async fn get<R: DeserializeOwned>(&self, request: &PageRequest) -> ApiResult<R> {
        self.get_url(&request.url(&self.base_url)).await
    }

    async fn get_url<R: DeserializeOwned>(&self, url: &str) -> ApiResult<R> {
        debug!(url, "torn request");
        let body = self.transport.get_json(url, &self.api_key).await?;
        if let Some(err) = remote_error(&body) {
            return Err(err);
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Streams record batches starting at `request`.
    ///
    /// Both stop conditions are checked every iteration: an empty batch ends
    /// the stream without being yielded, and a missing or blank `next` link
    /// ends it after the current batch.
    pub fn pages<'a, P>(
        &'a self,
        request: &PageRequest,
    ) -> impl Stream<Item = ApiResult<Vec<P::Record>>> + Send + 'a
    where
        P: Page + Send + 'a,
        P::Record: Send + 'a,
    {
        let first = request.url(&self.base_url);
        stream::try_unfold(Some(first), move |next| self.next_page::<P>(next))
    }

    async fn next_page<P: Page>(
        &self,
        next: Option<String>,
    ) -> ApiResult<Option<(Vec<P::Record>, Option<String>)>> {
        let Some(url) = next else {
            return Ok(None);
        };
        let page: P = self.get_url(&url).await?;
        let (records, link) = page.into_parts();
        if records.is_empty() {
            debug!(url = %url, "empty page, stopping");
            return Ok(None);
        }
        debug!(url = %url, records = records.len(), "page fetched");
        let next = link
            .filter(|link| !link.trim().is_empty())
            .map(|link| self.resolve(&link));
        Ok(Some((records, next)))
    }
}

/// Drains a page stream, stopping once `limit` records are collected.
pub async fn collect_records<S, R>(pages: S, limit: Option<usize>) -> ApiResult<Vec<R>>
where
    S: Stream<Item = ApiResult<Vec<R>>>,
{
    pin_mut!(pages);
    let mut records = Vec::new();
    while let Some(batch) = pages.try_next().await? {
        records.extend(batch);
        if limit.is_some_and(|limit| records.len() >= limit) {
            break;
        }
    }
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    Ok(records)
}

fn remote_error(body: &Value) -> Option<ApiError> {
    let error = body.get("error")?.as_object()?;
    let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
    let message = error
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    Some(ApiError::Remote { code, message })
}

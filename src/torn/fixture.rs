//! In-memory [Transport] serving canned JSON bodies, for offline runs and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::torn::fetcher::Transport;

#[derive(Debug, Default)]
struct FixtureState {
    responses: HashMap<String, Value>,
    requests: Vec<String>,
}

/// Responses are keyed by the tail of the request URL, e.g. `faction/basic` or
/// `faction/chains?limit=100&sort=ASC&from=1&to=2`. A key with a query must
/// match the URL's end exactly; a key without one matches the URL's path
/// regardless of query. The longest matching key wins. Unknown URLs answer
/// `{}` so callers see missing data rather than a failure.
#[derive(Debug, Clone, Default)]
pub struct FixtureTransport {
    state: Arc<Mutex<FixtureState>>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, key: &str, body: Value) -> Self {
        self.insert(key, body);
        self
    }

    pub fn insert(&self, key: &str, body: Value) {
        self.lock().responses.insert(key.to_string(), body);
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FixtureState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn respond(&self, url: &str) -> Value {
        let mut state = self.lock();
        state.requests.push(url.to_string());
        let path = url.split('?').next().unwrap_or(url);
        state
            .responses
            .iter()
            .filter(|(key, _)| {
                if key.contains('?') {
                    url.ends_with(key.as_str())
                } else {
                    path.ends_with(key.as_str())
                }
            })
            .max_by_key(|(key, _)| key.len())
            .map(|(_, body)| body.clone())
            .unwrap_or_else(|| json!({}))
    }
}

impl Transport for FixtureTransport {
    async fn get_json(&self, url: &str, _api_key: &str) -> ApiResult<Value> {
        Ok(self.respond(url))
    }
}

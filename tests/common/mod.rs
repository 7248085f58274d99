//! Shared test double for the fetch collaborator.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use spotrs::{Client, Error, Fetch, FetchRequest, SpotifyApiError};
use std::collections::HashMap;
use std::sync::Arc;

enum Canned {
    Json(Value),
    Failure(SpotifyApiError),
}

/// A [`Fetch`] implementation answering from canned responses keyed by path.
///
/// Paths without a canned response answer `Ok(None)`, like an empty but
/// successful response. Every call is recorded.
#[derive(Default)]
pub struct MockFetch {
    responses: Mutex<HashMap<String, Canned>>,
    calls: Mutex<Vec<(String, FetchRequest)>>,
}

impl MockFetch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, path: &str, value: Value) {
        self.responses
            .lock()
            .insert(path.to_string(), Canned::Json(value));
    }

    pub fn fail(&self, path: &str, status: u16, message: &str) {
        self.responses.lock().insert(
            path.to_string(),
            Canned::Failure(SpotifyApiError {
                status,
                message: message.to_string(),
            }),
        );
    }

    pub fn calls(&self) -> Vec<(String, FetchRequest)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|(p, _)| p == path).count()
    }

    /// The request of the last call to `path`.
    pub fn last_request(&self, path: &str) -> Option<FetchRequest> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, request)| request.clone())
    }
}

#[async_trait]
impl Fetch for MockFetch {
    async fn fetch(&self, path: &str, request: FetchRequest) -> Result<Option<Value>, Error> {
        self.calls.lock().push((path.to_string(), request));

        match self.responses.lock().get(path) {
            Some(Canned::Json(value)) => Ok(Some(value.clone())),
            Some(Canned::Failure(err)) => Err(Error::SpotifyApiError(err.clone())),
            None => Ok(None),
        }
    }
}

/// A client over a fresh [`MockFetch`], with every cache enabled.
pub fn mock_client() -> (Client, Arc<MockFetch>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let fetch = MockFetch::new();
    let client = Client::from_fetcher(fetch.clone())
        .with_cache_settings(spotrs::CacheSettings::all());

    (client, fetch)
}

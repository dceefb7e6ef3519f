//! Canned HTTP transport for offline adapter and service tests

#![allow(dead_code)]

use super::fixtures::load_response_fixture;
use async_trait::async_trait;
use msds_core::{HttpError, HttpResponse, Transport};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers each GET with the first route whose pattern occurs in the URL.
/// Unrouted URLs get an empty 404.
#[derive(Default)]
pub struct CannedTransport {
    routes: Vec<(String, Result<HttpResponse, HttpError>)>,
    requests: Mutex<Vec<String>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, pattern: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.push((
            pattern.to_string(),
            Ok(HttpResponse {
                status,
                body: body.into(),
            }),
        ));
        self
    }

    /// Route to a file under `test_fixtures/responses/` with status 200
    pub fn fixture(self, pattern: &str, name: &str) -> Self {
        self.route(pattern, 200, load_response_fixture(name))
    }

    pub fn fail(mut self, pattern: &str, error: HttpError) -> Self {
        self.routes.push((pattern.to_string(), Err(error)));
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every requested URL with its query parameters, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, pattern: &str) -> usize {
        self.requests()
            .iter()
            .filter(|url| url.contains(pattern))
            .count()
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, &str)],
        _timeout: Duration,
    ) -> Result<HttpResponse, HttpError> {
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        let full = if query.is_empty() {
            url.to_string()
        } else {
            format!("{}?{}", url, query.join("&"))
        };
        self.requests.lock().unwrap().push(full);

        self.routes
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or(Ok(HttpResponse {
                status: 404,
                body: String::new(),
            }))
    }
}

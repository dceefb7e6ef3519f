//! HTTP transport abstraction for source adapters

pub mod native;

pub use native::*;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Request failed: {message}")]
    RequestFailed { message: String },
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
    #[error("Timeout")]
    Timeout,
    #[error("Unexpected status {status}")]
    Status { status: u16, body: String },
    #[error("Could not build HTTP client: {message}")]
    ClientBuild { message: String },
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A blocking-free GET transport shared by all adapters.
///
/// Implementations must not retry. Non-2xx responses are returned as
/// `Ok(HttpResponse)` so adapters can inspect backend error bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<HttpResponse, HttpError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<HttpResponse, HttpError> {
        (**self).get_with_params(url, params, timeout).await
    }
}

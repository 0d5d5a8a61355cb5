// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Seams between the resolving fetcher and the underlying HTTP transport.

use async_trait::async_trait;
use http::{HeaderMap, Method};
use thiserror::Error;

use crate::fetch::FetchResponse;

/// A configurable request opened against the underlying transport.
///
/// Headers and body may be adjusted until `execute` is called; the retry
/// layer re-applies configurators and context headers before every attempt.
#[async_trait]
pub trait TransportRequest: Send {
    fn uri(&self) -> &str;

    fn method(&self) -> &Method;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn body_mut(&mut self) -> &mut Vec<u8>;

    async fn execute(&mut self) -> Result<FetchResponse, TransportError>;
}

/// Opens transport requests for absolute URIs.
pub trait TransportFactory: Send + Sync {
    fn create(&self, uri: &str, method: Method) -> Result<Box<dyn TransportRequest>, TransportError>;
}

/// Callback applied to a prepared request before each dispatch, in
/// registration order.
pub trait RequestConfigurator: Send + Sync {
    fn configure(&self, request: &mut dyn TransportRequest);
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport I/O error: {0}")]
    Io(String),
}

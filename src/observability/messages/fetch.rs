// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for resource fetching and retry events.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::messages::StructuredLog;

/// An inline data URI was decoded into a synthetic response.
///
/// # Log Level
/// `debug!` - Diagnostic event
pub struct ResolvedDataUri<'a> {
    pub content_type: &'a str,
}

impl Display for ResolvedDataUri<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Resolved request from inline data URI: {}", self.content_type)
    }
}

impl StructuredLog for ResolvedDataUri<'_> {
    fn log(&self) {
        tracing::debug!(content_type = self.content_type, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "resolved_data_uri",
            span_name = name,
            content_type = self.content_type,
        )
    }
}

/// A logical URI was served through the configuration's file loaders.
///
/// # Log Level
/// `debug!` - Diagnostic event
pub struct ResolvedConfigFile<'a> {
    pub uri: &'a str,
}

impl Display for ResolvedConfigFile<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Resolved request {} using the configuration file loaders", self.uri)
    }
}

impl StructuredLog for ResolvedConfigFile<'_> {
    fn log(&self) {
        tracing::debug!(uri = self.uri, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("resolved_config_file", span_name = name, uri = self.uri)
    }
}

/// A fetch attempt failed and will be retried.
///
/// # Log Level
/// `debug!` - Retries below the threshold are silent at higher levels
pub struct FetchRetrying<'a> {
    pub uri: &'a str,
    pub attempt: u32,
    pub max_attempts: u32,
    /// Status of the failed attempt; `None` for transport errors.
    pub status: Option<u16>,
}

impl Display for FetchRetrying<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "Fetching failed URI resource {}, error code {} (attempt {}/{}), retrying",
                self.uri, status, self.attempt, self.max_attempts
            ),
            None => write!(
                f,
                "Fetching failed URI resource {} (attempt {}/{}), retrying",
                self.uri, self.attempt, self.max_attempts
            ),
        }
    }
}

impl StructuredLog for FetchRetrying<'_> {
    fn log(&self) {
        tracing::debug!(
            uri = self.uri,
            attempt = self.attempt,
            max_attempts = self.max_attempts,
            status = self.status,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "fetch_retrying",
            span_name = name,
            uri = self.uri,
            attempt = self.attempt,
            max_attempts = self.max_attempts,
        )
    }
}

/// A fetch completed with a terminal response.
///
/// # Log Level
/// `debug!` - Diagnostic event
pub struct FetchCompleted<'a> {
    pub uri: &'a str,
    pub status: u16,
}

impl Display for FetchCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Fetching success URI resource {}, status code {}", self.uri, self.status)
    }
}

impl StructuredLog for FetchCompleted<'_> {
    fn log(&self) {
        tracing::debug!(uri = self.uri, status = self.status, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "fetch_completed",
            span_name = name,
            uri = self.uri,
            status = self.status,
        )
    }
}

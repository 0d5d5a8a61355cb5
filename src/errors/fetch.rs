// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use http::StatusCode;
use thiserror::Error;

use crate::traits::configuration::ConfigResolveError;
use crate::traits::transport::TransportError;

/// Errors surfaced by the config-resolving fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Fetching URI resource {uri} failed with status {status} after {attempts} attempts")]
    RetryExhausted5xx {
        uri: String,
        status: StatusCode,
        attempts: u32,
    },

    #[error("Fetching URI resource {uri} failed after {attempts} attempts: {cause}")]
    RetryExhaustedTransport {
        uri: String,
        attempts: u32,
        #[source]
        cause: TransportError,
    },

    #[error("Interrupted while waiting to retry {uri}")]
    InterruptedDuringRetry { uri: String },

    #[error("Malformed data URI: {reason}")]
    DataUriMalformed { reason: String },

    #[error("Failed to load {uri} through the configuration: {cause}")]
    ConfigFileLoadFailed {
        uri: String,
        #[source]
        cause: ConfigResolveError,
    },

    #[error("Failed to prepare the transport request for {uri}: {cause}")]
    PrepareFailed {
        uri: String,
        #[source]
        cause: TransportError,
    },

    #[error("The request body can only be requested once")]
    BodyAlreadyRequested,
}

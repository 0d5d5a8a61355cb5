// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for structured logging and distributed tracing.
//!
//! Messages are organized by subsystem:
//! * `graph` - dependency graph construction events
//! * `fetch` - resource fetching and retry events
//!
//! Each type implements `Display` for human-readable output and
//! [`StructuredLog`] for machine-readable fields.

pub mod fetch;
pub mod graph;

use tracing::Span;

/// Trait for messages that support structured logging and tracing.
///
/// `log()` emits the message at its semantic level with machine-readable
/// fields; `span()` creates a `tracing::Span` carrying the same fields as
/// attributes.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for dependency graph construction events.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::messages::StructuredLog;

/// A dependency graph was successfully constructed.
///
/// # Log Level
/// `debug!` - Diagnostic event
pub struct GraphBuilt {
    pub processor_count: usize,
    pub root_count: usize,
}

impl Display for GraphBuilt {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built processor dependency graph: {} processors, {} roots",
            self.processor_count, self.root_count
        )
    }
}

impl StructuredLog for GraphBuilt {
    fn log(&self) {
        tracing::debug!(
            processor_count = self.processor_count,
            root_count = self.root_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "graph_built",
            span_name = name,
            processor_count = self.processor_count,
            root_count = self.root_count,
        )
    }
}

/// A renameable output collided with an existing name and was rewritten.
///
/// # Log Level
/// `debug!` - Diagnostic event
pub struct OutputRenamed<'a> {
    pub processor: &'a str,
    pub from: &'a str,
    pub to: &'a str,
}

impl Display for OutputRenamed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Renamed colliding output '{}' of processor '{}' to '{}'",
            self.from, self.processor, self.to
        )
    }
}

impl StructuredLog for OutputRenamed<'_> {
    fn log(&self) {
        tracing::debug!(
            processor = self.processor,
            from = self.from,
            to = self.to,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "output_renamed",
            span_name = name,
            processor = self.processor,
            from = self.from,
            to = self.to,
        )
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Centralized message types for the diagnostic and operational logging of
//! the planner and fetcher. Message types follow a struct-based pattern with
//! a `Display` implementation plus the [`messages::StructuredLog`] trait so
//! call sites never format log strings inline.

pub mod messages;

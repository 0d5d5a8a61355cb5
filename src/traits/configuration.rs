// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The configuration lookup chain consumed by the file resolver.

use std::path::PathBuf;

use thiserror::Error;

/// Access to the active print configuration's resource loaders.
///
/// `load` resolves a logical URI (`file:`, `classpath:`, `servlet:` or a
/// bare relative path) through the configuration's lookup chain and returns
/// the raw bytes. `locate` reports the concrete file behind the URI when one
/// exists on disk.
pub trait Configuration: Send + Sync {
    fn load(&self, uri: &str) -> Result<Vec<u8>, ConfigResolveError>;

    fn locate(&self, uri: &str) -> Option<PathBuf>;
}

#[derive(Debug, Error)]
pub enum ConfigResolveError {
    #[error("resource '{0}' not found in the configuration")]
    NotFound(String),

    #[error("resource '{0}' is outside the configuration directory")]
    OutsideConfigDir(String),

    #[error("I/O error reading '{uri}': {source}")]
    Io {
        uri: String,
        #[source]
        source: std::io::Error,
    },
}

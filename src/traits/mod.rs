// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod configuration;
pub mod processor;
pub mod transport;

pub use configuration::{ConfigResolveError, Configuration};
pub use processor::{
    AttributeMismatch, NameMapping, ParamField, ParamShape, Processor, ProvideAttributes,
    RequireAttributes,
};
pub use transport::{RequestConfigurator, TransportError, TransportFactory, TransportRequest};

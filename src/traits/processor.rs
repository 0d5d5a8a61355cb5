// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The processor contract.
//!
//! A processor is a transformation stage with typed named inputs and
//! outputs. It advertises its input shape through a fresh parameter value
//! and its output shape through a type descriptor; the graph builder turns
//! both into external value names using the processor's prefixes and
//! name mappings.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::errors::ProcessorError;
use crate::values::{Attribute, ValueKind, Values};

/// One field of a processor's input or output shape.
#[derive(Debug, Clone)]
pub struct ParamField {
    pub name: &'static str,
    pub kind: ValueKind,
    /// The input may be left unsatisfied; the processor supplies a default.
    pub has_default: bool,
    /// The input is republished unchanged as an output of the processor.
    pub input_output: bool,
    /// Internal debug output; its external name may be rewritten on
    /// collision.
    pub internal: bool,
}

impl ParamField {
    pub fn new<T: std::any::Any>(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::of::<T>(),
            has_default: false,
            input_output: false,
            internal: false,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn passed_through(mut self) -> Self {
        self.input_output = true;
        self
    }

    pub fn internal_value(mut self) -> Self {
        self.internal = true;
        self
    }
}

/// The declared shape of a processor parameter value.
#[derive(Debug, Clone)]
pub struct ParamShape {
    pub type_name: &'static str,
    pub fields: Vec<ParamField>,
}

impl ParamShape {
    pub fn new(type_name: &'static str, fields: Vec<ParamField>) -> Self {
        Self { type_name, fields }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }
}

/// Bijective rename table between external value names and internal field
/// names.
///
/// Orientation is fixed by the caller: the input mapping is keyed by
/// external name with field names as values, the output mapping is keyed by
/// field name with external names as values. `key_for` does the reverse
/// lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameMapping {
    entries: BTreeMap<String, String>,
}

impl NameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn key_for(&self, value: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| v.as_str() == value)
            .map(|(k, _)| k.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Capability of processors that receive declarative attributes by name
/// before the graph is built.
pub trait RequireAttributes {
    fn set_attribute(&mut self, name: &str, attribute: &Attribute) -> Result<(), AttributeMismatch>;
}

/// Capability of processors that extend the attribute catalogue for later
/// processors.
pub trait ProvideAttributes {
    fn attributes(&self) -> std::collections::HashMap<String, Attribute>;
}

/// Raised by a [`RequireAttributes`] sink when the pushed attribute has the
/// wrong type. The attribute filler wraps this with the external and
/// internal names involved.
#[derive(Debug, Clone, Copy)]
pub struct AttributeMismatch {
    pub expected: ValueKind,
    pub actual: ValueKind,
}

#[async_trait]
pub trait Processor: Send + Sync {
    fn name(&self) -> &str;

    /// Shape advertised by a fresh input parameter value, or `None` when the
    /// processor declares no inputs.
    fn input_shape(&self) -> Option<ParamShape>;

    /// Shape of the processor's output value.
    fn output_shape(&self) -> ParamShape;

    fn input_prefix(&self) -> Option<&str> {
        None
    }

    fn output_prefix(&self) -> Option<&str> {
        None
    }

    /// External name -> internal field name.
    fn input_mapping(&self) -> NameMapping {
        NameMapping::default()
    }

    /// Internal field name -> external name.
    fn output_mapping(&self) -> NameMapping {
        NameMapping::default()
    }

    /// For processors with a wildcard `values` input: the external names the
    /// processor actually depends on. `None` means depend on everything
    /// produced so far.
    fn custom_dependencies(&self) -> Option<Vec<String>> {
        None
    }

    fn as_require_attributes(&mut self) -> Option<&mut dyn RequireAttributes> {
        None
    }

    fn as_provide_attributes(&self) -> Option<&dyn ProvideAttributes> {
        None
    }

    async fn process(&self, values: &Values) -> Result<(), ProcessorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_mapping_lookups() {
        let mapping = NameMapping::new().with("mapDef", "map").with("layers", "layerList");

        assert_eq!(mapping.get("mapDef"), Some("map"));
        assert_eq!(mapping.key_for("map"), Some("mapDef"));
        assert_eq!(mapping.key_for("missing"), None);
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["layers", "mapDef"]);
    }

    #[test]
    fn param_field_markers() {
        let field = ParamField::new::<String>("report").with_default().passed_through();
        assert!(field.has_default);
        assert!(field.input_output);
        assert!(!field.internal);
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Descriptor extraction: turning a processor's declared parameter shapes
//! into externally named, typed input/output descriptors.
//!
//! Extraction is purely structural. External names are derived from field
//! names through the processor's name mappings; a prefix applies only to
//! fields without an explicit mapping. Before enumeration every mapping
//! entry is verified against the shape, and all offending entries are
//! reported together.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::errors::GraphBuildError;
use crate::traits::processor::{ParamShape, Processor};
use crate::values::ValueKind;

/// A typed named input of a processor.
///
/// Equality and hashing consider the external name only; a processor cannot
/// declare two inputs with the same external name.
#[derive(Debug, Clone)]
pub struct InputValue {
    name: String,
    internal: String,
    kind: ValueKind,
    has_default: bool,
    input_output: bool,
}

impl InputValue {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn internal(&self) -> &str {
        &self.internal
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    pub fn input_output(&self) -> bool {
        self.input_output
    }
}

impl PartialEq for InputValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for InputValue {}

impl Hash for InputValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A typed named output of a processor.
#[derive(Debug, Clone)]
pub struct OutputValue {
    name: String,
    internal: String,
    kind: ValueKind,
    renameable: bool,
}

impl OutputValue {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn internal(&self) -> &str {
        &self.internal
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Renameable outputs may have their external name uniquely suffixed to
    /// resolve a collision.
    pub fn renameable(&self) -> bool {
        self.renameable
    }
}

/// Join a prefix onto a field-derived name, camelCase style.
pub(crate) fn apply_prefix(prefix: Option<&str>, field: &str) -> String {
    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        None => field.to_string(),
        Some(prefix) => {
            let mut chars = field.chars();
            match chars.next() {
                None => prefix.to_string(),
                Some(first) => {
                    format!("{}{}{}", prefix, first.to_uppercase(), chars.as_str())
                }
            }
        }
    }
}

fn verify_mappings<'a>(
    mappings: impl Iterator<Item = &'a str>,
    shape: &ParamShape,
) -> Result<(), (Vec<String>, Vec<String>)> {
    let fields: HashSet<&str> = shape.fields.iter().map(|field| field.name).collect();
    let offenders: Vec<String> = mappings
        .filter(|mapping| !fields.contains(mapping))
        .map(str::to_string)
        .collect();
    if offenders.is_empty() {
        Ok(())
    } else {
        let mut options: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        options.sort();
        Err((offenders, options))
    }
}

/// Enumerate a processor's input descriptors.
pub(crate) fn inputs_of(processor: &dyn Processor) -> Result<Vec<InputValue>, GraphBuildError> {
    let shape = match processor.input_shape() {
        Some(shape) => shape,
        None => return Ok(Vec::new()),
    };
    let mapping = processor.input_mapping();

    verify_mappings(mapping.values(), &shape).map_err(|(mappings, options)| {
        GraphBuildError::UnmappedInputAlias {
            processor: processor.name().to_string(),
            mappings,
            options,
        }
    })?;

    let inputs = shape
        .fields
        .iter()
        .map(|field| {
            let name = match mapping.key_for(field.name) {
                Some(external) => external.to_string(),
                None => apply_prefix(processor.input_prefix(), field.name),
            };
            InputValue {
                name,
                internal: field.name.to_string(),
                kind: field.kind,
                has_default: field.has_default,
                input_output: field.input_output,
            }
        })
        .collect();
    Ok(inputs)
}

/// Enumerate a processor's output descriptors.
pub(crate) fn outputs_of(processor: &dyn Processor) -> Result<Vec<OutputValue>, GraphBuildError> {
    let shape = processor.output_shape();
    let mapping = processor.output_mapping();

    verify_mappings(mapping.keys(), &shape).map_err(|(mappings, options)| {
        GraphBuildError::UnmappedOutputAlias {
            processor: processor.name().to_string(),
            mappings,
            options,
        }
    })?;

    let outputs = shape
        .fields
        .iter()
        .map(|field| {
            let name = match mapping.get(field.name) {
                Some(external) => external.to_string(),
                None => apply_prefix(processor.output_prefix(), field.name),
            };
            OutputValue {
                name,
                internal: field.name.to_string(),
                kind: field.kind,
                renameable: field.internal,
            }
        })
        .collect();
    Ok(outputs)
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::values::ValueKind;

/// Errors detected while constructing a processor dependency graph.
///
/// All of these are reported before any graph is returned; a failed build
/// never leaks a partial graph.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphBuildError {
    /// A non-default input has neither an attribute nor an upstream producer
    MissingInput {
        processor: String,
        input: String,
    },
    /// An input's declared type does not accept what an upstream processor
    /// produces under that name
    TypeConflictWithProducer {
        producer: String,
        consumer: String,
        name: String,
        produced: ValueKind,
        expected: ValueKind,
    },
    /// An input's declared type does not accept the attribute registered
    /// under that name
    TypeConflictWithAttribute {
        consumer: String,
        name: String,
        attribute: ValueKind,
        expected: ValueKind,
    },
    /// Two processors publish the same non-renameable output name
    DuplicateOutput {
        name: String,
        first: String,
        second: String,
    },
    /// A processor output shadows a declared attribute
    OutputClashesWithAttribute {
        name: String,
        processor: String,
    },
    /// Input mapping entries that name no field of the input shape
    UnmappedInputAlias {
        processor: String,
        mappings: Vec<String>,
        options: Vec<String>,
    },
    /// Output mapping entries that name no field of the output shape
    UnmappedOutputAlias {
        processor: String,
        mappings: Vec<String>,
        options: Vec<String>,
    },
    /// Processors not reachable from the root set after construction
    UnreachableProcessors {
        missing: Vec<String>,
    },
}

fn list(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    for item in items {
        write!(f, "\n  * {}", item)?;
    }
    Ok(())
}

impl fmt::Display for GraphBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphBuildError::MissingInput { processor, input } => {
                write!(
                    f,
                    "The processor '{}' has no value for the input '{}'",
                    processor, input
                )
            }
            GraphBuildError::TypeConflictWithProducer {
                producer,
                consumer,
                name,
                produced,
                expected,
            } => {
                write!(
                    f,
                    "Type conflict: processor '{}' provides an output named '{}' of type '{}', \
                     while processor '{}' expects an input of that name with type '{}'. \
                     Rename one of the values in the processor mappings.",
                    producer, name, produced, consumer, expected
                )
            }
            GraphBuildError::TypeConflictWithAttribute {
                consumer,
                name,
                attribute,
                expected,
            } => {
                write!(
                    f,
                    "Type conflict: the attribute '{}' has type '{}', while processor '{}' \
                     expects an input of that name with type '{}'",
                    name, attribute, consumer, expected
                )
            }
            GraphBuildError::DuplicateOutput { name, first, second } => {
                write!(
                    f,
                    "Multiple processors provide the same output mapping: '{}' and '{}' both \
                     provide '{}'. Rename one of the outputs and the corresponding input so \
                     there is no ambiguity over which value a processor consumes.",
                    first, second, name
                )
            }
            GraphBuildError::OutputClashesWithAttribute { name, processor } => {
                write!(
                    f,
                    "Processor '{}' provides the output '{}' which is already declared as an \
                     attribute. Rename the output and the corresponding input so there is no \
                     ambiguity over which value a processor consumes.",
                    processor, name
                )
            }
            GraphBuildError::UnmappedInputAlias { processor, mappings, options } => {
                write!(
                    f,
                    "One or more input mapping values of '{}' do not match an input parameter. \
                     The bad mappings are:",
                    processor
                )?;
                list(f, mappings)?;
                write!(f, "\nThe possible parameter names are:")?;
                list(f, options)
            }
            GraphBuildError::UnmappedOutputAlias { processor, mappings, options } => {
                write!(
                    f,
                    "One or more output mapping keys of '{}' do not match an output parameter. \
                     The bad mappings are:",
                    processor
                )?;
                list(f, mappings)?;
                write!(f, "\nThe possible parameter names are:")?;
                list(f, options)
            }
            GraphBuildError::UnreachableProcessors { missing } => {
                write!(f, "The processor graph does not contain all the processors, missing:")?;
                list(f, missing)
            }
        }
    }
}

impl std::error::Error for GraphBuildError {}

/// Errors raised while binding declarative attributes to processors.
#[derive(Debug, Clone)]
pub enum AttributeError {
    /// A pushed attribute did not have the type the processor requires
    TypeMismatch {
        processor: String,
        external: String,
        internal: String,
        expected: ValueKind,
        actual: ValueKind,
    },
    /// Descriptor extraction failed before any attribute could be bound
    InvalidMapping(GraphBuildError),
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeError::TypeMismatch {
                processor,
                external,
                internal,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "The processor '{}' requires the attribute '{}' ({}) but it has the wrong \
                     type: expected '{}', got '{}'",
                    processor, external, internal, expected, actual
                )
            }
            AttributeError::InvalidMapping(inner) => inner.fmt(f),
        }
    }
}

impl std::error::Error for AttributeError {}

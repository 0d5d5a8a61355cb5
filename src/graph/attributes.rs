//! Declarative attribute propagation.
//!
//! Before a graph is built, processors tagged as attribute consumers receive
//! the subset of the attribute catalogue they name, and processors tagged as
//! attribute providers may extend that catalogue for every processor that
//! runs after them.

use std::collections::HashMap;

use crate::errors::AttributeError;
use crate::graph::descriptor::{inputs_of, outputs_of};
use crate::traits::processor::Processor;
use crate::values::{Attribute, ValueKind, Values};

/// Walk the processor list in order, pushing required attributes into each
/// consumer and folding provided attributes into the live catalogue.
///
/// The initial map is never mutated; providers only affect processors
/// positioned after them.
pub fn fill_processor_attributes(
    processors: &mut [Box<dyn Processor>],
    initial_attributes: &HashMap<String, Attribute>,
) -> Result<(), AttributeError> {
    let values_kind = ValueKind::of::<Values>();
    let mut current: HashMap<String, Attribute> = initial_attributes.clone();

    for processor in processors.iter_mut() {
        let name = processor.name().to_string();
        let inputs = inputs_of(processor.as_ref()).map_err(AttributeError::InvalidMapping)?;
        let outputs = outputs_of(processor.as_ref()).map_err(AttributeError::InvalidMapping)?;

        if let Some(sink) = processor.as_require_attributes() {
            for input in &inputs {
                if input.kind() == values_kind {
                    // Wildcard consumer: push the whole live catalogue.
                    for (attribute_name, attribute) in &current {
                        sink.set_attribute(attribute_name, attribute).map_err(|mismatch| {
                            AttributeError::TypeMismatch {
                                processor: name.clone(),
                                external: attribute_name.clone(),
                                internal: attribute_name.clone(),
                                expected: mismatch.expected,
                                actual: mismatch.actual,
                            }
                        })?;
                    }
                } else if let Some(attribute) = current.get(input.name()) {
                    sink.set_attribute(input.internal(), attribute).map_err(|mismatch| {
                        AttributeError::TypeMismatch {
                            processor: name.clone(),
                            external: input.name().to_string(),
                            internal: input.internal().to_string(),
                            expected: mismatch.expected,
                            actual: mismatch.actual,
                        }
                    })?;
                }
            }
        }

        if let Some(source) = processor.as_provide_attributes() {
            let provided = source.attributes();
            for output in &outputs {
                if let Some(attribute) = provided.get(output.internal()) {
                    current.insert(output.name().to_string(), attribute.clone());
                }
            }
        }
    }

    Ok(())
}

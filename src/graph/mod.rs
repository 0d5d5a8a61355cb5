mod attributes;
mod builder;
mod descriptor;
mod node;

#[cfg(test)]
pub(crate) mod test_support;

pub use attributes::fill_processor_attributes;
pub use builder::ProcessorDependencyGraphFactory;
pub use descriptor::{InputValue, OutputValue};
pub use node::{ProcessorDependencyGraph, ProcessorGraphNode};

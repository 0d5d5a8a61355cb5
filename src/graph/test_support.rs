//! A configurable processor stub shared by the graph tests.

use async_trait::async_trait;

use crate::errors::ProcessorError;
use crate::traits::processor::{NameMapping, ParamField, ParamShape, Processor};
use crate::values::Values;

pub(crate) struct TestProcessor {
    name: String,
    inputs: Vec<ParamField>,
    outputs: Vec<ParamField>,
    input_prefix: Option<String>,
    output_prefix: Option<String>,
    input_mapping: NameMapping,
    output_mapping: NameMapping,
    custom_dependencies: Option<Vec<String>>,
}

impl TestProcessor {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            input_prefix: None,
            output_prefix: None,
            input_mapping: NameMapping::default(),
            output_mapping: NameMapping::default(),
            custom_dependencies: None,
        }
    }

    pub(crate) fn input(mut self, field: ParamField) -> Self {
        self.inputs.push(field);
        self
    }

    pub(crate) fn output(mut self, field: ParamField) -> Self {
        self.outputs.push(field);
        self
    }

    pub(crate) fn input_prefix(mut self, prefix: &str) -> Self {
        self.input_prefix = Some(prefix.to_string());
        self
    }

    #[allow(dead_code)]
    pub(crate) fn output_prefix(mut self, prefix: &str) -> Self {
        self.output_prefix = Some(prefix.to_string());
        self
    }

    pub(crate) fn input_mapping(mut self, mapping: NameMapping) -> Self {
        self.input_mapping = mapping;
        self
    }

    pub(crate) fn output_mapping(mut self, mapping: NameMapping) -> Self {
        self.output_mapping = mapping;
        self
    }

    pub(crate) fn custom_dependencies(mut self, names: &[&str]) -> Self {
        self.custom_dependencies = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }
}

#[async_trait]
impl Processor for TestProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_shape(&self) -> Option<ParamShape> {
        if self.inputs.is_empty() {
            None
        } else {
            Some(ParamShape::new("TestInput", self.inputs.clone()))
        }
    }

    fn output_shape(&self) -> ParamShape {
        ParamShape::new("TestOutput", self.outputs.clone())
    }

    fn input_prefix(&self) -> Option<&str> {
        self.input_prefix.as_deref()
    }

    fn output_prefix(&self) -> Option<&str> {
        self.output_prefix.as_deref()
    }

    fn input_mapping(&self) -> NameMapping {
        self.input_mapping.clone()
    }

    fn output_mapping(&self) -> NameMapping {
        self.output_mapping.clone()
    }

    fn custom_dependencies(&self) -> Option<Vec<String>> {
        self.custom_dependencies.clone()
    }

    async fn process(&self, _values: &Values) -> Result<(), ProcessorError> {
        Ok(())
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Construction of processor dependency graphs.
//!
//! The builder walks the processor list in the caller-supplied order and
//! maintains two working tables: which node produces each external output
//! name, and the declared type of every known name (seeded with the
//! attribute catalogue plus the ambient well-known values). Because edges
//! only ever point from an earlier-positioned processor to a later one, the
//! single pass yields an acyclic graph and deterministic conflict
//! diagnostics.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::errors::GraphBuildError;
use crate::fetch::ClientRequestFactory;
use crate::graph::descriptor::{inputs_of, outputs_of};
use crate::graph::node::{ProcessorDependencyGraph, ProcessorGraphNode};
use crate::observability::messages::graph::{GraphBuilt, OutputRenamed};
use crate::observability::messages::StructuredLog;
use crate::traits::processor::Processor;
use crate::values::{
    self, PdfConfig, RequestHeaders, Template, ValueKind, Values,
};

/// Builds [`ProcessorDependencyGraph`] instances from an ordered processor
/// list and an attribute catalogue.
#[derive(Debug, Default)]
pub struct ProcessorDependencyGraphFactory;

impl ProcessorDependencyGraphFactory {
    pub fn new() -> Self {
        Self
    }

    /// Construct the dependency graph.
    ///
    /// Every non-default input of every processor must be satisfied either
    /// by an attribute or by the output of an earlier-positioned processor,
    /// with matching types and without naming ambiguity. The ordering of
    /// `processors` is an explicit contract: it decides which producer an
    /// input binds to and guarantees the result is acyclic.
    pub fn build(
        &self,
        processors: Vec<Arc<dyn Processor>>,
        attributes: &HashMap<String, ValueKind>,
    ) -> Result<ProcessorDependencyGraph, GraphBuildError> {
        let mut provider_by_name: HashMap<String, usize> = HashMap::new();
        let mut type_by_name: HashMap<String, ValueKind> = attributes.clone();

        // Ambient well-known values available to every processor.
        type_by_name.insert(values::VALUES_KEY.to_string(), ValueKind::of::<Values>());
        type_by_name.insert(
            values::TASK_DIRECTORY_KEY.to_string(),
            ValueKind::of::<std::path::PathBuf>(),
        );
        type_by_name.insert(
            values::CLIENT_HTTP_REQUEST_FACTORY_KEY.to_string(),
            ValueKind::of::<ClientRequestFactory>(),
        );
        type_by_name.insert(values::TEMPLATE_KEY.to_string(), ValueKind::of::<Template>());
        type_by_name.insert(values::PDF_CONFIG_KEY.to_string(), ValueKind::of::<PdfConfig>());
        type_by_name.insert(values::SUBREPORT_DIR_KEY.to_string(), ValueKind::of::<String>());
        type_by_name.insert(values::OUTPUT_FORMAT_KEY.to_string(), ValueKind::of::<String>());
        type_by_name.insert(
            values::REQUEST_HEADERS_KEY.to_string(),
            ValueKind::of::<RequestHeaders>(),
        );

        let mut nodes: Vec<ProcessorGraphNode> = Vec::with_capacity(processors.len());
        let mut roots: Vec<usize> = Vec::new();

        for processor in processors {
            let index = nodes.len();
            nodes.push(ProcessorGraphNode::new(Arc::clone(&processor)));

            let inputs = inputs_of(processor.as_ref())?;
            let mut is_root = true;

            for input in &inputs {
                if input.name() == values::VALUES_KEY {
                    // The processor consumes the whole bag.
                    if let Some(dependencies) = processor.custom_dependencies() {
                        for dependency in dependencies {
                            if let Some(&provider) = provider_by_name.get(&dependency) {
                                nodes[provider].add_dependent(index);
                                is_root = false;
                            }
                        }
                    } else {
                        let providers: Vec<usize> = provider_by_name.values().copied().collect();
                        for provider in providers {
                            nodes[provider].add_dependent(index);
                            is_root = false;
                        }
                    }
                    continue;
                }

                match type_by_name.get(input.name()) {
                    None => {
                        if !input.has_default() {
                            return Err(GraphBuildError::MissingInput {
                                processor: processor.name().to_string(),
                                input: input.name().to_string(),
                            });
                        }
                    }
                    Some(&available) => {
                        let provider = provider_by_name.get(input.name()).copied();
                        if input.kind().is_assignable_from(&available) {
                            if let Some(provider) = provider {
                                nodes[provider].add_dependent(index);
                                is_root = false;
                            }
                        } else if let Some(provider) = provider {
                            return Err(GraphBuildError::TypeConflictWithProducer {
                                producer: nodes[provider].name().to_string(),
                                consumer: processor.name().to_string(),
                                name: input.name().to_string(),
                                produced: available,
                                expected: input.kind(),
                            });
                        } else {
                            return Err(GraphBuildError::TypeConflictWithAttribute {
                                consumer: processor.name().to_string(),
                                name: input.name().to_string(),
                                attribute: available,
                                expected: input.kind(),
                            });
                        }
                    }
                }
            }

            if is_root {
                roots.push(index);
            }

            for output in outputs_of(processor.as_ref())? {
                let mut output_name = output.name().to_string();
                if type_by_name.contains_key(&output_name) {
                    if output.renameable() {
                        let renamed = format!("{}_{}", output_name, Uuid::new_v4());
                        OutputRenamed {
                            processor: processor.name(),
                            from: &output_name,
                            to: &renamed,
                        }
                        .log();
                        output_name = renamed;
                    } else if let Some(&provider) = provider_by_name.get(&output_name) {
                        return Err(GraphBuildError::DuplicateOutput {
                            name: output_name,
                            first: nodes[provider].name().to_string(),
                            second: processor.name().to_string(),
                        });
                    } else {
                        return Err(GraphBuildError::OutputClashesWithAttribute {
                            name: output_name,
                            processor: processor.name().to_string(),
                        });
                    }
                }

                provider_by_name.insert(output_name.clone(), index);
                type_by_name.insert(output_name, output.kind());
            }

            // Pass-through inputs republish their value for later processors.
            for input in &inputs {
                if input.input_output() {
                    provider_by_name.insert(input.name().to_string(), index);
                }
            }
        }

        let graph = ProcessorDependencyGraph::new(nodes, roots);

        let reachable = graph.reachable_from_roots();
        if reachable.len() != graph.len() {
            let missing: Vec<String> = (0..graph.len())
                .filter(|index| !reachable.contains(index))
                .map(|index| graph.nodes()[index].name().to_string())
                .collect();
            return Err(GraphBuildError::UnreachableProcessors { missing });
        }

        GraphBuilt {
            processor_count: graph.len(),
            root_count: graph.root_indices().len(),
        }
        .log();

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::TestProcessor;
    use crate::traits::processor::ParamField;
    use std::collections::BTreeSet;

    struct Map;
    struct Legend;

    fn build(
        processors: Vec<Arc<dyn Processor>>,
        attributes: &HashMap<String, ValueKind>,
    ) -> Result<ProcessorDependencyGraph, GraphBuildError> {
        ProcessorDependencyGraphFactory::new().build(processors, attributes)
    }

    fn edge_set(graph: &ProcessorDependencyGraph) -> BTreeSet<(String, String)> {
        let mut edges = BTreeSet::new();
        for node in graph.nodes() {
            for dependent in node.dependents() {
                edges.insert((
                    node.name().to_string(),
                    graph.nodes()[dependent].name().to_string(),
                ));
            }
        }
        edges
    }

    #[test]
    fn simple_chain_yields_single_root_and_edge() {
        let p1 = TestProcessor::new("createMap").output(ParamField::new::<Map>("map"));
        let p2 = TestProcessor::new("createLegend")
            .input(ParamField::new::<Map>("map"))
            .output(ParamField::new::<Legend>("legend"));

        let graph = build(vec![Arc::new(p1), Arc::new(p2)], &HashMap::new()).unwrap();

        let roots: Vec<&str> = graph.roots().map(|node| node.name()).collect();
        assert_eq!(roots, vec!["createMap"]);
        assert_eq!(
            edge_set(&graph),
            BTreeSet::from([("createMap".to_string(), "createLegend".to_string())])
        );
    }

    #[test]
    fn input_satisfied_by_attribute_keeps_node_a_root() {
        let mut attributes = HashMap::new();
        attributes.insert("map".to_string(), ValueKind::of::<Map>());
        let p = TestProcessor::new("createLegend")
            .input(ParamField::new::<Map>("map"))
            .output(ParamField::new::<Legend>("legend"));

        let graph = build(vec![Arc::new(p)], &attributes).unwrap();
        assert_eq!(graph.root_indices(), &[0]);
    }

    #[test]
    fn duplicate_output_is_rejected() {
        let p1 = TestProcessor::new("first").output(ParamField::new::<i32>("x"));
        let p2 = TestProcessor::new("second").output(ParamField::new::<i32>("x"));

        let err = build(vec![Arc::new(p1), Arc::new(p2)], &HashMap::new()).unwrap_err();
        match err {
            GraphBuildError::DuplicateOutput { name, first, second } => {
                assert_eq!(name, "x");
                assert_eq!(first, "first");
                assert_eq!(second, "second");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn output_clashing_with_attribute_is_rejected() {
        let mut attributes = HashMap::new();
        attributes.insert("x".to_string(), ValueKind::of::<i32>());
        let p = TestProcessor::new("producer").output(ParamField::new::<i32>("x"));

        let err = build(vec![Arc::new(p)], &attributes).unwrap_err();
        assert!(matches!(
            err,
            GraphBuildError::OutputClashesWithAttribute { ref name, .. } if name == "x"
        ));
    }

    #[test]
    fn missing_input_without_default_is_rejected() {
        let p = TestProcessor::new("consumer").input(ParamField::new::<String>("x"));

        let err = build(vec![Arc::new(p)], &HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            GraphBuildError::MissingInput { ref input, .. } if input == "x"
        ));
    }

    #[test]
    fn missing_input_with_default_is_allowed() {
        let p = TestProcessor::new("consumer")
            .input(ParamField::new::<String>("x").with_default());

        let graph = build(vec![Arc::new(p)], &HashMap::new()).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.root_indices(), &[0]);
    }

    #[test]
    fn type_conflict_with_producer_is_rejected() {
        let p1 = TestProcessor::new("producer").output(ParamField::new::<i32>("x"));
        let p2 = TestProcessor::new("consumer").input(ParamField::new::<String>("x"));

        let err = build(vec![Arc::new(p1), Arc::new(p2)], &HashMap::new()).unwrap_err();
        assert!(matches!(err, GraphBuildError::TypeConflictWithProducer { .. }));
    }

    #[test]
    fn type_conflict_with_attribute_is_rejected() {
        let mut attributes = HashMap::new();
        attributes.insert("x".to_string(), ValueKind::of::<i32>());
        let p = TestProcessor::new("consumer").input(ParamField::new::<String>("x"));

        let err = build(vec![Arc::new(p)], &attributes).unwrap_err();
        assert!(matches!(err, GraphBuildError::TypeConflictWithAttribute { .. }));
    }

    #[test]
    fn wildcard_input_depends_on_all_producers() {
        let p1 = TestProcessor::new("a").output(ParamField::new::<i32>("a"));
        let p2 = TestProcessor::new("b").output(ParamField::new::<i32>("b"));
        let p3 = TestProcessor::new("collector")
            .input(ParamField::new::<Values>("values"));

        let graph = build(
            vec![Arc::new(p1), Arc::new(p2), Arc::new(p3)],
            &HashMap::new(),
        )
        .unwrap();

        assert_eq!(
            edge_set(&graph),
            BTreeSet::from([
                ("a".to_string(), "collector".to_string()),
                ("b".to_string(), "collector".to_string()),
            ])
        );
    }

    #[test]
    fn custom_dependencies_narrow_the_wildcard() {
        let p0 = TestProcessor::new("wanted").output(ParamField::new::<i32>("a"));
        let p1 = TestProcessor::new("unrelated").output(ParamField::new::<i32>("b"));
        let p2 = TestProcessor::new("collector")
            .input(ParamField::new::<Values>("values"))
            .custom_dependencies(&["a"]);

        let graph = build(
            vec![Arc::new(p0), Arc::new(p1), Arc::new(p2)],
            &HashMap::new(),
        )
        .unwrap();

        assert_eq!(
            edge_set(&graph),
            BTreeSet::from([("wanted".to_string(), "collector".to_string())])
        );
    }

    #[test]
    fn renameable_output_is_suffixed_on_collision() {
        let p1 = TestProcessor::new("first").output(ParamField::new::<i32>("trace"));
        let p2 = TestProcessor::new("second")
            .output(ParamField::new::<i32>("trace").internal_value());
        let p3 = TestProcessor::new("consumer").input(ParamField::new::<i32>("trace"));

        // The consumer still binds to the first producer; the renamed output
        // keeps its own unique name.
        let graph = build(
            vec![Arc::new(p1), Arc::new(p2), Arc::new(p3)],
            &HashMap::new(),
        )
        .unwrap();

        assert_eq!(
            edge_set(&graph),
            BTreeSet::from([("first".to_string(), "consumer".to_string())])
        );
    }

    #[test]
    fn pass_through_input_registers_node_as_producer() {
        let p1 = TestProcessor::new("source").output(ParamField::new::<i32>("x"));
        let p2 = TestProcessor::new("enricher")
            .input(ParamField::new::<i32>("x").passed_through());
        let p3 = TestProcessor::new("sink").input(ParamField::new::<i32>("x"));

        let graph = build(
            vec![Arc::new(p1), Arc::new(p2), Arc::new(p3)],
            &HashMap::new(),
        )
        .unwrap();

        let edges = edge_set(&graph);
        assert!(edges.contains(&("source".to_string(), "enricher".to_string())));
        assert!(edges.contains(&("enricher".to_string(), "sink".to_string())));
        assert!(!edges.contains(&("source".to_string(), "sink".to_string())));
    }

    #[test]
    fn ambient_values_are_available_as_inputs() {
        let p = TestProcessor::new("renderer")
            .input(ParamField::new::<Template>("template"))
            .input(ParamField::new::<String>("outputFormat"));

        let graph = build(vec![Arc::new(p)], &HashMap::new()).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn builder_is_deterministic() {
        let build_once = || {
            let p1 = TestProcessor::new("a").output(ParamField::new::<i32>("x"));
            let p2 = TestProcessor::new("b")
                .input(ParamField::new::<i32>("x"))
                .output(ParamField::new::<i32>("y"));
            let p3 = TestProcessor::new("c").input(ParamField::new::<i32>("y"));
            let graph = build(
                vec![Arc::new(p1), Arc::new(p2), Arc::new(p3)],
                &HashMap::new(),
            )
            .unwrap();
            (graph.root_indices().to_vec(), edge_set(&graph))
        };

        assert_eq!(build_once(), build_once());
    }
}

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::traits::processor::Processor;

/// A processor wrapped with its resolved dependency edges.
///
/// Edges point from a producer to the nodes that consume one of its
/// outputs. Nodes are only mutated while the builder runs; the finished
/// graph is immutable.
pub struct ProcessorGraphNode {
    processor: Arc<dyn Processor>,
    metric_name: String,
    dependents: BTreeSet<usize>,
}

impl ProcessorGraphNode {
    pub(crate) fn new(processor: Arc<dyn Processor>) -> Self {
        let metric_name = format!("printgraph.processor.{}", processor.name());
        Self {
            processor,
            metric_name,
            dependents: BTreeSet::new(),
        }
    }

    pub fn processor(&self) -> &Arc<dyn Processor> {
        &self.processor
    }

    pub fn name(&self) -> &str {
        self.processor.name()
    }

    /// Stable key used for spans and timers covering this node.
    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    pub fn dependents(&self) -> impl Iterator<Item = usize> + '_ {
        self.dependents.iter().copied()
    }

    pub(crate) fn add_dependent(&mut self, index: usize) {
        self.dependents.insert(index);
    }
}

impl fmt::Debug for ProcessorGraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorGraphNode")
            .field("name", &self.name())
            .field("dependents", &self.dependents)
            .finish()
    }
}

/// The acyclic execution plan relating processors by data dependency.
#[derive(Debug)]
pub struct ProcessorDependencyGraph {
    nodes: Vec<ProcessorGraphNode>,
    roots: Vec<usize>,
}

impl ProcessorDependencyGraph {
    pub(crate) fn new(nodes: Vec<ProcessorGraphNode>, roots: Vec<usize>) -> Self {
        Self { nodes, roots }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[ProcessorGraphNode] {
        &self.nodes
    }

    pub fn root_indices(&self) -> &[usize] {
        &self.roots
    }

    pub fn roots(&self) -> impl Iterator<Item = &ProcessorGraphNode> {
        self.roots.iter().map(|&index| &self.nodes[index])
    }

    /// Indices of all nodes reachable from the root set by following
    /// dependent edges.
    pub fn reachable_from_roots(&self) -> BTreeSet<usize> {
        let mut reachable = BTreeSet::new();
        let mut pending: Vec<usize> = self.roots.clone();
        while let Some(index) = pending.pop() {
            if reachable.insert(index) {
                pending.extend(self.nodes[index].dependents());
            }
        }
        reachable
    }

    /// Number of incoming edges per node, indexed like `nodes()`.
    pub fn dependency_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.nodes.len()];
        for node in &self.nodes {
            for dependent in node.dependents() {
                counts[dependent] += 1;
            }
        }
        counts
    }
}

impl fmt::Display for ProcessorDependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn print_node(
            f: &mut fmt::Formatter<'_>,
            graph: &ProcessorDependencyGraph,
            index: usize,
            depth: usize,
        ) -> fmt::Result {
            writeln!(f, "{}+ {}", "  ".repeat(depth), graph.nodes[index].name())?;
            for dependent in graph.nodes[index].dependents() {
                print_node(f, graph, dependent, depth + 1)?;
            }
            Ok(())
        }

        writeln!(f, "ProcessorDependencyGraph:")?;
        for &root in &self.roots {
            print_node(f, self, root, 1)?;
        }
        Ok(())
    }
}

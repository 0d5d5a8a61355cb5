//! Thin concurrent walker over a built dependency graph.
//!
//! Uses dependency counting: a node becomes ready once every producer it
//! consumes from has completed. Ready nodes run concurrently up to the
//! configured limit; the first processor failure fails the walk.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::Instrument;

use crate::errors::{ExecutionError, ProcessorError};
use crate::graph::ProcessorDependencyGraph;
use crate::values::Values;

pub struct GraphExecutor {
    max_concurrency: usize,
}

impl GraphExecutor {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Create an executor sized to the available CPU parallelism.
    pub fn with_available_parallelism() -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(concurrency)
    }

    /// Walk the graph, invoking every processor once its dependencies have
    /// completed. Fails fast on the first processor error.
    pub async fn execute(
        &self,
        graph: &ProcessorDependencyGraph,
        values: Arc<Values>,
    ) -> Result<(), ExecutionError> {
        let mut dependency_counts = graph.dependency_counts();
        let mut ready: VecDeque<usize> = graph.root_indices().iter().copied().collect();
        let mut join_set: JoinSet<(usize, Result<(), ProcessorError>)> = JoinSet::new();
        let mut completed = 0usize;

        while completed < graph.len() {
            while join_set.len() < self.max_concurrency {
                let Some(index) = ready.pop_front() else { break };
                let node = &graph.nodes()[index];
                let processor = Arc::clone(node.processor());
                let task_values = Arc::clone(&values);
                let span = tracing::debug_span!("processor", metric = node.metric_name());
                join_set.spawn(
                    async move {
                        let result = processor.process(&task_values).await;
                        (index, result)
                    }
                    .instrument(span),
                );
            }

            match join_set.join_next().await {
                None => {
                    return Err(ExecutionError::InternalError {
                        message: format!(
                            "executor stalled with {} of {} processors completed",
                            completed,
                            graph.len()
                        ),
                    });
                }
                Some(Err(join_error)) => {
                    return Err(ExecutionError::InternalError {
                        message: format!("processor task failed to join: {}", join_error),
                    });
                }
                Some(Ok((index, Err(error)))) => {
                    return Err(ExecutionError::ProcessorFailed {
                        processor_id: graph.nodes()[index].name().to_string(),
                        error: error.to_string(),
                    });
                }
                Some(Ok((index, Ok(())))) => {
                    completed += 1;
                    for dependent in graph.nodes()[index].dependents() {
                        dependency_counts[dependent] -= 1;
                        if dependency_counts[dependent] == 0 {
                            ready.push_back(dependent);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

mod fetch;
mod graph;

pub use fetch::FetchError;
pub use graph::{AttributeError, GraphBuildError};

/// Failure raised by a processor body during execution.
#[derive(Debug, Clone)]
pub struct ProcessorError {
    message: String,
}

impl ProcessorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProcessorError {}

/// Errors that can occur while walking a dependency graph
#[derive(Debug, Clone)]
pub enum ExecutionError {
    /// A processor failed during execution
    ProcessorFailed {
        processor_id: String,
        error: String,
    },

    /// Executor internal error (e.g., join failures, resource exhaustion)
    InternalError {
        message: String,
    },
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionError::ProcessorFailed { processor_id, error } => {
                write!(f, "Processor '{}' failed: {}", processor_id, error)
            }
            ExecutionError::InternalError { message } => {
                write!(f, "Executor internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for ExecutionError {}

//! Task-local diagnostic context.
//!
//! A keyed string map attached to the running task, used to correlate log
//! lines and outgoing requests across asynchronous work. The execution
//! layer establishes a [`scope`] per print task; the fetcher swaps the
//! factory's captured snapshot in around each request execution and always
//! restores the caller's context afterwards.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

/// Context key carrying the print job identifier.
pub const JOB_ID_KEY: &str = "jobId";
/// Context key carrying the calling application identifier.
pub const APPLICATION_ID_KEY: &str = "applicationId";

tokio::task_local! {
    static CONTEXT: RefCell<HashMap<String, String>>;
}

/// Run `future` with `context` as the task's diagnostic context.
pub async fn scope<F>(context: HashMap<String, String>, future: F) -> F::Output
where
    F: Future,
{
    CONTEXT.scope(RefCell::new(context), future).await
}

/// Snapshot of the current task's context; empty outside any scope.
pub fn copy_of_context() -> HashMap<String, String> {
    CONTEXT
        .try_with(|context| context.borrow().clone())
        .unwrap_or_default()
}

/// Replace the current task's context. A no-op outside any scope.
pub fn set_context(map: &HashMap<String, String>) {
    let _ = CONTEXT.try_with(|context| *context.borrow_mut() = map.clone());
}

pub fn get(key: &str) -> Option<String> {
    CONTEXT
        .try_with(|context| context.borrow().get(key).cloned())
        .ok()
        .flatten()
}

pub fn put(key: &str, value: &str) {
    let _ = CONTEXT.try_with(|context| {
        context.borrow_mut().insert(key.to_string(), value.to_string());
    });
}

/// Scoped swap of the diagnostic context.
///
/// Saves the caller's context and installs the snapshot iff the two differ;
/// dropping the guard restores the saved context on every exit path,
/// including errors and cancellation.
pub(crate) struct ContextSwap {
    saved: Option<HashMap<String, String>>,
}

impl ContextSwap {
    pub(crate) fn swap_in(snapshot: &HashMap<String, String>) -> Self {
        let current = copy_of_context();
        if &current != snapshot {
            set_context(snapshot);
            Self { saved: Some(current) }
        } else {
            Self { saved: None }
        }
    }
}

impl Drop for ContextSwap {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            set_context(&saved);
        }
    }
}

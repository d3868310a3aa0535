//! Cancellable delayed-task scheduling
//!
//! "After a short delay, signal X" is an explicit timer task here, not
//! implicit runtime behavior. Dropping the handle cancels the task if it
//! has not fired yet.

use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

/// Handle to a scheduled callback
pub struct DelayedTask {
    handle: Option<JoinHandle<()>>,
}

impl DelayedTask {
    /// Cancel the task if it has not fired yet
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Release the handle so the task runs to completion on its own
    pub fn detach(mut self) {
        self.handle.take();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Run `task` after `delay` on the tokio runtime
pub fn schedule(delay: Duration, task: BoxFuture<'static, ()>) -> DelayedTask {
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        task.await;
    });
    DelayedTask {
        handle: Some(handle),
    }
}

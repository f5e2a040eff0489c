//! Background execution of similarity work

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{Result, SomnioError};

/// Receives failures from background similarity work
///
/// Background tasks have no caller to return an error to, so every failure
/// ends up here exactly once.
pub trait ErrorSink: Send + Sync {
    fn report(&self, operation: &str, dream_id: &str, error: &SomnioError);
}

/// Reports background failures through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, operation: &str, dream_id: &str, error: &SomnioError) {
        tracing::error!(
            operation,
            dream_id,
            error = %error,
            "Background similarity sync failed"
        );
    }
}

/// Handle to similarity work running on its own thread
///
/// Dropping the handle detaches the thread; the work still runs to completion
/// and failures still reach the error sink.
#[derive(Debug)]
pub struct BackgroundTask {
    operation: &'static str,
    dream_id: String,
    handle: JoinHandle<Result<usize>>,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl BackgroundTask {
    /// Run `work` on a new thread, reporting its error or panic to `sink`
    pub fn spawn<F>(
        operation: &'static str,
        dream_id: &str,
        sink: Arc<dyn ErrorSink>,
        work: F,
    ) -> Result<Self>
    where
        F: FnOnce() -> Result<usize> + Send + 'static,
    {
        let task_dream_id = dream_id.to_string();
        let handle = thread::Builder::new()
            .name(format!("somnio-{}", operation))
            .spawn(move || {
                let outcome = match panic::catch_unwind(AssertUnwindSafe(work)) {
                    Ok(result) => result,
                    Err(payload) => Err(SomnioError::TaskPanicked(panic_message(&*payload))),
                };
                if let Err(e) = &outcome {
                    sink.report(operation, &task_dream_id, e);
                }
                outcome
            })?;

        Ok(BackgroundTask {
            operation,
            dream_id: dream_id.to_string(),
            handle,
        })
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn dream_id(&self) -> &str {
        &self.dream_id
    }

    /// Block until the work finishes
    ///
    /// Returns the number of edges written. An error returned here has
    /// already been delivered to the sink.
    pub fn wait(self) -> Result<usize> {
        self.handle
            .join()
            .unwrap_or_else(|payload| Err(SomnioError::TaskPanicked(panic_message(&*payload))))
    }
}

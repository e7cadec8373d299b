//! Exit code logic for the export process.
//!
//! Single responsibility: map the outcome of a run to the process exit code.

use anyhow::Result;
use tracing::error;

use crate::ProcessExit;

/// Logs a fatal error chain and maps the run result to the process outcome.
pub(crate) fn finish(result: Result<ProcessExit>) -> ProcessExit {
    match result {
        Ok(exit) => exit,
        Err(err) => {
            error!("{err:#}");
            ProcessExit::Failure
        }
    }
}

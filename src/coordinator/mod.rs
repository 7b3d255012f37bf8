//! Spawns the workers of a run and owns the result stream's lifecycle.
mod completion;
mod run;


pub use completion::{CompletionGuard, CompletionTracker};
pub use run::{DEFAULT_RESULT_BUFFER, RunHandle, RunPlan, start_run};

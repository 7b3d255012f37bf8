//! HTTP attempt execution and the per-worker attempt loop.
mod executor;
mod worker;


pub use executor::{HttpExecution, HttpExecutor};
pub(crate) use worker::HttpWorker;

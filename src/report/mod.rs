//! Consumes the result stream of a run and summarizes it.
mod tally;


pub use tally::{RunTally, SummaryStats, compute_summary_stats, drain_results, print_summary};

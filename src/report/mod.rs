// src/report/mod.rs
// =============================================================================
// This module presents the results of a run.
//
// Submodules:
// - console: banner, per-word lines and the colored summary
// - output: the result.json file
// =============================================================================

mod console;
mod output;

pub use console::{format_duration, print_banner, print_summary, ConsoleObserver};
pub use output::persist;

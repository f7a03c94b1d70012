//! Batch processing of a directory of safety data sheets.

mod config;
mod runner;

pub use config::BatchConfig;
pub use runner::{run, BatchReport, BatchRunner, FileFailure, FileOutcome};

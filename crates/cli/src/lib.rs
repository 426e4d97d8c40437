//! Library side of the `tsprompt` binary: the benchmark runner shared by
//! the `run` command and the end-to-end tests.

pub mod benchmark;

pub use benchmark::{BenchmarkError, BenchmarkRecord, BenchmarkRun, BenchmarkSummary};

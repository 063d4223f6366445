//! Process runner implementations for the folio pipeline.
//!
//! This crate provides the platform-specific implementation of the
//! `ProcessRunner` trait from folio-traits.
//!
//! ## Available Runners
//!
//! - [`TokioProcessRunner`]: Spawns real child processes with a bounded deadline
//!
//! ## Usage
//!
//! ```ignore
//! use folio_executor::TokioProcessRunner;
//! use folio_traits::{ProcessRequest, ProcessRunner};
//!
//! let runner = TokioProcessRunner::new();
//! let output = runner.run(ProcessRequest::new("pdflatex").arg("--version")).await?;
//! ```

mod tokio_runner;

pub use tokio_runner::TokioProcessRunner;

// Re-export from folio-traits
pub use folio_traits::{ProcessError, ProcessOutput, ProcessRequest, ProcessRunner};

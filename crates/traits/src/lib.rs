//! Platform seams for the folio document engine.
//!
//! The engine never touches ambient process state or a database directly.
//! Child processes go through [`ProcessRunner`] and generation history goes
//! through [`GenerationStore`], so both can be swapped for in-memory fakes.

pub mod process;
pub mod store;

pub use process::{ProcessError, ProcessOutput, ProcessRequest, ProcessRunner};
pub use store::{GenerationRecord, GenerationStore, InMemoryGenerationStore, StoreError};

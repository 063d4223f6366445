//! PDF composition utilities.
//!
//! Merges compiled documents into one file using lopdf:
//! - Deep object copying with cycle detection
//! - Page copies detached from their source page tree, with inherited
//!   attributes made explicit
//! - Ordered, all-or-nothing file merge

mod copier;
mod error;
mod merge;

pub use error::ComposerError;
pub use merge::{empty_document, merge_documents, merge_files};

//! Document assembly pipeline orchestration.
//!
//! - [`PipelineBuilder`]: Fluent builder for constructing document pipelines
//! - [`DocumentPipeline`]: Renders templates and assembles applications
//! - [`ArtifactLocks`]: Serialises writers of the same output file
//! - [`TemplateLibrary`]: Safe name-based access to template directories
//!
//! # Example
//!
//! ```ignore
//! use folio::{PipelineBuilder, VariableMap};
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_output_dir("output")
//!     .build()?;
//!
//! let variables = VariableMap::new().with("company_name", "Globex");
//! let pdf = pipeline
//!     .render_template("data/cover_letters/letter.tex".as_ref(), Some(&variables), "output".as_ref())
//!     .await?;
//! ```

mod builder;
pub mod config;
mod library;
mod locks;
pub mod naming;
mod orchestrator;
mod working;

pub use builder::PipelineBuilder;
pub use config::PipelineConfig;
pub use library::TemplateLibrary;
pub use locks::{ArtifactLease, ArtifactLocks};
pub use orchestrator::{ApplicationRequest, Assembly, DocumentPipeline, RenderedDocument};

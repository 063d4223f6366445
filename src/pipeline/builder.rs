// src/pipeline/builder.rs
use super::config::PipelineConfig;
use super::locks::ArtifactLocks;
use super::orchestrator::DocumentPipeline;
use crate::error::PipelineError;
use folio_compiler::LatexCompiler;
use folio_executor::TokioProcessRunner;
use folio_traits::{GenerationStore, ProcessRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// A builder for creating a `DocumentPipeline`.
pub struct PipelineBuilder<R: ProcessRunner = TokioProcessRunner> {
    config: PipelineConfig,
    runner: R,
    store: Option<Arc<dyn GenerationStore>>,
    locks: ArtifactLocks,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            runner: TokioProcessRunner,
            store: None,
            locks: ArtifactLocks::new(),
        }
    }
}

impl PipelineBuilder {
    /// Creates a builder with default settings that runs the real compiler.
    pub fn new() -> Self {
        Default::default()
    }
}

impl<R: ProcessRunner> PipelineBuilder<R> {
    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the configuration from a JSON file.
    pub fn with_config_file<P: AsRef<Path>>(self, path: P) -> Result<Self, PipelineError> {
        let config = PipelineConfig::from_json_file(path)?;
        Ok(self.with_config(config))
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Root of the template library.
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.data_dir = dir.into();
        self
    }

    /// Compiler executable name or path, e.g. `xelatex`.
    pub fn with_compiler_program(mut self, program: impl Into<String>) -> Self {
        self.config.compiler.program = program.into();
        self
    }

    /// Limit on each compiler run, rounded up to whole seconds. `None` lets a
    /// hung compiler block its request indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.compiler.timeout_secs = timeout.map(|t| t.as_secs() + u64::from(t.subsec_nanos() > 0));
        self
    }

    /// Swaps the process runner, e.g. for a fake in tests.
    pub fn with_runner<R2: ProcessRunner>(self, runner: R2) -> PipelineBuilder<R2> {
        PipelineBuilder {
            config: self.config,
            runner,
            store: self.store,
            locks: self.locks,
        }
    }

    /// Records every assembly in `store`.
    pub fn with_store(mut self, store: Arc<dyn GenerationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Shares artifact locks with other pipelines writing to the same
    /// output directories.
    pub fn with_locks(mut self, locks: ArtifactLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Consumes the builder and creates the `DocumentPipeline`.
    pub fn build(self) -> Result<DocumentPipeline<R>, PipelineError> {
        if self.config.compiler.program.trim().is_empty() {
            return Err(PipelineError::Config(
                "No compiler program configured.".to_string(),
            ));
        }
        if self.config.compiler.timeout_secs == Some(0) {
            return Err(PipelineError::Config(
                "Compiler timeout must be at least one second.".to_string(),
            ));
        }

        log::info!(
            "Building pipeline: compiler '{}' via {}, output to {}",
            self.config.compiler.program,
            self.runner.name(),
            self.config.output_dir.display()
        );
        let compiler = LatexCompiler::new(self.runner, self.config.compiler.clone());
        Ok(DocumentPipeline::new(compiler, self.config, self.locks, self.store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_traits::InMemoryGenerationStore;

    #[test]
    fn test_builder_applies_overrides() {
        let pipeline = PipelineBuilder::new()
            .with_data_dir("/srv/data")
            .with_output_dir("/srv/out")
            .with_compiler_program("xelatex")
            .with_timeout(Some(Duration::from_millis(1500)))
            .with_store(Arc::new(InMemoryGenerationStore::new()))
            .build()
            .unwrap();

        let config = pipeline.config();
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.output_dir, PathBuf::from("/srv/out"));
        assert_eq!(config.compiler.program, "xelatex");
        assert_eq!(config.compiler.timeout_secs, Some(2));
        assert!(pipeline.store().is_some());
    }

    #[test]
    fn test_builder_rejects_empty_program() {
        let result = PipelineBuilder::new().with_compiler_program(" ").build();
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = PipelineBuilder::new().with_timeout(Some(Duration::ZERO)).build();
        assert!(matches!(result, Err(PipelineError::Config(_))));

        let pipeline = PipelineBuilder::new().with_timeout(None).build().unwrap();
        assert_eq!(pipeline.config().compiler.timeout_secs, None);
    }
}

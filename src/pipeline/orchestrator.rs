// src/pipeline/orchestrator.rs
use super::config::PipelineConfig;
use super::library::TemplateLibrary;
use super::locks::{ArtifactLease, ArtifactLocks};
use super::naming::combined_file_name;
use super::working::WorkingDocument;
use crate::error::PipelineError;
use chrono::Utc;
use folio_compiler::{LatexCompiler, artifact_path};
use folio_executor::TokioProcessRunner;
use folio_template::{Template, VariableMap};
use folio_traits::{GenerationRecord, GenerationStore, ProcessRunner};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A compiled `<template-stem>.pdf` in the output directory.
///
/// Holds the lease on its path: a concurrent request for the same template
/// and output directory waits until this value is dropped.
#[derive(Debug)]
pub struct RenderedDocument {
    path: PathBuf,
    _lease: ArtifactLease,
}

impl RenderedDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Releases the lease and returns the path.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// The documents to put together for one application.
///
/// Template and attachment names are file names inside the library
/// directories of the pipeline's [`PipelineConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationRequest {
    pub cover_letter: Option<String>,
    pub cv: Option<String>,
    pub attachments: Vec<String>,
    /// Values derived from stored data about the position.
    pub variables: VariableMap,
    /// Caller-supplied values. These win over `variables`.
    pub custom_variables: VariableMap,
    /// Merge everything into one file when more than one document results.
    pub combine: bool,
    /// Prefix of the combined file name. Falls back to the `company_name`
    /// variable, then to `combined`.
    pub label: Option<String>,
}

impl ApplicationRequest {
    fn is_empty(&self) -> bool {
        self.cover_letter.is_none() && self.cv.is_none() && self.attachment_names().next().is_none()
    }

    fn attachment_names(&self) -> impl Iterator<Item = &str> {
        self.attachments.iter().map(String::as_str).filter(|a| !a.is_empty())
    }
}

/// The outcome of [`DocumentPipeline::assemble`].
#[derive(Debug)]
pub struct Assembly {
    /// The file to deliver: the combined PDF, or the first document.
    pub path: PathBuf,
    /// Every document collected, in delivery order.
    pub documents: Vec<PathBuf>,
    pub combined: bool,
    /// Id of the history record, when a store is configured.
    pub generation_id: Option<i64>,
    _leases: Vec<ArtifactLease>,
}

/// The document assembly pipeline.
///
/// Renders templates to PDFs through the external compiler and merges the
/// results. Requests are independent: each compile gets its own working file
/// and child process. Only requests targeting the same output file wait for
/// one another.
#[derive(Debug)]
pub struct DocumentPipeline<R: ProcessRunner = TokioProcessRunner> {
    compiler: LatexCompiler<R>,
    config: PipelineConfig,
    locks: ArtifactLocks,
    store: Option<Arc<dyn GenerationStore>>,
}

impl<R: ProcessRunner> DocumentPipeline<R> {
    pub(crate) fn new(
        compiler: LatexCompiler<R>,
        config: PipelineConfig,
        locks: ArtifactLocks,
        store: Option<Arc<dyn GenerationStore>>,
    ) -> Self {
        Self {
            compiler,
            config,
            locks,
            store,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn locks(&self) -> &ArtifactLocks {
        &self.locks
    }

    pub fn store(&self) -> Option<&Arc<dyn GenerationStore>> {
        self.store.as_ref()
    }

    pub fn cv_library(&self) -> TemplateLibrary {
        TemplateLibrary::new(self.config.cv_dir())
    }

    pub fn cover_letter_library(&self) -> TemplateLibrary {
        TemplateLibrary::new(self.config.cover_letter_dir())
    }

    pub fn attachment_library(&self) -> TemplateLibrary {
        TemplateLibrary::new(self.config.attachment_dir())
    }

    /// Compiles one template into `<output_dir>/<template-stem>.pdf`.
    ///
    /// Without variables (`None` or an empty map) the template is compiled in
    /// place. Otherwise the substituted content is compiled from a uniquely
    /// named working file in `output_dir`, and the result renamed to the
    /// template's name. The working file and its artifacts are removed
    /// however the compile ends. An existing PDF at the target is replaced.
    pub async fn render_template(
        &self,
        template_path: &Path,
        variables: Option<&VariableMap>,
        output_dir: &Path,
    ) -> Result<RenderedDocument, PipelineError> {
        let template = Template::load(template_path)?;
        let output_dir = prepare_output_dir(output_dir).await?;
        let target = target_path(&output_dir, &template);

        let lease = self.locks.acquire(&target).await;
        let path = self.compile_leased(&template, variables, &output_dir, &target).await?;
        Ok(RenderedDocument { path, _lease: lease })
    }

    /// Renders the selected templates, collects attachments, and optionally
    /// merges everything into one timestamped file.
    ///
    /// Order is cover letter, CV, then attachments in request order.
    /// Attachments missing from the library are skipped with a warning. With
    /// a store configured, a history record is written for the result.
    pub async fn assemble(&self, request: ApplicationRequest) -> Result<Assembly, PipelineError> {
        if request.is_empty() {
            return Err(PipelineError::Config(
                "at least one document must be selected".to_string(),
            ));
        }

        let mut templates = Vec::new();
        if let Some(name) = &request.cover_letter {
            templates.push(Template::load(self.cover_letter_library().resolve(name)?)?);
        }
        if let Some(name) = &request.cv {
            templates.push(Template::load(self.cv_library().resolve(name)?)?);
        }

        let attachment_library = self.attachment_library();
        let mut attachments = Vec::new();
        for name in request.attachment_names() {
            match attachment_library.resolve(name) {
                Ok(path) => {
                    info!("Added attachment: {}", name);
                    attachments.push(path);
                }
                Err(_) => warn!("Skipping missing attachment: {}", name),
            }
        }

        let output_dir = prepare_output_dir(&self.config.output_dir).await?;
        let targets: Vec<PathBuf> = templates.iter().map(|t| target_path(&output_dir, t)).collect();
        if let [first, second] = targets.as_slice()
            && first == second
        {
            return Err(PipelineError::Config(format!(
                "cover letter and CV would both be written to '{}'",
                first.display()
            )));
        }
        let leases = self.locks.acquire_all(targets.iter().map(PathBuf::as_path)).await;

        let mut variables = request.variables.clone();
        variables.overlay(&request.custom_variables);

        let mut documents = Vec::with_capacity(templates.len() + attachments.len());
        for (template, target) in templates.iter().zip(&targets) {
            let path = self
                .compile_leased(template, Some(&variables), &output_dir, target)
                .await?;
            info!("Generated {}: {}", template.name(), path.display());
            documents.push(path);
        }
        documents.extend(attachments);

        let Some(first) = documents.first().cloned() else {
            return Err(PipelineError::Config(
                "none of the selected documents exist".to_string(),
            ));
        };

        let combined = request.combine && documents.len() > 1;
        let label =
            non_blank(request.label.as_deref()).or_else(|| non_blank(variables.get("company_name")));

        let path = if combined {
            let output = output_dir.join(combined_file_name(label.as_deref(), Utc::now()));
            let sources = documents.clone();
            let merge_output = output.clone();
            tokio::task::spawn_blocking(move || folio_pdf_composer::merge_files(&sources, &merge_output))
                .await
                .map_err(|e| PipelineError::Io(std::io::Error::other(e)))??;
            info!("Combined PDFs into: {}", output.display());
            output
        } else {
            first
        };

        let generation_id = match &self.store {
            Some(store) => {
                let record = GenerationRecord {
                    filename: file_name(&path),
                    cv_file: request.cv.clone(),
                    cover_letter_file: request.cover_letter.clone(),
                    attachments: request.attachment_names().map(str::to_string).collect(),
                    combined,
                    label: if combined { label } else { None },
                    company_name: non_blank(variables.get("company_name")),
                    job_title: non_blank(variables.get("job_title")),
                    created_at: Utc::now(),
                };
                let id = store.insert(record)?;
                debug!("Recorded generation {} for {}", id, path.display());
                Some(id)
            }
            None => None,
        };

        Ok(Assembly {
            path,
            documents,
            combined,
            generation_id,
            _leases: leases,
        })
    }

    /// Produces `target` from `template`. The caller holds the lease on `target`.
    async fn compile_leased(
        &self,
        template: &Template,
        variables: Option<&VariableMap>,
        output_dir: &Path,
        target: &Path,
    ) -> Result<PathBuf, PipelineError> {
        let Some(variables) = variables.filter(|v| !v.is_empty()) else {
            debug!("No variables supplied, compiling {} in place", template.path().display());
            return Ok(self.compiler.compile(template.path(), output_dir).await?);
        };

        let content = template.render(variables);
        let working = WorkingDocument::create(output_dir, template.name(), &content)?;
        let produced = self
            .compiler
            .compile_in(working.path(), output_dir, template.path().parent())
            .await?;

        tokio::fs::rename(&produced, target).await?;
        debug!("Renamed {} to {}", produced.display(), target.display());
        drop(working);
        Ok(target.to_path_buf())
    }
}

async fn prepare_output_dir(output_dir: &Path) -> Result<PathBuf, PipelineError> {
    tokio::fs::create_dir_all(output_dir).await?;
    Ok(tokio::fs::canonicalize(output_dir).await?)
}

fn target_path(output_dir: &Path, template: &Template) -> PathBuf {
    artifact_path(output_dir, OsStr::new(template.name()), "pdf")
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

use crate::substitute::substitute;
use crate::variables::VariableMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Template path has no file name: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Failed to read template '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

static BINDING_SITE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\newcommand\s*\{\s*\\([A-Za-z@]+)\s*\}").expect("binding-site pattern is valid")
});

/// A LaTeX template read from disk. The engine never writes back to it.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    name: String,
    content: String,
}

impl Template {
    /// Reads a UTF-8 template file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| TemplateError::InvalidPath(path.to_path_buf()))?
            .to_string();

        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TemplateError::NotFound(path.to_path_buf())
            } else {
                TemplateError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            name,
            content,
        })
    }

    /// Builds a template from in-memory source; `path` only supplies the name.
    pub fn from_source(path: impl Into<PathBuf>, content: impl Into<String>) -> Result<Self, TemplateError> {
        let path = path.into();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| TemplateError::InvalidPath(path.clone()))?
            .to_string();
        Ok(Self {
            path,
            name,
            content: content.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Logical name: the file stem, e.g. `cv` for `cvs/cv.tex`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Names of all declared binding sites, in order of first appearance.
    pub fn binding_sites(&self) -> Vec<&str> {
        let mut sites: Vec<&str> = Vec::new();
        for caps in BINDING_SITE.captures_iter(&self.content) {
            if let Some(name) = caps.get(1).map(|m| m.as_str())
                && !sites.contains(&name)
            {
                sites.push(name);
            }
        }
        sites
    }

    /// Returns the template content with `variables` substituted.
    pub fn render(&self, variables: &VariableMap) -> String {
        substitute(&self.content, variables)
    }
}

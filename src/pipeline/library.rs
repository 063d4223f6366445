//! Name-based access to one directory of templates or attachments.
//!
//! # Security
//!
//! Names come from callers and are resolved relative to the library
//! directory. Absolute names and names that escape the directory (e.g.
//! `../../etc/passwd`) resolve to not-found.

use crate::error::PipelineError;
use std::path::{Component, Path, PathBuf};

/// A directory of documents addressed by file name.
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    base_path: PathBuf,
}

impl TemplateLibrary {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Resolves `name` to an existing file inside the library.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, PipelineError> {
        self.resolve_path_safe(name)
            .filter(|p| p.is_file())
            .ok_or_else(|| PipelineError::NotFound {
                path: self.base_path.join(name),
            })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// File names in the library with the given extension, sorted. A missing
    /// directory lists as empty.
    pub fn list(&self, extension: &str) -> Result<Vec<String>, PipelineError> {
        let entries = match std::fs::read_dir(&self.base_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(extension)
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns `None` if `name` would escape the library directory.
    fn resolve_path_safe(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        if name.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }

        let full_path = self.base_path.join(relative);

        // Symlinks inside the library may still point outside it.
        if let (Ok(canonical), Ok(base)) = (full_path.canonicalize(), self.base_path.canonicalize()) {
            return canonical.starts_with(base).then_some(full_path);
        }

        Some(full_path)
    }
}

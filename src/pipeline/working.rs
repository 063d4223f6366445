use folio_compiler::artifact_path;
use log::{debug, warn};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Artifacts the compiler and common packages derive from a working file's
/// name: hyperref, tables of contents and lists, beamer, bibliographies,
/// `-recorder` and SyncTeX.
const DERIVED_EXTENSIONS: &[&str] = &[
    "pdf", "log", "aux", "out", "toc", "lof", "lot", "nav", "snm", "vrb", "bbl", "blg", "fls",
    "synctex.gz",
];

/// A substituted copy of a template, written under a unique name for one
/// compile.
///
/// Dropping it deletes the `.tex` file and every artifact the compiler
/// derived from its name, whether the compile succeeded, failed or was
/// abandoned. A produced PDF must be renamed away before the drop.
#[derive(Debug)]
pub(crate) struct WorkingDocument {
    file: NamedTempFile,
    stem: OsString,
    dir: PathBuf,
}

impl WorkingDocument {
    /// Writes `content` to `<dir>/<template_stem>-<random>.tex`.
    pub(crate) fn create(dir: &Path, template_stem: &str, content: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(&format!("{}-", template_stem))
            .suffix(".tex")
            .tempfile_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        let stem = file
            .path()
            .file_stem()
            .map(|s| s.to_os_string())
            .ok_or_else(|| io::Error::other("working file has no name"))?;

        debug!("Created working document {}", file.path().display());
        Ok(Self {
            file,
            stem,
            dir: dir.to_path_buf(),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        self.file.path()
    }

    /// `<dir>/<working-stem>.<extension>`.
    pub(crate) fn artifact(&self, extension: &str) -> PathBuf {
        artifact_path(&self.dir, &self.stem, extension)
    }
}

impl Drop for WorkingDocument {
    fn drop(&mut self) {
        for extension in DERIVED_EXTENSIONS.iter().copied() {
            let path = self.artifact(extension);
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed working artifact {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove working artifact {}: {}", path.display(), e),
            }
        }
    }
}

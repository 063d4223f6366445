use log::warn;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Text artifacts left next to a compiled document, for debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationArtifacts {
    pub log: Option<String>,
    pub aux: Option<String>,
}

/// `<output_dir>/<stem>.<extension>`, keeping any dots already in the stem.
pub fn artifact_path(output_dir: &Path, stem: &OsStr, extension: &str) -> PathBuf {
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(extension);
    output_dir.join(name)
}

fn read_artifact(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            warn!("Failed to read artifact {}: {}", path.display(), e);
            None
        }
    }
}

/// Reads `<stem>.log` and `<stem>.aux` for `tex_file` from `output_dir`.
/// Missing or unreadable files come back as `None`.
pub fn compilation_artifacts(tex_file: &Path, output_dir: &Path) -> CompilationArtifacts {
    let Some(stem) = tex_file.file_stem() else {
        return CompilationArtifacts::default();
    };
    CompilationArtifacts {
        log: read_artifact(&artifact_path(output_dir, stem, "log")),
        aux: read_artifact(&artifact_path(output_dir, stem, "aux")),
    }
}

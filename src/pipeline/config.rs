use crate::error::PipelineError;
use folio_compiler::CompilerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CV_DIR: &str = "cvs";
const COVER_LETTER_DIR: &str = "cover_letters";
const ATTACHMENT_DIR: &str = "attachments";

/// Where templates are read from, where artifacts go, and how the compiler
/// is invoked.
///
/// ```json
/// {
///   "data_dir": "/srv/folio/data",
///   "output_dir": "/srv/folio/output",
///   "compiler": { "program": "pdflatex", "timeout_secs": 60 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root of the template library (`cvs/`, `cover_letters/`, `attachments/`).
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub compiler: CompilerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            output_dir: PathBuf::from("./output"),
            compiler: CompilerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&source)?)
    }

    pub fn cv_dir(&self) -> PathBuf {
        self.data_dir.join(CV_DIR)
    }

    pub fn cover_letter_dir(&self) -> PathBuf {
        self.data_dir.join(COVER_LETTER_DIR)
    }

    pub fn attachment_dir(&self) -> PathBuf {
        self.data_dir.join(ATTACHMENT_DIR)
    }
}

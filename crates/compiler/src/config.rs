use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default compiler executable.
pub const DEFAULT_PROGRAM: &str = "pdflatex";

/// Default wall-clock limit for a single compiler run.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// How the external compiler is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Executable name or path.
    pub program: String,
    /// Extra flags placed before the engine's own flags. The working file is
    /// always the last and only positional argument.
    pub extra_args: Vec<String>,
    /// Seconds before a run is killed. `None` disables the limit.
    pub timeout_secs: Option<u64>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            extra_args: Vec::new(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CompilerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

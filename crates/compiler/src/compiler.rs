use crate::artifacts::artifact_path;
use crate::config::CompilerConfig;
use crate::error::{CompilationError, CompileError, CompilerLog};
use folio_traits::{ProcessError, ProcessOutput, ProcessRequest, ProcessRunner};
use log::{debug, error, info, warn};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Tolerance for filesystems that store modification times coarsely.
const MTIME_SLACK: Duration = Duration::from_secs(2);

/// Runs the LaTeX compiler through a [`ProcessRunner`].
#[derive(Debug, Clone)]
pub struct LatexCompiler<R> {
    runner: R,
    config: CompilerConfig,
}

impl<R: ProcessRunner> LatexCompiler<R> {
    pub fn new(runner: R, config: CompilerConfig) -> Self {
        Self { runner, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Builds the invocation: batch mode, explicit output directory, and the
    /// working file as the sole positional argument. The child runs in the
    /// file's own directory so relative `\input` paths resolve.
    pub fn request_for(&self, tex_file: &Path, output_dir: &Path) -> ProcessRequest {
        self.request_in(tex_file, output_dir, tex_file.parent())
    }

    fn request_in(&self, tex_file: &Path, output_dir: &Path, working_dir: Option<&Path>) -> ProcessRequest {
        let mut output_flag = OsString::from("-output-directory=");
        output_flag.push(output_dir.as_os_str());

        let mut request = ProcessRequest::new(&self.config.program)
            .args(&self.config.extra_args)
            .arg("-interaction=nonstopmode")
            .arg(output_flag)
            .arg(tex_file.as_os_str());

        if let Some(dir) = working_dir.filter(|p| !p.as_os_str().is_empty()) {
            request = request.current_dir(dir);
        }
        if let Some(timeout) = self.config.timeout() {
            request = request.timeout(timeout);
        }
        request
    }

    /// Compiles `tex_file` once, writing `<stem>.pdf` into `output_dir`.
    pub async fn compile(&self, tex_file: &Path, output_dir: &Path) -> Result<PathBuf, CompileError> {
        self.compile_in(tex_file, output_dir, tex_file.parent()).await
    }

    /// Like [`compile`](Self::compile), but runs the compiler from
    /// `working_dir`. Used for working copies that live apart from the
    /// template they were rendered from.
    pub async fn compile_in(
        &self,
        tex_file: &Path,
        output_dir: &Path,
        working_dir: Option<&Path>,
    ) -> Result<PathBuf, CompileError> {
        if !tex_file.is_file() {
            return Err(CompileError::SourceNotFound(tex_file.to_path_buf()));
        }
        // The child may run elsewhere, so both paths are passed absolute.
        let absolute_tex = std::path::absolute(tex_file)
            .map_err(|_| CompileError::SourceNotFound(tex_file.to_path_buf()))?;
        let absolute_output = std::path::absolute(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());
        let tex_file = absolute_tex.as_path();
        let output_dir = absolute_output.as_path();

        let Some(stem) = tex_file.file_stem() else {
            return Err(CompileError::SourceNotFound(tex_file.to_path_buf()));
        };
        let pdf_file = artifact_path(output_dir, stem, "pdf");
        let log_file = artifact_path(output_dir, stem, "log");

        info!("Compiling LaTeX file: {}", tex_file.display());
        let request = self.request_in(tex_file, output_dir, working_dir);
        let started = SystemTime::now();
        let output = self.runner.run(request).await.map_err(|e| match e {
            ProcessError::TimedOut { after, .. } => CompileError::Timeout {
                source_file: tex_file.to_path_buf(),
                after,
            },
            other => CompileError::Process(other),
        })?;

        if !output.success() {
            let failure = failed_compilation(output, &log_file);
            error!("{} compilation failed:\n{}", self.config.program, failure.summary());
            debug!("{} stdout:\n{}", self.config.program, failure.stdout);
            debug!("{} stderr:\n{}", self.config.program, failure.stderr);
            return Err(CompileError::Compilation(Box::new(failure)));
        }

        info!("{} compilation successful for {}", self.config.program, tex_file.display());
        debug!("{} stdout:\n{}", self.config.program, output.stdout);

        if !written_since(&pdf_file, started) {
            error!(
                "compiler reported success but produced no artifact: {}",
                pdf_file.display()
            );
            if pdf_file.is_file() {
                warn!("{} is left over from an earlier run", pdf_file.display());
            }
            let log = read_log(&log_file).ok();
            return Err(CompileError::MissingArtifact {
                expected: pdf_file,
                log,
            });
        }

        Ok(pdf_file)
    }
}

/// True when `path` is a file modified no earlier than `started`. A PDF left
/// by an earlier run does not count as this run's output.
fn written_since(path: &Path, started: SystemTime) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    match metadata.modified() {
        Ok(modified) => modified + MTIME_SLACK >= started,
        // No mtime support: existence is all there is to go on.
        Err(_) => true,
    }
}

fn read_log(log_file: &Path) -> io::Result<String> {
    std::fs::read(log_file).map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

fn failed_compilation(output: ProcessOutput, log_file: &Path) -> CompilationError {
    let (log, diagnostics) = match read_log(log_file) {
        Ok(text) => {
            let diagnostics = folio_diagnostics::parse(&text);
            (CompilerLog::Read(text), diagnostics)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => (CompilerLog::Missing, Vec::new()),
        Err(e) => {
            warn!("Failed to read LaTeX log file {}: {}", log_file.display(), e);
            (CompilerLog::Unreadable(e.to_string()), Vec::new())
        }
    };

    CompilationError {
        exit_code: output.exit_code,
        stdout: output.stdout,
        stderr: output.stderr,
        log,
        diagnostics,
    }
}

pub mod fixtures;
pub mod pdf_assertions;

use folio::{ProcessError, ProcessOutput, ProcessRequest, ProcessRunner};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// What the fake compiler does when invoked.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Exit 0 with `<stem>.pdf`, `<stem>.log` and `<stem>.aux` written.
    Succeed,
    /// Exit 1 with the given log written.
    Fail { log: &'static str },
    /// Exit 1 without writing a log.
    FailWithoutLog,
    /// Exit 0 but no PDF.
    SucceedWithoutPdf,
    /// The runner gives up waiting.
    TimeOut,
    /// Writes the usual artifacts, then never returns.
    Hang,
}

/// One observed compiler invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub tex_file: PathBuf,
    /// The file's content at the time of the call.
    pub content: String,
    pub current_dir: Option<PathBuf>,
}

/// Emulates pdflatex: reads the positional `.tex` argument and writes the
/// name-derived artifacts into the `-output-directory=` directory.
#[derive(Debug, Clone)]
pub struct ScriptedRunner {
    outcome: Outcome,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl ScriptedRunner {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle on the invocations seen so far.
    pub fn invocations(&self) -> Arc<Mutex<Vec<Invocation>>> {
        Arc::clone(&self.invocations)
    }
}

impl ProcessRunner for ScriptedRunner {
    async fn run(&self, request: ProcessRequest) -> Result<ProcessOutput, ProcessError> {
        let output_dir = request
            .args
            .iter()
            .find_map(|a| a.to_str()?.strip_prefix("-output-directory=").map(PathBuf::from))
            .expect("output directory flag");
        let tex_file = PathBuf::from(request.args.last().expect("positional tex file"));
        let stem = tex_file.file_stem().expect("tex stem").to_string_lossy().into_owned();

        self.invocations.lock().unwrap().push(Invocation {
            tex_file: tex_file.clone(),
            content: fs::read_to_string(&tex_file).unwrap_or_default(),
            current_dir: request.current_dir.clone(),
        });

        let artifact = |ext: &str| output_dir.join(format!("{}.{}", stem, ext));
        let exit_code = match &self.outcome {
            Outcome::Succeed => {
                fs::write(artifact("pdf"), pdf_assertions::single_page_pdf(&format!("Rendered {}", stem))).unwrap();
                fs::write(artifact("log"), format!("Output written on {}.pdf (1 page).", stem)).unwrap();
                fs::write(artifact("aux"), "\\relax").unwrap();
                0
            }
            Outcome::Fail { log } => {
                fs::write(artifact("log"), log).unwrap();
                fs::write(artifact("aux"), "\\relax").unwrap();
                1
            }
            Outcome::FailWithoutLog => 1,
            Outcome::SucceedWithoutPdf => {
                fs::write(artifact("log"), "No pages of output.").unwrap();
                0
            }
            Outcome::Hang => {
                fs::write(artifact("pdf"), pdf_assertions::single_page_pdf("partial")).unwrap();
                fs::write(artifact("log"), "Output written on partial.pdf (1 page).").unwrap();
                fs::write(artifact("aux"), "\\relax").unwrap();
                fs::write(artifact("toc"), "").unwrap();
                return std::future::pending().await;
            }
            Outcome::TimeOut => {
                return Err(ProcessError::TimedOut {
                    program: request.program_name(),
                    after: request.timeout.unwrap_or(Duration::from_secs(1)),
                });
            }
        };

        Ok(ProcessOutput {
            exit_code: Some(exit_code),
            stdout: format!("This is pdfTeX, compiling {}", stem),
            stderr: String::new(),
        })
    }

    fn name(&self) -> &'static str {
        "ScriptedRunner"
    }
}

/// Log of a compile that referenced a package that is not installed.
pub const MISSING_PACKAGE_LOG: &str = "\
This is pdfTeX, Version 3.141592653-2.6-1.40.25 (TeX Live 2023)
(./letter.tex
LaTeX2e <2022-11-01> patch level 1
(/usr/share/texlive/texmf-dist/tex/latex/base/article.cls
Document Class: article 2022/07/02 v1.4n Standard LaTeX document class
)

! LaTeX Error: File `nonexistentpkg.sty' not found.

Type X to quit or <RETURN> to proceed,
or enter new name. (Default extension: sty)

Enter file name:
! Emergency stop.
<read *>

l.3 \\usepackage
                {nonexistentpkg}^^M
*** (cannot \\read from terminal in nonstop modes)
";

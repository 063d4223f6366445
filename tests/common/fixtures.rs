use super::ScriptedRunner;
use super::pdf_assertions::single_page_pdf;
use folio::{DocumentPipeline, InMemoryGenerationStore, PipelineBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const COVER_LETTER: &str = r"\documentclass{article}
\newcommand{\companyname}{Default Co}
\newcommand{\jobtitle}{Position}
\begin{document}
Dear \companyname, I am applying for \jobtitle.
\end{document}
";

pub const CV: &str = r"\documentclass{article}
\newcommand{\fullname}{Your Name}
\begin{document}
\fullname
\end{document}
";

/// A scratch data directory laid out like a template library, plus an
/// output directory.
pub struct Workspace {
    root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        for dir in ["data/cvs", "data/cover_letters", "data/attachments"] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root().join("data")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("output")
    }

    pub fn add_cv(&self, name: &str, content: &str) -> PathBuf {
        write(self.data_dir().join("cvs").join(name), content.as_bytes())
    }

    pub fn add_cover_letter(&self, name: &str, content: &str) -> PathBuf {
        write(self.data_dir().join("cover_letters").join(name), content.as_bytes())
    }

    pub fn add_attachment(&self, name: &str, text: &str) -> PathBuf {
        write(self.data_dir().join("attachments").join(name), &single_page_pdf(text))
    }

    /// Sorted file names currently in the output directory.
    pub fn output_files(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.output_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn pipeline(&self, runner: ScriptedRunner) -> DocumentPipeline<ScriptedRunner> {
        PipelineBuilder::new()
            .with_data_dir(self.data_dir())
            .with_output_dir(self.output_dir())
            .with_runner(runner)
            .build()
            .unwrap()
    }

    pub fn pipeline_with_store(
        &self,
        runner: ScriptedRunner,
    ) -> (DocumentPipeline<ScriptedRunner>, Arc<InMemoryGenerationStore>) {
        let store = Arc::new(InMemoryGenerationStore::new());
        let pipeline = PipelineBuilder::new()
            .with_data_dir(self.data_dir())
            .with_output_dir(self.output_dir())
            .with_runner(runner)
            .with_store(store.clone())
            .build()
            .unwrap();
        (pipeline, store)
    }
}

fn write(path: PathBuf, bytes: &[u8]) -> PathBuf {
    fs::write(&path, bytes).unwrap();
    path
}

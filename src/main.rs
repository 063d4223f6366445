//! folio command line interface.
//!
//! ```bash
//! # Render one template with variables
//! folio render data/cover_letters/letter.tex --var company_name="Globex Inc." --output-dir out
//!
//! # Assemble an application from the template library and merge it
//! folio --config folio.json assemble --cover-letter letter.tex --cv cv.tex \
//!     --attachment transcript.pdf --vars-file job.json --combine
//!
//! # Merge PDFs, classify a compiler log, list the library
//! folio merge out.pdf a.pdf b.pdf
//! folio diagnose out/cv.log
//! folio list
//! ```

use clap::{Args, Parser, Subcommand};
use folio::{
    ApplicationRequest, PipelineBuilder, PipelineConfig, PipelineError, VariableMap, merge_files, parse_log,
    summarize,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Assemble PDFs from LaTeX templates and variables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file (data_dir, output_dir, compiler)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile one template, substituting variables first
    Render {
        template: PathBuf,

        #[command(flatten)]
        vars: VarArgs,

        /// Overrides the configured output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Render cover letter and CV from the library, add attachments, optionally merge
    Assemble {
        /// File name in <data_dir>/cover_letters
        #[arg(long)]
        cover_letter: Option<String>,

        /// File name in <data_dir>/cvs
        #[arg(long)]
        cv: Option<String>,

        /// File name in <data_dir>/attachments (repeatable)
        #[arg(long = "attachment")]
        attachments: Vec<String>,

        #[command(flatten)]
        vars: VarArgs,

        /// Merge all documents into one file
        #[arg(long)]
        combine: bool,

        /// Prefix for the combined file name
        #[arg(long)]
        label: Option<String>,
    },

    /// Concatenate PDFs in the given order
    Merge {
        output: PathBuf,

        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Classify the errors in a compiler log
    Diagnose {
        log: PathBuf,

        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the templates and attachments in the library
    List,
}

#[derive(Args)]
struct VarArgs {
    /// Variable as key=value (repeatable, wins over --vars-file)
    #[arg(long = "var", value_parser = parse_key_val)]
    vars: Vec<(String, String)>,

    /// JSON object of string variables
    #[arg(long)]
    vars_file: Option<PathBuf>,
}

impl VarArgs {
    /// Returns (file variables, command-line variables).
    fn load(&self) -> Result<(VariableMap, VariableMap), PipelineError> {
        let from_file = match &self.vars_file {
            Some(path) => read_variables(path)?,
            None => VariableMap::new(),
        };
        let from_args = self.vars.iter().cloned().collect();
        Ok((from_file, from_args))
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn read_variables(path: &Path) -> Result<VariableMap, PipelineError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Config(format!("Failed to read variables '{}': {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&source)?)
}

async fn run(cli: Cli) -> Result<(), PipelineError> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Render {
            template,
            vars,
            output_dir,
        } => {
            let (mut variables, overrides) = vars.load()?;
            variables.overlay(&overrides);
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());

            let pipeline = PipelineBuilder::new().with_config(config).build()?;
            let rendered = pipeline
                .render_template(&template, Some(&variables), &output_dir)
                .await?;
            println!("{}", rendered.path().display());
        }
        Commands::Assemble {
            cover_letter,
            cv,
            attachments,
            vars,
            combine,
            label,
        } => {
            let (variables, custom_variables) = vars.load()?;
            let pipeline = PipelineBuilder::new().with_config(config).build()?;
            let assembly = pipeline
                .assemble(ApplicationRequest {
                    cover_letter,
                    cv,
                    attachments,
                    variables,
                    custom_variables,
                    combine,
                    label,
                })
                .await?;
            for document in &assembly.documents {
                log::info!("Included {}", document.display());
            }
            println!("{}", assembly.path.display());
        }
        Commands::Merge { output, inputs } => {
            let pages = merge_files(&inputs, &output)?;
            println!("{} ({} pages)", output.display(), pages);
        }
        Commands::Diagnose { log, json } => {
            let bytes = std::fs::read(&log)?;
            let diagnostics = parse_log(&String::from_utf8_lossy(&bytes));
            if json {
                println!("{}", serde_json::to_string_pretty(&diagnostics)?);
            } else {
                println!("{}", summarize(&diagnostics));
            }
        }
        Commands::List => {
            let pipeline = PipelineBuilder::new().with_config(config).build()?;
            let sections = [
                ("cover letters", pipeline.cover_letter_library().list("tex")?),
                ("cvs", pipeline.cv_library().list("tex")?),
                ("attachments", pipeline.attachment_library().list("pdf")?),
            ];
            for (title, names) in sections {
                println!("{}:", title);
                for name in names {
                    println!("  {}", name);
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(path) = e.path() {
                eprintln!("  file: {}", path.display());
            }
            ExitCode::FAILURE
        }
    }
}

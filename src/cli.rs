use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use anyhow::{Context, Result};

use crate::core::{Engine, FileReport};

#[derive(Parser)]
#[command(name = "commentsmith")]
#[command(about = "Extract functions from source files and write comments for them")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract every function from files or directories
    Extract {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Generate a comment for the single function in a prompt file
    Comment {
        /// Prompt file: task description followed by one function
        file: PathBuf,

        /// Print the request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// List known languages and whether they can be parsed
    Languages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run(&engine, &mut out).await
    }

    /// Run the command, writing results to `out`
    pub async fn run<W: Write>(self, engine: &Engine, out: &mut W) -> Result<()> {
        match self.command {
            Commands::Extract { paths, format } => {
                let mut reports = Vec::new();
                for path in &paths {
                    let found = engine
                        .extract_any(path)
                        .with_context(|| format!("Failed to scan {}", path.display()))?;
                    reports.extend(found);
                }
                write_reports(&reports, format, out)
            }
            Commands::Comment { file, dry_run } => {
                let content = std::fs::read(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let request = engine.prepare_comment(&file.to_string_lossy(), &content)?;

                if dry_run {
                    serde_json::to_writer_pretty(&mut *out, &request)?;
                    writeln!(out)?;
                } else {
                    let response = engine.comment(&request).await?;
                    writeln!(out, "{}", response.comment)?;
                }
                Ok(())
            }
            Commands::Languages => {
                for (language, parseable) in engine.languages() {
                    let status = if parseable { "parser available" } else { "detection only" };
                    writeln!(out, "{:<12}{}", language, status)?;
                }
                Ok(())
            }
        }
    }
}

fn write_reports<W: Write>(reports: &[FileReport], format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for report in reports {
                match report {
                    FileReport::Extracted(extraction) => {
                        writeln!(
                            out,
                            "{} ({}, {} functions)",
                            extraction.file, extraction.language, extraction.count
                        )?;
                        for function in &extraction.functions {
                            writeln!(
                                out,
                                "  {:>4}-{:<4} {}",
                                function.start_line,
                                function.end_line,
                                function.display_name()
                            )?;
                        }
                    }
                    FileReport::Failed { file, error } => {
                        writeln!(out, "{}: error: {}", file, error)?;
                    }
                }
            }
        }
    }
    Ok(())
}

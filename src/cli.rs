use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codereport")]
#[command(about = "Static analysis and report generation for Python code", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to codereport.json in the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a .py file or .zip archive and generate a full report
    Report {
        /// Path to the uploaded file
        path: PathBuf,

        /// Output directory for report artifacts (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate docstrings for undocumented definitions in one file
    Doc {
        /// Python file to document
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the review heuristics over one file
    Review {
        /// Python file to review
        file: PathBuf,
    },

    /// Run the bug-risk detectors over one file
    Bugs {
        /// Python file to scan
        file: PathBuf,
    },

    /// Compute code metrics for one file
    Metrics {
        /// Python file to measure
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: MetricsFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricsFormat {
    /// Human-readable key/value listing
    Terminal,
    /// JSON object
    Json,
}

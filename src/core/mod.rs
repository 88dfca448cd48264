pub mod ast;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-file aggregate computed by the metrics calculator. Recomputed on
/// every run; zero-valued when the file cannot be read or parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMetrics {
    pub line_count: usize,
    pub function_count: usize,
    pub class_count: usize,
    pub complexity: u32,
}

impl CodeMetrics {
    /// The degraded aggregate returned when analysis fails.
    pub fn zeroed() -> Self {
        Self {
            line_count: 0,
            function_count: 0,
            class_count: 0,
            complexity: 0,
        }
    }
}

/// The analysis outputs for one source file, combined into one report
/// section. Findings are plain diagnostic strings; degraded engines place
/// their error text in-band here instead of failing the batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileSection {
    pub file_name: String,
    pub metrics: CodeMetrics,
    pub documented_source: String,
    pub review_findings: Vec<String>,
    pub bug_findings: Vec<String>,
}

/// Which rendering path actually produced the artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Text,
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Text => "text/plain",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "txt",
        }
    }
}

/// A successfully produced report artifact. The caller owns the file and is
/// expected to delete it (and its parent request directory) once delivered.
#[derive(Clone, Debug)]
pub struct ReportOutcome {
    pub path: PathBuf,
    pub format: ReportFormat,
}

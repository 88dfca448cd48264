//! Report assembly: input resolution, per-file analysis, rendering.
//!
//! One request flows through a fixed sequence: resolve the upload into a
//! list of Python files, analyze each file with all four engines, render the
//! LaTeX document and compile it, and fall back to plain text when the
//! compiler is missing, fails, or times out. Per-file analysis failures
//! degrade in-band; only input resolution and a failed fallback are hard
//! errors.

pub mod compiler;
pub mod latex;
pub mod text;

use crate::analyzers::{bugs, docgen, metrics, review};
use crate::config::Config;
use crate::core::{FileSection, ReportFormat, ReportOutcome};
use crate::errors::{Error, Result};
use crate::io::arena::ReportArena;
use crate::io::archive::{collect_python_files, extract_zip};
use crate::io::{enforce_size_limit, read_file, write_file};
use crate::model::QualityModel;
use compiler::RenderStatus;
use std::path::{Path, PathBuf};
use std::time::Duration;

const TEX_NAME: &str = "project_report.tex";
const TEXT_NAME: &str = "project_report.txt";

pub struct ReportAssembler<'a> {
    config: &'a Config,
    model: &'a dyn QualityModel,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(config: &'a Config, model: &'a dyn QualityModel) -> Self {
        Self { config, model }
    }

    /// Run the full pipeline over one upload. `file_name` is the name the
    /// upload was submitted under; it selects the input handling and labels
    /// the report.
    pub fn generate(&self, input: &Path, file_name: &str) -> Result<ReportOutcome> {
        enforce_size_limit(input, self.config.max_upload_bytes)?;

        let arena = ReportArena::create(&self.config.output_dir)?;
        match self.generate_in(&arena, input, file_name) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                arena.discard_artifacts();
                Err(e)
            }
        }
    }

    fn generate_in(
        &self,
        arena: &ReportArena,
        input: &Path,
        file_name: &str,
    ) -> Result<ReportOutcome> {
        let files = resolve_inputs(input, file_name, arena)?;
        log::info!("Analyzing {} file(s) from {}", files.len(), file_name);

        let sections: Vec<FileSection> = files
            .iter()
            .map(|file| self.analyze_file(file, arena))
            .collect();
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        match self.render_primary(arena, file_name, &generated, &sections) {
            RenderStatus::Compiled(path) => {
                log::info!("Generated PDF report at {}", path.display());
                Ok(ReportOutcome {
                    path,
                    format: ReportFormat::Pdf,
                })
            }
            status => {
                log::warn!("Primary rendering unavailable ({status:?}), falling back to text");
                self.render_fallback(arena, file_name, &generated, &sections)
            }
        }
    }

    /// Run all four engines over one file, in order: metrics, docstrings,
    /// review, bugs. Every engine degrades in-band, so this cannot fail.
    fn analyze_file(&self, file: &Path, arena: &ReportArena) -> FileSection {
        let base = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());

        let metrics = metrics::calculate_metrics(file);

        let documented_path = arena.scratch().join(format!("doc_{base}"));
        let documented_source = if docgen::add_docstrings(file, &documented_path) {
            read_file(&documented_path).unwrap_or_else(|_| "No docstrings generated.".to_string())
        } else {
            "Failed to generate docstrings.".to_string()
        };

        FileSection {
            file_name: base,
            metrics,
            documented_source,
            review_findings: review::review_file(file, self.model),
            bug_findings: bugs::predict_bugs(file),
        }
    }

    fn render_primary(
        &self,
        arena: &ReportArena,
        file_name: &str,
        generated: &str,
        sections: &[FileSection],
    ) -> RenderStatus {
        let document = latex::render_document(file_name, generated, sections);
        let tex_path = arena.artifact_dir().join(TEX_NAME);
        if let Err(e) = write_file(&tex_path, &document) {
            return RenderStatus::CompilerFailed(format!("failed to write LaTeX source: {e}"));
        }

        compiler::compile(
            &self.config.compiler,
            &tex_path,
            arena.artifact_dir(),
            Duration::from_secs(self.config.compile_timeout_secs),
        )
    }

    fn render_fallback(
        &self,
        arena: &ReportArena,
        file_name: &str,
        generated: &str,
        sections: &[FileSection],
    ) -> Result<ReportOutcome> {
        let content = text::render_document(file_name, generated, sections);
        let path = arena.artifact_dir().join(TEXT_NAME);
        write_file(&path, &content)
            .map_err(|e| Error::Render(format!("failed to write text report: {e}")))?;
        log::info!("Generated text report at {}", path.display());
        Ok(ReportOutcome {
            path,
            format: ReportFormat::Text,
        })
    }
}

/// Resolve the upload into the list of Python files to analyze. A `.py`
/// upload is a one-element list; a `.zip` is expanded into the arena. An
/// unsupported extension, a corrupt archive, and an archive with no Python
/// members are distinct terminal errors.
fn resolve_inputs(input: &Path, file_name: &str, arena: &ReportArena) -> Result<Vec<PathBuf>> {
    if file_name.ends_with(".py") {
        Ok(vec![input.to_path_buf()])
    } else if file_name.ends_with(".zip") {
        let extracted = arena.scratch().join("extracted");
        extract_zip(input, &extracted)?;
        let files = collect_python_files(&extracted);
        if files.is_empty() {
            Err(Error::NoSourceFiles)
        } else {
            Ok(files)
        }
    } else {
        Err(Error::UnsupportedInput)
    }
}

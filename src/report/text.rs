//! Plain-text fallback rendering.
//!
//! Carries the same analytical content as the LaTeX document, as structured
//! text, for when the external compiler is unavailable or fails.

use crate::core::FileSection;
use std::fmt::Write;

pub fn render_document(file_name: &str, generated: &str, sections: &[FileSection]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project Report: {file_name}");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    let _ = writeln!(out, "Generated on {generated}\n");

    for section in sections {
        let _ = writeln!(out, "\nAnalysis of {}", section.file_name);
        out.push_str(&"-".repeat(50));
        out.push('\n');

        out.push_str("Code Metrics:\n");
        let _ = writeln!(out, "  Lines of Code: {}", section.metrics.line_count);
        let _ = writeln!(out, "  Functions: {}", section.metrics.function_count);
        let _ = writeln!(out, "  Classes: {}", section.metrics.class_count);
        let _ = writeln!(out, "  Cyclomatic Complexity: {}\n", section.metrics.complexity);

        out.push_str("Code with Docstrings:\n");
        out.push_str(&"-".repeat(30));
        out.push('\n');
        out.push_str(&section.documented_source);
        out.push_str("\n\n");

        out.push_str("Code Review Findings:\n");
        for finding in &section.review_findings {
            let _ = writeln!(out, "- {finding}");
        }
        out.push('\n');

        out.push_str("Bug Predictions:\n");
        for finding in &section.bug_findings {
            let _ = writeln!(out, "- {finding}");
        }
        out.push('\n');
    }

    out
}

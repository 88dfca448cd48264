//! Rule-based code review, with an optional qualitative model pass.
//!
//! Best-effort contract: the caller always receives a renderable list of
//! findings, never an error. Internal failures (unreadable file, parse
//! error, model error) become a single explanatory entry.

use crate::core::ast::{walk_suite, walk_suite_exprs, FnDef, ParsedModule};
use crate::io::read_file;
use crate::model::QualityModel;
use rustpython_parser::ast;
use std::collections::HashSet;
use std::path::Path;

/// A function body with more direct top-level statements than this gets a
/// refactor suggestion. Counts top-level statements only, not nested ones.
const MAX_BODY_STATEMENTS: usize = 20;

/// Confidence above which the model's quality verdict becomes a finding.
const MODEL_CONFIDENCE_THRESHOLD: f64 = 0.7;

pub const NO_ISSUES: &str = "No significant issues found.";

pub fn review_file(path: &Path, model: &dyn QualityModel) -> Vec<String> {
    match read_file(path) {
        Ok(source) => review_source(&source, path, model),
        Err(e) => vec![format!("Error during code review: {e}")],
    }
}

pub fn review_source(source: &str, path: &Path, model: &dyn QualityModel) -> Vec<String> {
    match try_review(source, path, model) {
        Ok(findings) if findings.is_empty() => vec![NO_ISSUES.to_string()],
        Ok(findings) => findings,
        Err(e) => vec![format!("Error during code review: {e}")],
    }
}

fn try_review(source: &str, path: &Path, model: &dyn QualityModel) -> anyhow::Result<Vec<String>> {
    let module = ParsedModule::parse(source, path)?;
    let mut findings = Vec::new();

    walk_suite(&module.body, &mut |stmt| {
        if let Some(func) = FnDef::from_stmt(stmt) {
            findings.extend(check_unused_parameters(stmt, &func));
            findings.extend(check_body_length(&func));
        }
    });

    if let Some(assessment) = model.assess(source)? {
        if assessment.confidence > MODEL_CONFIDENCE_THRESHOLD {
            findings.push(
                "Quality model detected potential quality issues; review for best practices."
                    .to_string(),
            );
        }
    }

    Ok(findings)
}

/// Declared positional parameters never referenced anywhere inside the
/// function subtree (including nested scopes). Unused names are listed
/// alphabetically for deterministic output.
fn check_unused_parameters(stmt: &ast::Stmt, func: &FnDef) -> Option<String> {
    let declared = func.param_names();
    if declared.is_empty() {
        return None;
    }

    let mut used: HashSet<&str> = HashSet::new();
    walk_suite_exprs(std::slice::from_ref(stmt), &mut |expr| {
        if let ast::Expr::Name(name) = expr {
            used.insert(name.id.as_str());
        }
    });

    let mut unused: Vec<&str> = declared
        .into_iter()
        .filter(|name| !used.contains(name))
        .collect();
    if unused.is_empty() {
        return None;
    }
    unused.sort_unstable();
    Some(format!(
        "Function '{}' has unused arguments: {}",
        func.name(),
        unused.join(", ")
    ))
}

fn check_body_length(func: &FnDef) -> Option<String> {
    if func.body().len() > MAX_BODY_STATEMENTS {
        Some(format!(
            "Function '{}' is too long; consider refactoring.",
            func.name()
        ))
    } else {
        None
    }
}

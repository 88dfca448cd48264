//! Per-file code metrics.

use crate::core::ast::{functions_in, walk_suite, FnDef, ParsedModule};
use crate::core::CodeMetrics;
use crate::errors::Result;
use crate::io::read_file;
use rustpython_parser::ast;
use std::path::Path;

/// Calculate metrics for one file. Failure (unreadable, unparseable) is
/// logged and degrades to the zeroed aggregate so batch report generation
/// stays resilient to individual bad files.
pub fn calculate_metrics(path: &Path) -> CodeMetrics {
    match read_file(path).and_then(|source| metrics_from_source(&source, path)) {
        Ok(metrics) => metrics,
        Err(e) => {
            log::error!("Error calculating metrics for {}: {}", path.display(), e);
            CodeMetrics::zeroed()
        }
    }
}

/// Simplified cyclomatic complexity: 1 (baseline path) plus, for every
/// function definition at any depth, the number of if / for / while / try
/// nodes anywhere in that function's subtree. The walk within a function is
/// unscoped, so a nested function's branches count toward both the inner
/// and the outer function.
pub fn metrics_from_source(source: &str, path: &Path) -> Result<CodeMetrics> {
    let module = ParsedModule::parse(source, path)?;

    let mut function_count = 0;
    let mut class_count = 0;
    walk_suite(&module.body, &mut |stmt| match stmt {
        ast::Stmt::FunctionDef(_) | ast::Stmt::AsyncFunctionDef(_) => function_count += 1,
        ast::Stmt::ClassDef(_) => class_count += 1,
        _ => {}
    });

    let mut complexity = 1;
    for func in functions_in(&module.body) {
        complexity += branch_count(&func);
    }

    Ok(CodeMetrics {
        line_count: source.lines().count(),
        function_count,
        class_count,
        complexity,
    })
}

fn branch_count(func: &FnDef) -> u32 {
    let mut count = 0;
    walk_suite(func.body(), &mut |stmt| {
        if matches!(
            stmt,
            ast::Stmt::If(_)
                | ast::Stmt::For(_)
                | ast::Stmt::AsyncFor(_)
                | ast::Stmt::While(_)
                | ast::Stmt::Try(_)
                | ast::Stmt::TryStar(_)
        ) {
            count += 1;
        }
    });
    count
}

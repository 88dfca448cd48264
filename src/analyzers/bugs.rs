//! Shallow, rule-based bug-risk detection.
//!
//! Three syntactic detectors, each applied to every matching node regardless
//! of scope: unconditional `while True` loops, calls to the dynamic
//! evaluation primitives, and division by a literal zero. Deliberately no
//! dataflow: a loop containing a `break` is still flagged, and a variable
//! that happens to hold zero is not.

use crate::core::ast::{walk_suite, walk_suite_exprs, ParsedModule};
use crate::io::read_file;
use rustpython_parser::ast;
use std::path::Path;

pub const NO_BUGS: &str = "No potential bugs detected.";

const UNSAFE_CALLS: [&str; 2] = ["eval", "exec"];

pub fn predict_bugs(path: &Path) -> Vec<String> {
    match read_file(path) {
        Ok(source) => predict_bugs_source(&source, path),
        Err(e) => vec![format!("Error during bug prediction: {e}")],
    }
}

pub fn predict_bugs_source(source: &str, path: &Path) -> Vec<String> {
    let module = match ParsedModule::parse(source, path) {
        Ok(module) => module,
        Err(e) => return vec![format!("Error during bug prediction: {e}")],
    };

    // (line, text) pairs so findings from the statement and expression
    // walks interleave in line order. No de-duplication across detectors.
    let mut found: Vec<(usize, String)> = Vec::new();

    walk_suite(&module.body, &mut |stmt| {
        if let ast::Stmt::While(while_stmt) = stmt {
            if is_literal_true(&while_stmt.test) {
                found.push((
                    module.line_of(while_stmt),
                    format!(
                        "Potential infinite loop at line {}: 'while True' without break.",
                        module.line_of(while_stmt)
                    ),
                ));
            }
        }
    });

    walk_suite_exprs(&module.body, &mut |expr| match expr {
        ast::Expr::Call(call) => {
            if let ast::Expr::Name(name) = call.func.as_ref() {
                if UNSAFE_CALLS.contains(&name.id.as_str()) {
                    found.push((
                        module.line_of(call),
                        format!(
                            "Use of unsafe function '{}' at line {}; consider safer alternatives.",
                            name.id,
                            module.line_of(call)
                        ),
                    ));
                }
            }
        }
        ast::Expr::BinOp(binop) => {
            if matches!(binop.op, ast::Operator::Div) && is_literal_zero(&binop.right) {
                found.push((
                    module.line_of(binop),
                    format!("Potential division by zero at line {}.", module.line_of(binop)),
                ));
            }
        }
        _ => {}
    });

    found.sort_by_key(|(line, _)| *line);
    let findings: Vec<String> = found.into_iter().map(|(_, text)| text).collect();
    if findings.is_empty() {
        vec![NO_BUGS.to_string()]
    } else {
        findings
    }
}

fn is_literal_true(expr: &ast::Expr) -> bool {
    matches!(
        expr,
        ast::Expr::Constant(c) if matches!(c.value, ast::Constant::Bool(true))
    )
}

fn is_literal_zero(expr: &ast::Expr) -> bool {
    match expr {
        ast::Expr::Constant(c) => match &c.value {
            ast::Constant::Int(i) => i.to_string() == "0",
            ast::Constant::Float(f) => *f == 0.0,
            _ => false,
        },
        _ => false,
    }
}

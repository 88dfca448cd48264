//! Python source parsing and syntax-tree traversal.
//!
//! Wraps `rustpython_parser` behind [`ParsedModule`], which pairs the parsed
//! statement suite with the original source text and a byte-offset line
//! index. All heuristic engines share the generic walkers defined here
//! instead of hand-rolling their own recursion over statement bodies.

use crate::errors::{Error, Result};
use rustpython_parser::ast::{self, Ranged};
use rustpython_parser::text_size::TextSize;
use rustpython_parser::Parse;
use std::path::{Path, PathBuf};

/// One parsed source file: the syntax tree plus everything needed to map
/// nodes back to lines and byte offsets in the original text.
#[derive(Debug)]
pub struct ParsedModule {
    pub path: PathBuf,
    pub source: String,
    pub body: ast::Suite,
    lines: LineIndex,
}

impl ParsedModule {
    /// Parse `source` into a module-level statement suite.
    ///
    /// Fails closed: malformed input yields a typed parse error, never a
    /// partial tree.
    pub fn parse(source: &str, path: &Path) -> Result<Self> {
        let body = ast::Suite::parse(source, &path.to_string_lossy())
            .map_err(|e| Error::parse(path, e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            source: source.to_string(),
            body,
            lines: LineIndex::new(source),
        })
    }

    /// 1-based line number of a node's start offset.
    pub fn line_of(&self, node: &impl Ranged) -> usize {
        self.lines.line_of(node.start().to_usize())
    }

    /// Byte offset of the start of the line containing `offset`.
    pub fn line_start(&self, offset: TextSize) -> usize {
        self.lines.line_start(self.lines.line_of(offset.to_usize()))
    }
}

/// Maps byte offsets to 1-based line numbers.
#[derive(Debug)]
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .char_indices()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }

    fn line_start(&self, line: usize) -> usize {
        self.starts[line - 1]
    }
}

/// A function definition, sync or async. The reference toolchain silently
/// skipped `async def`; here both flavors flow through every engine.
#[derive(Clone, Copy)]
pub enum FnDef<'a> {
    Sync(&'a ast::StmtFunctionDef),
    Async(&'a ast::StmtAsyncFunctionDef),
}

impl<'a> FnDef<'a> {
    pub fn from_stmt(stmt: &'a ast::Stmt) -> Option<Self> {
        match stmt {
            ast::Stmt::FunctionDef(f) => Some(Self::Sync(f)),
            ast::Stmt::AsyncFunctionDef(f) => Some(Self::Async(f)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Self::Sync(f) => f.name.as_str(),
            Self::Async(f) => f.name.as_str(),
        }
    }

    pub fn args(&self) -> &'a ast::Arguments {
        match self {
            Self::Sync(f) => &f.args,
            Self::Async(f) => &f.args,
        }
    }

    pub fn body(&self) -> &'a [ast::Stmt] {
        match self {
            Self::Sync(f) => &f.body,
            Self::Async(f) => &f.body,
        }
    }

    /// Declared positional parameter names, in declaration order.
    pub fn param_names(&self) -> Vec<&'a str> {
        self.args()
            .args
            .iter()
            .map(|a| a.def.arg.as_str())
            .collect()
    }
}

/// True when the first statement of a definition body is a string-literal
/// expression, i.e. an existing docstring.
pub fn has_docstring(body: &[ast::Stmt]) -> bool {
    matches!(
        body.first(),
        Some(ast::Stmt::Expr(e))
            if matches!(
                e.value.as_ref(),
                ast::Expr::Constant(c) if matches!(c.value, ast::Constant::Str(_))
            )
    )
}

/// Visit every statement in `suite`, including all nested bodies, in source
/// order (pre-order).
pub fn walk_suite<'a>(suite: &'a [ast::Stmt], visit: &mut dyn FnMut(&'a ast::Stmt)) {
    for stmt in suite {
        walk_stmt(stmt, visit);
    }
}

/// Visit `stmt` and every statement nested inside it.
pub fn walk_stmt<'a>(stmt: &'a ast::Stmt, visit: &mut dyn FnMut(&'a ast::Stmt)) {
    visit(stmt);
    for suite in child_suites(stmt) {
        walk_suite(suite, visit);
    }
}

/// Every function definition in `suite`, at any nesting depth.
pub fn functions_in<'a>(suite: &'a [ast::Stmt]) -> Vec<FnDef<'a>> {
    let mut found = Vec::new();
    walk_suite(suite, &mut |stmt| {
        if let Some(f) = FnDef::from_stmt(stmt) {
            found.push(f);
        }
    });
    found
}

/// The statement bodies directly nested under one statement.
fn child_suites(stmt: &ast::Stmt) -> Vec<&[ast::Stmt]> {
    use ast::Stmt::*;
    match stmt {
        FunctionDef(f) => vec![&f.body],
        AsyncFunctionDef(f) => vec![&f.body],
        ClassDef(c) => vec![&c.body],
        For(f) => vec![&f.body, &f.orelse],
        AsyncFor(f) => vec![&f.body, &f.orelse],
        While(w) => vec![&w.body, &w.orelse],
        If(i) => vec![&i.body, &i.orelse],
        With(w) => vec![&w.body],
        AsyncWith(w) => vec![&w.body],
        Match(m) => m.cases.iter().map(|c| c.body.as_slice()).collect(),
        Try(t) => {
            let mut suites: Vec<&[ast::Stmt]> = vec![&t.body];
            for handler in &t.handlers {
                let ast::ExceptHandler::ExceptHandler(h) = handler;
                suites.push(&h.body);
            }
            suites.push(&t.orelse);
            suites.push(&t.finalbody);
            suites
        }
        TryStar(t) => {
            let mut suites: Vec<&[ast::Stmt]> = vec![&t.body];
            for handler in &t.handlers {
                let ast::ExceptHandler::ExceptHandler(h) = handler;
                suites.push(&h.body);
            }
            suites.push(&t.orelse);
            suites.push(&t.finalbody);
            suites
        }
        _ => vec![],
    }
}

/// Visit every expression reachable from the statements in `suite`,
/// including expressions inside nested statement bodies.
pub fn walk_suite_exprs<'a>(suite: &'a [ast::Stmt], visit: &mut dyn FnMut(&'a ast::Expr)) {
    walk_suite(suite, &mut |stmt| {
        for expr in direct_exprs(stmt) {
            walk_expr(expr, visit);
        }
    });
}

/// The expressions appearing directly in one statement (not those inside
/// nested statement bodies).
fn direct_exprs(stmt: &ast::Stmt) -> Vec<&ast::Expr> {
    use ast::Stmt::*;
    let mut exprs: Vec<&ast::Expr> = Vec::new();
    match stmt {
        FunctionDef(f) => {
            exprs.extend(f.decorator_list.iter());
            collect_argument_exprs(&f.args, &mut exprs);
            if let Some(r) = &f.returns {
                exprs.push(r);
            }
        }
        AsyncFunctionDef(f) => {
            exprs.extend(f.decorator_list.iter());
            collect_argument_exprs(&f.args, &mut exprs);
            if let Some(r) = &f.returns {
                exprs.push(r);
            }
        }
        ClassDef(c) => {
            exprs.extend(c.bases.iter());
            exprs.extend(c.keywords.iter().map(|k| &k.value));
            exprs.extend(c.decorator_list.iter());
        }
        Return(r) => exprs.extend(r.value.as_deref()),
        Delete(d) => exprs.extend(d.targets.iter()),
        Assign(a) => {
            exprs.extend(a.targets.iter());
            exprs.push(&a.value);
        }
        AugAssign(a) => {
            exprs.push(&a.target);
            exprs.push(&a.value);
        }
        AnnAssign(a) => {
            exprs.push(&a.target);
            exprs.push(&a.annotation);
            exprs.extend(a.value.as_deref());
        }
        For(f) => {
            exprs.push(&f.target);
            exprs.push(&f.iter);
        }
        AsyncFor(f) => {
            exprs.push(&f.target);
            exprs.push(&f.iter);
        }
        While(w) => exprs.push(&w.test),
        If(i) => exprs.push(&i.test),
        With(w) => {
            for item in &w.items {
                exprs.push(&item.context_expr);
                exprs.extend(item.optional_vars.as_deref());
            }
        }
        AsyncWith(w) => {
            for item in &w.items {
                exprs.push(&item.context_expr);
                exprs.extend(item.optional_vars.as_deref());
            }
        }
        Match(m) => {
            exprs.push(&m.subject);
            for case in &m.cases {
                collect_pattern_exprs(&case.pattern, &mut exprs);
                exprs.extend(case.guard.as_deref());
            }
        }
        Raise(r) => {
            exprs.extend(r.exc.as_deref());
            exprs.extend(r.cause.as_deref());
        }
        Try(t) => {
            for handler in &t.handlers {
                let ast::ExceptHandler::ExceptHandler(h) = handler;
                exprs.extend(h.type_.as_deref());
            }
        }
        TryStar(t) => {
            for handler in &t.handlers {
                let ast::ExceptHandler::ExceptHandler(h) = handler;
                exprs.extend(h.type_.as_deref());
            }
        }
        Assert(a) => {
            exprs.push(&a.test);
            exprs.extend(a.msg.as_deref());
        }
        Expr(e) => exprs.push(&e.value),
        _ => {}
    }
    exprs
}

fn collect_argument_exprs<'a>(args: &'a ast::Arguments, exprs: &mut Vec<&'a ast::Expr>) {
    for arg in args
        .posonlyargs
        .iter()
        .chain(&args.args)
        .chain(&args.kwonlyargs)
    {
        exprs.extend(arg.def.annotation.as_deref());
        exprs.extend(arg.default.as_deref());
    }
    if let Some(vararg) = &args.vararg {
        exprs.extend(vararg.annotation.as_deref());
    }
    if let Some(kwarg) = &args.kwarg {
        exprs.extend(kwarg.annotation.as_deref());
    }
}

fn collect_pattern_exprs<'a>(pattern: &'a ast::Pattern, exprs: &mut Vec<&'a ast::Expr>) {
    use ast::Pattern::*;
    match pattern {
        MatchValue(p) => exprs.push(&p.value),
        MatchSingleton(_) | MatchStar(_) => {}
        MatchSequence(p) => {
            for sub in &p.patterns {
                collect_pattern_exprs(sub, exprs);
            }
        }
        MatchMapping(p) => {
            exprs.extend(p.keys.iter());
            for sub in &p.patterns {
                collect_pattern_exprs(sub, exprs);
            }
        }
        MatchClass(p) => {
            exprs.push(&p.cls);
            for sub in p.patterns.iter().chain(&p.kwd_patterns) {
                collect_pattern_exprs(sub, exprs);
            }
        }
        MatchAs(p) => {
            if let Some(sub) = &p.pattern {
                collect_pattern_exprs(sub, exprs);
            }
        }
        MatchOr(p) => {
            for sub in &p.patterns {
                collect_pattern_exprs(sub, exprs);
            }
        }
    }
}

/// Visit `expr` and every expression nested inside it, in source order.
pub fn walk_expr<'a>(expr: &'a ast::Expr, visit: &mut dyn FnMut(&'a ast::Expr)) {
    visit(expr);
    use ast::Expr::*;
    match expr {
        BoolOp(e) => {
            for v in &e.values {
                walk_expr(v, visit);
            }
        }
        NamedExpr(e) => {
            walk_expr(&e.target, visit);
            walk_expr(&e.value, visit);
        }
        BinOp(e) => {
            walk_expr(&e.left, visit);
            walk_expr(&e.right, visit);
        }
        UnaryOp(e) => walk_expr(&e.operand, visit),
        Lambda(e) => {
            for arg in e.args.posonlyargs.iter().chain(&e.args.args).chain(&e.args.kwonlyargs) {
                if let Some(default) = &arg.default {
                    walk_expr(default, visit);
                }
            }
            walk_expr(&e.body, visit);
        }
        IfExp(e) => {
            walk_expr(&e.test, visit);
            walk_expr(&e.body, visit);
            walk_expr(&e.orelse, visit);
        }
        Dict(e) => {
            for key in e.keys.iter().flatten() {
                walk_expr(key, visit);
            }
            for value in &e.values {
                walk_expr(value, visit);
            }
        }
        Set(e) => {
            for elt in &e.elts {
                walk_expr(elt, visit);
            }
        }
        ListComp(e) => {
            walk_expr(&e.elt, visit);
            walk_comprehensions(&e.generators, visit);
        }
        SetComp(e) => {
            walk_expr(&e.elt, visit);
            walk_comprehensions(&e.generators, visit);
        }
        DictComp(e) => {
            walk_expr(&e.key, visit);
            walk_expr(&e.value, visit);
            walk_comprehensions(&e.generators, visit);
        }
        GeneratorExp(e) => {
            walk_expr(&e.elt, visit);
            walk_comprehensions(&e.generators, visit);
        }
        Await(e) => walk_expr(&e.value, visit),
        Yield(e) => {
            if let Some(v) = &e.value {
                walk_expr(v, visit);
            }
        }
        YieldFrom(e) => walk_expr(&e.value, visit),
        Compare(e) => {
            walk_expr(&e.left, visit);
            for c in &e.comparators {
                walk_expr(c, visit);
            }
        }
        Call(e) => {
            walk_expr(&e.func, visit);
            for arg in &e.args {
                walk_expr(arg, visit);
            }
            for kw in &e.keywords {
                walk_expr(&kw.value, visit);
            }
        }
        FormattedValue(e) => {
            walk_expr(&e.value, visit);
            if let Some(spec) = &e.format_spec {
                walk_expr(spec, visit);
            }
        }
        JoinedStr(e) => {
            for v in &e.values {
                walk_expr(v, visit);
            }
        }
        Constant(_) | Name(_) => {}
        Attribute(e) => walk_expr(&e.value, visit),
        Subscript(e) => {
            walk_expr(&e.value, visit);
            walk_expr(&e.slice, visit);
        }
        Starred(e) => walk_expr(&e.value, visit),
        List(e) => {
            for elt in &e.elts {
                walk_expr(elt, visit);
            }
        }
        Tuple(e) => {
            for elt in &e.elts {
                walk_expr(elt, visit);
            }
        }
        Slice(e) => {
            for bound in [&e.lower, &e.upper, &e.step].into_iter().flatten() {
                walk_expr(bound, visit);
            }
        }
    }
}

fn walk_comprehensions<'a>(
    generators: &'a [ast::Comprehension],
    visit: &mut dyn FnMut(&'a ast::Expr),
) {
    for gen in generators {
        walk_expr(&gen.target, visit);
        walk_expr(&gen.iter, visit);
        for cond in &gen.ifs {
            walk_expr(cond, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(source: &str) -> ParsedModule {
        ParsedModule::parse(source, &PathBuf::from("test.py")).unwrap()
    }

    #[test]
    fn parse_failure_is_typed() {
        let err = ParsedModule::parse("def broken(:\n", &PathBuf::from("bad.py")).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn line_index_maps_offsets() {
        let index = LineIndex::new("a\nbb\nccc\n");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(5), 3);
        assert_eq!(index.line_start(3), 5);
    }

    #[test]
    fn walks_nested_statements() {
        let module = parse("def outer():\n    if x:\n        def inner():\n            pass\n");
        let mut names = Vec::new();
        for f in functions_in(&module.body) {
            names.push(f.name().to_string());
        }
        assert_eq!(names, vec!["outer", "inner"]);
    }

    #[test]
    fn async_defs_are_collected() {
        let module = parse("async def fetch():\n    pass\n");
        assert_eq!(functions_in(&module.body).len(), 1);
    }

    #[test]
    fn docstring_detection() {
        let documented = parse("def f():\n    \"\"\"doc\"\"\"\n    pass\n");
        let bare = parse("def f():\n    pass\n");
        let doc_fn = functions_in(&documented.body)[0];
        let bare_fn = functions_in(&bare.body)[0];
        assert!(has_docstring(doc_fn.body()));
        assert!(!has_docstring(bare_fn.body()));
    }

    #[test]
    fn expression_walk_reaches_nested_scopes() {
        let module = parse("def f(a):\n    return [x / a for x in range(10)]\n");
        let mut names = Vec::new();
        walk_suite_exprs(&module.body, &mut |expr| {
            if let rustpython_parser::ast::Expr::Name(n) = expr {
                names.push(n.id.to_string());
            }
        });
        assert!(names.contains(&"a".to_string()));
        assert!(names.contains(&"range".to_string()));
    }
}

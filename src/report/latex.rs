//! LaTeX document assembly for the primary rendering path.
//!
//! Everything interpolated into the markup (file names, findings, source
//! listings) passes through [`escape_latex`] first; findings and source are
//! untrusted text and unescaped insertion would corrupt or break the
//! document.

use crate::core::FileSection;
use std::fmt::Write;

/// Escape LaTeX special characters.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '#' => out.push_str(r"\#"),
            '$' => out.push_str(r"\$"),
            '%' => out.push_str(r"\%"),
            '&' => out.push_str(r"\&"),
            '_' => out.push_str(r"\_"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '~' => out.push_str(r"\~{}"),
            '^' => out.push_str(r"\^{}"),
            '\\' => out.push_str(r"\textbackslash{}"),
            '<' => out.push_str(r"\textless{}"),
            '>' => out.push_str(r"\textgreater{}"),
            '|' => out.push_str(r"\textbar{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the complete LaTeX source: title page, table of contents, project
/// overview, then one analysis section per file.
pub fn render_document(file_name: &str, generated: &str, sections: &[FileSection]) -> String {
    let mut doc = preamble(file_name);

    doc.push_str("\\section{Project Overview}\n");
    let _ = writeln!(
        doc,
        "\\textbf{{File Name:}} {}\\\\[0.2cm]",
        escape_latex(file_name)
    );
    let _ = writeln!(doc, "\\textbf{{Generated:}} {generated}\\\\[0.2cm]");
    doc.push_str(
        "\\textbf{Description:} Analysis of uploaded Python code with docstrings, \
         code review, bug predictions, and metrics.\n\n",
    );

    for section in sections {
        render_section(&mut doc, section);
    }

    doc.push_str("\\end{document}\n");
    doc
}

fn render_section(doc: &mut String, section: &FileSection) {
    let _ = writeln!(
        doc,
        "\\section{{Analysis of {}}}",
        escape_latex(&section.file_name)
    );

    doc.push_str("\\subsection{Code Metrics}\n\\begin{description}\n");
    let _ = writeln!(doc, "\\item[Lines of Code:] {}", section.metrics.line_count);
    let _ = writeln!(doc, "\\item[Functions:] {}", section.metrics.function_count);
    let _ = writeln!(doc, "\\item[Classes:] {}", section.metrics.class_count);
    let _ = writeln!(
        doc,
        "\\item[Cyclomatic Complexity:] {}",
        section.metrics.complexity
    );
    doc.push_str("\\end{description}\n\n");

    doc.push_str("\\subsection{Code with Docstrings}\n");
    doc.push_str("\\begin{lstlisting}[language=Python]\n");
    doc.push_str(&escape_latex(&section.documented_source));
    doc.push_str("\n\\end{lstlisting}\n");

    doc.push_str("\\subsection{Code Review Findings}\n");
    render_item_list(doc, &section.review_findings);

    doc.push_str("\\subsection{Bug Predictions}\n");
    render_item_list(doc, &section.bug_findings);
}

fn render_item_list(doc: &mut String, items: &[String]) {
    doc.push_str("\\begin{itemize}\n");
    for item in items {
        let _ = writeln!(doc, "\\item {}", escape_latex(item));
    }
    doc.push_str("\\end{itemize}\n");
}

fn preamble(file_name: &str) -> String {
    format!(
        r"\documentclass[a4paper,12pt]{{article}}
\usepackage[utf8]{{inputenc}}
\usepackage{{listings}}
\usepackage{{xcolor}}
\usepackage{{geometry}}
\usepackage{{times}}
\geometry{{margin=1in}}

\lstset{{
    language=Python,
    basicstyle=\ttfamily\small,
    showstringspaces=false,
    breaklines=true,
    frame=single,
    numbers=left,
    numberstyle=\tiny,
    numbersep=5pt
}}

\title{{Project Report: {}}}
\author{{codereport}}
\date{{\today}}

\begin{{document}}
\maketitle
\tableofcontents
\newpage
",
        escape_latex(file_name)
    )
}

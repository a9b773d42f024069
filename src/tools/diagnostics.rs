use crate::{
    language::errors::SyntaxError,
    navtree::{
        errors::{LoadError, LoadIssue},
        loader::LoadReport,
    },
};
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(code(navtree::syntax))]
pub struct SyntaxDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    message: String,
    label: String,
}

impl SyntaxDiagnostic {
    pub fn from_error(src: NamedSource<String>, err: SyntaxError) -> Self {
        Self {
            src,
            span: err.to_source_span(),
            help: err.help.clone(),
            message: err.message.clone(),
            label: err.label,
        }
    }
}

#[derive(Debug, Error, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(code(navtree::load), severity(Warning))]
pub struct IssueDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
    message: String,
}

pub fn emit_syntax_errors(path: &Path, text: &str, errors: &[SyntaxError]) {
    let src = NamedSource::new(path.display().to_string(), text.to_string());
    for err in errors {
        let diagnostic = SyntaxDiagnostic::from_error(src.clone(), err.clone());
        eprintln!("{:?}", Report::new(diagnostic));
    }
}

/// Builds a labeled diagnostic when the issue points into a known source.
pub fn issue_diagnostic(report: &LoadReport, issue: &LoadIssue) -> Option<IssueDiagnostic> {
    let span = issue.span?;
    let source = report.source_of(issue)?;
    Some(IssueDiagnostic {
        src: NamedSource::new(source.path.display().to_string(), source.text.clone()),
        span: span.into(),
        message: issue.kind.message(),
    })
}

pub fn emit_load_issues(report: &LoadReport) {
    for issue in &report.issues {
        match issue_diagnostic(report, issue) {
            Some(diagnostic) => eprintln!("{:?}", Report::new(diagnostic)),
            None => {
                let file = report
                    .source_of(issue)
                    .map(|source| source.path.display().to_string())
                    .unwrap_or_else(|| "<unknown>".into());
                eprintln!("warning: {file}: {}", issue.kind.message());
            }
        }
    }
}

pub fn report_load_error(error: &LoadError) {
    match error {
        LoadError::Syntax { path, text, errors } => emit_syntax_errors(path, text, &errors.errors),
        other => eprintln!("error: {other}"),
    }
}

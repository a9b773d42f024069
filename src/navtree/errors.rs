use crate::{
    config::ConfigError,
    language::{errors::SyntaxErrors, span::Span},
};
use std::path::PathBuf;
use thiserror::Error;

/// A navigation entry that does not have the `[label, target, children]`
/// shape. The loader skips such entries and keeps going.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedNodeError {
    #[error("navigation entry must be an array, found {found}")]
    NotAnEntry { found: &'static str },
    #[error("navigation entry must have 3 elements, found {found}")]
    WrongArity { found: usize },
    #[error("navigation label must be a string, found {found}")]
    NonStringLabel { found: &'static str },
    #[error("navigation target must be a string, found {found}")]
    NonStringTarget { found: &'static str },
    #[error("navigation children must be null, an array, or a script name, found {found}")]
    InvalidChildren { found: &'static str },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("{} has {} syntax error(s)", path.display(), errors.errors.len())]
    Syntax {
        path: PathBuf,
        text: String,
        errors: SyntaxErrors,
    },
    #[error("{} does not define `{binding}`", path.display())]
    MissingTree { path: PathBuf, binding: String },
    #[error("`{binding}` in {} must be an array, found {found}", path.display())]
    TreeNotArray {
        path: PathBuf,
        binding: String,
        found: &'static str,
        span: Span,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Something the loader recovered from. `file` indexes
/// [`LoadReport::sources`](super::loader::LoadReport::sources).
#[derive(Clone, Debug, PartialEq)]
pub struct LoadIssue {
    pub file: usize,
    pub span: Option<Span>,
    pub kind: LoadIssueKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadIssueKind {
    Malformed(MalformedNodeError),
    EmptyChildren { label: String },
    MissingIndex { binding: String },
    IndexNotArray { binding: String },
    NonStringIndexEntry { position: usize },
    UnsortedIndex { position: usize },
    DeferredUnavailable {
        script: String,
        path: PathBuf,
        reason: String,
    },
    DeferredSyntax { script: String, message: String },
    DeferredMissingBinding { script: String },
    DeferredNotArray { script: String },
    DeferredEmpty { script: String },
    DeferredCycle { script: String },
    DeferredTooDeep { script: String, limit: usize },
    DeferredTooLarge { script: String, limit: usize },
}

impl LoadIssueKind {
    pub fn message(&self) -> String {
        match self {
            LoadIssueKind::Malformed(err) => format!("skipped entry: {err}"),
            LoadIssueKind::EmptyChildren { label } => {
                format!("`{label}` has an empty child list; treating it as a leaf")
            }
            LoadIssueKind::MissingIndex { binding } => {
                format!("`{binding}` is not defined; the anchor index is empty")
            }
            LoadIssueKind::IndexNotArray { binding } => {
                format!("`{binding}` is not an array; the anchor index is empty")
            }
            LoadIssueKind::NonStringIndexEntry { position } => {
                format!("skipped index entry {position}: anchors must be strings")
            }
            LoadIssueKind::UnsortedIndex { position } => format!(
                "index entry {position} sorts before its predecessor; chunk lookups may miss"
            ),
            LoadIssueKind::DeferredUnavailable {
                script,
                path,
                reason,
            } => format!(
                "children `{script}` left unresolved: cannot read {}: {reason}",
                path.display()
            ),
            LoadIssueKind::DeferredSyntax { script, message } => {
                format!("children `{script}` left unresolved: {message}")
            }
            LoadIssueKind::DeferredMissingBinding { script } => {
                format!("children `{script}` left unresolved: script does not define `{script}`")
            }
            LoadIssueKind::DeferredNotArray { script } => {
                format!("children `{script}` left unresolved: `{script}` is not an array")
            }
            LoadIssueKind::DeferredEmpty { script } => {
                format!("children `{script}` left unresolved: script has no usable entries")
            }
            LoadIssueKind::DeferredCycle { script } => {
                format!("children `{script}` left unresolved: script includes itself")
            }
            LoadIssueKind::DeferredTooDeep { script, limit } => format!(
                "children `{script}` left unresolved: entries would nest deeper than {limit} levels"
            ),
            LoadIssueKind::DeferredTooLarge { script, limit } => format!(
                "children `{script}` left unresolved: tree would exceed {limit} entries"
            ),
        }
    }
}

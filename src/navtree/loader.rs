use super::{
    errors::{LoadError, LoadIssue, LoadIssueKind, MalformedNodeError},
    index::AnchorIndex,
    node::TreeNode,
    store::{NavigationStore, SyncMessages},
};
use crate::{
    config::NavConfig,
    language::{
        ast::{Binding, Literal, LiteralKind, Script},
        parser::parse_script,
        span::Span,
    },
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

pub const SYNC_ON_BINDING: &str = "SYNCONMSG";
pub const SYNC_OFF_BINDING: &str = "SYNCOFFMSG";

#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// A loaded store plus everything that was skipped or left unresolved on the
/// way. `sources[0]` is the main script; deferred scripts follow in the order
/// they were read.
#[derive(Clone, Debug)]
pub struct LoadReport {
    pub store: NavigationStore,
    pub issues: Vec<LoadIssue>,
    pub sources: Vec<SourceFile>,
}

impl LoadReport {
    pub fn source_of(&self, issue: &LoadIssue) -> Option<&SourceFile> {
        self.sources.get(issue.file)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

pub struct Loader<'a> {
    config: &'a NavConfig,
}

impl<'a> Loader<'a> {
    pub fn new(config: &'a NavConfig) -> Self {
        Self { config }
    }

    pub fn load_path(&self, path: &Path) -> Result<LoadReport, LoadError> {
        let text = fs::read_to_string(path).map_err(|error| LoadError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        self.load_source(path, text)
    }

    /// Loads script text that claims to come from `path`. The path names the
    /// script in diagnostics and locates deferred children.
    pub fn load_source(&self, path: &Path, text: String) -> Result<LoadReport, LoadError> {
        log::debug!("loading navigation script {}", path.display());
        let script = match parse_script(&text, self.config.max_depth) {
            Ok(script) => script,
            Err(errors) => {
                return Err(LoadError::Syntax {
                    path: path.to_path_buf(),
                    text,
                    errors,
                });
            }
        };

        let tree_binding = &self.config.tree_binding;
        let binding = script
            .binding(tree_binding)
            .ok_or_else(|| LoadError::MissingTree {
                path: path.to_path_buf(),
                binding: tree_binding.clone(),
            })?;
        let Some(items) = binding.value.as_array() else {
            return Err(LoadError::TreeNotArray {
                path: path.to_path_buf(),
                binding: tree_binding.clone(),
                found: binding.value.describe(),
                span: binding.value.span,
            });
        };

        let mut issues = Vec::new();
        let mut sources = vec![SourceFile {
            path: path.to_path_buf(),
            text,
        }];
        let root = self
            .config
            .resolve_deferred
            .then(|| self.config.deferred_root(path));
        let roots =
            Lowering::new(self.config, root, &mut issues, &mut sources).nodes(items, 0, 0);
        let index = lower_index(&script, &self.config.index_binding, &mut issues);
        let sync = lower_sync_messages(&script);

        let mut store = NavigationStore::new(roots, index);
        if let Some(sync) = sync {
            store = store.with_sync_messages(sync);
        }
        log::debug!(
            "loaded {} navigation entries and {} index anchors ({} issue(s))",
            store.node_count(),
            store.index().len(),
            issues.len()
        );

        Ok(LoadReport {
            store,
            issues,
            sources,
        })
    }
}

/// Turns parsed entries into [`TreeNode`]s, skipping malformed ones. With a
/// `root`, deferred references are replaced by the entries of
/// `<root>/<name>.js` as they are met.
struct Lowering<'l> {
    max_depth: usize,
    max_entries: usize,
    root: Option<PathBuf>,
    issues: &'l mut Vec<LoadIssue>,
    sources: &'l mut Vec<SourceFile>,
    cache: HashMap<String, Option<Vec<TreeNode>>>,
    active: Vec<String>,
    inlined: usize,
}

impl<'l> Lowering<'l> {
    fn new(
        config: &NavConfig,
        root: Option<PathBuf>,
        issues: &'l mut Vec<LoadIssue>,
        sources: &'l mut Vec<SourceFile>,
    ) -> Self {
        Self {
            max_depth: config.max_depth,
            max_entries: config.max_entries,
            root,
            issues,
            sources,
            cache: HashMap::new(),
            active: Vec::new(),
            inlined: 0,
        }
    }

    /// `depth` is the nesting level of `items` in the final tree; roots are 0.
    fn nodes(&mut self, items: &[Literal], file: usize, depth: usize) -> Vec<TreeNode> {
        let mut nodes = Vec::with_capacity(items.len());
        for item in items {
            match self.node(item, file, depth) {
                Ok(node) => nodes.push(node),
                Err(err) => {
                    log::warn!("skipping malformed navigation entry: {err}");
                    self.issue(file, Some(item.span), LoadIssueKind::Malformed(err));
                }
            }
        }
        nodes
    }

    fn node(
        &mut self,
        literal: &Literal,
        file: usize,
        depth: usize,
    ) -> Result<TreeNode, MalformedNodeError> {
        let fields = literal.as_array().ok_or(MalformedNodeError::NotAnEntry {
            found: literal.describe(),
        })?;
        let [label, target, children] = fields else {
            return Err(MalformedNodeError::WrongArity {
                found: fields.len(),
            });
        };
        let label = label.as_str().ok_or(MalformedNodeError::NonStringLabel {
            found: label.describe(),
        })?;
        let target = target.as_str().ok_or(MalformedNodeError::NonStringTarget {
            found: target.describe(),
        })?;

        match &children.kind {
            LiteralKind::Null => Ok(TreeNode::leaf(label, target)),
            LiteralKind::String(script) if script.is_empty() => {
                Err(MalformedNodeError::InvalidChildren {
                    found: "an empty script name",
                })
            }
            LiteralKind::String(script) if !is_script_name(script) => {
                Err(MalformedNodeError::InvalidChildren {
                    found: "a script name with characters other than letters, digits or `_`",
                })
            }
            LiteralKind::String(script) => {
                match self.inline(script, file, children.span, depth) {
                    Some(nodes) => Ok(TreeNode::branch(label, target, nodes)),
                    None => Ok(TreeNode::deferred(label, target, script.as_str())),
                }
            }
            LiteralKind::Array(items) if items.is_empty() => {
                log::warn!("`{label}` has an empty child list");
                self.issue(
                    file,
                    Some(children.span),
                    LoadIssueKind::EmptyChildren {
                        label: label.to_string(),
                    },
                );
                Ok(TreeNode::leaf(label, target))
            }
            LiteralKind::Array(items) => Ok(TreeNode::branch(
                label,
                target,
                self.nodes(items, file, depth + 1),
            )),
        }
    }

    /// Entries of `script` for a reference made at `depth`, or `None` when the
    /// reference stays deferred. Each script is read at most once; the merged
    /// tree never nests deeper than `max_depth` levels.
    fn inline(
        &mut self,
        script: &str,
        file: usize,
        span: Span,
        depth: usize,
    ) -> Option<Vec<TreeNode>> {
        let path = self.root.as_ref()?.join(format!("{script}.js"));
        let room = self.max_depth.saturating_sub(depth + 1);
        if room == 0 {
            self.too_deep(script, file, span);
            return None;
        }
        if self.active.iter().any(|name| name == script) {
            log::warn!("deferred script `{script}` includes itself");
            self.issue(
                file,
                Some(span),
                LoadIssueKind::DeferredCycle {
                    script: script.to_string(),
                },
            );
            return None;
        }
        if !self.cache.contains_key(script) {
            let loaded = self.read(script, path, file, span, depth + 1);
            self.cache.insert(script.to_string(), loaded);
        }

        let (height, len) = match self.cache.get(script) {
            Some(Some(nodes)) => (
                nodes.iter().map(TreeNode::height).max().unwrap_or(0),
                nodes.iter().map(TreeNode::subtree_len).sum::<usize>(),
            ),
            _ => return None,
        };
        if height > room {
            self.too_deep(script, file, span);
            return None;
        }
        if self.inlined + len > self.max_entries {
            log::warn!("inlining `{script}` would exceed {} entries", self.max_entries);
            self.issue(
                file,
                Some(span),
                LoadIssueKind::DeferredTooLarge {
                    script: script.to_string(),
                    limit: self.max_entries,
                },
            );
            return None;
        }
        self.inlined += len;
        self.cache.get(script).cloned().flatten()
    }

    fn read(
        &mut self,
        script: &str,
        path: PathBuf,
        from: usize,
        span: Span,
        depth: usize,
    ) -> Option<Vec<TreeNode>> {
        log::debug!("resolving deferred children from {}", path.display());
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) => {
                log::warn!("cannot read {}: {error}", path.display());
                self.issue(
                    from,
                    Some(span),
                    LoadIssueKind::DeferredUnavailable {
                        script: script.to_string(),
                        path,
                        reason: error.to_string(),
                    },
                );
                return None;
            }
        };

        let parsed = parse_script(&text, self.max_depth);
        let file = self.sources.len();
        self.sources.push(SourceFile { path, text });

        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(errors) => {
                for err in errors.errors {
                    self.issue(
                        file,
                        Some(err.span),
                        LoadIssueKind::DeferredSyntax {
                            script: script.to_string(),
                            message: err.message,
                        },
                    );
                }
                return None;
            }
        };

        let Some(binding) = parsed.binding(script) else {
            self.issue(
                file,
                None,
                LoadIssueKind::DeferredMissingBinding {
                    script: script.to_string(),
                },
            );
            return None;
        };
        let Some(items) = binding.value.as_array() else {
            self.issue(
                file,
                Some(binding.value.span),
                LoadIssueKind::DeferredNotArray {
                    script: script.to_string(),
                },
            );
            return None;
        };

        self.active.push(script.to_string());
        let nodes = self.nodes(items, file, depth);
        self.active.pop();

        if nodes.is_empty() {
            self.issue(
                file,
                Some(binding.value.span),
                LoadIssueKind::DeferredEmpty {
                    script: script.to_string(),
                },
            );
            return None;
        }
        Some(nodes)
    }

    fn too_deep(&mut self, script: &str, file: usize, span: Span) {
        log::warn!("deferred script `{script}` nests past {} levels", self.max_depth);
        self.issue(
            file,
            Some(span),
            LoadIssueKind::DeferredTooDeep {
                script: script.to_string(),
                limit: self.max_depth,
            },
        );
    }

    fn issue(&mut self, file: usize, span: Option<Span>, kind: LoadIssueKind) {
        self.issues.push(LoadIssue { file, span, kind });
    }
}

/// Doxygen names child scripts after identifiers; anything else could point
/// outside the site directory.
fn is_script_name(name: &str) -> bool {
    name.bytes()
        .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

fn lower_index(script: &Script, name: &str, issues: &mut Vec<LoadIssue>) -> AnchorIndex {
    let Some(binding) = script.binding(name) else {
        log::warn!("`{name}` is not defined; anchor index left empty");
        issues.push(LoadIssue {
            file: 0,
            span: None,
            kind: LoadIssueKind::MissingIndex {
                binding: name.to_string(),
            },
        });
        return AnchorIndex::default();
    };
    let Some(items) = binding.value.as_array() else {
        issues.push(LoadIssue {
            file: 0,
            span: Some(binding.value.span),
            kind: LoadIssueKind::IndexNotArray {
                binding: name.to_string(),
            },
        });
        return AnchorIndex::default();
    };

    let mut entries = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(anchor) => entries.push(anchor.to_string()),
            None => issues.push(LoadIssue {
                file: 0,
                span: Some(item.span),
                kind: LoadIssueKind::NonStringIndexEntry { position },
            }),
        }
    }

    let index = AnchorIndex::new(entries);
    if let Some(position) = index.first_unsorted() {
        log::warn!("anchor index is out of order at entry {position}");
        issues.push(LoadIssue {
            file: 0,
            span: Some(binding.value.span),
            kind: LoadIssueKind::UnsortedIndex { position },
        });
    }
    index
}

fn lower_sync_messages(script: &Script) -> Option<SyncMessages> {
    let text = |name: &str| {
        script
            .binding(name)
            .and_then(|binding: &Binding| binding.value.as_str())
            .map(str::to_string)
    };
    Some(SyncMessages {
        on: text(SYNC_ON_BINDING)?,
        off: text(SYNC_OFF_BINDING)?,
    })
}

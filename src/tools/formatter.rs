use crate::{
    config::NavConfig,
    navtree::{
        index::AnchorIndex,
        loader::{SYNC_OFF_BINDING, SYNC_ON_BINDING},
        node::{Children, TreeNode},
        store::{NavigationStore, SyncMessages},
    },
};
use serde::Serialize;

/// Writes the store back out in the layout Doxygen generates.
pub fn format_script(store: &NavigationStore, config: &NavConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("var {} =\n", config.tree_binding));
    out.push_str(&format_tree(store.roots()));
    out.push_str(";\n\n");
    out.push_str(&format!("var {} =\n", config.index_binding));
    out.push_str(&format_index(store.index()));
    out.push_str(";\n");
    if let Some(sync) = store.sync_messages() {
        out.push('\n');
        out.push_str(&format!(
            "var {SYNC_ON_BINDING} = {};\n",
            single_quoted(&sync.on)
        ));
        out.push_str(&format!(
            "var {SYNC_OFF_BINDING} = {};\n",
            single_quoted(&sync.off)
        ));
    }
    out
}

pub fn format_tree(roots: &[TreeNode]) -> String {
    let mut out = String::from("[\n");
    format_entries(&mut out, roots, 1);
    out.push(']');
    out
}

pub fn format_index(index: &AnchorIndex) -> String {
    let mut out = String::from("[\n");
    let entries: Vec<_> = index.entries().iter().map(|e| double_quoted(e)).collect();
    if !entries.is_empty() {
        out.push_str(&entries.join(",\n"));
        out.push('\n');
    }
    out.push(']');
    out
}

fn format_entries(out: &mut String, nodes: &[TreeNode], level: usize) {
    let prefix = "  ".repeat(level);
    for (idx, node) in nodes.iter().enumerate() {
        let separator = if idx + 1 < nodes.len() { "," } else { "" };
        let head = format!(
            "{prefix}[ {}, {}, ",
            double_quoted(node.label()),
            double_quoted(node.target())
        );
        out.push_str(&head);
        match node.children() {
            Children::Leaf => out.push_str(&format!("null ]{separator}\n")),
            Children::Deferred(script) => {
                out.push_str(&format!("{} ]{separator}\n", double_quoted(script)))
            }
            Children::Inline(children) => {
                out.push_str("[\n");
                format_entries(out, children, level + 1);
                out.push_str(&format!("{prefix}] ]{separator}\n"));
            }
        }
    }
}

fn double_quoted(text: &str) -> String {
    quoted(text, '"')
}

fn single_quoted(text: &str) -> String {
    quoted(text, '\'')
}

fn quoted(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch == quote => {
                out.push('\\');
                out.push(ch);
            }
            ch if (ch as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", ch as u32)),
            ch => out.push(ch),
        }
    }
    out.push(quote);
    out
}

#[derive(Serialize)]
struct JsonView<'a> {
    navtree: &'a [TreeNode],
    index: &'a AnchorIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    sync: Option<&'a SyncMessages>,
}

/// JSON rendering with the same positional entry shape as the script.
pub fn to_json(store: &NavigationStore) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonView {
        navtree: store.roots(),
        index: store.index(),
        sync: store.sync_messages(),
    })
}

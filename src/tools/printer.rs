use crate::navtree::{index::AnchorIndex, node::Children, store::NavigationStore};

/// Indented outline of the tree, one entry per line. Entries deeper than
/// `max_depth` are left out.
pub fn render_outline(store: &NavigationStore, max_depth: Option<usize>) -> String {
    let mut out = String::new();
    for visit in store.walk() {
        if max_depth.is_some_and(|limit| visit.depth > limit) {
            continue;
        }
        let node = visit.node;
        out.push_str(&"  ".repeat(visit.depth));
        out.push_str(&format!("{} ({})", node.label(), node.target()));
        if let Children::Deferred(script) = node.children() {
            out.push_str(&format!(" [+ {script}.js]"));
        }
        out.push('\n');
    }
    out
}

pub fn render_path(path: &[&str]) -> String {
    path.join(" > ")
}

pub fn render_index(index: &AnchorIndex) -> String {
    let mut out = String::new();
    for (position, entry) in index.entries().iter().enumerate() {
        out.push_str(&format!("navtreeindex{position}\t{entry}\n"));
    }
    out
}

pub fn print_summary(store: &NavigationStore, issues: usize) {
    println!(
        "{} entries, {} index chunks, {} deferred child script(s), {} issue(s)",
        store.node_count(),
        store.index().len(),
        store.deferred_scripts().len(),
        issues
    );
}

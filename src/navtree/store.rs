use super::{
    index::AnchorIndex,
    node::TreeNode,
    walk::{Visit, Walk},
};
use serde::Serialize;

/// The `SYNCONMSG`/`SYNCOFFMSG` tooltips that ship with the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncMessages {
    pub on: String,
    pub off: String,
}

/// Read-only navigation data for one documentation site.
///
/// Built once by [`Loader`](super::loader::Loader) and handed by reference to
/// whatever renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationStore {
    roots: Vec<TreeNode>,
    index: AnchorIndex,
    sync: Option<SyncMessages>,
    node_count: usize,
}

impl NavigationStore {
    pub fn new(roots: Vec<TreeNode>, index: AnchorIndex) -> Self {
        let node_count = Walk::unbounded(&roots).count();
        Self {
            roots,
            index,
            sync: None,
            node_count,
        }
    }

    pub fn with_sync_messages(mut self, sync: SyncMessages) -> Self {
        self.sync = Some(sync);
        self
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn index(&self) -> &AnchorIndex {
        &self.index
    }

    pub fn sync_messages(&self) -> Option<&SyncMessages> {
        self.sync.as_ref()
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.roots, self.node_count)
    }

    /// Target of the first root entry; where the viewer lands when the index
    /// has nothing better.
    pub fn home_target(&self) -> Option<&str> {
        self.roots.first().map(TreeNode::target)
    }

    pub fn find_node(&self, target: &str) -> Option<&TreeNode> {
        self.walk()
            .map(|visit| visit.node)
            .find(|node| node.target() == target)
    }

    /// Labels from the root down to the first entry whose target matches,
    /// that entry included.
    pub fn find_path(&self, target: &str) -> Option<Vec<&str>> {
        let mut path = Vec::new();
        for Visit { node, depth } in self.walk() {
            path.truncate(depth);
            path.push(node.label());
            if node.target() == target {
                return Some(path);
            }
        }
        None
    }

    /// Deferred child scripts still referenced by the tree, in walk order.
    pub fn deferred_scripts(&self) -> Vec<&str> {
        self.walk()
            .filter_map(|visit| visit.node.deferred_script())
            .collect()
    }
}

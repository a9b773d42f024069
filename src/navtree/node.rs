use serde::ser::{Serialize, SerializeTuple, Serializer};

/// One entry of the navigation tree: `[label, target, children]` in the
/// generated script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    label: String,
    target: String,
    children: Children,
}

/// Third element of a navigation entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Children {
    /// `null`: the entry has no children.
    Leaf,
    /// Inline child entries. Never empty.
    Inline(Vec<TreeNode>),
    /// Name of a separate script (`<name>.js`) defining `var <name> = [...]`.
    Deferred(String),
}

impl TreeNode {
    pub fn leaf(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            children: Children::Leaf,
        }
    }

    /// Builds an entry with inline children. An empty child list yields a leaf.
    pub fn branch(
        label: impl Into<String>,
        target: impl Into<String>,
        children: Vec<TreeNode>,
    ) -> Self {
        let children = if children.is_empty() {
            Children::Leaf
        } else {
            Children::Inline(children)
        };
        Self {
            label: label.into(),
            target: target.into(),
            children,
        }
    }

    pub fn deferred(
        label: impl Into<String>,
        target: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            children: Children::Deferred(script.into()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    /// Inline children, or an empty slice for leaves and deferred entries.
    pub fn child_nodes(&self) -> &[TreeNode] {
        match &self.children {
            Children::Inline(nodes) => nodes,
            Children::Leaf | Children::Deferred(_) => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.children, Children::Leaf)
    }

    pub fn deferred_script(&self) -> Option<&str> {
        match &self.children {
            Children::Deferred(name) => Some(name),
            _ => None,
        }
    }

    /// Number of entries in this subtree, the entry itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .child_nodes()
            .iter()
            .map(TreeNode::subtree_len)
            .sum::<usize>()
    }

    /// Levels of entries in this subtree; 1 for a leaf.
    pub fn height(&self) -> usize {
        1 + self
            .child_nodes()
            .iter()
            .map(TreeNode::height)
            .max()
            .unwrap_or(0)
    }
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entry = serializer.serialize_tuple(3)?;
        entry.serialize_element(&self.label)?;
        entry.serialize_element(&self.target)?;
        entry.serialize_element(&self.children)?;
        entry.end()
    }
}

impl Serialize for Children {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Children::Leaf => serializer.serialize_none(),
            Children::Inline(nodes) => nodes.serialize(serializer),
            Children::Deferred(name) => serializer.serialize_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_branch_collapses_to_leaf() {
        let node = TreeNode::branch("Backends", "usergroup0.html", Vec::new());
        assert!(node.is_leaf());
        assert!(node.child_nodes().is_empty());
    }

    #[test]
    fn subtree_len_counts_inline_descendants_only() {
        let node = TreeNode::branch(
            "Classes",
            "annotated.html",
            vec![
                TreeNode::deferred("Class List", "annotated.html", "annotated_dup"),
                TreeNode::branch(
                    "Class Members",
                    "functions.html",
                    vec![TreeNode::leaf("All", "functions.html")],
                ),
            ],
        );
        assert_eq!(node.subtree_len(), 4);
        assert_eq!(node.height(), 3);
    }

    #[test]
    fn serializes_as_positional_array() {
        let node = TreeNode::branch(
            "Namespaces",
            "namespaces.html",
            vec![
                TreeNode::deferred("Namespace List", "namespaces.html", "namespaces_dup"),
                TreeNode::leaf("Variables", "namespacemembers_vars.html"),
            ],
        );
        let value = serde_json::to_value(&node).expect("serializable");
        assert_eq!(
            value,
            json!([
                "Namespaces",
                "namespaces.html",
                [
                    ["Namespace List", "namespaces.html", "namespaces_dup"],
                    ["Variables", "namespacemembers_vars.html", null]
                ]
            ])
        );
    }
}

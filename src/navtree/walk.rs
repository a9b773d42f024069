use super::node::TreeNode;

#[derive(Clone, Copy, Debug)]
pub struct Visit<'a> {
    pub node: &'a TreeNode,
    pub depth: usize,
}

/// Depth-first, pre-order traversal over inline children.
///
/// The walk keeps an explicit stack instead of recursing and stops once it
/// has produced `budget` visits, so it terminates even on a corrupted tree.
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(&'a TreeNode, usize)>,
    budget: usize,
}

impl<'a> Walk<'a> {
    pub fn new(roots: &'a [TreeNode], budget: usize) -> Self {
        Self {
            stack: roots.iter().rev().map(|node| (node, 0)).collect(),
            budget,
        }
    }

    pub fn unbounded(roots: &'a [TreeNode]) -> Self {
        Self::new(roots, usize::MAX)
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Visit<'a>> {
        let (node, depth) = self.stack.pop()?;
        if self.budget == 0 {
            log::warn!(
                "navigation walk exhausted its visit budget at `{}`; stopping",
                node.label()
            );
            self.stack.clear();
            return None;
        }
        self.budget -= 1;
        self.stack.extend(
            node.child_nodes()
                .iter()
                .rev()
                .map(|child| (child, depth + 1)),
        );
        Some(Visit { node, depth })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TreeNode> {
        vec![
            TreeNode::leaf("A", "a.html"),
            TreeNode::branch(
                "B",
                "b.html",
                vec![
                    TreeNode::branch("B1", "b1.html", vec![TreeNode::leaf("B1a", "b1a.html")]),
                    TreeNode::deferred("B2", "b2.html", "b2_dup"),
                ],
            ),
            TreeNode::leaf("C", "c.html"),
        ]
    }

    #[test]
    fn visits_in_pre_order_with_depths() {
        let roots = sample();
        let visits: Vec<_> = Walk::unbounded(&roots)
            .map(|visit| (visit.node.label(), visit.depth))
            .collect();
        assert_eq!(
            visits,
            vec![("A", 0), ("B", 0), ("B1", 1), ("B1a", 2), ("B2", 1), ("C", 0)]
        );
    }

    #[test]
    fn stops_when_budget_is_spent() {
        let roots = sample();
        let labels: Vec<_> = Walk::new(&roots, 3).map(|v| v.node.label()).collect();
        assert_eq!(labels, vec!["A", "B", "B1"]);
    }

    #[test]
    fn empty_roots_yield_nothing() {
        assert_eq!(Walk::unbounded(&[]).count(), 0);
    }
}

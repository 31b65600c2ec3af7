//! Route reconstruction from a [`ShortestPathTree`].
//!
//! Both variants walk the predecessor relation backwards from the target.
//! The all-paths walk is a depth-first search over predecessor sets driven by
//! an explicit stack, so tie-heavy graphs cannot exhaust the call stack.

use evac_core::NodeId;

use crate::router::ShortestPathTree;

/// Follow the first predecessor of each node from the target back to the
/// source.  `None` if the target was not reached.
pub(crate) fn reconstruct_single(tree: &ShortestPathTree) -> Option<Vec<NodeId>> {
    let (source, target) = (tree.source(), tree.target());
    if source != target && tree.predecessors(target).is_empty() {
        return None;
    }

    let mut nodes = vec![target];
    let mut cur = target;
    while cur != source {
        // Every node on a recorded chain except the source has a predecessor.
        cur = *tree.predecessors(cur).first()?;
        nodes.push(cur);
    }
    nodes.reverse();
    Some(nodes)
}

/// Lazy enumeration of every tied-optimal path in a [`ShortestPathTree`].
///
/// Paths come out in depth-first order over predecessor insertion order: the
/// first yielded path is the one [`ShortestPathTree::route`] returns.
/// All yielded paths share the tree's total time and total distance.
///
/// The number of tied paths can grow exponentially with the number of tied
/// diamonds; take only what you need.
pub struct OptimalPaths<'t> {
    tree: &'t ShortestPathTree,
    /// `(node, index of the next predecessor to try)`, target at the bottom.
    stack: Vec<(NodeId, usize)>,
}

impl<'t> OptimalPaths<'t> {
    pub(crate) fn new(tree: &'t ShortestPathTree) -> Self {
        let stack = if tree.is_reachable() {
            vec![(tree.target(), 0)]
        } else {
            Vec::new()
        };
        Self { tree, stack }
    }
}

impl Iterator for OptimalPaths<'_> {
    type Item = Vec<NodeId>;

    fn next(&mut self) -> Option<Vec<NodeId>> {
        loop {
            let &(node, next_pred) = self.stack.last()?;

            if node == self.tree.source() {
                // Stack holds target..=source; reversed, that is the path.
                let path = self.stack.iter().rev().map(|&(n, _)| n).collect();
                self.stack.pop();
                return Some(path);
            }

            match self.tree.predecessors(node).get(next_pred) {
                Some(&pred) => {
                    if let Some(top) = self.stack.last_mut() {
                        top.1 += 1;
                    }
                    self.stack.push((pred, 0));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

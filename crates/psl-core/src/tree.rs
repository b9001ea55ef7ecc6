//! Transient rule tree built while parsing PSL text, before it is
//! flattened into a [`crate::Buffer`] by the builder.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::layout::NodeFlags;

/// One node of the in-memory rule tree. Children are keyed by label for
/// fast insertion; the builder sorts them into the length-major order the
/// matcher's binary search expects only once, at serialization time.
#[derive(Debug, Default)]
pub struct RuleNode {
    pub label: Vec<u8>,
    pub flags: NodeFlags,
    pub children: HashMap<Vec<u8>, RuleNode>,
}

impl RuleNode {
    pub fn root() -> Self {
        Self::default()
    }

    /// Inserts a rule given as its labels in right-to-left order (the same
    /// order `host.rsplit('.')` produces), creating intermediate nodes as
    /// needed. Only the final node in the path gets its flags set.
    pub fn insert(&mut self, labels: impl Iterator<Item = Vec<u8>>, exception: bool) {
        let mut node = self;
        for label in labels {
            node = node
                .children
                .entry(label.clone())
                .or_insert_with(|| RuleNode {
                    label,
                    flags: NodeFlags::empty(),
                    children: HashMap::new(),
                });
        }
        node.flags.insert(NodeFlags::TERMINUS);
        if exception {
            node.flags.insert(NodeFlags::EXCEPTION);
        }
    }

    /// Total number of nodes in this subtree, including self.
    pub fn count_nodes(&self) -> usize {
        1 + self.children.values().map(RuleNode::count_nodes).sum::<usize>()
    }

    /// Children sorted by the same length-major-then-lexicographic order
    /// the matcher's binary search relies on.
    pub fn sorted_children(&self) -> Vec<&RuleNode> {
        let mut children: Vec<&RuleNode> = self.children.values().collect();
        children.sort_by(|a, b| label_order(&a.label, &b.label));
        children
    }
}

/// Length-major-then-lexicographic comparator used both to sort a node's
/// children at build time and to binary search them at match time.
pub fn label_order(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

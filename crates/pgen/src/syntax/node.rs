use crate::syntax::{LineCol, SymbolId};
use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A concrete syntax tree node.
///
/// `children == None` marks a leaf built from a shifted token;
/// `children == Some(..)` marks a rule node, even while its list is still
/// empty during construction. A rule node is handed to its parent only once
/// its frame is popped, so every node reachable from a finished root is
/// complete.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Node {
    kind: SymbolId,
    text: Option<CompactString>,
    position: LineCol,
    children: Option<Vec<Node>>,
}

impl Node {
    /// Create a leaf for a shifted token
    #[must_use]
    pub fn leaf(kind: SymbolId, text: impl Into<CompactString>, position: LineCol) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            position,
            children: None,
        }
    }

    /// Create an empty rule node
    #[must_use]
    pub const fn branch(kind: SymbolId, position: LineCol) -> Self {
        Self {
            kind,
            text: None,
            position,
            children: Some(Vec::new()),
        }
    }

    /// Label kind for leaves, rule id for rule nodes
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> SymbolId {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> LineCol {
        self.position
    }

    #[inline]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Children of a rule node; empty for leaves
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.children.as_deref().unwrap_or(&[])
    }

    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children().get(index)
    }

    pub(crate) fn set_position(&mut self, position: LineCol) {
        self.position = position;
    }

    pub(crate) fn push_child(&mut self, child: Self) {
        if let Some(children) = &mut self.children {
            children.push(child);
        }
    }

    /// Text of every leaf below this node, left to right
    #[must_use]
    pub fn leaf_texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaf_texts(&mut out);
        out
    }

    fn collect_leaf_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.children {
            None => out.push(self.text.as_deref().unwrap_or_default()),
            Some(children) => {
                for child in children {
                    child.collect_leaf_texts(out);
                }
            }
        }
    }

    /// Total number of nodes in this subtree, itself included
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Self::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_has_no_children() {
        let leaf = Node::leaf(SymbolId(3), "1", LineCol::new(1, 0));
        assert!(leaf.is_leaf());
        assert!(leaf.children().is_empty());
        assert_eq!(leaf.text(), Some("1"));
    }

    #[test]
    fn test_empty_branch_is_not_leaf() {
        let node = Node::branch(SymbolId(256), LineCol::default());
        assert!(!node.is_leaf());
        assert!(node.children().is_empty());
        assert_eq!(node.text(), None);
    }

    #[test]
    fn test_push_child_ignored_on_leaf() {
        let mut leaf = Node::leaf(SymbolId(2), "x", LineCol::default());
        leaf.push_child(Node::leaf(SymbolId(2), "y", LineCol::default()));
        assert!(leaf.is_leaf());
    }

    #[test]
    fn test_leaf_texts_in_order() {
        let mut inner = Node::branch(SymbolId(257), LineCol::default());
        inner.push_child(Node::leaf(SymbolId(7), "+", LineCol::new(1, 2)));
        inner.push_child(Node::leaf(SymbolId(3), "2", LineCol::new(1, 4)));

        let mut root = Node::branch(SymbolId(256), LineCol::default());
        root.push_child(Node::leaf(SymbolId(3), "1", LineCol::new(1, 0)));
        root.push_child(inner);

        assert_eq!(root.leaf_texts(), vec!["1", "+", "2"]);
        assert_eq!(root.node_count(), 5);
    }
}

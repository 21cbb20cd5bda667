//! Scratch trie over path segments.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. A node is owned by
//! exactly one parent through its child map; detaching a node from its parent
//! orphans it inside the arena, which is dropped as a whole at the end of the
//! optimization pass.

use crate::error::{Result, RouteMinerError};
use crate::models::{Pattern, Segment};
use std::collections::BTreeMap;
use std::fmt;

/// Dense handle of a node inside a [`PathTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Debug, Clone)]
struct TreeNode {
    segment: Segment,
    children: BTreeMap<Segment, NodeId>,
}

/// Trie of pattern segments rooted at an empty static segment
#[derive(Debug, Clone)]
pub struct PathTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl PathTree {
    /// Create a tree holding only the root
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.allocate(Segment::new_static(""));
        tree
    }

    /// Insert every pattern, sharing nodes for common prefixes
    pub fn build<'a, I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = &'a Pattern>,
    {
        let mut tree = Self::new();
        for pattern in patterns {
            tree.insert(pattern);
        }
        tree
    }

    pub fn insert(&mut self, pattern: &Pattern) {
        let mut node = self.root;
        for segment in pattern.segments() {
            node = match self.child(node, segment) {
                Some(existing) => existing,
                None => {
                    let created = self.allocate(segment.clone());
                    self.attach(node, created);
                    created
                }
            };
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Nodes ever allocated, including orphaned ones
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn allocate(&mut self, segment: Segment) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            segment,
            children: BTreeMap::new(),
        });
        id
    }

    pub fn segment(&self, node: NodeId) -> &Segment {
        &self.nodes[node.0].segment
    }

    /// Children in segment order
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.values().copied().collect()
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.nodes[node.0].children.len()
    }

    pub fn child(&self, node: NodeId, segment: &Segment) -> Option<NodeId> {
        self.nodes[node.0].children.get(segment).copied()
    }

    /// Make `child` a child of `parent`, keyed by the child's own segment
    ///
    /// Returns the node previously stored under that key, if any.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        let segment = self.nodes[child.0].segment.clone();
        self.nodes[parent.0].children.insert(segment, child)
    }

    pub(crate) fn detach(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        let segment = self.nodes[child.0].segment.clone();
        self.nodes[parent.0].children.remove(&segment)
    }

    pub(crate) fn clear_children(&mut self, node: NodeId) {
        self.nodes[node.0].children.clear();
    }

    /// Union two trees whose roots carry the same segment
    ///
    /// Children present on one side only are kept; children present on both
    /// sides are unioned level by level through an explicit work list. Both
    /// inputs lose their children to the returned node.
    pub fn merge(&mut self, left: NodeId, right: NodeId) -> Result<NodeId> {
        if self.segment(left) != self.segment(right) {
            return Err(RouteMinerError::InvariantViolation {
                left: self.segment(left).key(),
                right: self.segment(right).key(),
            });
        }

        let merged = self.allocate(self.segment(left).clone());
        self.nodes[merged.0].children = std::mem::take(&mut self.nodes[left.0].children);

        // (target, incoming): move incoming's children under target
        let mut pending = vec![(merged, right)];
        while let Some((target, incoming)) = pending.pop() {
            let children = std::mem::take(&mut self.nodes[incoming.0].children);
            for (segment, child) in children {
                match self.nodes[target.0].children.get(&segment).copied() {
                    Some(existing) => pending.push((existing, child)),
                    None => {
                        self.nodes[target.0].children.insert(segment, child);
                    }
                }
            }
        }

        Ok(merged)
    }

    /// Root-to-leaf paths that contain at least one dynamic segment
    pub fn dynamic_patterns(&self) -> Vec<Pattern> {
        let mut patterns = Vec::new();
        let mut path: Vec<Segment> = Vec::new();
        // (node, segments from the root down to and including node)
        let mut stack: Vec<(NodeId, usize)> = vec![(self.root, 0)];

        while let Some((node, depth)) = stack.pop() {
            if depth > 0 {
                path.truncate(depth - 1);
                path.push(self.segment(node).clone());
            }

            let children = self.children(node);
            if children.is_empty() {
                if path.iter().any(Segment::is_dynamic) {
                    patterns.push(Pattern::new(path.clone(), 0));
                }
                continue;
            }
            // Reversed so the stack yields children in segment order
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        patterns
    }
}

impl Default for PathTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(paths: &[&str]) -> Vec<Pattern> {
        paths.iter().map(|path| Pattern::parse(path, 1)).collect()
    }

    fn rendered(patterns: &[Pattern]) -> Vec<String> {
        patterns.iter().map(Pattern::to_string).collect()
    }

    #[test]
    fn test_build_shares_prefixes() {
        let tree = PathTree::build(&patterns(&["/a/b", "/a/c", "/d/e"]));
        assert_eq!(tree.child_count(tree.root()), 2);
        let a = tree.child(tree.root(), &Segment::new_static("a")).unwrap();
        assert_eq!(tree.child_count(a), 2);
        // root + a + b + c + d + e
        assert_eq!(tree.allocated(), 6);
    }

    #[test]
    fn test_dynamic_patterns_only_returns_dynamic_leaves() {
        let tree = PathTree::build(&patterns(&["/a/:param", "/a/b", "/:param/c"]));
        assert_eq!(rendered(&tree.dynamic_patterns()), vec!["/a/:param", "/:param/c"]);
    }

    #[test]
    fn test_empty_tree_has_no_patterns() {
        let tree = PathTree::build(&patterns(&["/"]));
        assert!(tree.dynamic_patterns().is_empty());
        assert_eq!(tree.child_count(tree.root()), 0);
    }

    #[test]
    fn test_merge_unions_children_and_empties_inputs() {
        let mut tree = PathTree::new();
        let left = tree.allocate(Segment::new_static("x"));
        let right = tree.allocate(Segment::new_static("x"));
        for (parent, value) in [(left, "a"), (left, "b"), (right, "b"), (right, "c")] {
            let child = tree.allocate(Segment::new_static(value));
            tree.attach(parent, child);
        }
        let b_left = tree.child(left, &Segment::new_static("b")).unwrap();
        let leaf = tree.allocate(Segment::new_static("deep"));
        tree.attach(b_left, leaf);

        let merged = tree.merge(left, right).unwrap();

        assert_eq!(tree.child_count(merged), 3);
        assert_eq!(tree.child_count(left), 0);
        assert_eq!(tree.child_count(right), 0);
        let b = tree.child(merged, &Segment::new_static("b")).unwrap();
        assert!(tree.child(b, &Segment::new_static("deep")).is_some());
    }

    fn chain(tree: &mut PathTree, top: NodeId, depth: usize, leaf: &str) {
        let mut node = top;
        for _ in 0..depth {
            let next = tree.allocate(Segment::new_static("s"));
            tree.attach(node, next);
            node = next;
        }
        let end = tree.allocate(Segment::new_static(leaf));
        tree.attach(node, end);
    }

    #[test]
    fn test_merge_deep_chains() {
        let depth = 100_000;
        let mut tree = PathTree::new();
        let left = tree.allocate(Segment::new_static("x"));
        let right = tree.allocate(Segment::new_static("x"));
        chain(&mut tree, left, depth, "l");
        chain(&mut tree, right, depth, "r");

        let merged = tree.merge(left, right).unwrap();

        let mut node = merged;
        for _ in 0..depth {
            assert_eq!(tree.child_count(node), 1);
            node = tree.child(node, &Segment::new_static("s")).unwrap();
        }
        assert_eq!(tree.child_count(node), 2);
        assert_eq!(tree.child_count(right), 0);
    }

    #[test]
    fn test_dynamic_patterns_on_deep_chain() {
        let deep = format!("{}/:param", "/s".repeat(50_000));
        let flat = "/s".repeat(50_001);
        let tree = PathTree::build(&patterns(&[deep.as_str(), flat.as_str()]));
        let found = tree.dynamic_patterns();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].len(), 50_001);
        assert!(found[0].segments()[50_000].is_dynamic());
    }

    #[test]
    fn test_merge_rejects_different_roots() {
        let mut tree = PathTree::new();
        let left = tree.allocate(Segment::new_static("x"));
        let right = tree.allocate(Segment::new_dynamic());
        let err = tree.merge(left, right).unwrap_err();
        assert!(matches!(err, RouteMinerError::InvariantViolation { .. }));
    }

    #[test]
    fn test_detach_and_clear() {
        let mut tree = PathTree::build(&patterns(&["/a", "/b"]));
        let root = tree.root();
        let a = tree.child(root, &Segment::new_static("a")).unwrap();
        assert_eq!(tree.detach(root, a), Some(a));
        assert_eq!(tree.children(root).len(), 1);
        assert!(tree.child(root, &Segment::new_static("b")).is_some());
        tree.clear_children(root);
        assert_eq!(tree.child_count(root), 0);
    }
}

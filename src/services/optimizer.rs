//! Convergence optimizer: collapses over-wide subtrees of a [`PathTree`] into
//! dynamic nodes.
//!
//! A node whose child count exceeds the branching threshold is generalized.
//! Starting at its grandchildren, layers are scanned for a segment shared by
//! more than `threshold` nodes. The chains from the node down to those
//! convergent nodes are replaced by one dynamic node per layer, and the
//! convergent subtrees are unioned under the last dynamic node. When no layer
//! converges the whole subtree becomes a chain of dynamic nodes.

use super::tree::{NodeId, PathTree};
use crate::error::Result;
use crate::models::Segment;
use std::collections::BTreeMap;
use tracing::debug;

/// Counters describing what one optimization pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizeStats {
    /// Nodes that went through a collapse
    pub collapsed: usize,
    /// Collapses that found no convergent layer and dropped the subtree
    pub pruned: usize,
    /// Dynamic nodes created
    pub dynamic_nodes: usize,
}

/// Convergent groups found below a node
#[derive(Debug, Default)]
struct Convergence {
    groups: BTreeMap<Segment, Vec<NodeId>>,
    /// Number of layers between the node and the convergent nodes
    layers: usize,
}

/// Structural optimizer with a fixed branching threshold
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceOptimizer {
    threshold: usize,
}

impl ConvergenceOptimizer {
    /// Create an optimizer; a threshold below 1 is raised to 1
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Optimize the tree in place
    ///
    /// Uses an explicit work stack. A node that was collapsed is pushed back
    /// since its new child count may still exceed the threshold; otherwise its
    /// children are evaluated independently.
    pub fn optimize(&self, tree: &mut PathTree) -> Result<OptimizeStats> {
        let mut stats = OptimizeStats::default();
        let mut stack = vec![tree.root()];

        while let Some(node) = stack.pop() {
            if tree.child_count(node) > self.threshold {
                let convergence = self.find_convergent_nodes(tree, node);
                debug!(
                    node = %node,
                    layers = convergence.layers,
                    groups = convergence.groups.len(),
                    "Collapsing over-wide node"
                );

                if convergence.groups.is_empty() {
                    stats.pruned += 1;
                }
                excise_convergent_chains(tree, node, &convergence);
                stats.dynamic_nodes += insert_dynamic_layers(tree, node, convergence)?;
                stats.collapsed += 1;
                stack.push(node);
            } else {
                stack.extend(tree.children(node));
            }
        }

        Ok(stats)
    }

    /// Scan layers below `start` until one holds a convergent segment or the
    /// frontier runs out
    fn find_convergent_nodes(&self, tree: &PathTree, start: NodeId) -> Convergence {
        let mut layers = 1;
        let mut frontier = tree.children(start);

        loop {
            let mut next = Vec::new();
            let mut groups: BTreeMap<Segment, Vec<NodeId>> = BTreeMap::new();

            for &node in &frontier {
                for child in tree.children(node) {
                    groups
                        .entry(tree.segment(child).clone())
                        .or_default()
                        .push(child);
                    next.push(child);
                }
            }

            groups.retain(|_, nodes| nodes.len() > self.threshold);

            if !groups.is_empty() || next.is_empty() {
                return Convergence { groups, layers };
            }

            frontier = next;
            layers += 1;
        }
    }
}

/// Remove the structure the dynamic layers will stand for
///
/// Without convergent groups every child of `start` goes. Otherwise each
/// chain from `start` to a convergent node is cut at the convergent node and
/// ancestors left without children are removed, stopping at the first
/// ancestor that still has other children.
fn excise_convergent_chains(tree: &mut PathTree, start: NodeId, convergence: &Convergence) {
    if convergence.groups.is_empty() {
        tree.clear_children(start);
        return;
    }

    // start + intermediate layers + convergent node
    let chain_len = convergence.layers + 2;
    let mut chains: Vec<Vec<NodeId>> = Vec::new();
    let mut chain: Vec<NodeId> = Vec::new();
    // (node, chain length once node is appended)
    let mut stack: Vec<(NodeId, usize)> = vec![(start, 1)];

    while let Some((tip, len)) = stack.pop() {
        chain.truncate(len - 1);
        chain.push(tip);
        if len == chain_len {
            if convergence.groups.contains_key(tree.segment(tip)) {
                chains.push(chain.clone());
            }
            continue;
        }
        for child in tree.children(tip) {
            stack.push((child, len + 1));
        }
    }

    for chain in chains {
        for pair in chain.windows(2).rev() {
            let (parent, child) = (pair[0], pair[1]);
            tree.detach(parent, child);
            if tree.child_count(parent) > 0 {
                break;
            }
        }
    }
}

/// Hang one dynamic node per layer below `start`, then union each convergent
/// group under the last one. Returns the number of dynamic nodes created.
fn insert_dynamic_layers(
    tree: &mut PathTree,
    start: NodeId,
    convergence: Convergence,
) -> Result<usize> {
    let mut created = 0;
    let mut anchor = start;
    let dynamic = Segment::new_dynamic();

    for _ in 0..convergence.layers {
        anchor = match tree.child(anchor, &dynamic) {
            Some(existing) => existing,
            None => {
                let node = tree.allocate(dynamic.clone());
                tree.attach(anchor, node);
                created += 1;
                node
            }
        };
    }

    for (segment, nodes) in convergence.groups {
        let mut merged = tree.child(anchor, &segment);
        for node in nodes {
            merged = Some(match merged {
                Some(existing) => tree.merge(existing, node)?,
                None => node,
            });
        }
        if let Some(merged) = merged {
            tree.attach(anchor, merged);
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pattern;

    fn optimized(paths: &[&str], threshold: usize) -> (PathTree, OptimizeStats) {
        let patterns: Vec<Pattern> = paths.iter().map(|path| Pattern::parse(path, 1)).collect();
        let mut tree = PathTree::build(&patterns);
        let stats = ConvergenceOptimizer::new(threshold)
            .optimize(&mut tree)
            .unwrap();
        (tree, stats)
    }

    fn dynamic(tree: &PathTree) -> Vec<String> {
        tree.dynamic_patterns()
            .iter()
            .map(Pattern::to_string)
            .collect()
    }

    #[test]
    fn test_wide_leaf_layer_becomes_dynamic() {
        let (tree, stats) = optimized(&["/users/1", "/users/2", "/users/3", "/users/4"], 3);
        assert_eq!(dynamic(&tree), vec!["/users/:param"]);
        assert_eq!(stats.collapsed, 1);
        assert_eq!(stats.pruned, 1);
        assert_eq!(stats.dynamic_nodes, 1);
    }

    #[test]
    fn test_narrow_tree_is_untouched() {
        let (tree, stats) = optimized(&["/users/1", "/users/2", "/users/3", "/users/4"], 5);
        assert!(dynamic(&tree).is_empty());
        assert_eq!(stats, OptimizeStats::default());
    }

    #[test]
    fn test_convergent_suffix_is_kept() {
        let (tree, stats) = optimized(
            &[
                "/users/1/posts",
                "/users/2/posts",
                "/users/3/posts",
                "/users/4/posts",
            ],
            3,
        );
        assert_eq!(dynamic(&tree), vec!["/users/:param/posts"]);
        assert_eq!(stats.pruned, 0);
    }

    #[test]
    fn test_convergence_two_layers_down() {
        let (tree, _) = optimized(
            &[
                "/a/1/x/edit",
                "/a/2/y/edit",
                "/a/3/z/edit",
                "/a/4/w/edit",
            ],
            3,
        );
        assert_eq!(dynamic(&tree), vec!["/a/:param/:param/edit"]);
    }

    #[test]
    fn test_siblings_outside_the_chain_survive() {
        let (tree, _) = optimized(
            &[
                "/1/view",
                "/2/view",
                "/3/view",
                "/4/view",
                "/4/extra",
            ],
            3,
        );
        let root = tree.root();
        let four = tree.child(root, &Segment::new_static("4")).unwrap();
        assert!(tree.child(four, &Segment::new_static("extra")).is_some());
        assert!(tree.child(four, &Segment::new_static("view")).is_none());
        assert!(tree.child(root, &Segment::new_static("1")).is_none());
        assert_eq!(dynamic(&tree), vec!["/:param/view"]);
    }

    #[test]
    fn test_sibling_subtrees_are_judged_independently() {
        let (tree, _) = optimized(
            &[
                "/a/1", "/a/2", "/a/3", "/a/4", // wide
                "/b/1", "/b/2", // narrow
            ],
            3,
        );
        assert_eq!(dynamic(&tree), vec!["/a/:param"]);
        let b = tree.child(tree.root(), &Segment::new_static("b")).unwrap();
        assert_eq!(tree.child_count(b), 2);
    }

    #[test]
    fn test_zero_threshold_terminates() {
        let (tree, _) = optimized(&["/a/1", "/a/2"], 0);
        assert_eq!(ConvergenceOptimizer::new(0).threshold(), 1);
        assert_eq!(dynamic(&tree), vec!["/a/:param"]);
    }
}

use core::fmt::Debug;

use crate::QuantizedNode;

/// Node identity as seen by the search.
pub trait SearchNode: Clone + Debug {
    /// Whether `self` and `other` are the same search node. Need not be transitive, but
    /// must be reflexive and symmetric.
    fn matches(&self, other: &Self) -> bool;
}

impl SearchNode for QuantizedNode {
    fn matches(&self, other: &Self) -> bool {
        self.proximity_eq(other)
    }
}

/// Graph description consumed by [`search`](crate::search).
///
/// Implementations hold configuration only; they must not cache per-query scratch state,
/// so one descriptor can serve concurrent searches.
pub trait SearchGraph {
    type Node: SearchNode;

    /// Bucket key for the search's node table. Only nodes sharing a bucket are compared
    /// with [`SearchNode::matches`], so collisions are harmless.
    ///
    /// Nodes that match must share a bucket, otherwise the search keeps duplicates. An
    /// implementation may restrict that guarantee to the nodes its successors and callers
    /// actually produce, such as lattice-aligned ones.
    fn hash_bin(&self, node: &Self::Node) -> u64;

    /// Whether the node may appear on a path. Checked by the search for every successor.
    fn is_accessible(&self, node: &Self::Node) -> bool;

    /// Clears `out`, then fills it with every neighbor of `node` and the cost of the step
    /// to it. No accessibility filtering happens here.
    fn successors(&self, node: &Self::Node, out: &mut Vec<(Self::Node, f64)>);

    /// Estimated remaining cost; must never exceed the true cost.
    fn heuristic(&self, from: &Self::Node, to: &Self::Node) -> f64;
}

impl<G: SearchGraph + ?Sized> SearchGraph for &G {
    type Node = G::Node;

    fn hash_bin(&self, node: &Self::Node) -> u64 {
        (**self).hash_bin(node)
    }

    fn is_accessible(&self, node: &Self::Node) -> bool {
        (**self).is_accessible(node)
    }

    fn successors(&self, node: &Self::Node, out: &mut Vec<(Self::Node, f64)>) {
        (**self).successors(node, out)
    }

    fn heuristic(&self, from: &Self::Node, to: &Self::Node) -> f64 {
        (**self).heuristic(from, to)
    }
}

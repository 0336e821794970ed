use core::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::{SearchError, SearchGraph, SearchNode};

/// Caller-imposed bounds on one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Give up after this many node expansions. `None` explores until the reachable
    /// region is exhausted.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(max_expansions: usize) -> Self {
        Self {
            max_expansions: Some(max_expansions),
        }
    }
}

/// A found path, start first, goal last.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPath<N> {
    pub nodes: Vec<N>,
    pub cost: f64,
    pub expanded: usize,
}

#[derive(Debug)]
struct OpenEntry {
    f: f64,
    g: f64,
    slot: usize,
    tie: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.total_cmp(&self.g))
            .then_with(|| other.tie.cmp(&self.tie))
    }
}

#[derive(Debug)]
struct Record<N> {
    node: N,
    g: f64,
    parent: Option<usize>,
    closed: bool,
}

/// A* from `start` to `goal` over `graph`.
///
/// Every successor is checked with [`SearchGraph::is_accessible`] before it is queued.
/// Node identity goes through [`SearchGraph::hash_bin`] buckets and
/// [`SearchNode::matches`]; the goal is reached when a popped node matches it. Ties are
/// broken by insertion order, so identical inputs give identical paths.
pub fn search<G>(
    graph: &G,
    start: &G::Node,
    goal: &G::Node,
    limits: SearchLimits,
) -> Result<SearchPath<G::Node>, SearchError>
where
    G: SearchGraph + ?Sized,
{
    if !graph.is_accessible(start) {
        return Err(SearchError::StartBlocked);
    }
    if !graph.is_accessible(goal) {
        return Err(SearchError::GoalBlocked);
    }

    let mut records = vec![Record {
        node: start.clone(),
        g: 0.0,
        parent: None,
        closed: false,
    }];
    let mut bins: HashMap<u64, Vec<usize>> = HashMap::new();
    bins.entry(graph.hash_bin(start)).or_default().push(0);

    let mut open = BinaryHeap::new();
    let mut tie: u64 = 0;
    open.push(OpenEntry {
        f: graph.heuristic(start, goal),
        g: 0.0,
        slot: 0,
        tie,
    });
    tie += 1;

    let mut expanded = 0usize;
    let mut successors = Vec::with_capacity(8);

    while let Some(entry) = open.pop() {
        let record = &records[entry.slot];
        if record.closed || entry.g > record.g {
            // Stale heap entry.
            continue;
        }

        if record.node.matches(goal) {
            let path = reconstruct(&records, entry.slot, expanded);
            tracing::debug!(
                expanded,
                cost = path.cost,
                len = path.nodes.len(),
                "path found"
            );
            return Ok(path);
        }

        if let Some(limit) = limits.max_expansions {
            if expanded >= limit {
                tracing::debug!(limit, "search budget exhausted");
                return Err(SearchError::BudgetExhausted { limit });
            }
        }

        records[entry.slot].closed = true;
        expanded += 1;

        let current = records[entry.slot].node.clone();
        graph.successors(&current, &mut successors);
        tracing::trace!(node = ?current, g = entry.g, fanout = successors.len(), "expand");

        for (next, step) in successors.drain(..) {
            if !graph.is_accessible(&next) {
                continue;
            }

            let g = entry.g + step;
            let bin = graph.hash_bin(&next);
            let known = bins
                .get(&bin)
                .and_then(|slots| slots.iter().copied().find(|&s| records[s].node.matches(&next)));

            let slot = match known {
                Some(slot) => {
                    let record = &mut records[slot];
                    if record.closed || g >= record.g {
                        continue;
                    }
                    record.g = g;
                    record.parent = Some(entry.slot);
                    slot
                }
                None => {
                    records.push(Record {
                        node: next,
                        g,
                        parent: Some(entry.slot),
                        closed: false,
                    });
                    let slot = records.len() - 1;
                    bins.entry(bin).or_default().push(slot);
                    slot
                }
            };

            open.push(OpenEntry {
                f: g + graph.heuristic(&records[slot].node, goal),
                g,
                slot,
                tie,
            });
            tie += 1;
        }
    }

    tracing::debug!(expanded, "no path");
    Err(SearchError::NoPath { expanded })
}

fn reconstruct<N: Clone>(records: &[Record<N>], mut slot: usize, expanded: usize) -> SearchPath<N> {
    let cost = records[slot].g;
    let mut nodes = vec![records[slot].node.clone()];
    while let Some(prev) = records[slot].parent {
        slot = prev;
        nodes.push(records[slot].node.clone());
    }
    nodes.reverse();
    SearchPath {
        nodes,
        cost,
        expanded,
    }
}

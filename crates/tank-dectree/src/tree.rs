use tank_core::TickContext;
use tank_tools::{NullTraceSink, TraceEvent, TraceSink};

use crate::node::{Branch, BranchId, DecisionNode, Leaf, LeafId, NodeRef};
use crate::TreeError;

/// What a single evaluation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// A leaf was reached and its action ran.
    Fired { leaf: LeafId, name: &'static str },
    /// The branch `at` selected a child that is not wired. Nothing ran.
    NoTerminal { at: BranchId },
}

impl Decision {
    pub fn fired(&self) -> bool {
        matches!(self, Decision::Fired { .. })
    }

    pub fn leaf_name(&self) -> Option<&'static str> {
        match self {
            Decision::Fired { name, .. } => Some(*name),
            Decision::NoTerminal { .. } => None,
        }
    }
}

/// An immutable, validated decision tree over agents of type `A`.
///
/// Holds no per-agent state: one tree can drive any number of agents, from any number
/// of threads.
pub struct DecisionTree<A> {
    name: &'static str,
    branches: Vec<Branch<A>>,
    leaves: Vec<Leaf<A>>,
    root: NodeRef,
    depth: usize,
}

impl<A> core::fmt::Debug for DecisionTree<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecisionTree")
            .field("name", &self.name)
            .field("branches", &self.branches)
            .field("leaves", &self.leaves)
            .field("root", &self.root)
            .field("depth", &self.depth)
            .finish()
    }
}

impl<A> DecisionTree<A> {
    pub fn builder(name: &'static str) -> DecisionTreeBuilder<A> {
        DecisionTreeBuilder::new(name)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// Largest number of nodes any evaluation can visit.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn branches(&self) -> &[Branch<A>] {
        &self.branches
    }

    pub fn leaves(&self) -> &[Leaf<A>] {
        &self.leaves
    }

    pub fn branch(&self, id: BranchId) -> Option<&Branch<A>> {
        self.branches.get(id.0)
    }

    pub fn leaf(&self, id: LeafId) -> Option<&Leaf<A>> {
        self.leaves.get(id.0)
    }

    pub fn node(&self, node: NodeRef) -> Option<DecisionNode<'_, A>> {
        match node {
            NodeRef::Branch(id) => self.branch(id).map(DecisionNode::Branch),
            NodeRef::Leaf(id) => self.leaf(id).map(DecisionNode::Leaf),
        }
    }

    pub fn evaluate(&self, agent: &mut A, ctx: &TickContext) -> Decision {
        self.evaluate_traced(agent, ctx, &mut NullTraceSink)
    }

    /// Like [`evaluate`](Self::evaluate), emitting one trace event per visited node:
    /// `dectree.branch` (subject = branch, detail = predicate result), `dectree.halt`
    /// (subject = branch) and `dectree.leaf` (subject = leaf).
    pub fn evaluate_traced(
        &self,
        agent: &mut A,
        ctx: &TickContext,
        sink: &mut dyn TraceSink,
    ) -> Decision {
        let mut current = self.root;
        let mut visited = 0usize;

        loop {
            visited += 1;
            debug_assert!(visited <= self.depth, "tree `{}` walked past its depth", self.name);

            match current {
                NodeRef::Leaf(id) => {
                    let leaf = &self.leaves[id.0];
                    leaf.run(agent, ctx);
                    sink.emit(TraceEvent::at(ctx, "dectree.leaf").subject(id.0 as u64));
                    tracing::trace!(tree = self.name, leaf = leaf.name(), "action fired");
                    return Decision::Fired {
                        leaf: id,
                        name: leaf.name(),
                    };
                }
                NodeRef::Branch(id) => {
                    let branch = &self.branches[id.0];
                    let (taken, next) = branch.choose(agent, ctx);
                    sink.emit(
                        TraceEvent::at(ctx, "dectree.branch")
                            .subject(id.0 as u64)
                            .flag(taken),
                    );
                    tracing::trace!(tree = self.name, branch = branch.name(), taken);

                    match next {
                        Some(next) => current = next,
                        None => {
                            sink.emit(TraceEvent::at(ctx, "dectree.halt").subject(id.0 as u64));
                            tracing::trace!(
                                tree = self.name,
                                branch = branch.name(),
                                "no child wired, nothing to do"
                            );
                            return Decision::NoTerminal { at: id };
                        }
                    }
                }
            }
        }
    }
}

/// Collects nodes and wiring, then validates them into a [`DecisionTree`].
///
/// Ids handed out by one builder are only meaningful to that builder.
pub struct DecisionTreeBuilder<A> {
    name: &'static str,
    branches: Vec<Branch<A>>,
    wired: Vec<bool>,
    leaves: Vec<Leaf<A>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    Active,
    Done,
}

impl<A> DecisionTreeBuilder<A> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            branches: Vec::new(),
            wired: Vec::new(),
            leaves: Vec::new(),
        }
    }

    pub fn branch<F>(&mut self, name: &'static str, predicate: F) -> BranchId
    where
        F: Fn(&A, &TickContext) -> bool + Send + Sync + 'static,
    {
        self.branches.push(Branch::new(name, Box::new(predicate)));
        self.wired.push(false);
        BranchId(self.branches.len() - 1)
    }

    pub fn leaf<F>(&mut self, name: &'static str, action: F) -> LeafId
    where
        F: Fn(&mut A, &TickContext) + Send + Sync + 'static,
    {
        self.leaves.push(Leaf::new(name, Box::new(action)));
        LeafId(self.leaves.len() - 1)
    }

    /// Sets both children of `branch`. Each branch is wired exactly once; `None` leaves
    /// that outcome without a response.
    pub fn wire(
        &mut self,
        branch: BranchId,
        on_true: Option<NodeRef>,
        on_false: Option<NodeRef>,
    ) -> Result<&mut Self, TreeError> {
        self.check_branch(branch)?;
        for child in on_true.into_iter().chain(on_false) {
            self.check_ref(child)?;
        }

        if self.wired[branch.0] {
            return Err(TreeError::BranchRewired {
                tree: self.name,
                branch: self.branches[branch.0].name(),
            });
        }

        let node = &mut self.branches[branch.0];
        node.on_true = on_true;
        node.on_false = on_false;
        self.wired[branch.0] = true;
        Ok(self)
    }

    pub fn build(self, root: NodeRef) -> Result<DecisionTree<A>, TreeError> {
        self.check_ref(root)?;

        if let Some(idx) = self.wired.iter().position(|w| !w) {
            return Err(TreeError::UnwiredBranch {
                tree: self.name,
                branch: self.branches[idx].name(),
            });
        }

        let mut visits = vec![Visit::Unseen; self.branches.len()];
        let mut depths = vec![0usize; self.branches.len()];
        let mut leaf_seen = vec![false; self.leaves.len()];
        let depth = self.depth_from(root, &mut visits, &mut depths, &mut leaf_seen)?;

        for (branch, visit) in self.branches.iter().zip(&visits) {
            if *visit == Visit::Unseen {
                tracing::warn!(tree = self.name, branch = branch.name(), "unreachable branch");
            }
        }
        for (leaf, seen) in self.leaves.iter().zip(&leaf_seen) {
            if !seen {
                tracing::warn!(tree = self.name, leaf = leaf.name(), "unreachable leaf");
            }
        }

        tracing::debug!(
            tree = self.name,
            branches = self.branches.len(),
            leaves = self.leaves.len(),
            depth,
            "decision tree built"
        );

        Ok(DecisionTree {
            name: self.name,
            branches: self.branches,
            leaves: self.leaves,
            root,
            depth,
        })
    }

    // Longest node count from `node` to any terminal, rejecting back edges.
    fn depth_from(
        &self,
        node: NodeRef,
        visits: &mut [Visit],
        depths: &mut [usize],
        leaf_seen: &mut [bool],
    ) -> Result<usize, TreeError> {
        let id = match node {
            NodeRef::Leaf(id) => {
                leaf_seen[id.0] = true;
                return Ok(1);
            }
            NodeRef::Branch(id) => id.0,
        };

        match visits[id] {
            Visit::Done => return Ok(depths[id]),
            Visit::Active => {
                return Err(TreeError::Cycle {
                    tree: self.name,
                    branch: self.branches[id].name(),
                })
            }
            Visit::Unseen => {}
        }

        visits[id] = Visit::Active;
        let mut below = 0;
        for child in self.branches[id].children() {
            below = below.max(self.depth_from(child, visits, depths, leaf_seen)?);
        }
        visits[id] = Visit::Done;
        depths[id] = below + 1;
        Ok(depths[id])
    }

    fn check_branch(&self, id: BranchId) -> Result<(), TreeError> {
        if id.0 < self.branches.len() {
            Ok(())
        } else {
            Err(TreeError::UnknownBranch {
                tree: self.name,
                index: id.0,
            })
        }
    }

    fn check_ref(&self, node: NodeRef) -> Result<(), TreeError> {
        match node {
            NodeRef::Branch(id) => self.check_branch(id),
            NodeRef::Leaf(id) if id.0 < self.leaves.len() => Ok(()),
            NodeRef::Leaf(id) => Err(TreeError::UnknownLeaf {
                tree: self.name,
                index: id.0,
            }),
        }
    }
}

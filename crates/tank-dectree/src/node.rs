use core::fmt;

use tank_core::TickContext;

/// Read-only test against agent state. Must not have side effects.
pub type Predicate<A> = Box<dyn Fn(&A, &TickContext) -> bool + Send + Sync>;

/// Terminal behavior run against agent state.
pub type Action<A> = Box<dyn Fn(&mut A, &TickContext) + Send + Sync>;

/// Index of a branch inside the tree that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BranchId(pub(crate) usize);

impl BranchId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a leaf inside the tree that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeafId(pub(crate) usize);

impl LeafId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A child link. Absence of a child is expressed as `Option<NodeRef>::None` and means
/// "nothing wired here": evaluation stops without running an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Branch(BranchId),
    Leaf(LeafId),
}

impl From<BranchId> for NodeRef {
    fn from(id: BranchId) -> Self {
        NodeRef::Branch(id)
    }
}

impl From<LeafId> for NodeRef {
    fn from(id: LeafId) -> Self {
        NodeRef::Leaf(id)
    }
}

pub struct Branch<A> {
    name: &'static str,
    predicate: Predicate<A>,
    pub(crate) on_true: Option<NodeRef>,
    pub(crate) on_false: Option<NodeRef>,
}

impl<A> Branch<A> {
    pub(crate) fn new(name: &'static str, predicate: Predicate<A>) -> Self {
        Self {
            name,
            predicate,
            on_true: None,
            on_false: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn on_true(&self) -> Option<NodeRef> {
        self.on_true
    }

    pub fn on_false(&self) -> Option<NodeRef> {
        self.on_false
    }

    /// Runs the predicate and returns its result with the child it selects.
    pub fn choose(&self, agent: &A, ctx: &TickContext) -> (bool, Option<NodeRef>) {
        if (self.predicate)(agent, ctx) {
            (true, self.on_true)
        } else {
            (false, self.on_false)
        }
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = NodeRef> {
        self.on_true.into_iter().chain(self.on_false)
    }
}

impl<A> fmt::Debug for Branch<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branch")
            .field("name", &self.name)
            .field("on_true", &self.on_true)
            .field("on_false", &self.on_false)
            .finish_non_exhaustive()
    }
}

pub struct Leaf<A> {
    name: &'static str,
    action: Action<A>,
}

impl<A> Leaf<A> {
    pub(crate) fn new(name: &'static str, action: Action<A>) -> Self {
        Self { name, action }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn run(&self, agent: &mut A, ctx: &TickContext) {
        (self.action)(agent, ctx);
    }
}

impl<A> fmt::Debug for Leaf<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Outcome of visiting a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A branch selected a wired child.
    Next(NodeRef),
    /// A branch selected an absent child.
    Halt,
    /// A leaf ran its action.
    Fired,
}

/// Borrowed view of one node, whichever kind it is.
#[derive(Debug)]
pub enum DecisionNode<'t, A> {
    Branch(&'t Branch<A>),
    Leaf(&'t Leaf<A>),
}

impl<A> Clone for DecisionNode<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for DecisionNode<'_, A> {}

impl<'t, A> DecisionNode<'t, A> {
    pub fn name(&self) -> &'static str {
        match self {
            DecisionNode::Branch(b) => b.name(),
            DecisionNode::Leaf(l) => l.name(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, DecisionNode::Leaf(_))
    }

    /// Visits this node: a branch only reads the agent, a leaf runs its action.
    pub fn step(&self, agent: &mut A, ctx: &TickContext) -> Step {
        match self {
            DecisionNode::Branch(branch) => match branch.choose(agent, ctx).1 {
                Some(next) => Step::Next(next),
                None => Step::Halt,
            },
            DecisionNode::Leaf(leaf) => {
                leaf.run(agent, ctx);
                Step::Fired
            }
        }
    }
}

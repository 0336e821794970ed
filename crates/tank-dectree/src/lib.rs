//! Fixed binary decision trees for the tank bot.
//!
//! A tree is a set of branches (predicate + optional true/false children) and leaves
//! (actions), wired once at construction and never mutated afterwards. Evaluation walks
//! from the root to a leaf and runs its action, or stops at an absent child and does
//! nothing.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod error;
pub mod node;
pub mod registry;
pub mod tree;

pub use error::{RegistryError, TreeError};
pub use node::{Action, Branch, BranchId, DecisionNode, Leaf, LeafId, NodeRef, Predicate, Step};
pub use registry::{DecisionTrees, SharedDecisionTrees, TickDecisions, TreeKind};
pub use tree::{Decision, DecisionTree, DecisionTreeBuilder};

use thiserror::Error;

/// Problems found while wiring a tree. Evaluation itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("tree `{tree}`: no branch with index {index}")]
    UnknownBranch { tree: &'static str, index: usize },

    #[error("tree `{tree}`: no leaf with index {index}")]
    UnknownLeaf { tree: &'static str, index: usize },

    #[error("tree `{tree}`: branch `{branch}` is wired more than once")]
    BranchRewired {
        tree: &'static str,
        branch: &'static str,
    },

    #[error("tree `{tree}`: branch `{branch}` was never wired")]
    UnwiredBranch {
        tree: &'static str,
        branch: &'static str,
    },

    #[error("tree `{tree}`: branch `{branch}` can reach itself")]
    Cycle {
        tree: &'static str,
        branch: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("decision trees are already initialized")]
    AlreadyInitialized,

    #[error("decision trees have not been initialized")]
    NotInitialized,

    #[error(transparent)]
    Tree(#[from] TreeError),
}

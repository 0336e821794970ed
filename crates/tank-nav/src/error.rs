use thiserror::Error;

/// Why a path query produced no path. All of these are recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("start node is not accessible")]
    StartBlocked,

    #[error("goal node is not accessible")]
    GoalBlocked,

    #[error("goal unreachable after expanding {expanded} nodes")]
    NoPath { expanded: usize },

    #[error("gave up after {limit} expansions")]
    BudgetExhausted { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavConfigError {
    #[error("stride must be at least 2 for planning, got {0}")]
    StrideTooSmall(i32),

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidClearance { name: &'static str, value: f32 },

    #[error("max_expansions must be greater than zero")]
    ZeroBudget,
}

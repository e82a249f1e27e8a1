use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// The caller broke an input invariant (sizes, ordering, container or config values).
    #[error("invalid layout input: {0}")]
    InvalidInput(String),
    #[error("path {path:?} has no child {index} at depth {depth}")]
    InvalidPath {
        path: Vec<usize>,
        depth: usize,
        index: usize,
    },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

use crate::predictor::PredictorError;
use ego_tree::NodeId;
use thiserror::Error;

/// Errors that can occur during the tree search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Cannot pick a child of a node without children")]
    EmptyChildSelection,

    #[error("Prior surface has no valid probability for the move at ({x}, {y})")]
    InconsistentPrior { x: usize, y: usize },

    #[error("Node {0:?} is already expanded")]
    AlreadyExpanded(NodeId),

    #[error("Node {0:?} does not belong to this search tree")]
    UnknownNode(NodeId),

    #[error("Predictor returned a non-finite value: {0}")]
    NonFiniteValue(f64),

    #[error("Predictor error: {0}")]
    Predictor(#[from] PredictorError),
}

/// Convenience Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

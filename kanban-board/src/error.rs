//! Error types for the board engine

use crate::types::BoardId;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Board was never opened in this collection
    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    /// Every column template is already on the board
    #[error("no unused column template left for board {board_id}")]
    DuplicateColumn { board_id: String },

    /// A reorder or move index outside the target sequence
    #[error("{what} index {index} out of range for length {len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Persisted board state violates the data model invariants
    #[error("corrupt board state: {message}")]
    Corrupt { message: String },

    /// Saving to the durable store failed
    #[error(transparent)]
    Persistence(#[from] PersistenceFailure),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a board not found error
    pub fn board_not_found(id: &BoardId) -> Self {
        Self::BoardNotFound { id: id.to_string() }
    }

    /// Create a corrupt state error
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    /// Check an index against a sequence length
    pub(crate) fn check_index(what: &'static str, index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfRange { what, index, len })
        }
    }
}

/// A failed save, reported asynchronously through the board's update status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to save board {board_id}: {message}")]
pub struct PersistenceFailure {
    pub board_id: BoardId,
    pub message: String,
}

impl PersistenceFailure {
    pub fn new(board_id: BoardId, message: impl Into<String>) -> Self {
        Self {
            board_id,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::BoardNotFound { id: "b1".into() };
        assert_eq!(err.to_string(), "board not found: b1");
    }

    #[test]
    fn test_check_index() {
        assert!(BoardError::check_index("card", 2, 3).is_ok());
        let err = BoardError::check_index("card", 3, 3).unwrap_err();
        assert_eq!(err.to_string(), "card index 3 out of range for length 3");
    }

    #[test]
    fn test_persistence_failure_display() {
        let failure = PersistenceFailure::new(BoardId::from("b1"), "disk full");
        assert_eq!(failure.to_string(), "failed to save board b1: disk full");

        let err: BoardError = failure.clone().into();
        assert_eq!(err.to_string(), failure.to_string());
    }
}

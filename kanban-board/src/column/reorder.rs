//! ReorderColumn command

use crate::error::{BoardError, Result};
use crate::operation::{Applied, BoardOperation};
use crate::ordering::reorder;
use crate::sample::SampleData;
use crate::types::{BoardData, BoardId, LastOperation, Outcome, Trigger};
use serde::{Deserialize, Serialize};

/// Move a column to a new display position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderColumn {
    pub board_id: BoardId,
    /// Current display index of the column
    pub start_index: usize,
    /// Display index after the move
    pub finish_index: usize,
    #[serde(default)]
    pub trigger: Option<Trigger>,
}

impl ReorderColumn {
    /// Create a new ReorderColumn command
    pub fn new(board_id: impl Into<BoardId>, start_index: usize, finish_index: usize) -> Self {
        Self {
            board_id: board_id.into(),
            start_index,
            finish_index,
            trigger: None,
        }
    }

    /// Set the input modality
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }
}

impl BoardOperation for ReorderColumn {
    fn op_string(&self) -> &'static str {
        "reorder column"
    }

    fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    fn records_outcome(&self) -> bool {
        true
    }

    fn apply(&self, board: &mut BoardData, _sample: &mut SampleData) -> Result<Applied> {
        let len = board.ordered_column_ids.len();
        BoardError::check_index("column", self.start_index, len)?;
        BoardError::check_index("column", self.finish_index, len)?;

        let outcome = Outcome::ColumnReorder {
            column_id: board.ordered_column_ids[self.start_index].clone(),
            start_index: self.start_index,
            finish_index: self.finish_index,
        };

        board.ordered_column_ids =
            reorder(&board.ordered_column_ids, self.start_index, self.finish_index);
        board.last_operation = Some(LastOperation::new(outcome, self.trigger));

        Ok(Applied::Changed)
    }
}

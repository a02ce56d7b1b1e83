//! MoveCard command

use crate::error::{BoardError, Result};
use crate::operation::{Applied, BoardOperation, SkipReason};
use crate::sample::SampleData;
use crate::types::{BoardData, BoardId, ColumnId, LastOperation, Outcome, Trigger};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Move a card from one column into another.
///
/// Same-column moves are skipped; those go through `ReorderCard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCard {
    pub board_id: BoardId,
    pub start_column_id: ColumnId,
    pub finish_column_id: ColumnId,
    /// Index of the card in the source column
    pub item_index_in_start_column: usize,
    /// Insertion index in the destination; the front when omitted
    #[serde(default)]
    pub item_index_in_finish_column: Option<usize>,
    /// Input modality, recorded as keyboard when omitted
    #[serde(default)]
    pub trigger: Option<Trigger>,
}

impl MoveCard {
    /// Create a MoveCard command that inserts at the front of the destination
    pub fn new(
        board_id: impl Into<BoardId>,
        start_column_id: impl Into<ColumnId>,
        finish_column_id: impl Into<ColumnId>,
        item_index_in_start_column: usize,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            start_column_id: start_column_id.into(),
            finish_column_id: finish_column_id.into(),
            item_index_in_start_column,
            item_index_in_finish_column: None,
            trigger: None,
        }
    }

    /// Set the insertion index in the destination column
    pub fn at_index(mut self, index: usize) -> Self {
        self.item_index_in_finish_column = Some(index);
        self
    }

    /// Set the input modality
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }
}

impl BoardOperation for MoveCard {
    fn op_string(&self) -> &'static str {
        "move card"
    }

    fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    fn records_outcome(&self) -> bool {
        true
    }

    fn apply(&self, board: &mut BoardData, _sample: &mut SampleData) -> Result<Applied> {
        if self.start_column_id == self.finish_column_id {
            debug!(column = %self.start_column_id, "cross-column move within one column ignored");
            return Ok(Applied::Skipped(SkipReason::SameColumn));
        }

        let (Some(source), Some(destination)) = (
            board.column(&self.start_column_id),
            board.column(&self.finish_column_id),
        ) else {
            return Ok(Applied::Skipped(SkipReason::ColumnNotFound));
        };

        let finish_index = self.item_index_in_finish_column.unwrap_or(0);
        BoardError::check_index("card", self.item_index_in_start_column, source.items.len())?;
        // inserting one past the end appends
        BoardError::check_index("destination", finish_index, destination.items.len() + 1)?;

        let card = match board.column_map.get_mut(&self.start_column_id) {
            Some(source) => source.items.remove(self.item_index_in_start_column),
            None => return Ok(Applied::Skipped(SkipReason::ColumnNotFound)),
        };
        if let Some(destination) = board.column_map.get_mut(&self.finish_column_id) {
            destination.items.insert(finish_index, card);
        }

        board.last_operation = Some(LastOperation::new(
            Outcome::CardMove {
                finish_column_id: self.finish_column_id.clone(),
                item_index_in_start_column: self.item_index_in_start_column,
                item_index_in_finish_column: finish_index,
            },
            Some(self.trigger.unwrap_or(Trigger::Keyboard)),
        ));

        Ok(Applied::Changed)
    }
}

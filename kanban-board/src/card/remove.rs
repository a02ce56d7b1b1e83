//! RemoveCard command

use crate::error::Result;
use crate::operation::{Applied, BoardOperation, SkipReason};
use crate::sample::SampleData;
use crate::types::{BoardData, BoardId, CardId, ColumnId};
use serde::{Deserialize, Serialize};

/// Remove a card from a column. Removing a missing card is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveCard {
    pub board_id: BoardId,
    pub column_id: ColumnId,
    pub user_id: CardId,
}

impl RemoveCard {
    /// Create a new RemoveCard command
    pub fn new(
        board_id: impl Into<BoardId>,
        column_id: impl Into<ColumnId>,
        user_id: impl Into<CardId>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            column_id: column_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl BoardOperation for RemoveCard {
    fn op_string(&self) -> &'static str {
        "remove card"
    }

    fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    fn apply(&self, board: &mut BoardData, _sample: &mut SampleData) -> Result<Applied> {
        let Some(column) = board.column_map.get_mut(&self.column_id) else {
            return Ok(Applied::Skipped(SkipReason::ColumnNotFound));
        };
        let Some(index) = column.card_index(&self.user_id) else {
            return Ok(Applied::Skipped(SkipReason::CardNotFound));
        };

        column.items.remove(index);
        Ok(Applied::Changed)
    }
}

//! ReorderCard command

use crate::error::{BoardError, Result};
use crate::operation::{Applied, BoardOperation, SkipReason};
use crate::ordering::reorder;
use crate::sample::SampleData;
use crate::types::{BoardData, BoardId, ColumnId, LastOperation, Outcome, Trigger};
use serde::{Deserialize, Serialize};

/// Move a card within its column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderCard {
    pub board_id: BoardId,
    pub column_id: ColumnId,
    pub start_index: usize,
    pub finish_index: usize,
    #[serde(default)]
    pub trigger: Option<Trigger>,
}

impl ReorderCard {
    /// Create a new ReorderCard command
    pub fn new(
        board_id: impl Into<BoardId>,
        column_id: impl Into<ColumnId>,
        start_index: usize,
        finish_index: usize,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            column_id: column_id.into(),
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

impl BoardOperation for ReorderCard {
    fn op_string(&self) -> &'static str {
        "reorder card"
    }

    fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    fn records_outcome(&self) -> bool {
        true
    }

    fn apply(&self, board: &mut BoardData, _sample: &mut SampleData) -> Result<Applied> {
        let Some(column) = board.column_map.get_mut(&self.column_id) else {
            return Ok(Applied::Skipped(SkipReason::ColumnNotFound));
        };

        let len = column.items.len();
        BoardError::check_index("card", self.start_index, len)?;
        BoardError::check_index("card", self.finish_index, len)?;

        column.items = reorder(&column.items, self.start_index, self.finish_index);
        board.last_operation = Some(LastOperation::new(
            Outcome::CardReorder {
                column_id: self.column_id.clone(),
                start_index: self.start_index,
                finish_index: self.finish_index,
            },
            self.trigger,
        ));

        Ok(Applied::Changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{abc_board, deterministic_sample, item_ids};

    #[test]
    fn test_reorder_card() {
        let mut board = abc_board();
        ReorderCard::new("b1", "A", 2, 0)
            .with_trigger(Trigger::Keyboard)
            .apply(&mut board, &mut deterministic_sample())
            .unwrap();

        assert_eq!(item_ids(&board, "A"), vec!["c", "a", "b"]);
        let last = board.last_operation.unwrap();
        assert!(last.is_keyboard());
        assert_eq!(
            last.outcome,
            Outcome::CardReorder {
                column_id: ColumnId::from("A"),
                start_index: 2,
                finish_index: 0,
            }
        );
    }

    #[test]
    fn test_reorder_card_missing_column() {
        let mut board = abc_board();
        let applied = ReorderCard::new("b1", "Q", 0, 1)
            .apply(&mut board, &mut deterministic_sample())
            .unwrap();

        assert_eq!(applied, Applied::Skipped(SkipReason::ColumnNotFound));
        assert_eq!(board, abc_board());
    }

    #[test]
    fn test_reorder_card_out_of_range() {
        let mut board = abc_board();
        let result = ReorderCard::new("b1", "B", 0, 0).apply(&mut board, &mut deterministic_sample());

        assert!(matches!(result, Err(BoardError::IndexOutOfRange { len: 0, .. })));
        assert_eq!(board, abc_board());
    }
}

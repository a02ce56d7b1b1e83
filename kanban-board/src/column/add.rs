//! AddColumn command

use crate::error::{BoardError, Result};
use crate::operation::{Applied, BoardOperation};
use crate::sample::{ColumnTemplate, SampleData};
use crate::types::{BoardData, BoardId, Column};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Place an unused column template on the board, filled with sample cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddColumn {
    /// The board to add to
    pub board_id: BoardId,
}

impl AddColumn {
    /// Create a new AddColumn command
    pub fn new(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: board_id.into(),
        }
    }
}

impl BoardOperation for AddColumn {
    fn op_string(&self) -> &'static str {
        "add column"
    }

    fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    fn apply(&self, board: &mut BoardData, sample: &mut SampleData) -> Result<Applied> {
        let unused: Vec<&ColumnTemplate> = sample
            .templates
            .iter()
            .filter(|t| !board.column_map.contains_key(&t.column_id))
            .collect();

        let template = sample
            .selector
            .select(&unused)
            .filter(|t| !board.column_map.contains_key(&t.column_id))
            .cloned()
            .ok_or_else(|| BoardError::DuplicateColumn {
                board_id: self.board_id.to_string(),
            })?;

        sample.cards.observe(board);
        let items = sample.cards.make_cards(sample.added_column_cards);
        debug!(column = %template.column_id, cards = items.len(), "placing column");

        let column = Column::new(template.column_id.clone(), template.title).with_items(items);
        board.column_map.insert(template.column_id.clone(), column);
        board.ordered_column_ids.push(template.column_id);

        Ok(Applied::Changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{abc_board, deterministic_sample};
    use crate::types::ColumnId;

    #[test]
    fn test_add_column() {
        let mut board = abc_board();
        let mut sample = deterministic_sample();

        let applied = AddColumn::new("b1").apply(&mut board, &mut sample).unwrap();

        assert_eq!(applied, Applied::Changed);
        let added = ColumnId::from("PR_REVIEW");
        assert_eq!(board.ordered_column_ids.last(), Some(&added));
        let column = board.column(&added).unwrap();
        assert_eq!(column.title, "PR REVIEW");
        assert_eq!(column.items.len(), sample.added_column_cards);
        assert!(board.last_operation.is_none());
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_add_column_pool_exhausted() {
        let mut board = abc_board();
        let mut sample = deterministic_sample();
        AddColumn::new("b1").apply(&mut board, &mut sample).unwrap();
        let before = board.clone();

        let result = AddColumn::new("b1").apply(&mut board, &mut sample);

        assert!(matches!(result, Err(BoardError::DuplicateColumn { .. })));
        assert_eq!(board, before);
    }
}

//! Keyboard alternatives to dragging

use crate::card::{MoveCard, ReorderCard};
use crate::column::ReorderColumn;
use crate::operation::BoardCommand;
use crate::types::{BoardData, BoardId, CardId, ColumnId, Trigger};
use serde::{Deserialize, Serialize};

/// Keyboard action on a focused card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKeyboardMove {
    Up,
    Down,
    ToTop,
    ToBottom,
    /// Move to the front of another column
    ToColumn(ColumnId),
}

/// Keyboard action on a focused column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKeyboardMove {
    Left,
    Right,
}

impl CardKeyboardMove {
    /// Plan the command for moving `user_id`. Moves past a boundary, into
    /// the card's own column or to an unknown column plan nothing.
    pub fn plan(&self, board_id: &BoardId, board: &BoardData, user_id: &CardId) -> Option<BoardCommand> {
        let (column_id, index) = board.locate_card(user_id)?;
        let last = board.column(column_id)?.items.len() - 1;

        let finish_index = match self {
            Self::Up if index > 0 => index - 1,
            Self::Down if index < last => index + 1,
            Self::ToTop if index > 0 => 0,
            Self::ToBottom if index < last => last,
            Self::ToColumn(target) if target != column_id && board.column(target).is_some() => {
                return Some(
                    MoveCard::new(board_id.clone(), column_id.clone(), target.clone(), index)
                        .with_trigger(Trigger::Keyboard)
                        .into(),
                );
            }
            _ => return None,
        };

        Some(
            ReorderCard::new(board_id.clone(), column_id.clone(), index, finish_index)
                .with_trigger(Trigger::Keyboard)
                .into(),
        )
    }
}

impl ColumnKeyboardMove {
    /// Plan the command for moving `column_id` one position
    pub fn plan(self, board_id: &BoardId, board: &BoardData, column_id: &ColumnId) -> Option<BoardCommand> {
        let index = board.column_index(column_id)?;
        let finish_index = match self {
            Self::Left if index > 0 => index - 1,
            Self::Right if index + 1 < board.ordered_column_ids.len() => index + 1,
            _ => return None,
        };

        Some(
            ReorderColumn::new(board_id.clone(), index, finish_index)
                .with_trigger(Trigger::Keyboard)
                .into(),
        )
    }
}

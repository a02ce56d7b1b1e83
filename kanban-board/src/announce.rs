//! Human-readable descriptions of the last operation, for assistive
//! announcement

use crate::types::{BoardData, LastOperation, Outcome};
use tracing::info;

/// Receives announcement text
pub trait Announcer: Send + Sync {
    fn announce(&self, text: &str);
}

/// Emits announcements as log events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnnouncer;

impl Announcer for TracingAnnouncer {
    fn announce(&self, text: &str) {
        info!(announcement = text, "announce");
    }
}

/// Describe `last` against the board it produced.
///
/// Column reorders are described for every trigger; card reorders and
/// moves only when they came from the keyboard, since a pointer user can
/// see where they dropped. Returns `None` when there is nothing to say or
/// the board no longer matches the outcome.
pub fn describe(board: &BoardData, last: &LastOperation) -> Option<String> {
    match &last.outcome {
        Outcome::ColumnReorder {
            start_index,
            finish_index,
            ..
        } => {
            let column = board.column(board.ordered_column_ids.get(*finish_index)?)?;
            Some(format!(
                "You've moved {} from position {} to position {} of {}.",
                column.title,
                start_index + 1,
                finish_index + 1,
                board.ordered_column_ids.len()
            ))
        }
        Outcome::CardReorder {
            column_id,
            start_index,
            finish_index,
        } => {
            if !last.is_keyboard() {
                return None;
            }
            let column = board.column(column_id)?;
            let card = column.items.get(*finish_index)?;
            Some(format!(
                "You've moved {} from position {} to position {} of {} in the {} column.",
                card.name,
                start_index + 1,
                finish_index + 1,
                column.items.len(),
                column.title
            ))
        }
        Outcome::CardMove {
            finish_column_id,
            item_index_in_start_column,
            item_index_in_finish_column,
        } => {
            if !last.is_keyboard() {
                return None;
            }
            let column = board.column(finish_column_id)?;
            let card = column.items.get(*item_index_in_finish_column)?;
            Some(format!(
                "You've moved {} from position {} to position {} in the {} column.",
                card.name,
                item_index_in_start_column + 1,
                item_index_in_finish_column + 1,
                column.title
            ))
        }
    }
}

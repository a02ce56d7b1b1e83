//! Translate completed pointer drops into board commands.
//!
//! The gesture layer reports what was dragged and the drop targets under
//! the pointer, innermost first: a card drop over another card yields
//! `[card, column]`, a drop on empty column space yields `[column]`.

use crate::card::{MoveCard, ReorderCard};
use crate::column::ReorderColumn;
use crate::operation::BoardCommand;
use crate::ordering::{resolve_destination_index, Axis, DropSignal, Edge};
use crate::types::{BoardData, BoardId, CardId, ColumnId, Trigger};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What was dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sourceType", rename_all = "lowercase")]
pub enum DragSource {
    Column {
        #[serde(rename = "sourceId")]
        column_id: ColumnId,
    },
    Card {
        #[serde(rename = "sourceId")]
        user_id: CardId,
        #[serde(rename = "sourceColumnId")]
        column_id: ColumnId,
    },
}

/// A drop target under the pointer: a column id or a card id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<Edge>,
}

impl DropTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            edge: None,
        }
    }

    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edge = Some(edge);
        self
    }
}

/// A completed drop as reported by the gesture layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropIntent {
    #[serde(flatten)]
    pub source: DragSource,
    /// Position of the source when the drag started. Used when it still
    /// matches the board, otherwise the source is looked up by id.
    pub start_index: usize,
    #[serde(rename = "targetDropTargets", default)]
    pub targets: Vec<DropTarget>,
}

impl DropIntent {
    pub fn column(column_id: impl Into<ColumnId>, start_index: usize) -> Self {
        Self {
            source: DragSource::Column {
                column_id: column_id.into(),
            },
            start_index,
            targets: Vec::new(),
        }
    }

    pub fn card(user_id: impl Into<CardId>, column_id: impl Into<ColumnId>, start_index: usize) -> Self {
        Self {
            source: DragSource::Card {
                user_id: user_id.into(),
                column_id: column_id.into(),
            },
            start_index,
            targets: Vec::new(),
        }
    }

    /// Add the next drop target, innermost first
    pub fn over(mut self, target: DropTarget) -> Self {
        self.targets.push(target);
        self
    }
}

/// Plan the command a drop should dispatch.
///
/// Returns `None` for drops that change nothing: no targets, or ids that
/// are not on the board.
pub fn plan_drop(board_id: &BoardId, board: &BoardData, intent: &DropIntent) -> Option<BoardCommand> {
    let planned = match &intent.source {
        DragSource::Column { column_id } => plan_column_drop(board_id, board, column_id, intent),
        DragSource::Card { user_id, column_id } => {
            plan_card_drop(board_id, board, user_id, column_id, intent)
        }
    };

    if planned.is_none() {
        debug!(board = %board_id, targets = intent.targets.len(), "drop planned nothing");
    }
    planned
}

fn plan_column_drop(
    board_id: &BoardId,
    board: &BoardData,
    column_id: &ColumnId,
    intent: &DropIntent,
) -> Option<BoardCommand> {
    let target = intent.targets.first()?;
    let start_index = if board.ordered_column_ids.get(intent.start_index) == Some(column_id) {
        intent.start_index
    } else {
        board.column_index(column_id)?
    };
    let index_of_target = board.column_index(&ColumnId::from(target.id.as_str()))?;

    let finish_index = resolve_destination_index(DropSignal {
        start_index,
        index_of_target,
        closest_edge: target.edge,
        axis: Axis::Horizontal,
    });

    Some(
        ReorderColumn::new(board_id.clone(), start_index, finish_index)
            .with_trigger(Trigger::Pointer)
            .into(),
    )
}

fn plan_card_drop(
    board_id: &BoardId,
    board: &BoardData,
    user_id: &CardId,
    column_id: &ColumnId,
    intent: &DropIntent,
) -> Option<BoardCommand> {
    let source = board.column(column_id)?;
    let start_index = match source.items.get(intent.start_index) {
        Some(card) if &card.user_id == user_id => intent.start_index,
        _ => source.card_index(user_id)?,
    };

    match intent.targets.as_slice() {
        [] => None,
        // empty space in a column
        [column_target] => {
            let destination = board.column(&ColumnId::from(column_target.id.as_str()))?;

            if destination.column_id == source.column_id {
                let finish_index = resolve_destination_index(DropSignal {
                    start_index,
                    index_of_target: source.items.len() - 1,
                    closest_edge: None,
                    axis: Axis::Vertical,
                });
                return Some(
                    ReorderCard::new(board_id.clone(), column_id.clone(), start_index, finish_index)
                        .with_trigger(Trigger::Pointer)
                        .into(),
                );
            }

            Some(
                MoveCard::new(
                    board_id.clone(),
                    column_id.clone(),
                    destination.column_id.clone(),
                    start_index,
                )
                .with_trigger(Trigger::Pointer)
                .into(),
            )
        }
        // over a card, inside its column
        [card_target, column_target, ..] => {
            let destination = board.column(&ColumnId::from(column_target.id.as_str()))?;
            let index_of_target = destination.card_index(&CardId::from(card_target.id.as_str()))?;

            if destination.column_id == source.column_id {
                let finish_index = resolve_destination_index(DropSignal {
                    start_index,
                    index_of_target,
                    closest_edge: card_target.edge,
                    axis: Axis::Vertical,
                });
                return Some(
                    ReorderCard::new(board_id.clone(), column_id.clone(), start_index, finish_index)
                        .with_trigger(Trigger::Pointer)
                        .into(),
                );
            }

            let destination_index = if card_target.edge == Some(Edge::Bottom) {
                index_of_target + 1
            } else {
                index_of_target
            };
            Some(
                MoveCard::new(
                    board_id.clone(),
                    column_id.clone(),
                    destination.column_id.clone(),
                    start_index,
                )
                .at_index(destination_index)
                .with_trigger(Trigger::Pointer)
                .into(),
            )
        }
    }
}

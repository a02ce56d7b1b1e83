//! The reducer seam: every board mutation implements [`BoardOperation`].
//!
//! Operations are structs whose fields are their parameters. Applying one is
//! synchronous and atomic: it either succeeds, skips without touching the
//! board, or fails without touching the board.

use crate::card::{MoveCard, RemoveCard, ReorderCard};
use crate::column::{AddColumn, ReorderColumn};
use crate::error::Result;
use crate::sample::SampleData;
use crate::types::{BoardData, BoardId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an operation left the board untouched without failing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Cross-column move with identical source and destination
    SameColumn,
    /// The named column is not on the board
    ColumnNotFound,
    /// The named card is not in the column
    CardNotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SameColumn => "source and destination column are the same",
            Self::ColumnNotFound => "column not found",
            Self::CardNotFound => "card not found",
        };
        f.write_str(text)
    }
}

/// Result of applying an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The board changed and should be persisted
    Changed,
    /// Nothing changed
    Skipped(SkipReason),
}

impl Applied {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// A named, atomic transition of one board
pub trait BoardOperation: fmt::Debug {
    /// Canonical op string, e.g. "move card"
    fn op_string(&self) -> &'static str;

    /// The board this operation targets
    fn board_id(&self) -> &BoardId;

    /// Apply to `board`. On `Err` or `Skipped` the board is unchanged.
    fn apply(&self, board: &mut BoardData, sample: &mut SampleData) -> Result<Applied>;

    /// Whether a changed board carries this operation's outcome record
    fn records_outcome(&self) -> bool {
        false
    }
}

/// Apply an operation to a copy of `board`, leaving the input untouched
pub fn reduce(
    board: &BoardData,
    op: &dyn BoardOperation,
    sample: &mut SampleData,
) -> Result<(BoardData, Applied)> {
    let mut next = board.clone();
    let applied = op.apply(&mut next, sample)?;
    Ok((next, applied))
}

/// Any board operation, as data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum BoardCommand {
    #[serde(rename = "add column")]
    AddColumn(AddColumn),
    #[serde(rename = "remove card")]
    RemoveCard(RemoveCard),
    #[serde(rename = "reorder column")]
    ReorderColumn(ReorderColumn),
    #[serde(rename = "reorder card")]
    ReorderCard(ReorderCard),
    #[serde(rename = "move card")]
    MoveCard(MoveCard),
}

impl BoardCommand {
    fn inner(&self) -> &dyn BoardOperation {
        match self {
            Self::AddColumn(op) => op,
            Self::RemoveCard(op) => op,
            Self::ReorderColumn(op) => op,
            Self::ReorderCard(op) => op,
            Self::MoveCard(op) => op,
        }
    }
}

impl BoardOperation for BoardCommand {
    fn op_string(&self) -> &'static str {
        self.inner().op_string()
    }

    fn board_id(&self) -> &BoardId {
        self.inner().board_id()
    }

    fn apply(&self, board: &mut BoardData, sample: &mut SampleData) -> Result<Applied> {
        self.inner().apply(board, sample)
    }

    fn records_outcome(&self) -> bool {
        self.inner().records_outcome()
    }
}

macro_rules! command_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for BoardCommand {
                fn from(op: $variant) -> Self {
                    Self::$variant(op)
                }
            }
        )*
    };
}

command_from!(AddColumn, RemoveCard, ReorderColumn, ReorderCard, MoveCard);

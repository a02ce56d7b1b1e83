//! Core types for the board engine

mod board;
mod card;
mod ids;
mod outcome;

pub use board::{BoardData, Column, UpdateStatus};
pub use card::{Assignee, Card, CardTag};
pub use ids::{BoardId, CardId, ColumnId};
pub use outcome::{LastOperation, Outcome, Trigger};

//! Reorderable kanban board state engine
//!
//! This crate holds the state side of a drag-and-drop kanban board: the
//! column/card data model, the operations that reorder and move things, and
//! an optimistic persistence layer that saves after every change and reports
//! failures through the board's update status.
//!
//! ## Overview
//!
//! - **Pure reducer** - Operations apply synchronously and atomically; a
//!   rejected operation leaves the board untouched
//! - **One dispatch point** - [`BoardCoordinator`] serializes every mutation
//!   per session
//! - **Optimistic saves** - Saves run in the background, fenced by revision so
//!   a slow save never overwrites newer state
//! - **Drop translation** - Pointer drops and keyboard moves are planned into
//!   the same commands
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use kanban_board::{BoardConfig, BoardCoordinator, card::MoveCard};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = BoardCoordinator::from_config(&BoardConfig::load(None)?);
//! let board = coordinator.open("session-1").await?;
//! println!("{} columns", board.ordered_column_ids.len());
//!
//! // Move the second card of NOT_STARTED to the front of IN_PROGRESS
//! let dispatched = coordinator
//!     .dispatch(MoveCard::new("session-1", "NOT_STARTED", "IN_PROGRESS", 1))
//!     .await?;
//!
//! if let Some(save) = dispatched.pending_save {
//!     println!("{:?}", save.wait().await);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Stored Format
//!
//! Board state is one JSON document under a single store key:
//!
//! ```text
//! {
//!   "columnMap": { "<columnId>": { "columnId", "title", "items": [card...] } },
//!   "orderedColumnIds": ["<columnId>", ...],
//!   "lastOperation": { "trigger", "outcome": { "type": "card-move", ... } },
//!   "isLoadingWhileUpdating", "isErrorWhileUpdating", "errorMessageWhileUpdating"
//! }
//! ```

pub mod announce;
mod collection;
pub mod config;
mod coordinator;
pub mod drop_intent;
mod error;
pub mod gateway;
pub mod keyboard;
mod operation;
pub mod ordering;
pub mod sample;
pub mod store;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Command modules
pub mod card;
pub mod column;

pub use announce::{describe, Announcer, TracingAnnouncer};
pub use collection::BoardCollection;
pub use config::{BoardConfig, ConfigError};
pub use coordinator::{BoardCoordinator, Dispatched, PendingSave};
pub use drop_intent::{plan_drop, DragSource, DropIntent, DropTarget};
pub use error::{BoardError, PersistenceFailure, Result};
pub use gateway::{BoardGateway, SaveOutcome};
pub use keyboard::{CardKeyboardMove, ColumnKeyboardMove};
pub use operation::{reduce, Applied, BoardCommand, BoardOperation, SkipReason};
pub use ordering::{reorder, resolve_destination_index, Axis, DropSignal, Edge};

// Re-export commonly used types
pub use types::{
    Assignee, BoardData, BoardId, Card, CardId, CardTag, Column, ColumnId, LastOperation, Outcome,
    Trigger, UpdateStatus,
};

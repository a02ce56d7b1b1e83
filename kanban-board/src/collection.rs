//! Independent per-board states, keyed by board id

use crate::error::{BoardError, Result};
use crate::gateway::SaveOutcome;
use crate::operation::{Applied, BoardOperation};
use crate::sample::SampleData;
use crate::types::{BoardData, BoardId};
use std::collections::HashMap;
use tracing::{debug, trace};

/// One open board and its latest revision
#[derive(Debug, Clone)]
struct BoardEntry {
    data: BoardData,
    /// Bumped by every applied mutation
    revision: u64,
    /// Which open of the board this entry belongs to
    epoch: u64,
}

/// Owns the state of every open board.
///
/// All mutation goes through [`BoardCollection::apply`], so each board's
/// revision counts exactly the mutations applied to it.
///
/// Revisions keep rising across close and reopen, and every open gets a
/// fresh epoch so saves started by an earlier open are never folded into
/// the new one.
#[derive(Debug, Default)]
pub struct BoardCollection {
    boards: HashMap<BoardId, BoardEntry>,
    /// Last revision of boards that were closed
    closed: HashMap<BoardId, u64>,
    next_epoch: u64,
}

impl BoardCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a board at revision 0, replacing any previous state
    pub fn insert(&mut self, board_id: BoardId, data: BoardData) -> u64 {
        self.insert_at(board_id, data, 0)
    }

    /// Register a board whose revisions continue from `revision`, or from
    /// its last revision before it was closed when that is higher. Returns
    /// the epoch of this open.
    pub fn insert_at(&mut self, board_id: BoardId, data: BoardData, revision: u64) -> u64 {
        let revision = self.closed.remove(&board_id).map_or(revision, |r| r.max(revision));
        self.next_epoch += 1;
        let epoch = self.next_epoch;
        self.boards.insert(board_id, BoardEntry { data, revision, epoch });
        epoch
    }

    pub fn get(&self, board_id: &BoardId) -> Option<&BoardData> {
        self.boards.get(board_id).map(|e| &e.data)
    }

    /// Latest revision of a board
    pub fn revision(&self, board_id: &BoardId) -> Option<u64> {
        self.boards.get(board_id).map(|e| e.revision)
    }

    /// Epoch of the current open of a board
    pub fn epoch(&self, board_id: &BoardId) -> Option<u64> {
        self.boards.get(board_id).map(|e| e.epoch)
    }

    pub fn remove(&mut self, board_id: &BoardId) -> Option<BoardData> {
        let entry = self.boards.remove(board_id)?;
        self.closed.insert(board_id.clone(), entry.revision);
        Some(entry.data)
    }

    pub fn contains(&self, board_id: &BoardId) -> bool {
        self.boards.contains_key(board_id)
    }

    /// Ids of all open boards, sorted
    pub fn board_ids(&self) -> Vec<BoardId> {
        let mut ids: Vec<_> = self.boards.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Apply an operation to the board it names.
    ///
    /// A change bumps the revision and marks a save as in flight.
    pub fn apply(&mut self, op: &dyn BoardOperation, sample: &mut SampleData) -> Result<Applied> {
        let entry = self
            .boards
            .get_mut(op.board_id())
            .ok_or_else(|| BoardError::board_not_found(op.board_id()))?;

        let applied = op.apply(&mut entry.data, sample)?;
        match applied {
            Applied::Changed => {
                entry.revision += 1;
                entry.data.status.is_loading_while_updating = true;
                trace!(board = %op.board_id(), op = op.op_string(), revision = entry.revision, "applied");
            }
            Applied::Skipped(reason) => {
                debug!(board = %op.board_id(), op = op.op_string(), %reason, "skipped");
            }
        }

        Ok(applied)
    }

    /// Fold a finished save into the board's update status.
    ///
    /// Failures always raise the error flags. The loading flag clears only
    /// once the latest revision has settled, and a successful save of the
    /// latest revision clears earlier errors. Returns false when the board
    /// is no longer open, or the save belongs to an earlier open.
    pub fn record_save(&mut self, board_id: &BoardId, epoch: u64, outcome: &SaveOutcome) -> bool {
        let Some(entry) = self.boards.get_mut(board_id).filter(|e| e.epoch == epoch) else {
            debug!(board = %board_id, epoch, revision = outcome.revision(), "save outcome not recorded");
            return false;
        };
        let latest = outcome.revision() == entry.revision;
        let status = &mut entry.data.status;

        match outcome {
            SaveOutcome::Saved { .. } if latest => {
                status.is_loading_while_updating = false;
                status.is_error_while_updating = false;
                status.error_message_while_updating = None;
            }
            SaveOutcome::Saved { .. } | SaveOutcome::Superseded { .. } => {}
            SaveOutcome::Failed { failure, .. } => {
                status.is_error_while_updating = true;
                status.error_message_while_updating = Some(failure.message.clone());
                if latest {
                    status.is_loading_while_updating = false;
                }
            }
        }

        true
    }
}

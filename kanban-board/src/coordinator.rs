//! The single dispatch point for board sessions.
//!
//! Every mutation is planned and applied under one lock, so each operation
//! sees the settled result of the previous one. Saves run in the background
//! after the lock is released; their outcome is folded back into the board's
//! update status when they finish. Reopening a board first waits for the
//! saves of its previous open, so it always loads the latest written state.

use crate::announce::{describe, Announcer, TracingAnnouncer};
use crate::collection::BoardCollection;
use crate::config::BoardConfig;
use crate::drop_intent::{plan_drop, DropIntent};
use crate::error::{BoardError, PersistenceFailure, Result};
use crate::gateway::{BoardGateway, SaveOutcome};
use crate::keyboard::{CardKeyboardMove, ColumnKeyboardMove};
use crate::operation::{Applied, BoardCommand, BoardOperation};
use crate::sample::SampleData;
use crate::types::{BoardData, BoardId, CardId, ColumnId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

struct SessionState {
    boards: BoardCollection,
    sample: SampleData,
    /// Background saves per board, kept after the board closes
    saves: HashMap<BoardId, InFlight>,
}

/// Number of background saves still running for one board
#[derive(Clone)]
struct InFlight(Arc<watch::Sender<usize>>);

impl InFlight {
    fn new() -> Self {
        Self(Arc::new(watch::channel(0).0))
    }

    fn start(&self) -> SaveGuard {
        self.0.send_modify(|n| *n += 1);
        SaveGuard(self.clone())
    }

    /// Resolves once no save is running
    async fn settled(&self) {
        let mut running = self.0.subscribe();
        let _ = running.wait_for(|n| *n == 0).await;
    }
}

/// Marks one save as finished when dropped, even if the save task panics
struct SaveGuard(InFlight);

impl Drop for SaveGuard {
    fn drop(&mut self) {
        self.0 .0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Result of a dispatched command
#[derive(Debug)]
pub struct Dispatched {
    pub applied: Applied,
    /// Board revision after the command
    pub revision: u64,
    /// The background save, when the board changed
    pub pending_save: Option<PendingSave>,
}

/// Handle to an in-flight save
#[derive(Debug)]
pub struct PendingSave {
    board_id: BoardId,
    revision: u64,
    handle: JoinHandle<SaveOutcome>,
}

impl PendingSave {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Wait for the save to finish and its outcome to be recorded
    pub async fn wait(self) -> SaveOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => SaveOutcome::Failed {
                revision: self.revision,
                failure: PersistenceFailure::new(self.board_id, e.to_string()),
            },
        }
    }
}

/// Owns all open boards of a session and routes commands to them
pub struct BoardCoordinator {
    state: Arc<Mutex<SessionState>>,
    gateway: Arc<BoardGateway>,
    announcer: Arc<dyn Announcer>,
    /// Serializes opens with each other, never with dispatch
    opening: Mutex<()>,
}

impl BoardCoordinator {
    pub fn new(gateway: BoardGateway, sample: SampleData, announcer: Arc<dyn Announcer>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                boards: BoardCollection::new(),
                sample,
                saves: HashMap::new(),
            })),
            gateway: Arc::new(gateway),
            announcer,
            opening: Mutex::new(()),
        }
    }

    /// Coordinator with the configured store, defaults and random sample
    /// data, announcing through tracing
    pub fn from_config(config: &BoardConfig) -> Self {
        let gateway = BoardGateway::new(
            config.storage.build_store(),
            config.storage.key.clone(),
            config.defaults.columns.clone(),
        );
        Self::new(gateway, config.defaults.sample_data(), Arc::new(TracingAnnouncer))
    }

    /// Load a board and register it. Opening a board that is already open
    /// returns its current state without reloading.
    ///
    /// Store I/O runs without the session lock, so dispatch to other boards
    /// carries on while a board loads.
    pub async fn open(&self, board_id: impl Into<BoardId>) -> Result<BoardData> {
        let board_id = board_id.into();
        let _opening = self.opening.lock().await;

        let in_flight = {
            let state = self.state.lock().await;
            if let Some(board) = state.boards.get(&board_id) {
                return Ok(board.clone());
            }
            state.saves.get(&board_id).cloned()
        };
        if let Some(in_flight) = in_flight {
            in_flight.settled().await;
            debug!(board = %board_id, "earlier saves settled");
        }

        let board = match self.gateway.fetch(&board_id).await? {
            Some(board) => board,
            None => {
                let board = {
                    let mut state = self.state.lock().await;
                    self.gateway.generate(state.sample.cards.as_mut())
                };
                self.gateway.persist_generated(&board_id, &board).await?;
                board
            }
        };
        let committed = self.gateway.committed(&board_id).await;

        let mut state = self.state.lock().await;
        if let Some(board) = state.boards.get(&board_id) {
            return Ok(board.clone());
        }
        state.sample.cards.observe(&board);
        let epoch = state.boards.insert_at(board_id.clone(), board.clone(), committed);
        let revision = state.boards.revision(&board_id).unwrap_or(committed);
        info!(
            board = %board_id,
            columns = board.ordered_column_ids.len(),
            revision,
            epoch,
            "board opened"
        );
        Ok(board)
    }

    /// Current state of an open board
    pub async fn snapshot(&self, board_id: &BoardId) -> Option<BoardData> {
        self.state.lock().await.boards.get(board_id).cloned()
    }

    /// Unregister a board. Saves still in flight complete but are no longer
    /// recorded; a later open waits for them.
    pub async fn close(&self, board_id: &BoardId) -> Option<BoardData> {
        let closed = self.state.lock().await.boards.remove(board_id);
        if closed.is_some() {
            info!(board = %board_id, "board closed");
        }
        closed
    }

    /// Ids of all open boards
    pub async fn board_ids(&self) -> Vec<BoardId> {
        self.state.lock().await.boards.board_ids()
    }

    /// Apply a command and start saving the result
    pub async fn dispatch(&self, command: impl Into<BoardCommand>) -> Result<Dispatched> {
        let command = command.into();
        let mut state = self.state.lock().await;
        self.dispatch_locked(&mut state, &command)
    }

    /// Translate a completed pointer drop and dispatch it. `None` when the
    /// drop plans nothing.
    pub async fn handle_drop(&self, board_id: &BoardId, intent: &DropIntent) -> Result<Option<Dispatched>> {
        let mut state = self.state.lock().await;
        let board = state
            .boards
            .get(board_id)
            .ok_or_else(|| BoardError::board_not_found(board_id))?;

        match plan_drop(board_id, board, intent) {
            Some(command) => self.dispatch_locked(&mut state, &command).map(Some),
            None => Ok(None),
        }
    }

    /// Move a card with the keyboard
    pub async fn move_card_with_keyboard(
        &self,
        board_id: &BoardId,
        user_id: &CardId,
        movement: &CardKeyboardMove,
    ) -> Result<Option<Dispatched>> {
        let mut state = self.state.lock().await;
        let board = state
            .boards
            .get(board_id)
            .ok_or_else(|| BoardError::board_not_found(board_id))?;

        match movement.plan(board_id, board, user_id) {
            Some(command) => self.dispatch_locked(&mut state, &command).map(Some),
            None => Ok(None),
        }
    }

    /// Move a column with the keyboard
    pub async fn move_column_with_keyboard(
        &self,
        board_id: &BoardId,
        column_id: &ColumnId,
        movement: ColumnKeyboardMove,
    ) -> Result<Option<Dispatched>> {
        let mut state = self.state.lock().await;
        let board = state
            .boards
            .get(board_id)
            .ok_or_else(|| BoardError::board_not_found(board_id))?;

        match movement.plan(board_id, board, column_id) {
            Some(command) => self.dispatch_locked(&mut state, &command).map(Some),
            None => Ok(None),
        }
    }

    fn dispatch_locked(&self, state: &mut SessionState, command: &BoardCommand) -> Result<Dispatched> {
        let board_id = command.board_id().clone();

        let SessionState { boards, sample, saves } = state;
        let applied = boards.apply(command, sample)?;
        let revision = boards.revision(&board_id).unwrap_or_default();
        if !applied.is_changed() {
            return Ok(Dispatched {
                applied,
                revision,
                pending_save: None,
            });
        }

        let snapshot = boards
            .get(&board_id)
            .cloned()
            .ok_or_else(|| BoardError::board_not_found(&board_id))?;
        let epoch = boards.epoch(&board_id).unwrap_or_default();
        let guard = saves.entry(board_id.clone()).or_insert_with(InFlight::new).start();

        if command.records_outcome() {
            if let Some(text) = snapshot
                .last_operation
                .as_ref()
                .and_then(|last| describe(&snapshot, last))
            {
                self.announcer.announce(&text);
            }
        }

        Ok(Dispatched {
            applied,
            revision,
            pending_save: Some(self.spawn_save(board_id, epoch, revision, snapshot, guard)),
        })
    }

    fn spawn_save(
        &self,
        board_id: BoardId,
        epoch: u64,
        revision: u64,
        snapshot: BoardData,
        guard: SaveGuard,
    ) -> PendingSave {
        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let id = board_id.clone();

        let handle = tokio::spawn(async move {
            let outcome = gateway.save(&id, revision, &snapshot).await;
            state.lock().await.boards.record_save(&id, epoch, &outcome);
            drop(guard);
            outcome
        });

        PendingSave {
            board_id,
            revision,
            handle,
        }
    }
}

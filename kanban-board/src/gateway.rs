//! Persistence gateway: load and save board state through a [`StateStore`].
//!
//! Saves are optimistic. The caller has already applied the mutation
//! locally; a failed save is reported as a value and never rolls state
//! back. Saves for one board are serialized and fenced by revision, so a
//! slow save can never overwrite a newer state with a stale one.

use crate::error::{PersistenceFailure, Result};
use crate::sample::{generate_board, CardFactory, ColumnSeed};
use crate::store::StateStore;
use crate::types::{BoardData, BoardId, UpdateStatus};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of one save attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The snapshot at `revision` is now durable
    Saved { revision: u64 },
    /// A newer revision was already written; this one was discarded
    Superseded { revision: u64, committed: u64 },
    /// The store rejected the write
    Failed {
        revision: u64,
        failure: PersistenceFailure,
    },
}

impl SaveOutcome {
    /// The revision this save attempt was for
    pub fn revision(&self) -> u64 {
        match self {
            Self::Saved { revision }
            | Self::Superseded { revision, .. }
            | Self::Failed { revision, .. } => *revision,
        }
    }
}

/// Loads and saves boards under a single well-known key
pub struct BoardGateway {
    store: Arc<dyn StateStore>,
    key: String,
    defaults: Vec<ColumnSeed>,
    /// Last committed revision per board; the lock serializes writes
    fences: Mutex<HashMap<BoardId, Arc<Mutex<u64>>>>,
}

impl BoardGateway {
    pub fn new(store: Arc<dyn StateStore>, key: impl Into<String>, defaults: Vec<ColumnSeed>) -> Self {
        Self {
            store,
            key: key.into(),
            defaults,
            fences: Mutex::new(HashMap::new()),
        }
    }

    /// The store key board state lives under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the board, generating and persisting a default board when the
    /// store holds nothing.
    ///
    /// Update status flags are reset: they describe saves of a previous
    /// session, not this one.
    pub async fn load(&self, board_id: &BoardId, cards: &mut dyn CardFactory) -> Result<BoardData> {
        let board = match self.fetch(board_id).await? {
            Some(board) => board,
            None => {
                let board = self.generate(cards);
                self.persist_generated(board_id, &board).await?;
                board
            }
        };

        cards.observe(&board);
        Ok(board)
    }

    /// Read and validate the stored board, `None` when the store holds
    /// nothing. Status flags come back reset.
    pub async fn fetch(&self, board_id: &BoardId) -> Result<Option<BoardData>> {
        let Some(value) = self.store.get(&self.key).await?.filter(|v| !is_empty_document(v)) else {
            return Ok(None);
        };

        let mut board: BoardData = serde_json::from_value(value)?;
        board.check_invariants()?;
        board.status = UpdateStatus::default();
        debug!(board = %board_id, columns = board.column_map.len(), "loaded stored board");
        Ok(Some(board))
    }

    /// A fresh board from the default columns
    pub fn generate(&self, cards: &mut dyn CardFactory) -> BoardData {
        generate_board(&self.defaults, cards)
    }

    /// Write a freshly generated board as the initial stored state
    pub async fn persist_generated(&self, board_id: &BoardId, board: &BoardData) -> Result<()> {
        self.store.set(&self.key, serde_json::to_value(board)?).await?;
        info!(
            board = %board_id,
            columns = board.column_map.len(),
            cards = board.card_count(),
            "generated default board"
        );
        Ok(())
    }

    /// Persist `snapshot` as `revision` of the board.
    ///
    /// Revisions must increase with dispatch order. A save whose revision is
    /// not newer than the last committed one is discarded.
    pub async fn save(&self, board_id: &BoardId, revision: u64, snapshot: &BoardData) -> SaveOutcome {
        let fence = self.fence(board_id).await;
        let mut committed = fence.lock().await;

        if revision <= *committed {
            debug!(board = %board_id, revision, committed = *committed, "stale save discarded");
            return SaveOutcome::Superseded {
                revision,
                committed: *committed,
            };
        }

        let written = match serde_json::to_value(snapshot) {
            Ok(value) => self.store.set(&self.key, value).await,
            Err(e) => Err(e.into()),
        };

        match written {
            Ok(()) => {
                *committed = revision;
                debug!(board = %board_id, revision, "board saved");
                SaveOutcome::Saved { revision }
            }
            Err(e) => {
                warn!(board = %board_id, revision, error = %e, "board save failed");
                SaveOutcome::Failed {
                    revision,
                    failure: PersistenceFailure::new(board_id.clone(), e.to_string()),
                }
            }
        }
    }

    /// Last revision written for a board, 0 when none. Waits for a write
    /// in progress to finish.
    pub async fn committed(&self, board_id: &BoardId) -> u64 {
        let fence = self.fence(board_id).await;
        let committed = *fence.lock().await;
        committed
    }

    async fn fence(&self, board_id: &BoardId) -> Arc<Mutex<u64>> {
        let mut fences = self.fences.lock().await;
        fences.entry(board_id.clone()).or_default().clone()
    }
}

/// The front-end stored `{}` when it had nothing yet
fn is_empty_document(value: &Value) -> bool {
    matches!(value, Value::Null) || value.as_object().is_some_and(|o| o.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::store::MemoryStore;
    use crate::test_support::{abc_board, ControlledStore, SequentialCards};
    use serde_json::json;

    fn seeds() -> Vec<ColumnSeed> {
        vec![
            ColumnSeed::new("NOT_STARTED", "NOT STARTED", 10),
            ColumnSeed::new("IN_PROGRESS", "IN PROGRESS", 10),
            ColumnSeed::new("UNDER_REVIEW", "UNDER REVIEW", 2),
            ColumnSeed::new("SHIPPED", "SHIPPED", 10),
        ]
    }

    #[tokio::test]
    async fn test_load_generates_and_persists_default() {
        let store = Arc::new(MemoryStore::new());
        let gateway = BoardGateway::new(store.clone(), "BOARD_DATA", seeds());

        let board = gateway.load(&BoardId::from("b1"), &mut SequentialCards::new()).await.unwrap();

        let counts: Vec<_> = board.columns().map(|c| c.items.len()).collect();
        assert_eq!(counts, vec![10, 10, 2, 10]);
        let stored: BoardData =
            serde_json::from_value(store.get("BOARD_DATA").await.unwrap().unwrap()).unwrap();
        assert_eq!(stored, board);
    }

    #[tokio::test]
    async fn test_load_treats_empty_object_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set("BOARD_DATA", json!({})).await.unwrap();
        let gateway = BoardGateway::new(store, "BOARD_DATA", seeds());

        let board = gateway.load(&BoardId::from("b1"), &mut SequentialCards::new()).await.unwrap();
        assert_eq!(board.column_map.len(), 4);
    }

    #[tokio::test]
    async fn test_load_existing_resets_status() {
        let store = Arc::new(MemoryStore::new());
        let mut stored = abc_board();
        stored.status.is_error_while_updating = true;
        stored.status.error_message_while_updating = Some("old".into());
        store.set("BOARD_DATA", serde_json::to_value(&stored).unwrap()).await.unwrap();

        let gateway = BoardGateway::new(store, "BOARD_DATA", seeds());
        let board = gateway.load(&BoardId::from("b1"), &mut SequentialCards::new()).await.unwrap();

        assert_eq!(board.column_map, stored.column_map);
        assert_eq!(board.status, UpdateStatus::default());
    }

    #[tokio::test]
    async fn test_load_rejects_corrupt_state() {
        let store = Arc::new(MemoryStore::new());
        let mut stored = abc_board();
        stored.ordered_column_ids.pop();
        store.set("BOARD_DATA", serde_json::to_value(&stored).unwrap()).await.unwrap();

        let gateway = BoardGateway::new(store, "BOARD_DATA", seeds());
        let result = gateway.load(&BoardId::from("b1"), &mut SequentialCards::new()).await;
        assert!(matches!(result, Err(BoardError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_save_fences_stale_revisions() {
        let store = Arc::new(MemoryStore::new());
        let gateway = BoardGateway::new(store.clone(), "BOARD_DATA", seeds());
        let id = BoardId::from("b1");
        let newer = abc_board();
        let mut older = abc_board();
        older.ordered_column_ids.reverse();

        assert_eq!(gateway.save(&id, 2, &newer).await, SaveOutcome::Saved { revision: 2 });
        assert_eq!(
            gateway.save(&id, 1, &older).await,
            SaveOutcome::Superseded {
                revision: 1,
                committed: 2
            }
        );

        let stored: BoardData =
            serde_json::from_value(store.get("BOARD_DATA").await.unwrap().unwrap()).unwrap();
        assert_eq!(stored, newer);
    }

    #[tokio::test]
    async fn test_save_failure_is_a_value() {
        let store = Arc::new(ControlledStore::new());
        store.fail_writes(true);
        let gateway = BoardGateway::new(store, "BOARD_DATA", seeds());

        let outcome = gateway.save(&BoardId::from("b1"), 1, &abc_board()).await;

        match outcome {
            SaveOutcome::Failed { revision, failure } => {
                assert_eq!(revision, 1);
                assert_eq!(failure.board_id.as_str(), "b1");
                assert!(failure.message.contains("write rejected"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_save_does_not_advance_fence() {
        let store = Arc::new(ControlledStore::new());
        let gateway = BoardGateway::new(store.clone(), "BOARD_DATA", seeds());
        let id = BoardId::from("b1");

        store.fail_writes(true);
        assert!(matches!(gateway.save(&id, 1, &abc_board()).await, SaveOutcome::Failed { .. }));
        store.fail_writes(false);
        assert_eq!(gateway.save(&id, 1, &abc_board()).await, SaveOutcome::Saved { revision: 1 });
        assert_eq!(gateway.committed(&id).await, 1);
        assert_eq!(gateway.committed(&BoardId::from("other")).await, 0);
    }
}

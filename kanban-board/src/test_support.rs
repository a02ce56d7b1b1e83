//! Deterministic doubles for tests.
//!
//! Compiled for this crate's unit tests and, through the `test-support`
//! feature, for integration tests.

use crate::announce::Announcer;
use crate::error::{BoardError, Result};
use crate::sample::{CardFactory, ColumnTemplate, FirstUnusedTemplate, SampleData};
use crate::store::{MemoryStore, StateStore};
use crate::types::{BoardData, Card, Column, ColumnId};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{RwLock, RwLockWriteGuard};

const SEQUENTIAL_PREFIX: &str = "card-";

/// Board with columns A=[a,b,c], B=[], C=[d,e] in that order
pub fn abc_board() -> BoardData {
    BoardData::from_columns([
        Column::new("A", "To do").with_items(vec![
            Card::new("a", "Write docs").with_name("Ada"),
            Card::new("b", "Fix login").with_name("Ben"),
            Card::new("c", "Ship it").with_name("Cy"),
        ]),
        Column::new("B", "Doing"),
        Column::new("C", "Done").with_items(vec![
            Card::new("d", "Plan sprint").with_name("Dee"),
            Card::new("e", "Review PR").with_name("Eve"),
        ]),
    ])
}

/// Sample data with a single `PR_REVIEW` template, chosen deterministically
pub fn deterministic_sample() -> SampleData {
    SampleData::new(
        SequentialCards::new(),
        FirstUnusedTemplate,
        vec![ColumnTemplate::new("PR_REVIEW", "PR REVIEW")],
        2,
    )
}

/// Card ids of a column in order
pub fn item_ids<'a>(board: &'a BoardData, column_id: &str) -> Vec<&'a str> {
    board
        .column(&ColumnId::from(column_id))
        .map(|c| c.items.iter().map(|card| card.user_id.as_str()).collect())
        .unwrap_or_default()
}

/// Cards `card-1`, `card-2`, ... with no random payload
#[derive(Debug, Default)]
pub struct SequentialCards {
    next: u64,
}

impl SequentialCards {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CardFactory for SequentialCards {
    fn make_cards(&mut self, amount: usize) -> Vec<Card> {
        (0..amount)
            .map(|_| {
                self.next += 1;
                Card::new(
                    format!("{}{}", SEQUENTIAL_PREFIX, self.next),
                    format!("Task {}", self.next),
                )
                .with_name(format!("Person {}", self.next))
            })
            .collect()
    }

    fn observe(&mut self, board: &BoardData) {
        let highest = board
            .column_map
            .values()
            .flat_map(|c| &c.items)
            .filter_map(|card| card.user_id.as_str().strip_prefix(SEQUENTIAL_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.next = self.next.max(highest);
    }
}

/// In-memory store whose writes can be made to fail or to block
#[derive(Debug, Default)]
pub struct ControlledStore {
    inner: MemoryStore,
    failing: AtomicBool,
    writes: AtomicUsize,
    gate: RwLock<()>,
}

impl ControlledStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `set` fail
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Block writes until the returned guard is dropped
    pub async fn hold(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().await
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StateStore for ControlledStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _open = self.gate.read().await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(BoardError::Io(std::io::Error::other("write rejected")));
        }
        self.inner.set(key, value).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Collects announcements instead of emitting them
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    messages: Mutex<Vec<String>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything announced so far
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&self, text: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(text.to_string());
    }
}

//! Board-level types: BoardData, Column, UpdateStatus

use super::card::Card;
use super::ids::{CardId, ColumnId};
use super::outcome::LastOperation;
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A named, ordered group of cards. Position in `items` is the card's rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub column_id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub items: Vec<Card>,
}

impl Column {
    /// Create an empty column
    pub fn new(column_id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            title: title.into(),
            items: Vec::new(),
        }
    }

    /// Set the initial cards
    pub fn with_items(mut self, items: Vec<Card>) -> Self {
        self.items = items;
        self
    }

    /// Index of the card with the given id
    pub fn card_index(&self, user_id: &CardId) -> Option<usize> {
        self.items.iter().position(|c| &c.user_id == user_id)
    }
}

/// Flags tracking the asynchronous save side-channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    #[serde(default)]
    pub is_loading_while_updating: bool,
    #[serde(default)]
    pub is_error_while_updating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message_while_updating: Option<String>,
}

/// State of one board.
///
/// `ordered_column_ids` is kept apart from `column_map` so column order can
/// change without touching column contents. It is always a permutation of
/// the map's keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    pub column_map: BTreeMap<ColumnId, Column>,
    pub ordered_column_ids: Vec<ColumnId>,
    #[serde(default)]
    pub last_operation: Option<LastOperation>,
    #[serde(flatten)]
    pub status: UpdateStatus,
}

impl BoardData {
    /// Build a board from columns given in display order
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut board = Self::default();
        for column in columns {
            board.ordered_column_ids.push(column.column_id.clone());
            board.column_map.insert(column.column_id.clone(), column);
        }
        board
    }

    /// Columns in display order
    pub fn columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.ordered_column_ids
            .iter()
            .filter_map(|id| self.column_map.get(id))
    }

    /// Look up a column by id
    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.column_map.get(id)
    }

    /// Display position of a column
    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.ordered_column_ids.iter().position(|c| c == id)
    }

    /// Find which column holds a card, and where
    pub fn locate_card(&self, user_id: &CardId) -> Option<(&ColumnId, usize)> {
        self.column_map
            .iter()
            .find_map(|(id, column)| column.card_index(user_id).map(|idx| (id, idx)))
    }

    /// Total number of cards on the board
    pub fn card_count(&self) -> usize {
        self.column_map.values().map(|c| c.items.len()).sum()
    }

    /// Check the data model invariants.
    ///
    /// `ordered_column_ids` must be a permutation of the column map keys,
    /// each column must be stored under its own id, and card ids must be
    /// unique across the board.
    pub fn check_invariants(&self) -> Result<()> {
        if self.ordered_column_ids.len() != self.column_map.len() {
            return Err(BoardError::corrupt(format!(
                "{} ordered column ids for {} columns",
                self.ordered_column_ids.len(),
                self.column_map.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.ordered_column_ids.len());
        for id in &self.ordered_column_ids {
            if !seen.insert(id) {
                return Err(BoardError::corrupt(format!("column {} ordered twice", id)));
            }
            if !self.column_map.contains_key(id) {
                return Err(BoardError::corrupt(format!("ordered column {} has no entry", id)));
            }
        }

        let mut cards = HashSet::new();
        for (key, column) in &self.column_map {
            if key != &column.column_id {
                return Err(BoardError::corrupt(format!(
                    "column {} stored under key {}",
                    column.column_id, key
                )));
            }
            for card in &column.items {
                if !cards.insert(&card.user_id) {
                    return Err(BoardError::corrupt(format!(
                        "card {} appears more than once",
                        card.user_id
                    )));
                }
            }
        }

        Ok(())
    }
}

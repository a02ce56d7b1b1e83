//! Card type: a single trackable work item

use super::ids::CardId;
use serde::{Deserialize, Serialize};

/// A card on the board.
///
/// Only `user_id` matters to the engine; every other field is payload that
/// travels verbatim through reorders and moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub user_id: CardId,
    pub title: String,
    pub name: String,
    pub role: String,
    pub team_name: String,
    pub ticket_id: String,
    #[serde(default)]
    pub tags: Vec<CardTag>,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
}

impl Card {
    /// Create a card with just an id and title
    pub fn new(user_id: impl Into<CardId>, title: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            name: String::new(),
            role: String::new(),
            team_name: String::new(),
            ticket_id: String::new(),
            tags: Vec::new(),
            assignees: Vec::new(),
        }
    }

    /// Set the person name shown on the card
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the ticket reference
    pub fn with_ticket(mut self, ticket_id: impl Into<String>) -> Self {
        self.ticket_id = ticket_id.into();
        self
    }

    /// Add a tag label. Tag ids follow insertion order and saturate at
    /// `u32::MAX`.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let id = u32::try_from(self.tags.len()).unwrap_or(u32::MAX);
        self.tags.push(CardTag {
            id,
            tag: tag.into(),
        });
        self
    }
}

/// A tag label on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTag {
    pub id: u32,
    pub tag: String,
}

/// A person assigned to a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub name: String,
    pub avatar: String,
}

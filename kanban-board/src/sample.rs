//! Sample data: column templates, card generation, default boards.
//!
//! Generation is behind the [`CardFactory`] and [`TemplateSelector`] traits
//! so reducers stay deterministic under test.

use crate::types::{Assignee, BoardData, Card, CardId, CardTag, Column, ColumnId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const TICKET_PREFIX: &str = "ENG";
const CARD_ID_PREFIX: &str = "id:";

const TITLES: &[&str] = &[
    "Inbox design",
    "Inbox infrastructure",
    "Build conversion module",
    "Build co-pilot UI",
    "Notification module",
    "Setup API",
];

const TAGS: &[&str] = &[
    "Dev in progress",
    "In design",
    "Blocked",
    "Dev completed",
    "Updated",
    "IT team",
    "Devops",
    "Perf test",
];

const NAMES: &[&str] = &[
    "Alexander", "Aliza", "Alvin", "Angie", "Arjun", "Blair", "Claudia", "Colin",
];

const ROLES: &[&str] = &[
    "Engineer",
    "Senior Engineer",
    "Principal Engineer",
    "Engineering Manager",
    "Designer",
    "Senior Designer",
    "Lead Designer",
    "Design Manager",
];

const TEAMS: &[&str] = &[
    "Design System",
    "Jira",
    "Confluence",
    "Platform",
    "Mobile",
    "Growth",
    "Identity",
    "Analytics",
];

/// A column that can be placed on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTemplate {
    pub column_id: ColumnId,
    pub title: String,
}

impl ColumnTemplate {
    pub fn new(column_id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            title: title.into(),
        }
    }
}

/// A default column and how many sample cards it starts with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSeed {
    #[serde(flatten)]
    pub template: ColumnTemplate,
    pub cards: usize,
}

impl ColumnSeed {
    pub fn new(column_id: impl Into<ColumnId>, title: impl Into<String>, cards: usize) -> Self {
        Self {
            template: ColumnTemplate::new(column_id, title),
            cards,
        }
    }
}

/// Produces cards for new columns
pub trait CardFactory: Send {
    /// Generate `amount` cards with fresh ids
    fn make_cards(&mut self, amount: usize) -> Vec<Card>;

    /// Called with every board the factory will generate cards for, so ids
    /// it hands out later cannot collide with cards already on it.
    fn observe(&mut self, _board: &BoardData) {}
}

/// Picks which unused template `add column` places
pub trait TemplateSelector: Send {
    /// Choose one of `unused`, which is never empty
    fn select<'a>(&mut self, unused: &[&'a ColumnTemplate]) -> Option<&'a ColumnTemplate>;
}

/// Generates realistic-looking cards from fixed pools
pub struct SampleCardFactory {
    rng: StdRng,
    position: u64,
}

impl SampleCardFactory {
    /// Factory seeded from the OS
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            position: 0,
        }
    }

    /// Factory with reproducible output
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            position: 0,
        }
    }

    fn pick(&mut self, pool: &[&str]) -> String {
        pool[self.rng.random_range(0..pool.len())].to_string()
    }

    fn next_card(&mut self) -> Card {
        self.position += 1;
        let slot = (self.position as usize) % ROLES.len();
        let name = NAMES[slot].to_string();
        let count = self.rng.random_range(1..=2);

        let tags = (0..count)
            .map(|id| CardTag {
                id,
                tag: self.pick(TAGS),
            })
            .collect();
        let assignees = (0..count)
            .map(|_| Assignee {
                name: name.clone(),
                avatar: format!(
                    "https://i.pravatar.cc/100?new={}",
                    self.rng.random_range(1..=100_000u32)
                ),
            })
            .collect();

        Card {
            user_id: CardId::from_string(format!("{}{}", CARD_ID_PREFIX, self.position)),
            title: self.pick(TITLES),
            role: ROLES[slot].to_string(),
            team_name: TEAMS[slot].to_string(),
            ticket_id: format!(
                "{}-{}",
                TICKET_PREFIX,
                self.rng.random_range(1..=100_000u32)
            ),
            name,
            tags,
            assignees,
        }
    }
}

impl Default for SampleCardFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CardFactory for SampleCardFactory {
    fn make_cards(&mut self, amount: usize) -> Vec<Card> {
        (0..amount).map(|_| self.next_card()).collect()
    }

    fn observe(&mut self, board: &BoardData) {
        let highest = board
            .column_map
            .values()
            .flat_map(|c| &c.items)
            .filter_map(|card| card.user_id.as_str().strip_prefix(CARD_ID_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.position = self.position.max(highest);
    }
}

/// Uniform random choice among unused templates
pub struct RandomTemplate {
    rng: StdRng,
}

impl RandomTemplate {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateSelector for RandomTemplate {
    fn select<'a>(&mut self, unused: &[&'a ColumnTemplate]) -> Option<&'a ColumnTemplate> {
        if unused.is_empty() {
            return None;
        }
        Some(unused[self.rng.random_range(0..unused.len())])
    }
}

/// Always the first unused template in pool order
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstUnusedTemplate;

impl TemplateSelector for FirstUnusedTemplate {
    fn select<'a>(&mut self, unused: &[&'a ColumnTemplate]) -> Option<&'a ColumnTemplate> {
        unused.first().copied()
    }
}

/// Everything `add column` needs to invent a column
pub struct SampleData {
    pub cards: Box<dyn CardFactory>,
    pub selector: Box<dyn TemplateSelector>,
    pub templates: Vec<ColumnTemplate>,
    /// Cards generated for each added column
    pub added_column_cards: usize,
}

impl SampleData {
    pub fn new(
        cards: impl CardFactory + 'static,
        selector: impl TemplateSelector + 'static,
        templates: Vec<ColumnTemplate>,
        added_column_cards: usize,
    ) -> Self {
        Self {
            cards: Box::new(cards),
            selector: Box::new(selector),
            templates,
            added_column_cards,
        }
    }
}

/// Build a fresh board from default column seeds
pub fn generate_board(seeds: &[ColumnSeed], cards: &mut dyn CardFactory) -> BoardData {
    BoardData::from_columns(seeds.iter().map(|seed| {
        Column::new(seed.template.column_id.clone(), seed.template.title.clone())
            .with_items(cards.make_cards(seed.cards))
    }))
}

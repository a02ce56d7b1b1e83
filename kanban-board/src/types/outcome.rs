//! Outcome records describing the most recent mutation

use super::ids::ColumnId;
use serde::{Deserialize, Serialize};

/// Input modality that caused an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Pointer,
    Keyboard,
}

/// What the last reorder or move did.
///
/// Read only for reporting; never fed back into later mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Outcome {
    #[serde(rename_all = "camelCase")]
    ColumnReorder {
        column_id: ColumnId,
        start_index: usize,
        finish_index: usize,
    },
    #[serde(rename_all = "camelCase")]
    CardReorder {
        column_id: ColumnId,
        start_index: usize,
        finish_index: usize,
    },
    #[serde(rename_all = "camelCase")]
    CardMove {
        finish_column_id: ColumnId,
        item_index_in_start_column: usize,
        item_index_in_finish_column: usize,
    },
}

/// An outcome together with the trigger that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
    pub outcome: Outcome,
}

impl LastOperation {
    pub fn new(outcome: Outcome, trigger: Option<Trigger>) -> Self {
        Self { trigger, outcome }
    }

    /// True when the operation came from the keyboard
    pub fn is_keyboard(&self) -> bool {
        self.trigger == Some(Trigger::Keyboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_wire_format() {
        let op = LastOperation::new(
            Outcome::CardMove {
                finish_column_id: ColumnId::from("B"),
                item_index_in_start_column: 1,
                item_index_in_finish_column: 0,
            },
            Some(Trigger::Pointer),
        );

        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({
                "trigger": "pointer",
                "outcome": {
                    "type": "card-move",
                    "finishColumnId": "B",
                    "itemIndexInStartColumn": 1,
                    "itemIndexInFinishColumn": 0
                }
            })
        );
    }

    #[test]
    fn test_outcome_without_trigger() {
        let parsed: LastOperation = serde_json::from_value(json!({
            "outcome": {
                "type": "column-reorder",
                "columnId": "X",
                "startIndex": 0,
                "finishIndex": 2
            }
        }))
        .unwrap();

        assert_eq!(parsed.trigger, None);
        assert!(!parsed.is_keyboard());
        assert!(matches!(parsed.outcome, Outcome::ColumnReorder { finish_index: 2, .. }));
    }
}

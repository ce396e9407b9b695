/*
 * conditions.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Condition and action configuration nodes.
//!
//! These are pure configuration: ids, integer codes and numeric ranges. The
//! rendering lives in [`crate::conditions`]. Codes are small integers with
//! named constants in the modules below; rendering decodes them exhaustively
//! and reports unknown codes.

use serde::{Deserialize, Serialize};

pub mod group_operator {
    pub const AND: u8 = 0;
    pub const OR: u8 = 1;
}

pub mod compare_operator {
    pub const EQUAL: u8 = 0;
    pub const NOT_EQUAL: u8 = 1;
    pub const LESS: u8 = 2;
    pub const LESS_OR_EQUAL: u8 = 3;
    pub const GREATER: u8 = 4;
    pub const GREATER_OR_EQUAL: u8 = 5;
}

pub mod quest_state {
    pub const NOT_STARTED: u8 = 0;
    pub const IN_PROGRESS: u8 = 1;
    pub const SUCCESS: u8 = 2;
    pub const FAILED: u8 = 3;
}

pub mod inventory_operator {
    pub const AT_LEAST: u8 = 0;
    pub const AT_MAXIMUM: u8 = 1;
    pub const HAS_EQUIPPED: u8 = 2;
    pub const HAS_NOT_EQUIPPED: u8 = 3;
}

pub mod game_time_operator {
    pub const BEFORE: u8 = 0;
    pub const AFTER: u8 = 1;
}

pub mod routine_event_state {
    pub const DISABLED: u8 = 0;
    pub const ENABLED: u8 = 1;
}

pub mod npc_alive_state {
    pub const ALIVE: u8 = 0;
    pub const DEAD: u8 = 1;
}

pub mod value_change_operator {
    pub const SET: u8 = 0;
    pub const ADD: u8 = 1;
    pub const SUBTRACT: u8 = 2;
}

pub mod transfer_direction {
    pub const TO_PLAYER: u8 = 0;
    pub const TO_NPC: u8 = 1;
}

pub mod wait_unit {
    pub const SECONDS: u8 = 0;
    pub const MINUTES: u8 = 1;
    pub const HOURS: u8 = 2;
    pub const DAYS: u8 = 3;
}

/// A condition configuration node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionNode {
    /// Children joined with the group operator, in order.
    Group {
        operator: u8,
        #[serde(default)]
        conditions: Vec<ConditionNode>,
    },
    ValueField {
        field_id: String,
        /// Field name at the time the condition was authored.
        field_name: String,
        operator: u8,
        compare_value: String,
    },
    QuestState {
        quest_id: String,
        state: u8,
    },
    Inventory {
        item_id: String,
        #[serde(default)]
        quantity: u32,
        operator: u8,
    },
    GameTime {
        hours: u32,
        minutes: u32,
        operator: u8,
    },
    RandomValue {
        min: i64,
        max: i64,
        operator: u8,
        compare_value: i64,
    },
    DailyRoutineEventState {
        npc_id: String,
        event_id: String,
        state: u8,
    },
    NpcAliveState {
        npc_id: String,
        state: u8,
    },
    /// Raw script code written by the author.
    Code {
        code: String,
    },
}

/// An action configuration node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionNode {
    ChangeValueField {
        field_id: String,
        field_name: String,
        operator: u8,
        value: String,
    },
    SetQuestState {
        quest_id: String,
        state: u8,
    },
    TransferItem {
        item_id: String,
        quantity: u32,
        direction: u8,
    },
    SetDailyRoutineEventState {
        npc_id: String,
        event_id: String,
        state: u8,
    },
    Wait {
        amount: u32,
        unit: u8,
    },
    Code {
        code: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_condition_tree_from_json() {
        let node: ConditionNode = serde_json::from_value(serde_json::json!({
            "kind": "group",
            "operator": 1,
            "conditions": [
                { "kind": "quest_state", "quest_id": "q1", "state": 2 },
                { "kind": "code", "code": "IsNight()" }
            ]
        }))
        .unwrap();

        assert_eq!(
            node,
            ConditionNode::Group {
                operator: group_operator::OR,
                conditions: vec![
                    ConditionNode::QuestState {
                        quest_id: "q1".into(),
                        state: quest_state::SUCCESS
                    },
                    ConditionNode::Code {
                        code: "IsNight()".into()
                    },
                ],
            }
        );
    }
}

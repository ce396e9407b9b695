/*
 * dialog.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Dialog step graphs.
//!
//! A dialog is a flat list of steps linked by id. Successors are stored on
//! the steps; predecessors are computed by the dialog adapter.

use crate::model::conditions::{ActionNode, ConditionNode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportDialog {
    pub id: String,
    #[serde(default)]
    pub steps: Vec<ExportDialogStep>,
}

impl ExportDialog {
    pub fn step(&self, id: &str) -> Option<&ExportDialogStep> {
        self.steps.iter().find(|step| step.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDialogStep {
    pub id: String,
    #[serde(flatten)]
    pub content: StepContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_id: Option<String>,
}

impl ExportDialogStep {
    pub fn new(id: impl Into<String>, content: StepContent) -> Self {
        Self {
            id: id.into(),
            content,
            next_step_id: None,
        }
    }

    pub fn with_next(mut self, next_step_id: impl Into<String>) -> Self {
        self.next_step_id = Some(next_step_id.into());
        self
    }

    /// Ids of all steps this step can continue with, in declaration order.
    ///
    /// For conditions the `else` target comes last; for references the
    /// referenced step replaces `next_step_id`.
    pub fn successor_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        match &self.content {
            StepContent::NpcText { .. } | StepContent::PlayerText { .. } | StepContent::Action { .. } => {
                ids.extend(self.next_step_id.as_deref());
            }
            StepContent::Choice { choices } => {
                ids.extend(choices.iter().filter_map(|c| c.next_step_id.as_deref()));
            }
            StepContent::Condition {
                branches,
                else_next_step_id,
            } => {
                ids.extend(branches.iter().filter_map(|b| b.next_step_id.as_deref()));
                ids.extend(else_next_step_id.as_deref());
            }
            StepContent::Reference { reference_step_id } => ids.push(reference_step_id),
        }
        ids
    }
}

/// What a dialog step does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepContent {
    NpcText {
        text: String,
    },
    PlayerText {
        text: String,
    },
    Choice {
        choices: Vec<DialogChoice>,
    },
    Condition {
        branches: Vec<ConditionBranch>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_next_step_id: Option<String>,
    },
    Action {
        action: ActionNode,
    },
    /// Continue with another step of the same dialog.
    Reference {
        reference_step_id: String,
    },
}

impl StepContent {
    pub fn type_name(&self) -> &'static str {
        match self {
            StepContent::NpcText { .. } => "npc_text",
            StepContent::PlayerText { .. } => "player_text",
            StepContent::Choice { .. } => "choice",
            StepContent::Condition { .. } => "condition",
            StepContent::Action { .. } => "action",
            StepContent::Reference { .. } => "reference",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogChoice {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionBranch {
    pub id: String,
    pub condition: ConditionNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_step_json_shape() {
        let step: ExportDialogStep = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "type": "npc_text",
            "text": "Who goes there?",
            "next_step_id": "s2"
        }))
        .unwrap();

        assert_eq!(step.content.type_name(), "npc_text");
        assert_eq!(step.successor_ids(), vec!["s2"]);
    }

    #[test]
    fn test_condition_successors_end_with_else() {
        let step = ExportDialogStep::new(
            "c",
            StepContent::Condition {
                branches: vec![ConditionBranch {
                    id: "b1".into(),
                    condition: ConditionNode::Code { code: "x".into() },
                    next_step_id: Some("yes".into()),
                }],
                else_next_step_id: Some("no".into()),
            },
        );
        assert_eq!(step.successor_ids(), vec!["yes", "no"]);
    }
}

/*
 * xss.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Scan user-authored rich text for script injection.
//!
//! Multi-line flex fields and dialog texts are entered as rich text. Exports
//! end up in game scripts and in tooling that may display them as HTML, so
//! markup that could execute script aborts the export.

use crate::error::ExportError;
use crate::model::{ExportObjectData, FlexFieldType, StepContent};
use once_cell::sync::Lazy;
use regex::Regex;

/// Markup that can run script. `on...=` handlers only count inside a tag.
static XSS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)<\s*script\b|javascript\s*:|<\s*iframe\b|<\s*object\b|<\s*embed\b",
        r#"|<\s*[a-z][a-z0-9-]*\b[^<>]*?[\s/"']on[a-z]+\s*=[^<>]*>"#,
    ))
    .expect("xss pattern is valid")
});

pub fn contains_xss(text: &str) -> bool {
    XSS_RE.is_match(text)
}

/// Check every rich text of `data`, failing on the first hit.
pub fn check_export_data(data: &ExportObjectData) -> Result<(), ExportError> {
    let base = data.object.base();
    for field in &base.fields {
        if field.field_type == FlexFieldType::MultiLineText && contains_xss(&field.value) {
            return Err(ExportError::XssDetected {
                location: format!("field `{}` of `{}`", field.name, base.name),
            });
        }
    }

    let Some(dialog) = &data.dialog else {
        return Ok(());
    };
    for step in &dialog.steps {
        match &step.content {
            StepContent::NpcText { text } | StepContent::PlayerText { text } => {
                if contains_xss(text) {
                    return Err(ExportError::XssDetected {
                        location: format!("dialog step `{}`", step.id),
                    });
                }
            }
            StepContent::Choice { choices } => {
                if let Some(choice) = choices.iter().find(|c| contains_xss(&c.text)) {
                    return Err(ExportError::XssDetected {
                        location: format!("choice `{}` of dialog step `{}`", choice.id, step.id),
                    });
                }
            }
            StepContent::Condition { .. } | StepContent::Action { .. } | StepContent::Reference { .. } => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DialogChoice, ExportDialog, ExportDialogStep, ExportObject, FlexField, FlexFieldObject, Npc,
    };

    fn npc_with(field: FlexField) -> ExportObjectData {
        ExportObjectData::new(ExportObject::Npc(Npc {
            base: FlexFieldObject::new("npc-1", "Grom").with_field(field),
            ..Default::default()
        }))
    }

    #[test]
    fn test_patterns() {
        assert!(contains_xss("<script>alert(1)</script>"));
        assert!(contains_xss("< SCRIPT src=x>"));
        assert!(contains_xss("<a href=\"javascript:alert(1)\">"));
        assert!(contains_xss("<img src=x onerror=alert(1)>"));
        assert!(!contains_xss("The scripture says: be brave."));
        assert!(!contains_xss("x <= 3 and y > 2"));
    }

    #[test]
    fn test_event_handlers_only_inside_tags() {
        assert!(contains_xss("<svg/onload=alert(1)>"));
        assert!(contains_xss("<div class='x' onClick = \"go()\">hi</div>"));

        assert!(!contains_xss("one = two"));
        assert!(!contains_xss("Set online = true, then wait."));
        assert!(!contains_xss("<b>Hello</b>, one = two"));
        assert!(!contains_xss("if a < b then one = 1"));
    }

    #[test]
    fn test_only_multi_line_fields_are_scanned() {
        let field = FlexField::new("f1", "Bio", "<script>x</script>");
        assert!(check_export_data(&npc_with(field.clone())).is_ok());

        let field = field.with_type(FlexFieldType::MultiLineText);
        let err = check_export_data(&npc_with(field)).unwrap_err();
        assert_eq!(err.to_string(), "Possible cross-site scripting in field `Bio` of `Grom`");
    }

    #[test]
    fn test_choice_text_is_scanned() {
        let data = npc_with(FlexField::new("f1", "Name", "Grom")).with_dialog(ExportDialog {
            id: "d1".into(),
            steps: vec![ExportDialogStep::new(
                "s1",
                StepContent::Choice {
                    choices: vec![DialogChoice {
                        id: "c1".into(),
                        text: "<iframe src=evil>".into(),
                        condition: None,
                        next_step_id: None,
                    }],
                },
            )],
        });
        assert!(matches!(
            check_export_data(&data),
            Err(ExportError::XssDetected { location }) if location == "choice `c1` of dialog step `s1`"
        ));
    }
}

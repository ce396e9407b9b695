/*
 * flex_field.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde::{Deserialize, Serialize};

/// Separator of the alias list in [`ScriptSettings::additional_script_names`].
pub const ALIAS_SEPARATOR: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexFieldType {
    #[default]
    SingleLineText,
    MultiLineText,
    Number,
    Option,
}

impl FlexFieldType {
    pub fn name(self) -> &'static str {
        match self {
            FlexFieldType::SingleLineText => "single_line_text",
            FlexFieldType::MultiLineText => "multi_line_text",
            FlexFieldType::Number => "number",
            FlexFieldType::Option => "option",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScriptSettings {
    /// Additional names the field is known by in scripts, `,`-separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_script_names: Option<String>,
}

impl ScriptSettings {
    /// The trimmed, non-empty aliases.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.additional_script_names
            .as_deref()
            .unwrap_or_default()
            .split(ALIAS_SEPARATOR)
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
    }
}

/// A named, typed attribute of an NPC, item or skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexField {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub field_type: FlexFieldType,
    #[serde(default)]
    pub script_settings: ScriptSettings,
}

impl FlexField {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: value.into(),
            field_type: FlexFieldType::SingleLineText,
            script_settings: ScriptSettings::default(),
        }
    }

    pub fn with_type(mut self, field_type: FlexFieldType) -> Self {
        self.field_type = field_type;
        self
    }

    pub fn with_aliases(mut self, aliases: impl Into<String>) -> Self {
        self.script_settings.additional_script_names = Some(aliases.into());
        self
    }
}

/// The shared part of every exportable object.
///
/// Bookkeeping members are carried for round-tripping but never exported.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlexFieldObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FlexField>,
    #[serde(default)]
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
}

impl FlexFieldObject {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: FlexField) -> Self {
        self.fields.push(field);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_are_trimmed() {
        let field = FlexField::new("f1", "Health", "10").with_aliases(" HP, Hit Points ,,");
        let aliases: Vec<_> = field.script_settings.aliases().collect();
        assert_eq!(aliases, vec!["HP", "Hit Points"]);
        assert_eq!(FlexField::new("f2", "Name", "").script_settings.aliases().count(), 0);
    }
}

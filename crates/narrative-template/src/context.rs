/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template value and context types.
//!
//! Export data (objects, dialogs, rendered condition snippets) reaches the
//! template as a tree of [`TemplateValue`]s. Maps are ordered so that
//! iterating over them, and therefore rendering, is deterministic.

use std::collections::{BTreeMap, HashMap};

/// Ordered map of template values.
pub type ValueMap = BTreeMap<String, TemplateValue>;

/// A value that can be used in template evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TemplateValue {
    String(String),

    /// Numbers are stored as `f64`; integral values render without a
    /// fractional part.
    Number(f64),

    Bool(bool),

    List(Vec<TemplateValue>),

    Map(ValueMap),

    #[default]
    Null,
}

impl TemplateValue {
    /// Build a map value from `(key, value)` pairs.
    ///
    /// ```
    /// use narrative_template::TemplateValue;
    ///
    /// let npc = TemplateValue::map([("name", "Grom".into()), ("level", 3.into())]);
    /// assert_eq!(npc.get_path(&["name"]).unwrap().render(), "Grom");
    /// ```
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, TemplateValue)>) -> Self {
        TemplateValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Check if this value is "truthy" for conditional evaluation.
    ///
    /// - `false`, `null`, `0`, the empty string, empty lists and empty maps are falsy
    /// - everything else is truthy (including the string `"false"`)
    pub fn is_truthy(&self) -> bool {
        match self {
            TemplateValue::Bool(b) => *b,
            TemplateValue::Number(n) => *n != 0.0,
            TemplateValue::String(s) => !s.is_empty(),
            TemplateValue::List(items) => !items.is_empty(),
            TemplateValue::Map(m) => !m.is_empty(),
            TemplateValue::Null => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TemplateValue::Null)
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            TemplateValue::String(_) => "string",
            TemplateValue::Number(_) => "number",
            TemplateValue::Bool(_) => "bool",
            TemplateValue::List(_) => "list",
            TemplateValue::Map(_) => "map",
            TemplateValue::Null => "null",
        }
    }

    /// Look up a member of a map value.
    pub fn get_field(&self, name: &str) -> Option<&TemplateValue> {
        match self {
            TemplateValue::Map(m) => m.get(name),
            _ => None,
        }
    }

    /// Look up an element of a list value.
    pub fn get_index(&self, index: usize) -> Option<&TemplateValue> {
        match self {
            TemplateValue::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Get a nested field by path.
    ///
    /// For example, `get_path(&["inventory", "count"])` on a map containing
    /// `{"inventory": {"count": 3}}` returns the count value.
    pub fn get_path(&self, path: &[&str]) -> Option<&TemplateValue> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self.get_field(first).and_then(|v| v.get_path(rest)),
        }
    }

    /// Render this value as a string for output.
    ///
    /// - String: returned as-is
    /// - Number: integral values without decimals (`3`, not `3.0`)
    /// - Bool: `true` / `false`
    /// - List: concatenation of rendered elements
    /// - Map, Null: empty
    pub fn render(&self) -> String {
        match self {
            TemplateValue::String(s) => s.clone(),
            TemplateValue::Number(n) => format_number(*n),
            TemplateValue::Bool(b) => b.to_string(),
            TemplateValue::List(items) => items.iter().map(|v| v.render()).collect(),
            TemplateValue::Map(_) => String::new(),
            TemplateValue::Null => String::new(),
        }
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::String(s)
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::String(s.to_string())
    }
}

impl From<&String> for TemplateValue {
    fn from(s: &String) -> Self {
        TemplateValue::String(s.clone())
    }
}

impl From<bool> for TemplateValue {
    fn from(b: bool) -> Self {
        TemplateValue::Bool(b)
    }
}

impl From<f64> for TemplateValue {
    fn from(n: f64) -> Self {
        TemplateValue::Number(n)
    }
}

impl From<i32> for TemplateValue {
    fn from(n: i32) -> Self {
        TemplateValue::Number(f64::from(n))
    }
}

impl From<u32> for TemplateValue {
    fn from(n: u32) -> Self {
        TemplateValue::Number(f64::from(n))
    }
}

impl From<i64> for TemplateValue {
    fn from(n: i64) -> Self {
        TemplateValue::Number(n as f64)
    }
}

impl From<usize> for TemplateValue {
    fn from(n: usize) -> Self {
        TemplateValue::Number(n as f64)
    }
}

impl From<Vec<TemplateValue>> for TemplateValue {
    fn from(items: Vec<TemplateValue>) -> Self {
        TemplateValue::List(items)
    }
}

impl From<ValueMap> for TemplateValue {
    fn from(map: ValueMap) -> Self {
        TemplateValue::Map(map)
    }
}

impl<T: Into<TemplateValue>> From<Option<T>> for TemplateValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(TemplateValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for TemplateValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => TemplateValue::Null,
            Value::Bool(b) => TemplateValue::Bool(b),
            Value::Number(n) => n.as_f64().map_or(TemplateValue::Null, TemplateValue::Number),
            Value::String(s) => TemplateValue::String(s),
            Value::Array(items) => {
                TemplateValue::List(items.into_iter().map(TemplateValue::from).collect())
            }
            Value::Object(entries) => TemplateValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, TemplateValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// A context for template evaluation containing variable bindings.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Variable bindings at this level.
    variables: HashMap<String, TemplateValue>,

    /// Parent context for nested scopes (e.g., inside for loops).
    parent: Option<Box<TemplateContext>>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: TemplateValue) {
        self.variables.insert(key.into(), value);
    }

    /// Builder-style [`TemplateContext::insert`].
    pub fn with(mut self, key: impl Into<String>, value: TemplateValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable from the context, checking parent scopes.
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.variables
            .get(key)
            .or_else(|| self.parent.as_ref().and_then(|p| p.get(key)))
    }

    /// Get a variable by path (e.g., `["object", "name"]`).
    pub fn get_path(&self, path: &[&str]) -> Option<&TemplateValue> {
        let (first, rest) = path.split_first()?;
        self.get(first).and_then(|v| v.get_path(rest))
    }

    /// Create a child context for a nested scope (e.g., for loop iteration).
    ///
    /// The child context inherits access to parent variables.
    pub fn child(&self) -> TemplateContext {
        TemplateContext {
            variables: HashMap::new(),
            parent: Some(Box::new(self.clone())),
        }
    }
}

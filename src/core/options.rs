//! Normalized options handed to command handlers

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Key under which positionals appear in the serialized form
pub const POSITIONALS_KEY: &str = "";

/// Value of one parsed option
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean flag (arity 0)
    Flag(bool),
    /// `once` option with arity 1
    Single(String),
    /// Every other option, values in command-line order
    Multiple(Vec<String>),
}

/// Options parsed for the selected command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    values: BTreeMap<String, OptionValue>,
    positionals: Vec<String>,
}

impl Options {
    pub fn new(positionals: Vec<String>) -> Self {
        Self {
            values: BTreeMap::new(),
            positionals,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: OptionValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Value of a flag; `false` when absent or not a flag
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(OptionValue::Flag(true)))
    }

    /// First value of an option
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            OptionValue::Single(value) => Some(value),
            OptionValue::Multiple(values) => values.first().map(String::as_str),
            OptionValue::Flag(_) => None,
        }
    }

    /// All values of an option; empty when absent or a flag
    pub fn values(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(OptionValue::Single(value)) => std::slice::from_ref(value),
            Some(OptionValue::Multiple(values)) => values,
            _ => &[],
        }
    }

    /// Positional arguments following the command name
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Option names and values, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Options {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(POSITIONALS_KEY, &self.positionals)?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

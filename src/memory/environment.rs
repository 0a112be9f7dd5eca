//! Flat runtime namespace
//!
//! Every identifier lives in one program-wide scope; the last assignment wins.

use crate::memory::value::Value;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, Serializer};

/// Mapping from identifier to its last-assigned value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    #[serde(serialize_with = "serialize_sorted")]
    bindings: FxHashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Bind `name`, returning the value it replaced
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.bindings.insert(name.into(), value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings sorted by name
    pub fn sorted(&self) -> Vec<(&str, &Value)> {
        let mut entries: Vec<(&str, &Value)> = self
            .bindings
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Estimate the memory usage of this environment in bytes
    pub fn estimated_size(&self) -> usize {
        self.bindings
            .iter()
            .map(|(name, value)| name.len() + value.estimated_size())
            .sum()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Environment {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            bindings: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

fn serialize_sorted<S: Serializer>(
    bindings: &FxHashMap<String, Value>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut entries: Vec<_> = bindings.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    serializer.collect_map(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_assignment_wins() {
        let mut env = Environment::new();
        assert_eq!(env.set("a", Value::Int(1)), None);
        assert_eq!(env.set("a", Value::Int(2)), Some(Value::Int(1)));
        assert_eq!(env.get("a"), Some(&Value::Int(2)));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_serializes_sorted_by_name() {
        let env: Environment = [("b", Value::Int(5)), ("a", Value::Int(2))]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&env).unwrap(), r#"{"a":2,"b":5}"#);

        let back: Environment = serde_json::from_str(r#"{"a":2,"b":5}"#).unwrap();
        assert_eq!(back, env);
    }
}

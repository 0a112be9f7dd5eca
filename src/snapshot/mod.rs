// Value history for step-by-step visualization

use crate::interpreter::errors::RuntimeError;
use crate::memory::{Environment, Value};
use crate::trace::StepKind;
use serde::{Deserialize, Serialize};

/// Mock terminal for capturing `print` output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Terminal {
    lines: Vec<String>,
}

impl Terminal {
    pub fn new() -> Self {
        Terminal { lines: Vec::new() }
    }

    /// Record one line of output
    pub fn print_line(&mut self, text: String) {
        self.lines.push(text);
    }

    /// Get all lines as a slice of strings
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Drop every line after the first `len`
    pub fn truncate(&mut self, len: usize) {
        self.lines.truncate(len);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// What a recorded step did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Assigned {
        targets: Vec<String>,
        value: Value,
    },
    Called {
        function: String,
        args: Vec<Value>,
        result: Value,
    },
    Defined {
        name: String,
        params: Vec<String>,
    },
    Returned {
        value: Value,
    },
}

/// Environment state right after a state-changing step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub step_index: usize,
    pub kind: StepKind,
    pub event: Event,
    pub environment: Environment,
    /// Number of terminal lines written so far
    pub output_lines: usize,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        let event_size = match &self.event {
            Event::Assigned { targets, value } => {
                targets.iter().map(String::len).sum::<usize>() + value.estimated_size()
            }
            Event::Called {
                function,
                args,
                result,
            } => {
                function.len()
                    + args.iter().map(Value::estimated_size).sum::<usize>()
                    + result.estimated_size()
            }
            Event::Defined { name, params } => {
                name.len() + params.iter().map(String::len).sum::<usize>()
            }
            Event::Returned { value } => value.estimated_size(),
        };

        std::mem::size_of::<Snapshot>() + event_size + self.environment.estimated_size()
    }
}

/// Append-only history of snapshots with a memory budget
#[derive(Debug)]
pub struct ValueTrace {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl ValueTrace {
    pub fn new(max_memory: usize) -> Self {
        ValueTrace {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), RuntimeError> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(RuntimeError::SnapshotLimitExceeded {
                current: self.current_memory + snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(index: usize) -> Snapshot {
        Snapshot {
            step_index: index,
            kind: StepKind::Assign,
            event: Event::Assigned {
                targets: vec!["a".to_string()],
                value: Value::Int(index as i64),
            },
            environment: [("a", Value::Int(index as i64))].into_iter().collect(),
            output_lines: 0,
        }
    }

    #[test]
    fn test_push_within_budget() {
        let mut trace = ValueTrace::new(1024 * 1024);
        trace.push(snapshot(0)).unwrap();
        trace.push(snapshot(1)).unwrap();

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.get(1).map(|s| s.step_index), Some(1));
        assert!(trace.memory_usage() > 0);
    }

    #[test]
    fn test_push_over_budget_is_rejected() {
        let one = snapshot(0).estimated_size();
        let mut trace = ValueTrace::new(one);
        trace.push(snapshot(0)).unwrap();

        let err = trace.push(snapshot(1)).unwrap_err();
        assert!(matches!(err, RuntimeError::SnapshotLimitExceeded { limit, .. } if limit == one));
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_event_json_shape() {
        let event = Event::Called {
            function: "print".to_string(),
            args: vec![Value::Int(5)],
            result: Value::None,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"called","function":"print","args":[5],"result":null}"#
        );
    }
}

//! Ordered batch of pending commands

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Pending mutations keyed by command name, in insertion order.
///
/// A key that is present always maps to at least one payload: setting an
/// empty list or removing the last payload removes the key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandCollection {
    commands: Vec<(String, Vec<Value>)>,
}

impl CommandCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the payloads of a command
    pub fn set(&mut self, name: impl Into<String>, payloads: Vec<Value>) {
        let name = name.into();
        if payloads.is_empty() {
            self.remove(&name);
            return;
        }

        match self.position(&name) {
            Some(index) => self.commands[index].1 = payloads,
            None => self.commands.push((name, payloads)),
        }
    }

    /// Append a payload, creating the command if needed
    pub fn add(&mut self, name: impl Into<String>, payload: Value) {
        let name = name.into();
        match self.position(&name) {
            Some(index) => self.commands[index].1.push(payload),
            None => self.commands.push((name, vec![payload])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.position(name).map(|index| self.commands[index].1.as_slice())
    }

    /// Remove a command and return its payloads, `None` if absent
    pub fn remove(&mut self, name: &str) -> Option<Vec<Value>> {
        self.position(name)
            .map(|index| self.commands.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of distinct commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Total number of payloads across all commands
    pub fn payload_count(&self) -> usize {
        self.commands.iter().map(|(_, payloads)| payloads.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.commands
            .iter()
            .map(|(name, payloads)| (name.as_str(), payloads.as_slice()))
    }

    /// Take every command out, leaving the collection empty
    pub fn drain(&mut self) -> Self {
        std::mem::take(self)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.commands.iter().position(|(n, _)| n == name)
    }
}

/// Serializes to the bulk command body: `{"add-field": [{..}, {..}], ...}`.
/// Null payloads are skipped and a command left without payloads is omitted.
impl Serialize for CommandCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<(&str, Vec<&Value>)> = self
            .commands
            .iter()
            .map(|(name, payloads)| {
                let payloads: Vec<&Value> = payloads.iter().filter(|p| !p.is_null()).collect();
                (name.as_str(), payloads)
            })
            .filter(|(_, payloads)| !payloads.is_empty())
            .collect();

        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (name, payloads) in present {
            map.serialize_entry(name, &payloads)?;
        }
        map.end()
    }
}

//! Named counters for rebuild events (entities indexed, dropped, ...)

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Counter {
    counters: HashMap<&'static str, usize>,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            counters: HashMap::new(),
        }
    }

    pub fn increment(&mut self, name: &'static str, value: usize) {
        *self.counters.entry(name).or_insert(0) += value;
    }

    /// Overwrite a gauge-style counter (e.g. entities in the latest rebuild).
    pub fn set(&mut self, name: &'static str, value: usize) {
        self.counters.insert(name, value);
    }

    pub fn get(&self, name: &str) -> usize {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn reset_all(&mut self) {
        self.counters.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.counters.iter().map(|(name, value)| (*name, *value))
    }
}

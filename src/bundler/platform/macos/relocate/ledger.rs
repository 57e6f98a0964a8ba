//! Run-scoped record of relocated dependencies.

use std::collections::HashSet;

/// Bundle-relative names (dylib file names, `.framework` directory names)
/// that have already been copied and recursed into during this run.
///
/// Marking a key before recursing into it is what makes the walk terminate on
/// cyclic dependency graphs.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    handled: HashSet<String>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `key` has been handled.
    pub fn already_handled(&self, key: &str) -> bool {
        self.handled.contains(key)
    }

    /// Marks `key` handled. Returns `true` if it was not handled before.
    pub fn mark_handled(&mut self, key: impl Into<String>) -> bool {
        self.handled.insert(key.into())
    }

    /// Number of handled keys.
    pub fn len(&self) -> usize {
        self.handled.len()
    }

    /// Returns `true` if nothing has been handled yet.
    pub fn is_empty(&self) -> bool {
        self.handled.is_empty()
    }

    /// Handled keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.handled.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

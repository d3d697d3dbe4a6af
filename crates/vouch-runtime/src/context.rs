//! Per-suite test context
//!
//! A [`TestContext`] is created fresh for every suite run and shared by that
//! suite's hooks and its context-accepting tests. Hooks may shape it freely;
//! tests may only change the values behind keys that already exist.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Named values shared across one suite run
#[derive(Default)]
pub struct TestContext {
    values: BTreeMap<String, Box<dyn Any>>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing whatever was under `key`
    ///
    /// Returns true when the key was not present before.
    pub fn insert<T: Any>(&mut self, key: impl Into<String>, value: T) -> bool {
        self.values.insert(key.into(), Box::new(value)).is_none()
    }

    /// Borrow the value under `key` if it exists and has type `T`
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Mutably borrow the value under `key` if it exists and has type `T`
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Remove `key`, returning true if it was present
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Record the current key set
    pub fn key_snapshot(&self) -> KeySnapshot {
        KeySnapshot {
            keys: self.values.keys().cloned().collect(),
        }
    }
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Key set of a [`TestContext`] at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySnapshot {
    keys: BTreeSet<String>,
}

/// Keys that appeared or disappeared since a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl KeySnapshot {
    /// Compare against the context's current keys; `None` means unchanged
    pub fn changes(&self, ctx: &TestContext) -> Option<KeyChanges> {
        let current: BTreeSet<&String> = ctx.values.keys().collect();

        let added: Vec<String> = current
            .iter()
            .filter(|k| !self.keys.contains(k.as_str()))
            .map(|k| (*k).clone())
            .collect();
        let removed: Vec<String> = self
            .keys
            .iter()
            .filter(|k| !current.contains(k))
            .cloned()
            .collect();

        if added.is_empty() && removed.is_empty() {
            None
        } else {
            Some(KeyChanges { added, removed })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let mut ctx = TestContext::new();
        assert!(ctx.insert("count", 1u32));
        assert!(!ctx.insert("count", 2u32));

        assert_eq!(ctx.get::<u32>("count"), Some(&2));
        assert_eq!(ctx.get::<String>("count"), None);

        *ctx.get_mut::<u32>("count").unwrap() += 1;
        assert_eq!(ctx.get::<u32>("count"), Some(&3));
    }

    #[test]
    fn test_value_mutation_keeps_snapshot() {
        let mut ctx = TestContext::new();
        ctx.insert("name", String::from("a"));
        let snapshot = ctx.key_snapshot();

        ctx.get_mut::<String>("name").unwrap().push('b');
        ctx.insert("name", 5i64);

        assert_eq!(snapshot.changes(&ctx), None);
    }

    #[test]
    fn test_snapshot_reports_added_and_removed() {
        let mut ctx = TestContext::new();
        ctx.insert("keep", ());
        ctx.insert("drop", ());
        let snapshot = ctx.key_snapshot();

        ctx.remove("drop");
        ctx.insert("new", ());

        assert_eq!(
            snapshot.changes(&ctx),
            Some(KeyChanges {
                added: vec!["new".to_string()],
                removed: vec!["drop".to_string()],
            })
        );
    }

    #[test]
    fn test_debug_lists_keys() {
        let mut ctx = TestContext::new();
        ctx.insert("b", 1);
        ctx.insert("a", 2);
        assert_eq!(format!("{:?}", ctx), r#"TestContext { keys: ["a", "b"] }"#);
    }
}

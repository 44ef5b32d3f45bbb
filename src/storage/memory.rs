/// In-process media: a plain map, and the "no storage here" stand-in

use std::cell::RefCell;
use std::collections::HashMap;

use crate::storage::{KeyValueStore, StorageError};

/// Key-value slots kept in memory
///
/// Nothing survives the process. Useful for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: RefCell<HashMap<String, String>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with one slot already filled, e.g. with data from an older version
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let slots = Self::new();
        slots.slots.borrow_mut().insert(key.into(), value.into());
        slots
    }

    /// Raw payload of a slot
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A context with no durable medium at all
///
/// Reads find nothing and writes fail with [`StorageError::Unavailable`];
/// the habit store turns both into quiet no-ops.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableSlots;

impl KeyValueStore for UnavailableSlots {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

/// A medium whose every read and write fails
#[cfg(test)]
pub(crate) struct FailingSlots;

#[cfg(test)]
impl KeyValueStore for FailingSlots {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("disk went away".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk went away".to_string()))
    }
}

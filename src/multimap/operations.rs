//! Server-Side Operations
//!
//! The executables that wire requests translate into. Each operation is
//! created per invocation, owns copies of the request's collection name,
//! key, value, and thread id, runs once against the local store, and is
//! discarded.
//!
//! The thread id is what makes lock-held entries usable: when an entry is
//! locked, the executing side compares the operation's thread id with the
//! lock owner and lets a reentrant call from the same logical thread
//! proceed instead of failing it.

use super::store::MultiMapStore;
use super::types::Data;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperationError {
    /// The target entry is locked by a different logical thread.
    #[error("entry is locked by thread {owner}, caller thread is {caller}")]
    EntryLocked { owner: u64, caller: u64 },
}

/// Evaluates key presence (no value) or exact key/value presence against
/// the stored multimap state. Never mutates.
#[derive(Debug, Clone)]
pub struct ContainsEntryOperation {
    name: String,
    key: Data,
    value: Option<Data>,
    thread_id: u64,
}

impl ContainsEntryOperation {
    pub(crate) fn new(name: String, key: Data, value: Option<Data>, thread_id: u64) -> Self {
        Self {
            name,
            key,
            value,
            thread_id,
        }
    }

    pub fn value(&self) -> Option<&Data> {
        self.value.as_ref()
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    pub fn execute(&self, store: &MultiMapStore) -> Result<bool, OperationError> {
        check_entry_access(store, &self.name, &self.key, self.thread_id)?;
        Ok(match &self.value {
            None => store.contains_key(&self.name, &self.key),
            Some(value) => store.contains_entry(&self.name, &self.key, value),
        })
    }
}

/// Adds a value to the set under a key; reports whether the multimap changed.
#[derive(Debug, Clone)]
pub struct PutOperation {
    name: String,
    key: Data,
    value: Data,
    thread_id: u64,
}

impl PutOperation {
    pub(crate) fn new(name: String, key: Data, value: Data, thread_id: u64) -> Self {
        Self {
            name,
            key,
            value,
            thread_id,
        }
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    pub fn execute(&self, store: &MultiMapStore) -> Result<bool, OperationError> {
        check_entry_access(store, &self.name, &self.key, self.thread_id)?;
        Ok(store.put(&self.name, self.key.clone(), self.value.clone()))
    }
}

/// Removes one value from the set under a key; reports whether it was there.
#[derive(Debug, Clone)]
pub struct RemoveOperation {
    name: String,
    key: Data,
    value: Data,
    thread_id: u64,
}

impl RemoveOperation {
    pub(crate) fn new(name: String, key: Data, value: Data, thread_id: u64) -> Self {
        Self {
            name,
            key,
            value,
            thread_id,
        }
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    pub fn execute(&self, store: &MultiMapStore) -> Result<bool, OperationError> {
        check_entry_access(store, &self.name, &self.key, self.thread_id)?;
        Ok(store.remove(&self.name, &self.key, &self.value))
    }
}

/// Any operation of the family, as produced by
/// [`MultiMapRequest::prepare_operation`](super::protocol::MultiMapRequest::prepare_operation).
#[derive(Debug, Clone)]
pub enum MultiMapOperation {
    ContainsEntry(ContainsEntryOperation),
    Put(PutOperation),
    Remove(RemoveOperation),
}

impl MultiMapOperation {
    pub fn execute(&self, store: &MultiMapStore) -> Result<bool, OperationError> {
        match self {
            Self::ContainsEntry(op) => op.execute(store),
            Self::Put(op) => op.execute(store),
            Self::Remove(op) => op.execute(store),
        }
    }
}

fn check_entry_access(
    store: &MultiMapStore,
    name: &str,
    key: &Data,
    thread_id: u64,
) -> Result<(), OperationError> {
    match store.lock_owner(name, key) {
        Some(owner) if owner != thread_id => Err(OperationError::EntryLocked {
            owner,
            caller: thread_id,
        }),
        _ => Ok(()),
    }
}

use crate::entry::{DueInstant, EntryId, ReminderEntry};
use crate::error::{Field, OutOfRangeError, StoreError, ValidationError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
struct Entries {
    items: Vec<ReminderEntry>,
    next_id: u64,
}

/// Ordered collection of reminder entries.
///
/// Cloning the store yields another handle to the same entries, which is how
/// the scheduler and the presentation layer share it. Every operation takes
/// the internal lock once, so each call is atomic with respect to the others
/// and to a running tick.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    inner: Arc<Mutex<Entries>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an entry from the raw input fields.
    ///
    /// `time` is `HH:mm` (24-hour) and `date` is `yyyy-MM-dd`.
    pub fn add(&self, description: &str, time: &str, date: &str) -> Result<EntryId, ValidationError> {
        require(description, Field::Description)?;
        require(time, Field::Time)?;
        require(date, Field::Date)?;

        let due = DueInstant::parse(date, time)?;
        self.add_due(description, due)
    }

    /// Add an entry for an already parsed instant
    pub fn add_due(&self, description: &str, due: DueInstant) -> Result<EntryId, ValidationError> {
        require(description, Field::Description)?;

        let mut entries = self.lock();
        let id = EntryId::new(entries.next_id);
        entries.next_id += 1;
        entries.items.push(ReminderEntry {
            id,
            description: description.to_string(),
            due,
            fired: false,
        });

        debug!(%id, %due, "Added task");
        Ok(id)
    }

    /// Remove the entry at a display position.
    ///
    /// Later entries shift down by one, so positions obtained before this
    /// call are stale afterwards.
    pub fn remove_at(&self, index: usize) -> Result<ReminderEntry, OutOfRangeError> {
        let mut entries = self.lock();
        let len = entries.items.len();
        if index >= len {
            return Err(OutOfRangeError { index, len });
        }

        let removed = entries.items.remove(index);
        debug!(id = %removed.id, index, "Removed task");
        Ok(removed)
    }

    /// Remove the entry with the given id
    pub fn remove(&self, id: EntryId) -> Result<ReminderEntry, StoreError> {
        let mut entries = self.lock();
        let index = entries
            .items
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(StoreError::UnknownEntry(id))?;

        let removed = entries.items.remove(index);
        debug!(%id, index, "Removed task");
        Ok(removed)
    }

    /// Snapshot of all entries in insertion order
    pub fn list(&self) -> Vec<ReminderEntry> {
        self.lock().items.clone()
    }

    pub fn get(&self, id: EntryId) -> Option<ReminderEntry> {
        self.lock().items.iter().find(|entry| entry.id == id).cloned()
    }

    /// Current display position of an entry
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.lock().items.iter().position(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Run `f` over the entries while holding the lock.
    ///
    /// Used by the scheduler, which only ever flips `fired`.
    pub(crate) fn scan<R>(&self, f: impl FnOnce(&mut [ReminderEntry]) -> R) -> R {
        let mut entries = self.lock();
        f(&mut entries.items)
    }
}

fn require(value: &str, field: Field) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// The habit store: the single owner of the persisted habit collection
///
/// Every operation reads the whole collection from the configured slot,
/// applies its change and writes the whole collection back. There is one
/// caller at a time, so the last write wins.
///
/// Failures never reach the caller of the plain operations:
///
/// * an unreadable payload loads as an empty collection (logged), and
///   mutations leave it in place,
/// * a record that can't be read is skipped on load and written back
///   unchanged by every mutation,
/// * a missing durable medium turns writes into no-ops,
/// * an unknown id is ignored.
///
/// The `try_*` variants report medium errors and what happened to the
/// target record, for callers that want to tell the user.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::{self, Habit, HabitId, HabitStatus};
use crate::storage::{
    parse_collection, DroppedRecord, KeyValueStore, LoadedCollection, StorageError, StoreConfig,
};

/// What a single-record mutation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The change was written
    Applied,
    /// No habit has that id; nothing was written
    NotFound,
    /// A habit with that id already exists; nothing was written
    Duplicate,
    /// The habit cannot move between these states; nothing was written
    Rejected { from: HabitStatus, to: HabitStatus },
}

/// One element of the stored array
#[derive(Serialize)]
#[serde(untagged)]
enum StoredRecord<'a> {
    Habit(&'a Habit),
    Unreadable(&'a Value),
}

/// Durable collection of habits kept in one slot of a [`KeyValueStore`]
pub struct HabitStore<S: KeyValueStore> {
    medium: S,
    config: StoreConfig,
}

impl<S: KeyValueStore> HabitStore<S> {
    pub fn new(medium: S, config: StoreConfig) -> Self {
        Self { medium, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The underlying medium (useful for testing)
    pub fn medium(&self) -> &S {
        &self.medium
    }

    /// Load every habit, upgraded to the current schema
    ///
    /// Returns an empty collection when nothing is stored, the payload can't
    /// be parsed, or the medium can't be read.
    pub fn load_all(&self) -> Vec<Habit> {
        self.try_load_all().unwrap_or_else(|e| {
            error!("Error reading habits from slot '{}': {}", self.config.slot_key, e);
            Vec::new()
        })
    }

    /// Like [`load_all`](Self::load_all), but medium errors are returned
    ///
    /// An unparseable payload is still not an error: it is logged and read
    /// as empty.
    pub fn try_load_all(&self) -> Result<Vec<Habit>, StorageError> {
        if !self.medium.is_available() {
            debug!("No durable storage available, loading no habits");
            return Ok(Vec::new());
        }

        let payload = match self.medium.get(&self.config.slot_key)? {
            Some(payload) => payload,
            None => return Ok(Vec::new()),
        };

        match parse_collection(&payload) {
            Ok(loaded) => {
                self.report_load(&loaded);
                Ok(loaded.habits)
            }
            Err(e) => {
                error!("Error parsing habits from slot '{}': {}", self.config.slot_key, e);
                Ok(Vec::new())
            }
        }
    }

    /// Replace the stored collection with `habits`
    ///
    /// Records that could not be read are replaced as well.
    pub fn save_all(&self, habits: &[Habit]) {
        if let Err(e) = self.try_save_all(habits) {
            self.report_write_failure("save", e);
        }
    }

    pub fn try_save_all(&self, habits: &[Habit]) -> Result<(), StorageError> {
        self.ensure_available()?;
        self.write_back(habits, &[])
    }

    /// Look up one habit by id
    pub fn get(&self, habit_id: &HabitId) -> Option<Habit> {
        self.try_get(habit_id).unwrap_or_else(|e| {
            error!("Error reading habit {}: {}", habit_id, e);
            None
        })
    }

    pub fn try_get(&self, habit_id: &HabitId) -> Result<Option<Habit>, StorageError> {
        Ok(self.try_load_all()?.into_iter().find(|h| &h.id == habit_id))
    }

    /// Append a habit to the collection
    pub fn add(&self, habit: Habit) {
        self.quietly("add", self.try_add(habit));
    }

    pub fn try_add(&self, mut habit: Habit) -> Result<Mutation, StorageError> {
        let mut loaded = self.load_for_write()?;
        if loaded.contains_id(&habit.id) {
            warn!("Not adding habit {}: id already in use", habit.id);
            return Ok(Mutation::Duplicate);
        }

        habit.enforce_invariants();
        info!("Adding habit '{}' ({})", habit.title, habit.id);
        loaded.habits.push(habit);
        self.write_back(&loaded.habits, &loaded.dropped)?;
        Ok(Mutation::Applied)
    }

    /// Replace the stored habit that has the same id
    ///
    /// The stored creation time is kept, since it never changes. A status
    /// change the stored habit may not make (such as reopening an archived
    /// habit from an old copy) is refused.
    pub fn update(&self, habit: &Habit) {
        self.quietly("update", self.try_update(habit));
    }

    pub fn try_update(&self, habit: &Habit) -> Result<Mutation, StorageError> {
        self.modify(&habit.id, |stored| {
            if !stored.status.can_transition_to(habit.status) {
                return Err(Mutation::Rejected {
                    from: stored.status,
                    to: habit.status,
                });
            }

            let mut updated = habit.clone();
            updated.created_at = stored.created_at;
            updated.enforce_invariants();
            Ok(updated)
        })
    }

    /// Delete a habit
    pub fn remove(&self, habit_id: &HabitId) {
        self.quietly("remove", self.try_remove(habit_id));
    }

    pub fn try_remove(&self, habit_id: &HabitId) -> Result<Mutation, StorageError> {
        let mut loaded = self.load_for_write()?;
        let before = loaded.habits.len();
        loaded.habits.retain(|h| &h.id != habit_id);

        if loaded.habits.len() == before {
            debug!("Not removing habit {}: not found", habit_id);
            return Ok(Mutation::NotFound);
        }

        self.write_back(&loaded.habits, &loaded.dropped)?;
        info!("Removed habit {}", habit_id);
        Ok(Mutation::Applied)
    }

    /// Mark a habit as completed (and its `isCompleted` flag true)
    pub fn mark_completed(&self, habit_id: &HabitId) {
        self.quietly("mark completed", self.try_mark_completed(habit_id));
    }

    pub fn try_mark_completed(&self, habit_id: &HabitId) -> Result<Mutation, StorageError> {
        self.modify(habit_id, |stored| {
            domain::complete(stored).map_err(|_| Mutation::Rejected {
                from: stored.status,
                to: HabitStatus::Completed,
            })
        })
    }

    /// Archive a habit
    pub fn mark_archived(&self, habit_id: &HabitId) {
        self.quietly("mark archived", self.try_mark_archived(habit_id));
    }

    pub fn try_mark_archived(&self, habit_id: &HabitId) -> Result<Mutation, StorageError> {
        self.modify(habit_id, |stored| {
            domain::archive(stored).map_err(|_| Mutation::Rejected {
                from: stored.status,
                to: HabitStatus::Archived,
            })
        })
    }

    /// Rewrite the slot with every record in its current-schema form
    ///
    /// Returns how many legacy records were upgraded. Unreadable records are
    /// written back as they were. Nothing is written when the slot is empty
    /// or holds no legacy records.
    pub fn migrate_in_place(&self) -> Result<usize, StorageError> {
        let loaded = self.load_for_write()?;

        if loaded.upgraded > 0 {
            self.write_back(&loaded.habits, &loaded.dropped)?;
            info!(
                "Migrated slot '{}': {} upgraded, {} kept unreadable",
                self.config.slot_key,
                loaded.upgraded,
                loaded.dropped.len()
            );
        }

        Ok(loaded.upgraded)
    }

    /// Replace the habit with `habit_id` by `change(habit)` and save
    ///
    /// `change` returns the mutation to report instead when it refuses.
    fn modify<F>(&self, habit_id: &HabitId, change: F) -> Result<Mutation, StorageError>
    where
        F: FnOnce(&Habit) -> Result<Habit, Mutation>,
    {
        let mut loaded = self.load_for_write()?;
        let stored = match loaded.habits.iter_mut().find(|h| &h.id == habit_id) {
            Some(stored) => stored,
            None => {
                debug!("Ignoring change to habit {}: not found", habit_id);
                return Ok(Mutation::NotFound);
            }
        };

        match change(&*stored) {
            Ok(updated) => *stored = updated,
            Err(refused) => {
                warn!("Ignoring change to habit {}: {:?}", habit_id, refused);
                return Ok(refused);
            }
        }

        self.write_back(&loaded.habits, &loaded.dropped)?;
        debug!("Updated habit {}", habit_id);
        Ok(Mutation::Applied)
    }

    /// Read the collection at the start of a read-modify-write
    ///
    /// Unlike [`try_load_all`](Self::try_load_all), an unparseable payload is
    /// an error here, so the write that follows can't replace it.
    fn load_for_write(&self) -> Result<LoadedCollection, StorageError> {
        self.ensure_available()?;

        let loaded = match self.medium.get(&self.config.slot_key)? {
            Some(payload) => parse_collection(&payload)?,
            None => LoadedCollection::default(),
        };
        self.report_load(&loaded);
        Ok(loaded)
    }

    /// Serialize `habits` into the slot, with each unreadable record put
    /// back at its old position
    fn write_back(
        &self,
        habits: &[Habit],
        unreadable: &[DroppedRecord],
    ) -> Result<(), StorageError> {
        let mut records: Vec<StoredRecord> = habits.iter().map(StoredRecord::Habit).collect();
        for dropped in unreadable {
            let at = dropped.index.min(records.len());
            records.insert(at, StoredRecord::Unreadable(&dropped.raw));
        }

        let payload = serde_json::to_string(&records)?;
        self.medium.set(&self.config.slot_key, &payload)?;

        debug!("Saved {} record(s) to slot '{}'", records.len(), self.config.slot_key);
        Ok(())
    }

    fn report_load(&self, loaded: &LoadedCollection) {
        for dropped in &loaded.dropped {
            warn!("Skipping unreadable habit, kept as stored: {}", dropped.error);
        }
        if loaded.upgraded > 0 {
            debug!("Upgraded {} legacy habit record(s) on load", loaded.upgraded);
        }
    }

    fn ensure_available(&self) -> Result<(), StorageError> {
        if self.medium.is_available() {
            Ok(())
        } else {
            Err(StorageError::Unavailable)
        }
    }

    fn quietly(&self, action: &str, result: Result<Mutation, StorageError>) {
        if let Err(e) = result {
            self.report_write_failure(action, e);
        }
    }

    fn report_write_failure(&self, action: &str, e: StorageError) {
        match e {
            StorageError::Unavailable => {
                debug!("Skipping {}: no durable storage available", action)
            }
            e => error!("Failed to {} habits in slot '{}': {}", action, self.config.slot_key, e),
        }
    }
}

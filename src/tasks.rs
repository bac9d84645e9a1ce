//! This module maintains the authoritative date→note mapping and its derived "marked dates" index

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::StoreError;
use crate::traits::KeyValueStore;

/// The single storage key the whole mapping is serialized under
pub const TASKS_KEY: &str = "tasks";

/// The dot color the calendar widget displays on marked dates
pub const INDICATOR_COLOR: &str = "#50cebb";

/// A derived display flag: this date has a note attached
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayMarker {
    pub marked: bool,
    #[serde(rename = "indicatorColor")]
    pub indicator_color: String,
}

impl DayMarker {
    /// The marker every noted date gets
    pub fn new() -> Self {
        Self {
            marked: true,
            indicator_color: INDICATOR_COLOR.to_string(),
        }
    }
}

/// The index the calendar widget consumes: one marker per date that has a note
pub type MarkerIndex = HashMap<NaiveDate, DayMarker>;

/// See [`marker_channel`]
pub type MarkerSender = tokio::sync::watch::Sender<MarkerIndex>;
/// See [`marker_channel`]
pub type MarkerReceiver = tokio::sync::watch::Receiver<MarkerIndex>;

/// Create a feedback channel, that a UI layer can watch to re-render calendar highlights after every change
pub fn marker_channel() -> (MarkerSender, MarkerReceiver) {
    tokio::sync::watch::channel(MarkerIndex::new())
}

/// The date-keyed note store.
///
/// It owns the date→note mapping, persists it through a [`KeyValueStore`] after every change,
/// and derives the marker index from it. The marker index is always recomputed from the full mapping,
/// never patched incrementally, so it cannot drift out of sync with the notes.
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    tasks: HashMap<NaiveDate, String>,
    feedback: Option<MarkerSender>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Create an empty store over `storage`. Call [`Self::load`] to populate it with previously saved notes
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            tasks: HashMap::new(),
            feedback: None,
        }
    }

    /// Same as [`Self::new`], but marker updates will also be published on `feedback`
    pub fn new_with_feedback_channel(storage: S, feedback: MarkerSender) -> Self {
        Self {
            storage,
            tasks: HashMap::new(),
            feedback: Some(feedback),
        }
    }

    /// Replace the in-memory mapping with whatever the storage holds.
    ///
    /// A missing entry is a regular empty mapping, not an error. \
    /// Corrupt stored data returns a [`StoreError::Deserialization`] and leaves the store empty:
    /// the caller's usual policy is to log it and carry on (the saved notes of that session are lost, which
    /// is preferred over crashing or silently keeping unparsable data around).
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.tasks = HashMap::new();

        let saved = self
            .storage
            .get(TASKS_KEY)
            .await
            .map_err(|err| StoreError::Persistence(err.to_string()))?;

        if let Some(text) = saved {
            match serde_json::from_str(&text) {
                Ok(tasks) => self.tasks = tasks,
                Err(err) => {
                    self.notify();
                    return Err(err.into());
                }
            }
        }

        self.notify();
        Ok(())
    }

    /// Returns the note attached to `date`, or `None` in case there is none. Pure read, no side effect
    pub fn note(&self, date: NaiveDate) -> Option<&str> {
        self.tasks.get(&date).map(String::as_str)
    }

    /// Attach `text` to `date` (or detach any previous note in case `text` is empty or whitespace-only),
    /// then persist the whole mapping.
    ///
    /// When the write fails, the in-memory mapping has already been updated and a
    /// [`StoreError::Persistence`] is returned: memory is ahead of durable state until the next successful save.
    pub async fn set_note(&mut self, date: NaiveDate, text: &str) -> Result<(), StoreError> {
        if text.trim().is_empty() {
            self.tasks.remove(&date);
        } else {
            self.tasks.insert(date, text.to_string());
        }

        let serialized = serde_json::to_string(&self.tasks)
            .map_err(|err| StoreError::Persistence(err.to_string()))?;
        let saved = self
            .storage
            .set(TASKS_KEY, &serialized)
            .await
            .map_err(|err| StoreError::Persistence(err.to_string()));

        // The UI must reflect the in-memory mapping even when the save failed
        self.notify();
        saved
    }

    /// Returns the marker index: exactly one marker per date that currently has a note.
    /// This is a pure function of the current mapping
    pub fn markers(&self) -> MarkerIndex {
        self.tasks
            .keys()
            .map(|date| (*date, DayMarker::new()))
            .collect()
    }

    fn notify(&self) {
        if let Some(sender) = &self.feedback {
            let _ = sender.send(self.markers());
        }
    }
}

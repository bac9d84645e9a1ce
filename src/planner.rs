//! This module composes the two halves of the crate into what one app screen holds

use chrono::NaiveDate;

use crate::advisor::{AdvisorState, CheckupAdvisor, CheckupQuery};
use crate::error::StoreError;
use crate::tasks::{MarkerIndex, TaskStore};
use crate::traits::KeyValueStore;

/// The model behind the planner screen: the authoritative note store and the checkup advisor.
///
/// The two halves never depend on each other; this type only wires them to the same screen. \
/// [`CheckupAdvisor`] is a cheap clone-able handle: a coordinator can clone it into a background task
/// and keep editing notes while a generation is in flight.
pub struct Planner<S: KeyValueStore> {
    store: TaskStore<S>,
    advisor: CheckupAdvisor,
}

impl<S: KeyValueStore> Planner<S> {
    pub fn new(store: TaskStore<S>, advisor: CheckupAdvisor) -> Self {
        Self { store, advisor }
    }

    /// Load the saved notes, once, at startup.
    ///
    /// Corrupt saved data is logged and degrades to an empty mapping: the notes saved in that session
    /// are lost, but the app keeps running. Nothing here can terminate the process
    pub async fn start(&mut self) {
        if let Err(err) = self.store.load().await {
            log::warn!("Unable to load the saved tasks, starting from an empty mapping: {}", err);
        }
    }

    /// Returns the note store
    pub fn store(&self) -> &TaskStore<S> { &self.store }
    /// Returns the note store
    pub fn store_mut(&mut self) -> &mut TaskStore<S> { &mut self.store }
    /// Returns a handle to the checkup advisor
    pub fn advisor(&self) -> &CheckupAdvisor { &self.advisor }

    // Conveniences matching the UI events one-to-one

    /// What the edit dialog displays when a day is selected
    pub fn note(&self, date: NaiveDate) -> Option<&str> {
        self.store.note(date)
    }

    /// What the edit dialog's "Save" button triggers
    pub async fn save_note(&mut self, date: NaiveDate, text: &str) -> Result<(), StoreError> {
        self.store.set_note(date, text).await
    }

    /// What the calendar widget highlights
    pub fn markers(&self) -> MarkerIndex {
        self.store.markers()
    }

    /// What the questionary's "Go" button triggers
    pub async fn generate(&self, query: &CheckupQuery) -> bool {
        self.advisor.generate(query).await
    }

    /// What the results panel displays
    pub fn checkup_state(&self) -> AdvisorState {
        self.advisor.current_state()
    }
}

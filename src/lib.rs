//! This crate provides the core logic of a "CheckUP Planner" calendar app.
//!
//! It is made of two independent halves:
//! * a [`TaskStore`](tasks::TaskStore) that owns the mapping from a calendar date to a free-text note,
//!   persists it through a simple key-value storage, and derives the "marked dates" index the calendar widget displays,
//! * a [`CheckupAdvisor`](advisor::CheckupAdvisor) that turns an (age, gender, condition) query into an ordered list
//!   of suggested medical checkups by calling a remote text-generation endpoint and leniently parsing its prose output.
//!
//! Both halves can be composed in a [`Planner`](planner::Planner), which is what a screen-level coordinator would hold. \
//! The actual UI (calendar grid, modals, form inputs) is not part of this crate: it only consumes the marker index,
//! the current note text, and the suggestion list + loading phase this crate produces.

pub mod traits;

pub mod error;
pub use error::StoreError;
pub mod tasks;
pub use tasks::TaskStore;
pub mod advisor;
pub use advisor::CheckupAdvisor;
pub mod planner;
pub use planner::Planner;

pub mod client;
pub mod store;

pub mod mock_behaviour;

// crates/tracker/src/lib.rs
//! High-level relationship tracking for CircleUp
//!
//! Orchestration layer that coordinates the core domain model and the
//! snapshot store: typed CRUD with validation at the boundary, cascade
//! deletes, interaction logging with `last_connection` recomputation, the
//! dashboard feed, ask-history queries and contact-card import.

pub mod error;
pub mod import;
pub mod manager;
pub mod state;

pub use error::{TrackerError, TrackerResult};
pub use manager::{ChangeListener, Tracker};
pub use state::AppState;

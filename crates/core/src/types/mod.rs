// crates/core/src/types/mod.rs
//! Domain types for CircleUp
//!
//! All records that participate in sync are flat, serde-friendly structs with
//! a string `id` unique within their collection and an `updated_at` timestamp
//! that only the sync engine cares about.

mod activity;
mod common;
mod group;
mod interaction;
mod person;
mod settings;
mod support;

pub use activity::Activity;
pub use common::{Connectable, ConnectionGoal, EntityId, Timestamp, Validator};
pub use group::{CustomDate, Group};
pub use interaction::Interaction;
pub use person::{Birthdate, GiftIdea, Person, Reminder};
pub use settings::{Settings, Theme};
pub use support::{AskHistoryEntry, SupportRequest};

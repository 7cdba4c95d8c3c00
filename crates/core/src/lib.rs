// crates/core/src/lib.rs
//! Core domain types and pure logic for CircleUp
//!
//! This crate holds the entity model (people, groups, interactions,
//! activities, support requests, ask history, settings), the overdue/schedule
//! calculations that drive the dashboard, and the shareable contact-card
//! codec. Everything here is synchronous and free of I/O.

pub mod card;
pub mod error;
pub mod schedule;
pub mod types;

pub use card::{decode_card, encode_card, ContactCard, CARD_VERSION};
pub use error::{CoreError, CoreResult};
pub use schedule::{dashboard_feed, days_since, overdue_amount, FeedEntry, FeedKind, NEVER_DAYS};
pub use types::{
    Activity, AskHistoryEntry, Birthdate, Connectable, ConnectionGoal, CustomDate, EntityId,
    GiftIdea, Group, Interaction, Person, Reminder, Settings, SupportRequest, Theme, Timestamp,
    Validator,
};

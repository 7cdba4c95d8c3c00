// crates/core/src/schedule.rs
//! Overdue and scheduling calculations
//!
//! Pure, synchronous date arithmetic: days since last contact, overdue
//! amount, dashboard ordering, and upcoming reminders. All functions take the
//! current time explicitly so callers and tests control the clock.

use crate::types::{Connectable, EntityId, Group, Person, Settings, Timestamp};
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Day count standing in for "+infinity": the entity has never been contacted
pub const NEVER_DAYS: i64 = i64::MAX;

fn local_date(ts: Timestamp) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(ts.as_millis())
        .unwrap_or_default()
        .with_timezone(&Local)
        .date_naive()
}

/// Whole days between the local midnight of `last` and the local midnight of
/// `now`; `NEVER_DAYS` when `last` is the "never" sentinel
pub fn days_since(last: Timestamp, now: Timestamp) -> i64 {
    if last.is_never() {
        return NEVER_DAYS;
    }
    (local_date(now) - local_date(last)).num_days()
}

/// Days past the contact goal; positive means overdue
///
/// Never-contacted entities return `NEVER_DAYS` so they always sort as most
/// overdue.
pub fn overdue_amount(entity: &dyn Connectable, now: Timestamp) -> i64 {
    let days = days_since(entity.last_connection(), now);
    if days == NEVER_DAYS {
        return NEVER_DAYS;
    }
    days - i64::from(entity.goal().frequency_days)
}

/// Whether an entity belongs on the overdue dashboard right now
fn on_dashboard(entity: &dyn Connectable, now: Timestamp) -> bool {
    if entity.is_me() || !entity.show_on_dashboard() {
        return false;
    }
    match entity.snoozed_until() {
        Some(until) => until <= now,
        None => true,
    }
}

/// Which collection a feed entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedKind {
    Person,
    Group,
}

/// One row of the dashboard feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub kind: FeedKind,
    pub id: EntityId,
    pub name: String,
    pub overdue_days: i64,
}

/// Builds the dashboard feed: the "is me" record, hidden records and
/// currently snoozed records are dropped, the rest sorted descending by
/// overdue amount (stable, so ties keep input order)
pub fn dashboard_feed(people: &[Person], groups: &[Group], now: Timestamp) -> Vec<FeedEntry> {
    let mut feed = Vec::new();

    for person in people {
        if on_dashboard(person, now) {
            feed.push(FeedEntry {
                kind: FeedKind::Person,
                id: person.id.clone(),
                name: person.name.clone(),
                overdue_days: overdue_amount(person, now),
            });
        }
    }

    for group in groups {
        if on_dashboard(group, now) {
            feed.push(FeedEntry {
                kind: FeedKind::Group,
                id: group.id.clone(),
                name: group.name.clone(),
                overdue_days: overdue_amount(group, now),
            });
        }
    }

    feed.sort_by(|a, b| b.overdue_days.cmp(&a.overdue_days));
    feed
}

/// An upcoming reminder or birthday for the reminders view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingReminder {
    pub person_id: EntityId,
    pub person_name: String,
    pub text: String,
    pub days_away: i64,
}

fn days_until_month_day(today: NaiveDate, month: u32, day: u32) -> Option<i64> {
    // Feb 29 falls back to Feb 28 in non-leap years.
    let in_year = |year: i32| {
        NaiveDate::from_ymd_opt(year, month, day)
            .or_else(|| NaiveDate::from_ymd_opt(year, month, day.saturating_sub(1)))
    };
    let this_year = in_year(today.year())?;
    let next = if this_year < today {
        in_year(today.year() + 1)?
    } else {
        this_year
    };
    Some((next - today).num_days())
}

/// Reminders and birthdays due within the settings' lookahead window
pub fn upcoming_reminders(
    people: &[Person],
    settings: &Settings,
    now: Timestamp,
) -> Vec<UpcomingReminder> {
    let today = local_date(now);
    let lookahead = i64::from(settings.reminder_lookahead_days);
    let mut upcoming = Vec::new();

    for person in people {
        for reminder in &person.reminders {
            if reminder.completed {
                continue;
            }
            let days_away = (local_date(reminder.date) - today).num_days();
            if (0..=lookahead).contains(&days_away) {
                upcoming.push(UpcomingReminder {
                    person_id: person.id.clone(),
                    person_name: person.name.clone(),
                    text: reminder.text.clone(),
                    days_away,
                });
            }
        }

        if let Some(birthdate) = &person.birthdate {
            let (month, day) = birthdate.month_day();
            if let Some(days_away) = days_until_month_day(today, month, day) {
                if days_away <= lookahead {
                    upcoming.push(UpcomingReminder {
                        person_id: person.id.clone(),
                        person_name: person.name.clone(),
                        text: format!("{}'s birthday", person.name),
                        days_away,
                    });
                }
            }
        }
    }

    upcoming.sort_by_key(|r| r.days_away);
    upcoming
}

// crates/core/src/types/person.rs
//! Person domain model

use crate::error::{CoreError, CoreResult};
use crate::types::{Connectable, ConnectionGoal, EntityId, Timestamp, Validator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A birthdate, either partial (`--MM-DD`, year unknown) or full
/// (`YYYY-MM-DD`)
///
/// Deserialization routes through [`Birthdate::parse`], so a malformed
/// string coming off disk, a card, or the wire is rejected instead of
/// being carried around unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Birthdate(String);

impl TryFrom<String> for Birthdate {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl Birthdate {
    /// Parses and validates a birthdate string
    pub fn parse(s: &str) -> CoreResult<Self> {
        if let Some(rest) = s.strip_prefix("--") {
            // Partial form: month and day only. Validate against a leap year
            // so Feb 29 is accepted.
            let candidate = format!("2000-{rest}");
            NaiveDate::parse_from_str(&candidate, "%Y-%m-%d")
                .map_err(|_| CoreError::InvalidBirthdate(s.to_string()))?;
        } else {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| CoreError::InvalidBirthdate(s.to_string()))?;
        }
        Ok(Self(s.to_string()))
    }

    /// Returns true if the year is unknown
    pub fn is_partial(&self) -> bool {
        self.0.starts_with("--")
    }

    /// Month and day as numbers
    pub fn month_day(&self) -> (u32, u32) {
        // The month and day are always the last two dash-separated fields,
        // whichever form the string is in.
        let mut parts = self.0.rsplitn(3, '-');
        let day = parts.next().and_then(|p| p.parse().ok()).unwrap_or(1);
        let month = parts.next().and_then(|p| p.parse().ok()).unwrap_or(1);
        (month, day)
    }

    /// Returns the raw string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A gift idea attached to a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftIdea {
    pub id: EntityId,
    pub text: String,
    pub url: Option<String>,
}

impl GiftIdea {
    /// Creates a new gift idea
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            text: text.into(),
            url: None,
        }
    }
}

/// A dated reminder attached to a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: EntityId,
    pub text: String,
    pub date: Timestamp,
    pub completed: bool,
}

impl Reminder {
    /// Creates a new incomplete reminder
    pub fn new(text: impl Into<String>, date: Timestamp) -> Self {
        Self {
            id: EntityId::new(),
            text: text.into(),
            date,
            completed: false,
        }
    }
}

/// A person the user wants to stay in touch with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: EntityId,
    pub name: String,
    /// User-defined circle labels, e.g. "Family"
    pub circles: Vec<String>,
    pub goal: ConnectionGoal,
    /// Advanced only by interaction logging; NEVER means not yet contacted
    pub last_connection: Timestamp,
    pub interests: Vec<String>,
    pub dislikes: Vec<String>,
    pub notes: String,
    pub gift_ideas: Vec<GiftIdea>,
    pub reminders: Vec<Reminder>,
    pub birthdate: Option<Birthdate>,
    pub pinned: bool,
    pub pin_order: Option<u32>,
    /// At most one person carries this flag
    pub is_me: bool,
    pub snoozed_until: Option<Timestamp>,
    pub show_on_dashboard: bool,
    /// Sync bookkeeping, not meaningful to the UI
    pub updated_at: Timestamp,
}

impl Person {
    /// Creates a new person with the given name and goal
    pub fn new(name: impl Into<String>, goal: ConnectionGoal) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            circles: Vec::new(),
            goal,
            last_connection: Timestamp::NEVER,
            interests: Vec::new(),
            dislikes: Vec::new(),
            notes: String::new(),
            gift_ideas: Vec::new(),
            reminders: Vec::new(),
            birthdate: None,
            pinned: false,
            pin_order: None,
            is_me: false,
            snoozed_until: None,
            show_on_dashboard: true,
            updated_at: Timestamp::now(),
        }
    }

    /// Snoozes the person until the given timestamp
    pub fn snooze_until(&mut self, until: Timestamp) {
        self.snoozed_until = Some(until);
    }

    /// Clears any active snooze
    pub fn clear_snooze(&mut self) {
        self.snoozed_until = None;
    }
}

impl Connectable for Person {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn last_connection(&self) -> Timestamp {
        self.last_connection
    }

    fn goal(&self) -> &ConnectionGoal {
        &self.goal
    }

    fn snoozed_until(&self) -> Option<Timestamp> {
        self.snoozed_until
    }

    fn show_on_dashboard(&self) -> bool {
        self.show_on_dashboard
    }

    fn is_me(&self) -> bool {
        self.is_me
    }
}

impl Validator for Person {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Name cannot be empty".to_string());
        }

        if self.goal.frequency_days == 0 {
            errors.push("Goal frequency must be at least 1 day".to_string());
        }

        for idea in &self.gift_ideas {
            if idea.text.trim().is_empty() {
                errors.push("Gift idea text cannot be empty".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_new_defaults() {
        let person = Person::new("Alex", ConnectionGoal::new("call", 14));
        assert_eq!(person.name, "Alex");
        assert!(person.last_connection.is_never());
        assert!(person.show_on_dashboard);
        assert!(!person.is_me);
        assert!(person.snoozed_until.is_none());
    }

    #[test]
    fn test_person_validation_success() {
        let person = Person::new("Alex", ConnectionGoal::new("call", 14));
        assert!(person.is_valid());
    }

    #[test]
    fn test_person_validation_empty_name() {
        let person = Person::new("   ", ConnectionGoal::new("call", 14));
        assert!(!person.is_valid());
    }

    #[test]
    fn test_person_validation_zero_frequency() {
        let person = Person::new("Alex", ConnectionGoal::new("call", 0));
        assert!(!person.is_valid());
    }

    #[test]
    fn test_person_validation_empty_gift_idea() {
        let mut person = Person::new("Alex", ConnectionGoal::new("call", 14));
        person.gift_ideas.push(GiftIdea::new("  "));
        assert!(!person.is_valid());
    }

    #[test]
    fn test_person_snooze_roundtrip() {
        let mut person = Person::new("Alex", ConnectionGoal::new("call", 14));
        person.snooze_until(Timestamp::from_millis(5000));
        assert_eq!(person.snoozed_until, Some(Timestamp::from_millis(5000)));
        person.clear_snooze();
        assert!(person.snoozed_until.is_none());
    }

    #[test]
    fn test_birthdate_full() {
        let b = Birthdate::parse("1990-06-15").unwrap();
        assert!(!b.is_partial());
        assert_eq!(b.month_day(), (6, 15));
    }

    #[test]
    fn test_birthdate_partial() {
        let b = Birthdate::parse("--02-29").unwrap();
        assert!(b.is_partial());
        assert_eq!(b.month_day(), (2, 29));
    }

    #[test]
    fn test_birthdate_invalid() {
        assert!(Birthdate::parse("tomorrow").is_err());
        assert!(Birthdate::parse("--13-01").is_err());
        assert!(Birthdate::parse("1990-02-30").is_err());
    }

    #[test]
    fn test_birthdate_rejects_malformed_on_deserialize() {
        assert!(serde_json::from_str::<Birthdate>("\"x\"").is_err());
        assert!(serde_json::from_str::<Birthdate>("\"--\"").is_err());
        assert!(serde_json::from_str::<Birthdate>("\"1990-13-01\"").is_err());

        let person: Result<Person, _> = serde_json::from_value(serde_json::json!({
            "id": "1", "name": "Alex",
            "circles": [], "goal": {"kind": "call", "frequency_days": 14},
            "last_connection": 0, "interests": [], "dislikes": [],
            "notes": "", "gift_ideas": [], "reminders": [],
            "birthdate": "x",
            "pinned": false, "pin_order": null, "is_me": false,
            "snoozed_until": null, "show_on_dashboard": true, "updated_at": 0
        }));
        assert!(person.is_err());
    }

    #[test]
    fn test_person_serde_roundtrip() {
        let mut person = Person::new("Alex", ConnectionGoal::new("call", 14));
        person.birthdate = Some(Birthdate::parse("--06-15").unwrap());
        let json = serde_json::to_string(&person).unwrap();
        let back: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(person, back);
    }
}

// crates/tracker/src/import.rs
//! Contact-card import
//!
//! A received card either merges into the existing person with the same name
//! or creates a new one. Merging is a union: list entries the person already
//! has are kept, new ones appended, and scalar fields are only filled when
//! currently empty.

use crate::error::TrackerResult;
use crate::manager::Tracker;
use circleup_core::{ConnectionGoal, ContactCard, EntityId, Person, Timestamp};
use log::info;

/// Goal applied to people created from a card; the user adjusts it afterwards
const DEFAULT_GOAL_DAYS: u32 = 30;

impl Tracker {
    /// Imports a decoded contact card, returning the id of the merged or
    /// created person
    pub fn import_card(&mut self, card: &ContactCard) -> TrackerResult<EntityId> {
        match self.person_by_name(&card.name) {
            Some(existing) => {
                let mut person = existing.clone();
                merge_card(&mut person, card);
                let id = person.id.clone();
                info!("card for '{}' merged into existing person", card.name);
                self.update_person(person)?;
                Ok(id)
            }
            None => {
                let mut person = Person::new(
                    card.name.clone(),
                    ConnectionGoal::new("catch up", DEFAULT_GOAL_DAYS),
                );
                merge_card(&mut person, card);
                info!("card for '{}' created a new person", card.name);
                self.add_person(person)
            }
        }
    }
}

fn merge_card(person: &mut Person, card: &ContactCard) {
    union_into(&mut person.interests, &card.interests);
    union_into(&mut person.dislikes, &card.dislikes);

    for idea in &card.gift_ideas {
        if !person.gift_ideas.iter().any(|g| g.text == idea.text) {
            person.gift_ideas.push(idea.clone());
        }
    }

    if person.birthdate.is_none() {
        person.birthdate = card.birthdate.clone();
    }
    person.updated_at = Timestamp::now();
}

fn union_into(existing: &mut Vec<String>, incoming: &[String]) {
    for item in incoming {
        if !existing.iter().any(|e| e == item) {
            existing.push(item.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circleup_core::{Birthdate, ContactCard, GiftIdea, CARD_VERSION};
    use circleup_store::SnapshotStore;

    fn setup() -> (tempfile::TempDir, Tracker) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let tracker = Tracker::open(store).unwrap();
        (dir, tracker)
    }

    fn card(name: &str) -> ContactCard {
        ContactCard {
            version: CARD_VERSION,
            name: name.to_string(),
            interests: vec!["climbing".to_string(), "tea".to_string()],
            dislikes: vec!["surprises".to_string()],
            birthdate: Some(Birthdate::parse("--06-15").unwrap()),
            gift_ideas: vec![GiftIdea::new("Chalk bag")],
        }
    }

    #[test]
    fn test_import_creates_new_person() {
        let (_dir, mut tracker) = setup();
        let id = tracker.import_card(&card("Alex")).unwrap();

        let person = tracker.person(&id).unwrap();
        assert_eq!(person.name, "Alex");
        assert_eq!(person.interests, vec!["climbing", "tea"]);
        assert_eq!(person.goal.frequency_days, DEFAULT_GOAL_DAYS);
        assert!(person.birthdate.is_some());
    }

    #[test]
    fn test_import_merges_into_same_name() {
        let (_dir, mut tracker) = setup();
        let mut existing = Person::new("Alex", ConnectionGoal::new("call", 7));
        existing.interests = vec!["tea".to_string(), "chess".to_string()];
        existing.birthdate = Some(Birthdate::parse("1990-01-01").unwrap());
        let id = tracker.add_person(existing).unwrap();

        let merged = tracker.import_card(&card("Alex")).unwrap();
        assert_eq!(merged, id);
        assert_eq!(tracker.state().people.len(), 1);

        let person = tracker.person(&id).unwrap();
        // Union keeps existing entries first, appends new ones.
        assert_eq!(person.interests, vec!["tea", "chess", "climbing"]);
        assert_eq!(person.dislikes, vec!["surprises"]);
        assert_eq!(person.gift_ideas.len(), 1);
        // An already-set birthdate is not overwritten.
        assert_eq!(person.birthdate.as_ref().unwrap().as_str(), "1990-01-01");
        // The existing goal is untouched.
        assert_eq!(person.goal.frequency_days, 7);
    }

    #[test]
    fn test_import_twice_is_idempotent() {
        let (_dir, mut tracker) = setup();
        let id = tracker.import_card(&card("Alex")).unwrap();
        let again = tracker.import_card(&card("Alex")).unwrap();
        assert_eq!(id, again);

        let person = tracker.person(&id).unwrap();
        assert_eq!(person.interests.len(), 2);
        assert_eq!(person.gift_ideas.len(), 1);
    }
}

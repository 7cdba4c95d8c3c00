// crates/tracker/src/manager.rs
//! High-level relationship tracking

use crate::error::{TrackerError, TrackerResult};
use crate::state::AppState;
use circleup_core::schedule::{dashboard_feed, upcoming_reminders, FeedEntry, UpcomingReminder};
use circleup_core::{
    Activity, AskHistoryEntry, CoreError, EntityId, Group, Interaction, Person, Settings,
    SupportRequest, Timestamp, Validator,
};
use circleup_store::SnapshotStore;
use log::{debug, info};

/// Invoked after every committed mutation, so the host can schedule a
/// debounced sync push
pub type ChangeListener = Box<dyn Fn() + Send>;

/// High-level manager over the in-memory state and its snapshot store
///
/// Every mutation validates at this boundary, stamps `updated_at`, writes
/// through to the snapshot store and fires the change listener.
pub struct Tracker {
    store: SnapshotStore,
    state: AppState,
    on_change: Option<ChangeListener>,
}

impl Tracker {
    /// Opens a tracker over the given snapshot store
    pub fn open(store: SnapshotStore) -> TrackerResult<Self> {
        let state = AppState::load(&store)?;
        info!(
            "loaded state: {} people, {} groups, {} interactions",
            state.people.len(),
            state.groups.len(),
            state.interactions.len()
        );
        Ok(Self {
            store,
            state,
            on_change: None,
        })
    }

    /// Registers the change listener fired after every committed mutation
    pub fn set_change_listener(&mut self, listener: ChangeListener) {
        self.on_change = Some(listener);
    }

    /// Read access to the full state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Re-reads state from the snapshot store, discarding the in-memory copy
    ///
    /// Called after a realtime update has rewritten the store underneath us.
    pub fn reload(&mut self) -> TrackerResult<()> {
        self.state = AppState::load(&self.store)?;
        Ok(())
    }

    fn commit(&mut self) -> TrackerResult<()> {
        self.state.save(&self.store)?;
        if let Some(listener) = &self.on_change {
            listener();
        }
        Ok(())
    }

    fn check<T: Validator>(entity: &T, name: &'static str) -> TrackerResult<()> {
        entity
            .validate()
            .map_err(|reasons| CoreError::validation(name, &reasons).into())
    }

    // People

    /// Adds a person, returning the new id
    pub fn add_person(&mut self, mut person: Person) -> TrackerResult<EntityId> {
        Self::check(&person, "Person")?;
        if person.is_me {
            self.clear_is_me();
        }
        person.updated_at = Timestamp::now();
        let id = person.id.clone();
        self.state.people.push(person);
        self.commit()?;
        Ok(id)
    }

    /// Replaces an existing person record
    pub fn update_person(&mut self, mut person: Person) -> TrackerResult<()> {
        Self::check(&person, "Person")?;
        let idx = self
            .state
            .people
            .iter()
            .position(|p| p.id == person.id)
            .ok_or_else(|| TrackerError::not_found("Person", person.id.as_str()))?;
        if person.is_me {
            self.clear_is_me();
        }
        person.updated_at = Timestamp::now();
        self.state.people[idx] = person;
        self.commit()
    }

    /// Looks up a person by id
    pub fn person(&self, id: &EntityId) -> Option<&Person> {
        self.state.people.iter().find(|p| &p.id == id)
    }

    /// Finds a person by exact name
    pub fn person_by_name(&self, name: &str) -> Option<&Person> {
        self.state.people.iter().find(|p| p.name == name)
    }

    /// Deletes a person and cascades: the id is stripped from every group's
    /// member list and every support request's helper list, and those records
    /// get a fresh `updated_at` so the removal syncs
    pub fn delete_person(&mut self, id: &EntityId) -> TrackerResult<()> {
        let before = self.state.people.len();
        self.state.people.retain(|p| &p.id != id);
        if self.state.people.len() == before {
            return Err(TrackerError::not_found("Person", id.as_str()));
        }

        let now = Timestamp::now();
        for group in &mut self.state.groups {
            if group.remove_member(id) {
                group.updated_at = now;
            }
        }
        for request in &mut self.state.support_requests {
            if request.remove_helper(id) {
                request.updated_at = now;
            }
        }

        debug!("deleted person {id}");
        self.commit()
    }

    /// Marks one person as "me", clearing the flag everywhere else
    pub fn set_me(&mut self, id: &EntityId) -> TrackerResult<()> {
        if self.person(id).is_none() {
            return Err(TrackerError::not_found("Person", id.as_str()));
        }
        let now = Timestamp::now();
        for person in &mut self.state.people {
            let is_me = &person.id == id;
            if person.is_me != is_me {
                person.is_me = is_me;
                person.updated_at = now;
            }
        }
        self.commit()
    }

    /// Snoozes a person off the overdue feed until the given time
    pub fn snooze_person(&mut self, id: &EntityId, until: Timestamp) -> TrackerResult<()> {
        let person = self
            .state
            .people
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| TrackerError::not_found("Person", id.as_str()))?;
        person.snooze_until(until);
        person.updated_at = Timestamp::now();
        self.commit()
    }

    // Groups

    /// Adds a group, returning the new id
    pub fn add_group(&mut self, mut group: Group) -> TrackerResult<EntityId> {
        Self::check(&group, "Group")?;
        group.updated_at = Timestamp::now();
        let id = group.id.clone();
        self.state.groups.push(group);
        self.commit()?;
        Ok(id)
    }

    /// Replaces an existing group record
    pub fn update_group(&mut self, mut group: Group) -> TrackerResult<()> {
        Self::check(&group, "Group")?;
        let idx = self
            .state
            .groups
            .iter()
            .position(|g| g.id == group.id)
            .ok_or_else(|| TrackerError::not_found("Group", group.id.as_str()))?;
        group.updated_at = Timestamp::now();
        self.state.groups[idx] = group;
        self.commit()
    }

    /// Looks up a group by id
    pub fn group(&self, id: &EntityId) -> Option<&Group> {
        self.state.groups.iter().find(|g| &g.id == id)
    }

    /// Deletes a group, stripping its id from support helper lists
    pub fn delete_group(&mut self, id: &EntityId) -> TrackerResult<()> {
        let before = self.state.groups.len();
        self.state.groups.retain(|g| &g.id != id);
        if self.state.groups.len() == before {
            return Err(TrackerError::not_found("Group", id.as_str()));
        }
        let now = Timestamp::now();
        for request in &mut self.state.support_requests {
            if request.remove_helper(id) {
                request.updated_at = now;
            }
        }
        self.commit()
    }

    // Interactions

    /// Inserts or replaces an interaction, then recomputes `last_connection`
    /// for every referenced person and group and clears their snoozes
    ///
    /// This is the sole path that advances `last_connection`.
    pub fn upsert_interaction(&mut self, mut interaction: Interaction) -> TrackerResult<EntityId> {
        Self::check(&interaction, "Interaction")?;
        interaction.updated_at = Timestamp::now();
        let id = interaction.id.clone();
        let mut touched: Vec<EntityId> = interaction.person_ids.clone();
        touched.extend(interaction.group_ids.iter().cloned());

        match self.state.interactions.iter().position(|i| i.id == id) {
            Some(idx) => {
                // Records the old version referenced also need recomputing.
                let old = &self.state.interactions[idx];
                touched.extend(old.person_ids.iter().cloned());
                touched.extend(old.group_ids.iter().cloned());
                self.state.interactions[idx] = interaction;
            }
            None => self.state.interactions.push(interaction),
        }

        self.refresh_connections(&touched, true);
        self.commit()?;
        Ok(id)
    }

    /// Deletes an interaction and recomputes the records it referenced
    pub fn delete_interaction(&mut self, id: &EntityId) -> TrackerResult<()> {
        let idx = self
            .state
            .interactions
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| TrackerError::not_found("Interaction", id.as_str()))?;
        let removed = self.state.interactions.remove(idx);

        let mut touched = removed.person_ids;
        touched.extend(removed.group_ids);
        self.refresh_connections(&touched, false);
        self.commit()
    }

    /// Recomputes `last_connection` for the given ids as the max
    /// referencing-interaction date; NEVER when no interaction remains
    fn refresh_connections(&mut self, ids: &[EntityId], clear_snooze: bool) {
        let now = Timestamp::now();
        for id in ids {
            let latest = self
                .state
                .interactions
                .iter()
                .filter(|i| i.references(id))
                .map(|i| i.date)
                .max()
                .unwrap_or(Timestamp::NEVER);

            if let Some(person) = self.state.people.iter_mut().find(|p| &p.id == id) {
                person.last_connection = latest;
                if clear_snooze {
                    person.clear_snooze();
                }
                person.updated_at = now;
            } else if let Some(group) = self.state.groups.iter_mut().find(|g| &g.id == id) {
                group.last_connection = latest;
                if clear_snooze {
                    group.clear_snooze();
                }
                group.updated_at = now;
            }
        }
    }

    // Activities

    /// Adds a planned activity
    pub fn add_activity(&mut self, mut activity: Activity) -> TrackerResult<EntityId> {
        Self::check(&activity, "Activity")?;
        activity.updated_at = Timestamp::now();
        let id = activity.id.clone();
        self.state.activities.push(activity);
        self.commit()?;
        Ok(id)
    }

    /// Deletes an activity
    pub fn delete_activity(&mut self, id: &EntityId) -> TrackerResult<()> {
        let before = self.state.activities.len();
        self.state.activities.retain(|a| &a.id != id);
        if self.state.activities.len() == before {
            return Err(TrackerError::not_found("Activity", id.as_str()));
        }
        self.commit()
    }

    // Support requests

    /// Adds a support request
    pub fn add_support_request(&mut self, mut request: SupportRequest) -> TrackerResult<EntityId> {
        Self::check(&request, "SupportRequest")?;
        request.updated_at = Timestamp::now();
        let id = request.id.clone();
        self.state.support_requests.push(request);
        self.commit()?;
        Ok(id)
    }

    /// Records that a helper was asked, appending to the ask history
    pub fn record_ask(
        &mut self,
        request_id: &EntityId,
        helper_id: &EntityId,
        asked_at: Timestamp,
    ) -> TrackerResult<()> {
        let request = self
            .state
            .support_requests
            .iter()
            .find(|r| &r.id == request_id)
            .ok_or_else(|| TrackerError::not_found("SupportRequest", request_id.as_str()))?;
        if !request.helper_ids.contains(helper_id) {
            return Err(TrackerError::not_found("Helper", helper_id.as_str()));
        }
        self.state
            .ask_history
            .push(AskHistoryEntry::new(request_id.clone(), helper_id.clone(), asked_at));
        self.commit()
    }

    /// The helper asked longest ago for a request; never-asked helpers come
    /// first, in list order
    pub fn stalest_helper(&self, request_id: &EntityId) -> TrackerResult<Option<EntityId>> {
        let request = self
            .state
            .support_requests
            .iter()
            .find(|r| &r.id == request_id)
            .ok_or_else(|| TrackerError::not_found("SupportRequest", request_id.as_str()))?;

        let last_asked = |helper: &EntityId| {
            self.state
                .ask_history
                .iter()
                .filter(|e| &e.request_id == request_id && &e.helper_id == helper)
                .map(|e| e.asked_at)
                .max()
        };

        let stalest = request
            .helper_ids
            .iter()
            .min_by_key(|helper| last_asked(helper).unwrap_or(Timestamp::NEVER))
            .cloned();
        Ok(stalest)
    }

    // Settings

    /// Replaces the settings, stamping `updated_at`
    pub fn update_settings(&mut self, mut settings: Settings) -> TrackerResult<()> {
        settings.updated_at = Timestamp::now();
        self.state.settings = settings;
        self.commit()
    }

    // Derived views

    /// The overdue feed, most overdue first
    pub fn dashboard(&self, now: Timestamp) -> Vec<FeedEntry> {
        dashboard_feed(&self.state.people, &self.state.groups, now)
    }

    /// Reminders and birthdays inside the configured lookahead window
    pub fn reminders(&self, now: Timestamp) -> Vec<UpcomingReminder> {
        upcoming_reminders(&self.state.people, &self.state.settings, now)
    }

    fn clear_is_me(&mut self) {
        let now = Timestamp::now();
        for person in &mut self.state.people {
            if person.is_me {
                person.is_me = false;
                person.updated_at = now;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circleup_core::ConnectionGoal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn setup() -> (tempfile::TempDir, Tracker) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let tracker = Tracker::open(store).unwrap();
        (dir, tracker)
    }

    fn goal() -> ConnectionGoal {
        ConnectionGoal::new("call", 7)
    }

    #[test]
    fn test_add_person_persists() {
        let (dir, mut tracker) = setup();
        let id = tracker.add_person(Person::new("Alex", goal())).unwrap();
        assert!(tracker.person(&id).is_some());

        // A fresh tracker over the same directory sees the record.
        let reopened = Tracker::open(SnapshotStore::open(dir.path()).unwrap()).unwrap();
        assert_eq!(reopened.state().people.len(), 1);
    }

    #[test]
    fn test_add_person_rejects_invalid() {
        let (_dir, mut tracker) = setup();
        let result = tracker.add_person(Person::new("  ", goal()));
        assert!(matches!(result, Err(TrackerError::Core(_))));
        assert!(tracker.state().people.is_empty());
    }

    #[test]
    fn test_delete_person_cascades() {
        let (_dir, mut tracker) = setup();
        let alex = tracker.add_person(Person::new("Alex", goal())).unwrap();
        let beth = tracker.add_person(Person::new("Beth", goal())).unwrap();

        let group = Group::new("Book club", vec![alex.clone(), beth.clone()], goal());
        let group_id = tracker.add_group(group).unwrap();

        let mut request = SupportRequest::new("Moving day");
        request.helper_ids = vec![alex.clone(), beth.clone()];
        let request_id = tracker.add_support_request(request).unwrap();

        let group_stamp = tracker.group(&group_id).unwrap().updated_at;
        tracker.delete_person(&alex).unwrap();

        assert!(tracker.person(&alex).is_none());
        let group = tracker.group(&group_id).unwrap();
        assert_eq!(group.member_ids, vec![beth.clone()]);
        assert!(group.updated_at >= group_stamp);
        let request = tracker
            .state()
            .support_requests
            .iter()
            .find(|r| r.id == request_id)
            .unwrap();
        assert_eq!(request.helper_ids, vec![beth]);
    }

    #[test]
    fn test_delete_missing_person_errors() {
        let (_dir, mut tracker) = setup();
        let result = tracker.delete_person(&EntityId::new());
        assert!(matches!(result, Err(TrackerError::NotFound { .. })));
    }

    #[test]
    fn test_is_me_uniqueness() {
        let (_dir, mut tracker) = setup();
        let mut me = Person::new("Alex", goal());
        me.is_me = true;
        let alex = tracker.add_person(me).unwrap();

        let mut other = Person::new("Beth", goal());
        other.is_me = true;
        let beth = tracker.add_person(other).unwrap();

        assert!(!tracker.person(&alex).unwrap().is_me);
        assert!(tracker.person(&beth).unwrap().is_me);

        tracker.set_me(&alex).unwrap();
        assert!(tracker.person(&alex).unwrap().is_me);
        assert!(!tracker.person(&beth).unwrap().is_me);
    }

    #[test]
    fn test_interaction_advances_last_connection_and_clears_snooze() {
        let (_dir, mut tracker) = setup();
        let alex = tracker.add_person(Person::new("Alex", goal())).unwrap();
        tracker
            .snooze_person(&alex, Timestamp::from_millis(9_999_999))
            .unwrap();

        let interaction =
            Interaction::new(Timestamp::from_millis(5000), "call").with_person(alex.clone());
        tracker.upsert_interaction(interaction).unwrap();

        let person = tracker.person(&alex).unwrap();
        assert_eq!(person.last_connection, Timestamp::from_millis(5000));
        assert!(person.snoozed_until.is_none());
    }

    #[test]
    fn test_interaction_recompute_uses_max_date() {
        let (_dir, mut tracker) = setup();
        let alex = tracker.add_person(Person::new("Alex", goal())).unwrap();

        tracker
            .upsert_interaction(
                Interaction::new(Timestamp::from_millis(9000), "call").with_person(alex.clone()),
            )
            .unwrap();
        // An older interaction logged late must not move the clock backwards.
        tracker
            .upsert_interaction(
                Interaction::new(Timestamp::from_millis(4000), "coffee").with_person(alex.clone()),
            )
            .unwrap();

        assert_eq!(
            tracker.person(&alex).unwrap().last_connection,
            Timestamp::from_millis(9000)
        );
    }

    #[test]
    fn test_edit_interaction_recomputes_old_references() {
        let (_dir, mut tracker) = setup();
        let alex = tracker.add_person(Person::new("Alex", goal())).unwrap();
        let beth = tracker.add_person(Person::new("Beth", goal())).unwrap();

        let interaction =
            Interaction::new(Timestamp::from_millis(5000), "call").with_person(alex.clone());
        let id = tracker.upsert_interaction(interaction.clone()).unwrap();
        assert!(!tracker.person(&alex).unwrap().last_connection.is_never());

        // Re-point the interaction at Beth: Alex's clock resets.
        let mut edited = interaction;
        edited.id = id;
        edited.person_ids = vec![beth.clone()];
        tracker.upsert_interaction(edited).unwrap();

        assert!(tracker.person(&alex).unwrap().last_connection.is_never());
        assert_eq!(
            tracker.person(&beth).unwrap().last_connection,
            Timestamp::from_millis(5000)
        );
    }

    #[test]
    fn test_delete_interaction_resets_last_connection() {
        let (_dir, mut tracker) = setup();
        let alex = tracker.add_person(Person::new("Alex", goal())).unwrap();
        let id = tracker
            .upsert_interaction(
                Interaction::new(Timestamp::from_millis(5000), "call").with_person(alex.clone()),
            )
            .unwrap();

        tracker.delete_interaction(&id).unwrap();
        assert!(tracker.person(&alex).unwrap().last_connection.is_never());
    }

    #[test]
    fn test_stalest_helper_prefers_never_asked() {
        let (_dir, mut tracker) = setup();
        let alex = tracker.add_person(Person::new("Alex", goal())).unwrap();
        let beth = tracker.add_person(Person::new("Beth", goal())).unwrap();

        let mut request = SupportRequest::new("Moving day");
        request.helper_ids = vec![alex.clone(), beth.clone()];
        let request_id = tracker.add_support_request(request).unwrap();

        tracker
            .record_ask(&request_id, &alex, Timestamp::from_millis(1000))
            .unwrap();
        assert_eq!(tracker.stalest_helper(&request_id).unwrap(), Some(beth.clone()));

        tracker
            .record_ask(&request_id, &beth, Timestamp::from_millis(2000))
            .unwrap();
        assert_eq!(tracker.stalest_helper(&request_id).unwrap(), Some(alex));
    }

    #[test]
    fn test_record_ask_rejects_unknown_helper() {
        let (_dir, mut tracker) = setup();
        let request_id = tracker
            .add_support_request(SupportRequest::new("Moving day"))
            .unwrap();
        let result = tracker.record_ask(&request_id, &EntityId::new(), Timestamp::from_millis(1));
        assert!(matches!(result, Err(TrackerError::NotFound { .. })));
    }

    #[test]
    fn test_change_listener_fires_on_mutation() {
        let (_dir, mut tracker) = setup();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        tracker.set_change_listener(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        tracker.add_person(Person::new("Alex", goal())).unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // A rejected mutation does not fire the listener.
        let _ = tracker.add_person(Person::new("  ", goal()));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dashboard_delegates_to_schedule() {
        let (_dir, mut tracker) = setup();
        let alex = tracker.add_person(Person::new("Alex", goal())).unwrap();
        let feed = tracker.dashboard(Timestamp::now());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, alex);
    }
}

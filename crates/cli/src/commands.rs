// crates/cli/src/commands.rs

use anyhow::{anyhow, bail, Context, Result};
use circleup_core::schedule::NEVER_DAYS;
use circleup_core::{
    decode_card, encode_card, Birthdate, ConnectionGoal, ContactCard, Interaction, Person,
    Timestamp,
};
use circleup_store::{BackupData, SnapshotStore};
use circleup_sync_engine::{InMemoryRemoteStore, RemoteStore, SessionContext, UserId};
use circleup_tracker::Tracker;
use clap::ArgMatches;
use console::style;
use std::path::Path;
use std::sync::Arc;

fn open_store(data_dir: Option<&str>) -> Result<SnapshotStore> {
    let store = match data_dir {
        Some(dir) => SnapshotStore::open(dir),
        None => SnapshotStore::open_default(),
    };
    store.context("Failed to open data directory")
}

fn open_tracker(data_dir: Option<&str>) -> Result<Tracker> {
    Tracker::open(open_store(data_dir)?).context("Failed to load data")
}

/// Add a person
pub fn add_person(data_dir: Option<&str>, matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| anyhow!("Name is required"))?;
    let goal_days: u32 = matches
        .get_one::<String>("goal-days")
        .map(|s| s.parse())
        .transpose()
        .context("Goal days must be a number")?
        .unwrap_or(30);
    let kind = matches
        .get_one::<String>("kind")
        .map(|s| s.as_str())
        .unwrap_or("catch up");

    let mut person = Person::new(name, ConnectionGoal::new(kind, goal_days));
    if let Some(raw) = matches.get_one::<String>("birthdate") {
        person.birthdate = Some(Birthdate::parse(raw).context("Invalid birthdate")?);
    }

    let mut tracker = open_tracker(data_dir)?;
    let id = tracker.add_person(person)?;
    println!("Added {} ({})", style(name).bold(), id);
    Ok(())
}

/// List all people
pub fn list_people(data_dir: Option<&str>) -> Result<()> {
    let tracker = open_tracker(data_dir)?;
    let people = &tracker.state().people;

    if people.is_empty() {
        println!("No people yet. Use 'person add' to get started.");
        return Ok(());
    }

    println!("\n{} people", style(people.len()).bold().cyan());
    println!("{}", "=".repeat(60));
    for person in people {
        let last = if person.last_connection.is_never() {
            "never".to_string()
        } else {
            format!("{} ms", person.last_connection)
        };
        println!(
            "{:<30} every {:>3} days   last: {}",
            person.name, person.goal.frequency_days, last
        );
    }
    Ok(())
}

/// Remove a person, cascading through groups and support requests
pub fn remove_person(data_dir: Option<&str>, matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| anyhow!("Name is required"))?;

    let mut tracker = open_tracker(data_dir)?;
    let id = tracker
        .person_by_name(name)
        .map(|p| p.id.clone())
        .ok_or_else(|| anyhow!("No person named '{name}'"))?;
    tracker.delete_person(&id)?;
    println!("Removed {}", style(name).bold());
    Ok(())
}

/// Log an interaction with a person
pub fn log_interaction(data_dir: Option<&str>, matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| anyhow!("Name is required"))?;
    let kind = matches
        .get_one::<String>("kind")
        .map(|s| s.as_str())
        .unwrap_or("catch up");

    let mut tracker = open_tracker(data_dir)?;
    let id = tracker
        .person_by_name(name)
        .map(|p| p.id.clone())
        .ok_or_else(|| anyhow!("No person named '{name}'"))?;

    let mut interaction = Interaction::new(Timestamp::now(), kind).with_person(id);
    if let Some(notes) = matches.get_one::<String>("notes") {
        interaction.notes = notes.clone();
    }
    tracker.upsert_interaction(interaction)?;
    println!("Logged {} with {}", kind, style(name).bold());
    Ok(())
}

/// Show the overdue feed
pub fn show_dashboard(data_dir: Option<&str>) -> Result<()> {
    let tracker = open_tracker(data_dir)?;
    let feed = tracker.dashboard(Timestamp::now());

    if feed.is_empty() {
        println!("Nothing on the dashboard. All caught up!");
        return Ok(());
    }

    println!("\n{}", style("Who to reach out to").bold().cyan());
    println!("{}", "=".repeat(60));
    for entry in feed {
        let overdue = if entry.overdue_days == NEVER_DAYS {
            "never contacted".to_string()
        } else if entry.overdue_days > 0 {
            format!("{} days overdue", entry.overdue_days)
        } else {
            format!("due in {} days", -entry.overdue_days)
        };
        println!("{:<30} {}", entry.name, overdue);
    }
    Ok(())
}

/// Record asking the stalest helper for a support request
pub fn ask_helper(data_dir: Option<&str>, matches: &ArgMatches) -> Result<()> {
    let request_name = matches
        .get_one::<String>("request")
        .ok_or_else(|| anyhow!("Request name is required"))?;

    let mut tracker = open_tracker(data_dir)?;
    let request_id = tracker
        .state()
        .support_requests
        .iter()
        .find(|r| &r.name == request_name)
        .map(|r| r.id.clone())
        .ok_or_else(|| anyhow!("No support request named '{request_name}'"))?;

    let Some(helper_id) = tracker.stalest_helper(&request_id)? else {
        bail!("'{request_name}' has no helpers yet");
    };
    let helper_name = tracker
        .person(&helper_id)
        .map(|p| p.name.clone())
        .or_else(|| tracker.group(&helper_id).map(|g| g.name.clone()))
        .unwrap_or_else(|| helper_id.to_string());

    tracker.record_ask(&request_id, &helper_id, Timestamp::now())?;
    println!("Ask {} about '{}'", style(&helper_name).bold(), request_name);
    Ok(())
}

/// Export all data to a backup file
pub fn export_backup(data_dir: Option<&str>, matches: &ArgMatches) -> Result<()> {
    let output = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or("circleup_backup.json");

    let store = open_store(data_dir)?;
    let backup = BackupData::from_store(&store)?;
    backup.write_to(Path::new(output))?;
    println!("Backup written to {output}");
    Ok(())
}

/// Replace all data from a backup file
pub fn import_backup(data_dir: Option<&str>, matches: &ArgMatches) -> Result<()> {
    let file = matches
        .get_one::<String>("file")
        .ok_or_else(|| anyhow!("Backup file is required"))?;

    let store = open_store(data_dir)?;
    let backup = BackupData::read_from(Path::new(file)).context("Failed to read backup")?;
    backup.apply_to(&store)?;
    println!("Backup imported from {file}");
    Ok(())
}

/// Encode a person as a shareable card string
pub fn encode_person_card(data_dir: Option<&str>, matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| anyhow!("Name is required"))?;

    let tracker = open_tracker(data_dir)?;
    let person = tracker
        .person_by_name(name)
        .ok_or_else(|| anyhow!("No person named '{name}'"))?;
    let card = ContactCard::from_person(person);
    println!("{}", encode_card(&card)?);
    Ok(())
}

/// Decode a card string, optionally importing it
pub fn decode_person_card(data_dir: Option<&str>, matches: &ArgMatches) -> Result<()> {
    let payload = matches
        .get_one::<String>("payload")
        .ok_or_else(|| anyhow!("Card payload is required"))?;
    let card = decode_card(payload).context("Could not decode card")?;

    println!("{}", style(&card.name).bold());
    if !card.interests.is_empty() {
        println!("  interests: {}", card.interests.join(", "));
    }
    if !card.dislikes.is_empty() {
        println!("  dislikes:  {}", card.dislikes.join(", "));
    }
    if let Some(birthdate) = &card.birthdate {
        println!("  birthday:  {}", birthdate.as_str());
    }

    if matches.get_flag("import") {
        let mut tracker = open_tracker(data_dir)?;
        let id = tracker.import_card(&card)?;
        println!("Imported as {id}");
    }
    Ok(())
}

/// Run one reconcile-and-push cycle against an in-memory remote
///
/// There is no hosted backend wired up here; the in-memory store exercises
/// the full sync path for demos and smoke checks.
pub fn run_sync(data_dir: Option<&str>) -> Result<()> {
    let store = Arc::new(open_store(data_dir)?);
    let remote: Arc<dyn RemoteStore> = Arc::new(InMemoryRemoteStore::new());

    let mut session = SessionContext::signed_in(
        UserId::from_string("local-user"),
        remote,
        Arc::clone(&store),
    );
    session.start(Arc::new(|_| {}))?;

    let noted_at = Timestamp::now();
    session.note_change(noted_at);
    let due = Timestamp::from_millis(
        noted_at.as_millis() + circleup_sync_engine::DEFAULT_DEBOUNCE_MS,
    );
    match session.push_if_due(due)? {
        Some(report) if report.skipped => println!("Nothing to push (all collections empty)"),
        Some(report) => println!(
            "Synced: {} records pushed, {} pruned",
            report.upserted, report.deleted
        ),
        None => println!("Push not due"),
    }
    session.stop();
    Ok(())
}

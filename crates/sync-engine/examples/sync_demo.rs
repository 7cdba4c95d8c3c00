// crates/sync-engine/examples/sync_demo.rs
//! Two devices converging through the shared remote store.
//!
//! Run with: cargo run -p circleup-sync-engine --example sync_demo

use circleup_store::{Collection, SnapshotStore};
use circleup_sync_engine::{InMemoryRemoteStore, RemoteStore, SessionContext, UserId};
use serde_json::json;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let remote: Arc<dyn RemoteStore> = Arc::new(InMemoryRemoteStore::new());
    let user = UserId::from_string("demo-user");

    let phone_dir = tempfile::tempdir()?;
    let laptop_dir = tempfile::tempdir()?;
    let phone = Arc::new(SnapshotStore::open(phone_dir.path())?);
    let laptop = Arc::new(SnapshotStore::open(laptop_dir.path())?);

    // The phone edited the name later; the laptop still has the old one.
    phone.save_raw(
        Collection::People,
        &[json!({"id": "1", "name": "Alexander", "updated_at": 200})],
    )?;
    laptop.save_raw(
        Collection::People,
        &[
            json!({"id": "1", "name": "Alex", "updated_at": 100}),
            json!({"id": "2", "name": "Beth", "updated_at": 50}),
        ],
    )?;

    let mut phone_session =
        SessionContext::signed_in(user.clone(), Arc::clone(&remote), Arc::clone(&phone));
    phone_session.start(Arc::new(|update| println!("phone saw {update:?}")))?;

    let mut laptop_session =
        SessionContext::signed_in(user.clone(), Arc::clone(&remote), Arc::clone(&laptop));
    laptop_session.start(Arc::new(|update| println!("laptop saw {update:?}")))?;

    for (label, store) in [("phone", &phone), ("laptop", &laptop)] {
        let people = store.load_raw(Collection::People)?;
        let names: Vec<_> = people
            .iter()
            .filter_map(|p| p["name"].as_str())
            .collect();
        println!("{label}: {names:?}");
    }

    laptop_session.stop();
    phone_session.stop();
    Ok(())
}

// crates/cli/src/main.rs

use anyhow::Result;
use clap::{Arg, Command};

mod commands;

fn build_cli() -> Command {
    Command::new("circleup")
        .version("0.1.0")
        .about("Personal relationship tracker: stay in touch with the people who matter")
        .arg(
            Arg::new("data-dir")
                .short('d')
                .long("data-dir")
                .value_name("PATH")
                .help("Data directory (defaults to the platform data dir)")
                .global(true),
        )
        .subcommand(
            Command::new("person")
                .about("Manage people")
                .subcommand(
                    Command::new("add")
                        .about("Add a person")
                        .arg(Arg::new("name").required(true).value_name("NAME"))
                        .arg(
                            Arg::new("goal-days")
                                .short('g')
                                .long("goal-days")
                                .value_name("DAYS")
                                .help("Contact cadence goal in days")
                                .default_value("30"),
                        )
                        .arg(
                            Arg::new("kind")
                                .short('k')
                                .long("kind")
                                .value_name("KIND")
                                .help("Connection type, e.g. call")
                                .default_value("catch up"),
                        )
                        .arg(
                            Arg::new("birthdate")
                                .short('b')
                                .long("birthdate")
                                .value_name("DATE")
                                .help("Birthdate, YYYY-MM-DD or --MM-DD"),
                        ),
                )
                .subcommand(Command::new("list").about("List all people"))
                .subcommand(
                    Command::new("remove")
                        .about("Remove a person (cascades through groups and support requests)")
                        .arg(Arg::new("name").required(true).value_name("NAME")),
                ),
        )
        .subcommand(
            Command::new("log")
                .about("Log an interaction with a person")
                .arg(Arg::new("name").required(true).value_name("NAME"))
                .arg(
                    Arg::new("kind")
                        .short('k')
                        .long("kind")
                        .value_name("KIND")
                        .default_value("catch up"),
                )
                .arg(
                    Arg::new("notes")
                        .short('n')
                        .long("notes")
                        .value_name("TEXT")
                        .help("Free-form notes"),
                ),
        )
        .subcommand(Command::new("dashboard").about("Show the overdue feed, most overdue first"))
        .subcommand(
            Command::new("ask")
                .about("Pick and record the next helper to ask for a support request")
                .arg(Arg::new("request").required(true).value_name("REQUEST")),
        )
        .subcommand(
            Command::new("backup")
                .about("Export or import a full JSON backup")
                .subcommand(
                    Command::new("export")
                        .about("Write all data to a backup file")
                        .arg(
                            Arg::new("output")
                                .short('o')
                                .long("output")
                                .value_name("FILE")
                                .default_value("circleup_backup.json"),
                        ),
                )
                .subcommand(
                    Command::new("import")
                        .about("Replace all data from a backup file")
                        .arg(Arg::new("file").required(true).value_name("FILE")),
                ),
        )
        .subcommand(
            Command::new("card")
                .about("Share contact cards")
                .subcommand(
                    Command::new("encode")
                        .about("Encode a person as a shareable card string")
                        .arg(Arg::new("name").required(true).value_name("NAME")),
                )
                .subcommand(
                    Command::new("decode")
                        .about("Decode a card string, optionally importing it")
                        .arg(Arg::new("payload").required(true).value_name("CARD"))
                        .arg(
                            Arg::new("import")
                                .short('i')
                                .long("import")
                                .help("Merge the card into the data set")
                                .action(clap::ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Run a reconcile-and-push cycle against an in-memory remote (demo)"),
        )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = build_cli().get_matches();
    let data_dir = matches.get_one::<String>("data-dir").map(|s| s.as_str());

    match matches.subcommand() {
        Some(("person", sub)) => match sub.subcommand() {
            Some(("add", m)) => commands::add_person(data_dir, m),
            Some(("list", _)) => commands::list_people(data_dir),
            Some(("remove", m)) => commands::remove_person(data_dir, m),
            _ => {
                build_cli().print_help()?;
                Ok(())
            }
        },
        Some(("log", m)) => commands::log_interaction(data_dir, m),
        Some(("dashboard", _)) => commands::show_dashboard(data_dir),
        Some(("ask", m)) => commands::ask_helper(data_dir, m),
        Some(("backup", sub)) => match sub.subcommand() {
            Some(("export", m)) => commands::export_backup(data_dir, m),
            Some(("import", m)) => commands::import_backup(data_dir, m),
            _ => {
                build_cli().print_help()?;
                Ok(())
            }
        },
        Some(("card", sub)) => match sub.subcommand() {
            Some(("encode", m)) => commands::encode_person_card(data_dir, m),
            Some(("decode", m)) => commands::decode_person_card(data_dir, m),
            _ => {
                build_cli().print_help()?;
                Ok(())
            }
        },
        Some(("sync", _)) => commands::run_sync(data_dir),
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}

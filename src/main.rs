// src/main.rs
//
// comichub command-line entry point.
// Wiring order: config -> infrastructure -> store -> identity -> services -> controller

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use comichub::application::commands::*;
use comichub::application::{AppState, CatalogController, EntryForm, Notifier, UpdateEntryDto};
use comichub::catalog::{CatalogService, MutationOutcome};
use comichub::config::load_config;
use comichub::db::{
    create_connection_pool, get_connection, get_database_stats, initialize_database,
    verify_database_integrity,
};
use comichub::domain::{Session, RECENT_LIMIT};
use comichub::events::create_event_bus;
use comichub::identity::{IdentityProvider, LocalIdentity};
use comichub::logging::init_logging;
use comichub::store::{DocumentStore, SqliteDocumentStore};

#[derive(Parser)]
#[command(
    name = "comichub",
    version,
    about = "Local-first comic catalog with guest and full-access sessions"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run as a read-only guest (mature entries hidden)
    #[arg(long, global = true)]
    guest: bool,

    /// Debug logging, overrides logging.level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List visible entries in title order
    List {
        /// Case-insensitive title filter
        #[arg(long)]
        search: Option<String>,
    },
    /// The most recently updated visible entry
    Latest,
    /// Most recently updated entries
    Recent {
        #[arg(long, default_value_t = RECENT_LIMIT)]
        limit: usize,
    },
    /// Add an entry
    Add {
        title: String,
        episode: String,
        link: String,
        #[arg(long)]
        mature: bool,
    },
    /// Change fields of an existing entry
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        episode: Option<String>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        mature: Option<bool>,
    },
    /// Delete an entry by id
    Delete { id: String },
    /// Import a JSON array of entries
    Import { file: PathBuf },
    /// Database diagnostics
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    // 0. CONFIG & LOGGING
    let config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.log_level()?
    };
    init_logging(level);

    // 1. INFRASTRUCTURE
    let event_bus = Arc::new(create_event_bus());
    let db_path = config.database_path()?;
    let pool = Arc::new(
        create_connection_pool(&db_path, config.database.pool_size)
            .with_context(|| format!("Failed to open {}", db_path.display()))?,
    );
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
    }

    // 2. STORE
    let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(pool.clone()));

    // 3. IDENTITY
    let identity = Arc::new(LocalIdentity::new(event_bus.clone()));
    if cli.guest {
        identity.sign_in_as_guest();
    } else {
        let name = std::env::var("USER").unwrap_or_else(|_| "local".to_string());
        identity.sign_in(name);
    }

    // 4. SERVICES
    let catalog = Arc::new(CatalogService::new(
        store,
        event_bus.clone(),
        config.catalog_options(),
    ));
    let notifier = Arc::new(Notifier::new(config.notifications.dismiss_after()));
    let controller = Arc::new(CatalogController::new(
        catalog.clone(),
        identity.clone(),
        notifier,
    ));

    catalog.start(identity.clone()).await;
    if let Some(message) = catalog.last_error() {
        anyhow::bail!(message);
    }

    // 5. APPLICATION STATE
    let state = AppState {
        event_bus,
        identity,
        catalog,
        controller,
    };

    let ok = match cli.command {
        Command::List { search } => {
            let hits = list_entries(&state, search.as_deref());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                for hit in &hits {
                    let title: String = hit
                        .segments
                        .iter()
                        .map(|s| {
                            if s.matched {
                                format!("[{}]", s.text)
                            } else {
                                s.text.clone()
                            }
                        })
                        .collect();
                    let e = &hit.entry;
                    print_entry_line(&e.id, &title, e.episode, &e.link, e.is_mature);
                }
            }
            true
        }

        Command::Latest => {
            let entry = latest_entry(&state);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else if let Some(e) = &entry {
                print_entry_line(&e.id, &e.title, e.episode, &e.link, e.is_mature);
            } else {
                println!("No entries");
            }
            true
        }

        Command::Recent { limit } => {
            let entries = recent_entries(&state, limit);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for e in &entries {
                    print_entry_line(&e.id, &e.title, e.episode, &e.link, e.is_mature);
                }
            }
            true
        }

        Command::Add {
            title,
            episode,
            link,
            mature,
        } => {
            let form = EntryForm::new(title, episode, link).mature(mature);
            print_outcome(add_entry(&state, form).await, cli.json)?
        }

        Command::Update {
            id,
            title,
            episode,
            link,
            mature,
        } => {
            let changes = UpdateEntryDto {
                title,
                episode,
                link,
                is_mature: mature,
            };
            print_outcome(update_entry(&state, id, changes).await, cli.json)?
        }

        Command::Delete { id } => print_outcome(delete_entry(&state, id).await, cli.json)?,

        Command::Import { file } => print_outcome(import_entries(&state, &file).await, cli.json)?,

        Command::Stats => {
            let conn = get_connection(&pool)?;
            verify_database_integrity(&conn)?;
            let stats = get_database_stats(&conn)?;
            let session = Session::for_principal(state.identity.current_principal().as_ref());

            println!("database:  {}", db_path.display());
            println!("size:      {} bytes", stats.size_bytes);
            println!("entries:   {}", stats.entry_count);
            if session.show_mature {
                println!("mature:    {}", stats.mature_count);
            }
            true
        }
    };

    state.catalog.shutdown();
    log::debug!("{} events emitted", state.event_bus.get_event_log().len());
    Ok(ok)
}

fn print_entry_line(id: &str, title: &str, episode: u32, link: &str, is_mature: bool) {
    let flag = if is_mature { " (mature)" } else { "" };
    println!("{}  {}  ep {}  {}{}", id, title, episode, link, flag);
}

fn print_outcome(outcome: MutationOutcome, json: bool) -> anyhow::Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if outcome.success {
        println!("{}", outcome.message);
    } else {
        eprintln!("{}", outcome.message);
    }
    Ok(outcome.success)
}

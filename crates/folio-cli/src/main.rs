//! `folio` — operator commands for a Folio person store.
//!
//! Reads `folio.toml` (or the path given with `--config`), opens the SQLite
//! store it names, and runs one command against it.
//!
//! ```text
//! folio import people.json
//! folio export
//! folio history 12
//! folio user https://id.example.com/alice --name Alice --email alice@example.com
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use folio_core::{import, person::PersonId, store::ContentStore};
use folio_store_sqlite::SqliteStore;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Folio person store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "folio.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Reconcile a JSON file of `{"name", "emails"}` records into the store.
  Import {
    file: PathBuf,
  },
  /// Print every person's current content, keyed by person id.
  Export,
  /// Print all content versions of one person, newest first.
  History {
    person_id: PersonId,
  },
  /// Create or refresh a user from an already-verified identity.
  User {
    openid_url: String,
    #[arg(long)]
    name:       Option<String>,
    #[arg(long)]
    email:      Option<String>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;
  let store_path = settings.resolved_store_path();

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::Import { file } => {
      let records = import::load_file(&file)
        .with_context(|| format!("failed to load {file:?}"))?;
      let stats = store
        .import_bulk(records)
        .await
        .with_context(|| format!("import from {file:?} rejected"))?;
      if !stats.is_empty() {
        tracing::info!("JSON import from {file:?} completed; {stats}");
      }
      print_json(&stats)?;
    }
    Command::Export => {
      let persons = store.list_all_persons().await.context("export failed")?;
      print_json(&persons)?;
    }
    Command::History { person_id } => {
      store
        .get_person(person_id)
        .await?
        .with_context(|| format!("person {person_id} not found"))?;
      let versions = store.list_versions(person_id).await?;
      print_json(&versions)?;
    }
    Command::User { openid_url, name, email } => {
      let user = store
        .get_or_update_user(&openid_url, name.as_deref(), email.as_deref())
        .await?;
      print_json(&user)?;
    }
  }

  Ok(())
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
  let out = serde_json::to_string_pretty(value).context("failed to serialise output")?;
  println!("{out}");
  Ok(())
}

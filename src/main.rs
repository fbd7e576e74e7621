use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use media_organizer::cli::{self, Cli, Commands};
use media_organizer::settings::SettingsStore;

const SETTINGS_FILE: &str = ".media_organizer.json";

fn settings_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_FILE)
}

fn remember_folder(command: &Commands) {
    let root = match command {
        Commands::Analyze { root }
        | Commands::Organize { root, .. }
        | Commands::Cleanup { root, .. }
        | Commands::Convert { root, .. }
        | Commands::Privacy { root, .. }
        | Commands::Repair { root, .. }
        | Commands::Rename { root, .. } => root,
    };
    let mut settings = SettingsStore::load(settings_path());
    settings.add_recent_folder(&root.to_string_lossy());
    if let Err(err) = settings.save() {
        eprintln!("⚠️ Could not save settings: {err}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    remember_folder(&cli.command);
    cli::run(cli).await
}

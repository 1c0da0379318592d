use clap::Parser;
use heartchat::core::config::{self, CliOverrides};
use heartchat::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "heartchat", about = "A cosy little chat client for the terminal")]
struct Args {
    /// Base URL of the chat backend
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Where to keep chat history
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Keep history in memory only; nothing is written to disk
    #[arg(long)]
    no_persist: bool,

    /// Turn off the gradient, hearts, and sparkles
    #[arg(long)]
    no_effects: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to heartchat.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("heartchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        Default::default()
    });
    let overrides = CliOverrides {
        endpoint: args.endpoint,
        history_file: args.history_file,
        no_persist: args.no_persist,
        no_effects: args.no_effects,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!(
        "heartchat starting up: endpoint={}, history={} (persist={}), effects={}",
        resolved.endpoint,
        resolved.history_path.display(),
        resolved.persist_history,
        resolved.effects_enabled
    );

    tui::run(resolved)
}

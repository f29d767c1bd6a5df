//! Lumen bot entry point.
//!
//! Binary name: `lumen`
//!
//! Parses CLI arguments, initializes configuration, database, and services,
//! then runs the Telegram long-poll loop. Each inbound update is handled on
//! its own task; one user's slow turn never blocks the others.

mod state;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use state::AppState;

#[derive(Parser)]
#[command(name = "lumen", about = "Guided self-help companion bot", version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Data directory (defaults to LUMEN_DATA_DIR or ~/.lumen)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,lumen=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let state = AppState::init(cli.data_dir).await?;
    info!(data_dir = %state.data_dir.display(), "lumen is running");

    run_polling(&state).await
}

/// Long-poll `getUpdates` forever, spawning one task per inbound message.
async fn run_polling(state: &AppState) -> anyhow::Result<()> {
    let mut offset: i64 = 0;

    loop {
        let updates = match state.telegram.get_updates(offset).await {
            Ok(updates) => updates,
            Err(err) => {
                warn!(error = %err, "getUpdates failed, retrying");
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            let Some((user_id, chat_id, text)) = update.text_message() else {
                continue;
            };
            let text = text.to_string();

            let dispatcher = state.dispatcher.clone();
            let telegram = state.telegram.clone();
            tokio::spawn(async move {
                let replies = dispatcher.handle(user_id, &text).await;
                for reply in replies {
                    if let Err(err) = telegram.send_message(chat_id, &reply).await {
                        error!(chat_id, error = %err, "failed to send reply");
                    }
                }
            });
        }
    }
}

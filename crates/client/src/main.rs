mod app;
mod assets;
mod headless;
mod input;
mod net;
mod tui;

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bomber::config::{DEFAULT_MOVE_INTERVAL_MS, DEFAULT_RECONNECT_DELAY_MS, DEFAULT_URL};

#[derive(Parser, Debug)]
#[command(name = "bomber")]
#[command(about = "Terminal client for the multiplayer bomber game")]
pub struct Args {
    #[arg(short, long, default_value = DEFAULT_URL, help = "WebSocket URL of the game server")]
    url: String,

    #[arg(short, long, default_value = "Player", help = "Name used when joining a game")]
    name: String,

    #[arg(long, default_value_t = DEFAULT_RECONNECT_DELAY_MS, help = "Delay before reconnecting")]
    reconnect_delay_ms: u64,

    #[arg(long, default_value_t = DEFAULT_MOVE_INTERVAL_MS, help = "Minimum gap between moves")]
    move_interval_ms: u64,

    #[arg(long, help = "Keep the session token in this file across restarts")]
    token_file: Option<PathBuf>,

    #[arg(long, help = "Write logs to this file instead of stderr")]
    log_file: Option<PathBuf>,

    #[arg(long, help = "Run without the terminal UI, joining with --name")]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(app::run(args))
}

/// The terminal UI owns stderr, so without a log file it stays quiet.
fn init_logging(args: &Args) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None if !args.headless => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {}
    }

    builder.init();
    Ok(())
}

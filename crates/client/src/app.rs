use std::time::Duration;

use anyhow::{Context, bail};
use tokio::sync::mpsc;

use bomber::{
    FileTokenStore, MemoryTokenStore, Session, SessionConfig, SessionToken, TimingConfig,
};

use crate::Args;
use crate::assets::{self, Glyphs};
use crate::headless::LogFrontend;
use crate::input;
use crate::net::WsTransport;
use crate::tui::TerminalFrontend;

pub async fn run(args: Args) -> anyhow::Result<()> {
    let registry = assets::load_registry().context("failed to load embedded assets")?;
    let mut ready = registry.ready();
    if !ready.wait().await {
        bail!("asset registry closed before all assets arrived");
    }
    let glyphs = Glyphs::from_registry(&registry).context("invalid glyph assets")?;

    let token = match &args.token_file {
        Some(path) => SessionToken::load_or_create(&mut FileTokenStore::new(path)),
        None => SessionToken::load_or_create(&mut MemoryTokenStore::new()),
    }
    .context("failed to set up the session token")?;

    let config = SessionConfig {
        url: args.url.clone(),
        reconnect_delay: Duration::from_millis(args.reconnect_delay_ms),
        move_interval: Duration::from_millis(args.move_interval_ms),
    };
    let mut session = Session::new(WsTransport::new(), config, TimingConfig::default(), token);
    log::info!("Session token {}", session.token());

    let (commands, command_rx) = mpsc::unbounded_channel();

    if args.headless {
        let mut frontend = LogFrontend::with_auto_join(commands.downgrade(), args.name.clone());
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {}", e);
            }
            drop(commands);
        });

        session.run(&mut frontend, command_rx).await;
    } else {
        let mut frontend =
            TerminalFrontend::new(glyphs).context("failed to initialise the terminal")?;
        let _keyboard = input::spawn(commands, args.name.clone());
        session.run(&mut frontend, command_rx).await;
    }

    log::info!("Client stopped");
    Ok(())
}

//! clawlink console client
//!
//! Interactive front end for the OpenClaw gateway link:
//! - Maintains the session store and connection manager
//! - Tails the activity log to stdout as entries arrive
//! - Slash commands for link control; everything else is relayed to the
//!   agent (or to the simulation when no gateway is reachable)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use claw_client::{
    ClientEvent, ConnectionManager, SessionStore, StoreHandle, TokioTimers, WsConnector,
};
use claw_client::text;
use claw_core::{
    config, ConnectionMode, Language, SessionSettings, SettingsPatch,
};

#[derive(Parser)]
#[command(name = "clawlink")]
#[command(author, version, about = "Console client for the OpenClaw agent gateway")]
struct Cli {
    /// Gateway address (implies remote mode unless --mode is given)
    #[arg(short, long)]
    url: Option<String>,

    /// API token for the gateway handshake
    #[arg(short, long, env = "CLAWLINK_TOKEN")]
    token: Option<String>,

    /// Connection mode: local or remote
    #[arg(short, long)]
    mode: Option<ConnectionMode>,

    /// Display language: en or zh
    #[arg(short, long)]
    language: Option<Language>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let mut settings = load_settings(cli.config.as_ref())?;
    settings.apply(SettingsPatch {
        // A URL on the command line means the user wants that gateway.
        mode: cli.mode.or(cli.url.as_ref().map(|_| ConnectionMode::Remote)),
        gateway_url: cli.url,
        api_token: cli.token,
        language: cli.language,
    });
    let lang = settings.language;

    let store = StoreHandle::new(SessionStore::new(settings));
    let (event_tx, mut event_rx) = mpsc::channel::<ClientEvent>(256);
    let mut manager = ConnectionManager::new(
        store.clone(),
        WsConnector::new(event_tx.clone()),
        TokioTimers::new(event_tx),
    );

    store.add_log(
        claw_core::LogSender::System,
        text::system_initialized(lang),
    );

    let mut cursor: Option<u64> = None;
    drain_log(&store, &mut cursor);
    println!("Type /connect to link, /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line.context("Failed to read stdin")?;
                match line {
                    Some(line) => {
                        if !handle_line(&mut manager, &store, &config_path, line.trim()) {
                            break;
                        }
                    }
                    // stdin closed
                    None => break,
                }
            }

            event = event_rx.recv() => match event {
                Some(event) => manager.handle_event(event),
                None => break,
            },
        }

        drain_log(&store, &mut cursor);
    }

    manager.disconnect();
    drain_log(&store, &mut cursor);
    Ok(())
}

/// Resolve settings: explicit path must load; the default path is
/// optional and falls back to defaults on any problem.
fn load_settings(path: Option<&PathBuf>) -> Result<SessionSettings> {
    if let Some(path) = path {
        return config::load_settings(path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(config::load_settings(&default_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config from {:?}: {}", default_path, e);
            SessionSettings::default()
        }))
    } else {
        Ok(SessionSettings::default())
    }
}

/// Dispatch one input line. Returns false to exit.
fn handle_line<C, T>(
    manager: &mut ConnectionManager<C, T>,
    store: &StoreHandle,
    config_path: &Path,
    line: &str,
) -> bool
where
    C: claw_client::Connector,
    T: claw_client::TimerDriver,
{
    match line {
        "" => {}
        "/quit" | "/exit" => return false,
        "/connect" => {
            let token = store.settings().api_token;
            manager.connect(&token);
        }
        "/disconnect" => manager.disconnect(),
        "/status" => print_status(store),
        "/save" => save_settings(store, config_path),
        "/help" => print_help(),
        other if other.starts_with('/') => {
            println!("Unknown command: {other} (try /help)");
        }
        command => manager.send_command(command),
    }
    true
}

fn print_status(store: &StoreHandle) {
    let settings = store.settings();
    let target = match settings.mode {
        ConnectionMode::Local => claw_core::DEFAULT_GATEWAY_URL.to_string(),
        ConnectionMode::Remote => settings.gateway_url,
    };
    println!("  Connection: {}", store.connection_status());
    println!("  Agent:      {}", store.agent_status());
    println!("  Target:     {}", target);
}

fn print_help() {
    println!("  /connect       Link to the gateway");
    println!("  /disconnect    Drop the link");
    println!("  /status        Show connection and agent status");
    println!("  /save          Persist current settings to the config file");
    println!("  /quit          Exit");
    println!("  <anything>     Send as a command to the agent");
}

fn save_settings(store: &StoreHandle, path: &Path) {
    match config::save_settings(path, &store.settings()) {
        Ok(()) => println!("Settings saved to {}", path.display()),
        Err(e) => println!("Failed to save settings: {e}"),
    }
}

/// Print log entries added since the last call, advancing the cursor.
fn drain_log(store: &StoreHandle, cursor: &mut Option<u64>) {
    let entries = match cursor {
        Some(id) => store.logs_after(*id),
        None => store.logs(),
    };
    for entry in entries {
        println!("[{}] {}", entry.sender, entry.text);
        *cursor = Some(entry.id);
    }
}

//! Console host for the bot.
//!
//! Stands in for the chat client: every stdin line of the form `sender: message`
//! is delivered to the dispatcher as a message in one room, and replies are
//! printed to stdout. Logs go to stderr.

use std::io::Write;

use khhbot::api::ApiClient;
use khhbot::dispatcher::Dispatcher;
use khhbot::state::BotState;
use khhbot::types::{IncomingMessage, Replier};
use khhbot::{Config, KhhBotError, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_ROOM: &str = "console";
const USAGE: &str = "Usage: '<sender>: <message>', or one of /health, /status, /quit";

/// One parsed line of console input.
#[derive(Debug, PartialEq, Eq)]
enum ConsoleInput<'a> {
    Chat { sender: &'a str, message: &'a str },
    Health,
    Status,
    Quit,
}

fn parse_line(line: &str) -> Option<ConsoleInput<'_>> {
    match line.trim() {
        "/health" => return Some(ConsoleInput::Health),
        "/status" => return Some(ConsoleInput::Status),
        "/quit" => return Some(ConsoleInput::Quit),
        _ => {}
    }

    let (sender, message) = line.split_once(':')?;
    let (sender, message) = (sender.trim(), message.trim());
    if sender.is_empty() || message.is_empty() {
        return None;
    }
    Some(ConsoleInput::Chat { sender, message })
}

/// Prints replies for one room.
struct ConsoleReplier<W: Write> {
    room: String,
    out: W,
}

impl<W: Write> Replier for ConsoleReplier<W> {
    fn reply(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "[{}] {}", self.room, text)
            .and_then(|_| self.out.flush())
            .map_err(|e| KhhBotError::Reply(e.to_string()))
    }
}

/// One-line summary of the dispatcher's own state for `/status`.
fn local_status(dispatcher: &Dispatcher) -> String {
    format!(
        "local: {}, admin: {}, senders tracked: {}",
        if dispatcher.state().is_active() { "active" } else { "inactive" },
        dispatcher.config().admin_sender,
        dispatcher.state().tracked_senders()
    )
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "khhbot=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let room = std::env::var("CHAT_ROOM").unwrap_or_else(|_| DEFAULT_ROOM.to_string());

    let api = ApiClient::new(&config);
    if api.check_health().await {
        info!(url = %api.base_url(), "API server is reachable");
    } else {
        warn!(url = %api.base_url(), "API server is not reachable, offline replies will be used");
    }

    let mut dispatcher = Dispatcher::new(config, api, BotState::new());
    let mut replier = ConsoleReplier {
        room: room.clone(),
        out: std::io::stdout(),
    };

    info!(room = %room, "Reading messages from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Some(ConsoleInput::Chat { sender, message }) => {
                let msg = IncomingMessage::new(room.as_str(), message, sender, false);
                let outcome = dispatcher.handle(&msg, &mut replier).await;
                info!(sender = %sender, outcome = ?outcome, "Message handled");
            }
            Some(ConsoleInput::Health) => {
                let healthy = dispatcher.api().check_health().await;
                println!("API {}: {}", dispatcher.api().base_url(), if healthy { "healthy" } else { "unreachable" });
            }
            Some(ConsoleInput::Status) => {
                let local = local_status(&dispatcher);
                match dispatcher.api().fetch_status().await {
                    Ok(remote) => println!(
                        "{}, remote: {}",
                        local,
                        if remote.is_active { "active" } else { "inactive" }
                    ),
                    Err(failure) => println!("{}, remote: unavailable ({})", local, failure),
                }
            }
            Some(ConsoleInput::Quit) => break,
            None => eprintln!("{}", USAGE),
        }
    }

    info!("Console host stopped");
    Ok(())
}

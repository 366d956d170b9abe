//! Per-message dispatch pipeline.
//!
//! Every incoming chat message goes through the same steps: the per-sender rate
//! limit, the inactive short-circuit, the remote API relay, and finally the
//! offline fallback tables. At most one reply is sent per message and nothing
//! is propagated back to the host.

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiOutcome, MessageRequest, ResponseData};
use crate::config::Config;
use crate::offline::offline_reply;
use crate::state::BotState;
use crate::types::{IncomingMessage, Replier};

/// Reply sent when the admin turns an inactive bot back on.
pub const REACTIVATED_REPLY: &str = "봇이 다시 활성화됐다!";

/// What the dispatcher did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Sender posted again inside the rate-limit window
    RateLimited,
    /// Bot is inactive and the message was not the activation command
    Dropped,
    /// The admin reactivated the bot
    Reactivated,
    /// The remote API handled the message
    Relayed { replied: bool, deactivated: bool },
    /// The API was unavailable and the offline tables were used
    Offline { replied: bool },
}

/// Owns the bot state and routes each message through the pipeline.
///
/// Handling takes `&mut self`, so one dispatcher processes one message at a time.
pub struct Dispatcher {
    config: Config,
    api: ApiClient,
    state: BotState,
}

impl Dispatcher {
    pub fn new(config: Config, api: ApiClient, state: BotState) -> Self {
        Self { config, api, state }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> &BotState {
        &self.state
    }

    /// Handle one incoming message, replying through `replier` when needed.
    pub async fn handle<R>(&mut self, msg: &IncomingMessage, replier: &mut R) -> Dispatch
    where
        R: Replier + ?Sized,
    {
        if !self.state.check_rate_limit(&msg.sender, self.config.rate_limit) {
            debug!(sender = %msg.sender, room = %msg.room, "Rate limited");
            return Dispatch::RateLimited;
        }

        if !self.state.is_active() {
            return self.handle_inactive(msg, replier);
        }

        let request = MessageRequest {
            message: &msg.message,
            sender: &msg.sender,
            room: &msg.room,
        };

        let outcome = self.api.send_message(&request).await;
        match outcome {
            ApiOutcome::Success(data) => self.relay(msg, &data, replier),
            ApiOutcome::Unavailable(failure) => {
                info!(sender = %msg.sender, room = %msg.room, reason = %failure, "Falling back to offline replies");
                let replied = match offline_reply(&msg.message) {
                    Some(text) => send_reply(replier, &msg.room, text),
                    None => false,
                };
                Dispatch::Offline { replied }
            }
        }
    }

    fn handle_inactive<R>(&mut self, msg: &IncomingMessage, replier: &mut R) -> Dispatch
    where
        R: Replier + ?Sized,
    {
        if msg.sender == self.config.admin_sender && msg.message == self.config.activate_command {
            self.state.set_active(true);
            info!(sender = %msg.sender, room = %msg.room, "Bot reactivated");
            send_reply(replier, &msg.room, REACTIVATED_REPLY);
            return Dispatch::Reactivated;
        }

        debug!(sender = %msg.sender, room = %msg.room, "Bot inactive, dropping message");
        Dispatch::Dropped
    }

    fn relay<R>(&mut self, msg: &IncomingMessage, data: &ResponseData, replier: &mut R) -> Dispatch
    where
        R: Replier + ?Sized,
    {
        let replied = match data.reply_text() {
            Some(text) => send_reply(replier, &msg.room, &text),
            None => false,
        };

        let deactivated = data.is_admin()
            && msg.sender == self.config.admin_sender
            && msg.message == self.config.deactivate_command;
        if deactivated {
            self.state.set_active(false);
            info!(sender = %msg.sender, room = %msg.room, "Bot deactivated");
        }

        Dispatch::Relayed { replied, deactivated }
    }
}

fn send_reply<R>(replier: &mut R, room: &str, text: &str) -> bool
where
    R: Replier + ?Sized,
{
    match replier.reply(text) {
        Ok(()) => true,
        Err(e) => {
            warn!(room = %room, error = %e, "Failed to deliver reply");
            false
        }
    }
}

//! khhbot library.
//!
//! This library provides the message handling for the 크하학 chat bot,
//! including the per-sender rate limit, the admin on/off toggle, relaying
//! messages to the remote API, and offline fallback replies.

pub mod error;
pub mod config;
pub mod utils;
pub mod types;
pub mod state;
pub mod api;
pub mod offline;
pub mod dispatcher;

pub use error::{KhhBotError, Result};
pub use config::Config;
pub use dispatcher::{Dispatch, Dispatcher};

//! Mutable bot state: the active flag and the per-sender rate limiter.
//!
//! A single [`BotState`] lives for the whole process and is owned by the
//! dispatcher. Nothing here is persisted.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Active flag plus the last accepted message time of every sender.
#[derive(Debug, Clone)]
pub struct BotState {
    is_active: bool,
    last_request_time: HashMap<String, Instant>,
}

impl Default for BotState {
    fn default() -> Self {
        Self::new()
    }
}

impl BotState {
    /// Fresh state: active, with no rate-limit history.
    pub fn new() -> Self {
        Self {
            is_active: true,
            last_request_time: HashMap::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    /// Check the rate limit for `sender` at the current time.
    ///
    /// See [`BotState::check_rate_limit_at`].
    pub fn check_rate_limit(&mut self, sender: &str, window: Duration) -> bool {
        self.check_rate_limit_at(sender, window, Instant::now())
    }

    /// Accept or reject a message from `sender` arriving at `now`.
    ///
    /// Returns `true` and records `now` when the previous accepted message is at
    /// least `window` old (or there is none). Rejected messages leave the stored
    /// timestamp untouched.
    pub fn check_rate_limit_at(&mut self, sender: &str, window: Duration, now: Instant) -> bool {
        if let Some(last) = self.last_request_time.get(sender) {
            if now.saturating_duration_since(*last) < window {
                return false;
            }
        }

        self.last_request_time.insert(sender.to_string(), now);
        true
    }

    /// Last accepted message time for `sender`, if any.
    pub fn last_request_time(&self, sender: &str) -> Option<Instant> {
        self.last_request_time.get(sender).copied()
    }

    /// Number of senders with a recorded timestamp.
    pub fn tracked_senders(&self) -> usize {
        self.last_request_time.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(1000);

    #[test]
    fn test_new_state_is_active_and_empty() {
        let state = BotState::new();
        assert!(state.is_active());
        assert_eq!(state.tracked_senders(), 0);
    }

    #[test]
    fn test_first_message_is_accepted() {
        let mut state = BotState::new();
        let now = Instant::now();

        assert!(state.check_rate_limit_at("하리", WINDOW, now));
        assert_eq!(state.last_request_time("하리"), Some(now));
    }

    #[test]
    fn test_second_message_within_window_is_rejected_without_update() {
        let mut state = BotState::new();
        let start = Instant::now();

        assert!(state.check_rate_limit_at("하리", WINDOW, start));
        assert!(!state.check_rate_limit_at("하리", WINDOW, start + Duration::from_millis(999)));
        assert_eq!(state.last_request_time("하리"), Some(start));

        // The window is measured from the last accepted message, not the rejected one
        assert!(state.check_rate_limit_at("하리", WINDOW, start + Duration::from_millis(1000)));
        assert_eq!(state.last_request_time("하리"), Some(start + Duration::from_millis(1000)));
    }

    #[test]
    fn test_senders_are_limited_independently() {
        let mut state = BotState::new();
        let now = Instant::now();

        assert!(state.check_rate_limit_at("하리", WINDOW, now));
        assert!(state.check_rate_limit_at("요시", WINDOW, now));
        assert!(!state.check_rate_limit_at("하리", WINDOW, now));
        assert_eq!(state.tracked_senders(), 2);
    }

    #[test]
    fn test_one_timestamp_per_sender() {
        let mut state = BotState::new();
        let start = Instant::now();

        for i in 0..5 {
            state.check_rate_limit_at("줄리엔", WINDOW, start + WINDOW * i);
        }
        assert_eq!(state.tracked_senders(), 1);
        assert_eq!(state.last_request_time("줄리엔"), Some(start + WINDOW * 4));
    }

    #[test]
    fn test_zero_window_never_limits() {
        let mut state = BotState::new();
        let now = Instant::now();

        assert!(state.check_rate_limit_at("봇", Duration::ZERO, now));
        assert!(state.check_rate_limit_at("봇", Duration::ZERO, now));
    }

    #[test]
    fn test_toggle_active() {
        let mut state = BotState::new();
        state.set_active(false);
        assert!(!state.is_active());
        state.set_active(true);
        assert!(state.is_active());
    }
}

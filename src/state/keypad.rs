//! Drawer keypad unlock state machine
//!
//! Six masked slots, a cracking phase whose length follows the per-slot
//! scramble schedule, then either access or a crash that clears the code.
//! Time is passed in explicitly; [`Keypad::run_attempt`] drives it with
//! tokio timers.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use crate::config::settings::KeypadConfig;
use crate::utils::errors::{HackPortalError, Result};

pub const CODE_LENGTH: usize = 6;
pub const MASK: char = '*';

const SCRAMBLE_BASE_MS: u64 = 1000;
const SCRAMBLE_STEP_MS: u64 = 200;
const CRASH_DURATION_MS: u64 = 2000;

pub const STATUS_ENTERING: &str = "Enter 6-digit code...";
pub const STATUS_CRACKING: &str = "Cracking in progress...";
pub const STATUS_GRANTED: &str = "PERMISSION GRANTED!";
pub const STATUS_CRASHED: &str = "ACCESS DENIED - SYSTEM CRASHED";

/// Scramble time of one slot
pub fn scramble_duration(index: usize) -> Duration {
    Duration::from_millis(SCRAMBLE_BASE_MS + index as u64 * SCRAMBLE_STEP_MS)
}

/// Time until every slot has finished scrambling
pub fn cracking_duration() -> Duration {
    (0..CODE_LENGTH).map(scramble_duration).max().unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadState {
    Entering,
    Cracking { resolve_at: Instant },
    Granted,
    Crashed { until: Instant },
}

/// What a call to [`Keypad::tick`] changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadEvent {
    Granted,
    Crashed,
    Reset,
}

pub struct Keypad {
    code: String,
    slots: [Option<char>; CODE_LENGTH],
    filled: usize,
    state: KeypadState,
    on_granted: Option<Box<dyn FnMut() + Send>>,
}

impl std::fmt::Debug for Keypad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypad")
            .field("filled", &self.filled)
            .field("state", &self.state)
            .finish()
    }
}

impl Keypad {
    /// Build a keypad unlocking with `code`, which must be six digits
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if code.chars().count() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(HackPortalError::Config(format!(
                "Unlock code must be exactly {} digits",
                CODE_LENGTH
            )));
        }

        Ok(Self {
            code,
            slots: [None; CODE_LENGTH],
            filled: 0,
            state: KeypadState::Entering,
            on_granted: None,
        })
    }

    pub fn from_config(config: &KeypadConfig) -> Result<Self> {
        Self::new(config.unlock_code.clone())
    }

    /// Register the callback fired once access is granted
    pub fn on_granted<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_granted = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> KeypadState {
        self.state
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn status(&self) -> &'static str {
        match self.state {
            KeypadState::Entering => STATUS_ENTERING,
            KeypadState::Cracking { .. } => STATUS_CRACKING,
            KeypadState::Granted => STATUS_GRANTED,
            KeypadState::Crashed { .. } => STATUS_CRASHED,
        }
    }

    /// Slots as shown on screen
    pub fn display(&self) -> String {
        self.slots.iter().map(|slot| slot.unwrap_or(MASK)).collect()
    }

    /// Fill the next slot; ignored unless entering with room left
    pub fn press(&mut self, digit: char) -> bool {
        if self.state != KeypadState::Entering || self.filled >= CODE_LENGTH || !digit.is_ascii_digit() {
            return false;
        }
        self.slots[self.filled] = Some(digit);
        self.filled += 1;
        true
    }

    /// Clear the last filled slot
    pub fn backspace(&mut self) -> bool {
        if self.state != KeypadState::Entering || self.filled == 0 {
            return false;
        }
        self.filled -= 1;
        self.slots[self.filled] = None;
        true
    }

    /// Start cracking; only acts with every slot filled
    pub fn enter(&mut self, now: Instant) -> bool {
        if self.state != KeypadState::Entering || self.filled != CODE_LENGTH {
            return false;
        }
        self.state = KeypadState::Cracking { resolve_at: now + cracking_duration() };
        debug!("Keypad cracking started");
        true
    }

    /// Advance timers to `now`
    pub fn tick(&mut self, now: Instant) -> Option<KeypadEvent> {
        match self.state {
            KeypadState::Cracking { resolve_at } if now >= resolve_at => {
                if self.entered_code() == self.code {
                    self.state = KeypadState::Granted;
                    info!("Keypad access granted");
                    if let Some(callback) = self.on_granted.as_mut() {
                        callback();
                    }
                    Some(KeypadEvent::Granted)
                } else {
                    self.state = KeypadState::Crashed {
                        until: now + Duration::from_millis(CRASH_DURATION_MS),
                    };
                    warn!("Keypad access denied");
                    Some(KeypadEvent::Crashed)
                }
            }
            KeypadState::Crashed { until } if now >= until => {
                self.clear();
                Some(KeypadEvent::Reset)
            }
            _ => None,
        }
    }

    /// Clear the code; ignored while cracking or crashing
    pub fn reset(&mut self) -> bool {
        if matches!(self.state, KeypadState::Cracking { .. } | KeypadState::Crashed { .. }) {
            return false;
        }
        self.clear();
        true
    }

    /// Enter the filled code and wait out cracking (and a crash, if any)
    /// on tokio time; returns the settled state
    pub async fn run_attempt(&mut self) -> KeypadState {
        if !self.enter(Instant::now()) {
            return self.state;
        }
        loop {
            let wake_at = match self.state {
                KeypadState::Cracking { resolve_at } => resolve_at,
                KeypadState::Crashed { until } => until,
                _ => return self.state,
            };
            tokio::time::sleep_until(wake_at).await;
            self.tick(Instant::now());
        }
    }

    fn entered_code(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    fn clear(&mut self) {
        self.slots = [None; CODE_LENGTH];
        self.filled = 0;
        self.state = KeypadState::Entering;
    }
}

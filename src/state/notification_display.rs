//! Notification display state machine
//!
//! Entries mount after a short delay, stay visible for their duration
//! (forever for INFINITE), fade out over the exit delay and are then
//! removed. All transitions are computed from explicit instants.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use crate::config::settings::NotificationConfig;
use crate::models::notification::{ActionType, Notification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTimings {
    pub mount_delay: Duration,
    pub exit_delay: Duration,
}

impl Default for DisplayTimings {
    fn default() -> Self {
        Self {
            mount_delay: Duration::from_millis(100),
            exit_delay: Duration::from_millis(300),
        }
    }
}

impl From<&NotificationConfig> for DisplayTimings {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            mount_delay: Duration::from_millis(config.mount_delay_ms),
            exit_delay: Duration::from_millis(config.exit_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    Pending { visible_at: Instant },
    Visible { dismiss_at: Option<Instant> },
    Exiting { remove_at: Instant },
}

/// Side effect requested by clicking a notification's action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEffect {
    Navigate(String),
    OpenTab(String),
    OpenModal(Option<serde_json::Value>),
    ApiCall {
        method: String,
        url: String,
        payload: Option<serde_json::Value>,
    },
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Shown(String),
    Exiting(String),
    Removed(String),
}

#[derive(Debug, Clone)]
struct DisplayEntry {
    notification: Notification,
    phase: DisplayPhase,
}

/// Resolve the side effect of an action
pub fn resolve_action(notification: &Notification) -> ActionEffect {
    let action = &notification.action;
    let url = action.url.clone().filter(|u| !u.trim().is_empty());
    match (action.action_type, url) {
        (ActionType::Redirect, Some(url)) => ActionEffect::Navigate(url),
        (ActionType::ExternalLink, Some(url)) => ActionEffect::OpenTab(url),
        (ActionType::Modal, _) => ActionEffect::OpenModal(action.payload.clone()),
        (ActionType::ApiCall, Some(url)) => ActionEffect::ApiCall {
            method: action
                .method
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "POST".to_string())
                .to_uppercase(),
            url,
            payload: action.payload.clone(),
        },
        _ => ActionEffect::Nothing,
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    timings: DisplayTimings,
    entries: Vec<DisplayEntry>,
}

impl NotificationCenter {
    pub fn new(timings: DisplayTimings) -> Self {
        Self {
            timings,
            entries: Vec::new(),
        }
    }

    /// Queue a notification; it becomes visible after the mount delay.
    /// Pushing an id already on screen is ignored.
    pub fn push(&mut self, notification: Notification, now: Instant) -> bool {
        if self.entries.iter().any(|e| e.notification.id == notification.id) {
            return false;
        }
        self.entries.push(DisplayEntry {
            notification,
            phase: DisplayPhase::Pending { visible_at: now + self.timings.mount_delay },
        });
        true
    }

    pub fn phase(&self, id: &str) -> Option<DisplayPhase> {
        self.entries.iter().find(|e| e.notification.id == id).map(|e| e.phase)
    }

    /// Notifications currently shown and not fading out
    pub fn visible(&self) -> Vec<&Notification> {
        self.entries
            .iter()
            .filter(|e| matches!(e.phase, DisplayPhase::Visible { .. }))
            .map(|e| &e.notification)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// User dismiss: start exiting now
    pub fn dismiss(&mut self, id: &str, now: Instant) -> bool {
        let exit_delay = self.timings.exit_delay;
        match self.entries.iter_mut().find(|e| e.notification.id == id) {
            Some(entry) if !matches!(entry.phase, DisplayPhase::Exiting { .. }) => {
                entry.phase = DisplayPhase::Exiting { remove_at: now + exit_delay };
                true
            }
            _ => false,
        }
    }

    /// Drop an entry from the list at once
    pub fn close(&mut self, id: &str) -> Option<Notification> {
        let index = self.entries.iter().position(|e| e.notification.id == id)?;
        Some(self.entries.remove(index).notification)
    }

    /// Click the action of a visible entry: resolve its effect and dismiss it
    pub fn activate(&mut self, id: &str, now: Instant) -> Option<ActionEffect> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.notification.id == id && matches!(e.phase, DisplayPhase::Visible { .. }))?;
        let effect = resolve_action(&entry.notification);
        self.dismiss(id, now);
        Some(effect)
    }

    /// Remove everything; pending timers go with the entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Earliest instant at which some entry changes phase
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries
            .iter()
            .filter_map(|e| match e.phase {
                DisplayPhase::Pending { visible_at } => Some(visible_at),
                DisplayPhase::Visible { dismiss_at } => dismiss_at,
                DisplayPhase::Exiting { remove_at } => Some(remove_at),
            })
            .min()
    }

    /// Apply every transition due by `now`, in deadline order per entry
    pub fn tick(&mut self, now: Instant) -> Vec<DisplayEvent> {
        let exit_delay = self.timings.exit_delay;
        let mut events = Vec::new();

        for entry in self.entries.iter_mut() {
            loop {
                let id = &entry.notification.id;
                match entry.phase {
                    DisplayPhase::Pending { visible_at } if now >= visible_at => {
                        let dismiss_at = entry
                            .notification
                            .duration
                            .auto_dismiss_ms()
                            .map(|ms| visible_at + Duration::from_millis(ms));
                        entry.phase = DisplayPhase::Visible { dismiss_at };
                        events.push(DisplayEvent::Shown(id.clone()));
                    }
                    DisplayPhase::Visible { dismiss_at: Some(at) } if now >= at => {
                        entry.phase = DisplayPhase::Exiting { remove_at: at + exit_delay };
                        events.push(DisplayEvent::Exiting(id.clone()));
                    }
                    DisplayPhase::Exiting { remove_at } if now >= remove_at => {
                        events.push(DisplayEvent::Removed(id.clone()));
                        break;
                    }
                    _ => break,
                }
            }
        }

        self.entries.retain(|e| match e.phase {
            DisplayPhase::Exiting { remove_at } => now < remove_at,
            _ => true,
        });

        if !events.is_empty() {
            debug!(count = events.len(), remaining = self.entries.len(), "Notification display advanced");
        }
        events
    }

    /// Sleep through every pending deadline on tokio time until nothing is
    /// scheduled; INFINITE entries stay visible
    pub async fn run_until_idle(&mut self) -> Vec<DisplayEvent> {
        let mut events = Vec::new();
        while let Some(deadline) = self.next_deadline() {
            tokio::time::sleep_until(deadline).await;
            events.extend(self.tick(Instant::now()));
        }
        events
    }
}

//! State machine tests on paused tokio time
//!
//! Notification display and the drawer keypad are driven through their
//! async runners; the clock only moves when every task is idle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hackportal::config::Settings;
use hackportal::models::notification::Notification;
use hackportal::state::keypad::{cracking_duration, STATUS_ENTERING, STATUS_GRANTED};
use hackportal::state::{
    ActionEffect, DisplayEvent, DisplayPhase, DisplayTimings, Keypad, KeypadState, NotificationCenter,
};
use serde_json::json;
use tokio::time::Instant;

fn notification(id: &str, duration: serde_json::Value, action: serde_json::Value) -> Notification {
    let now = chrono::Utc::now();
    serde_json::from_value(json!({
        "id": id,
        "title": "Heads up",
        "message": "Judging starts at 5pm",
        "description": null,
        "status": "ACTIVE",
        "type": "HACKATHON",
        "position": "SIDE_BOTTOM_RIGHT",
        "priority": "MEDIUM",
        "duration": duration,
        "action": action,
        "isBroadcast": true,
        "sender": null,
        "recipients": [],
        "expiresAt": null,
        "scheduledFor": null,
        "metadata": null,
        "deleted": false,
        "deletedAt": null,
        "createdAt": now,
        "updatedAt": now,
    }))
    .expect("notification fixture")
}

fn no_action() -> serde_json::Value {
    json!({ "type": "NONE" })
}

#[tokio::test(start_paused = true)]
async fn test_fixed_notification_runs_its_course() {
    let settings = Settings::default();
    let mut center = NotificationCenter::new(DisplayTimings::from(&settings.notifications));
    let start = Instant::now();

    assert!(center.push(notification("n1", json!({ "type": "FIXED", "timer": 5000 }), no_action()), start));
    let events = center.run_until_idle().await;

    assert_eq!(
        events,
        vec![
            DisplayEvent::Shown("n1".into()),
            DisplayEvent::Exiting("n1".into()),
            DisplayEvent::Removed("n1".into()),
        ]
    );
    assert!(center.is_empty());
    // mount 100ms + timer 5000ms + exit 300ms
    assert_eq!(start.elapsed(), Duration::from_millis(5400));
}

#[tokio::test(start_paused = true)]
async fn test_infinite_notification_stays_until_dismissed() {
    let mut center = NotificationCenter::new(DisplayTimings::default());
    let start = Instant::now();

    center.push(notification("sticky", json!({ "type": "INFINITE" }), no_action()), start);
    center.push(notification("short", json!({ "type": "FIXED", "timer": 1000 }), no_action()), start);

    let events = center.run_until_idle().await;
    assert!(events.contains(&DisplayEvent::Removed("short".into())));
    assert_eq!(center.len(), 1);
    assert_matches::assert_matches!(center.phase("sticky"), Some(DisplayPhase::Visible { dismiss_at: None }));

    tokio::time::advance(Duration::from_secs(3600)).await;
    assert!(center.tick(Instant::now()).is_empty());
    assert_eq!(center.visible().len(), 1);

    assert!(center.dismiss("sticky", Instant::now()));
    assert!(center.visible().is_empty());
    let events = center.run_until_idle().await;
    assert_eq!(events, vec![DisplayEvent::Removed("sticky".into())]);
    assert!(center.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_close_and_activate() {
    let mut center = NotificationCenter::new(DisplayTimings::default());
    let now = Instant::now();

    center.push(
        notification(
            "link",
            json!({ "type": "INFINITE" }),
            json!({ "type": "EXTERNAL_LINK", "url": "https://devpost.example/rules" }),
        ),
        now,
    );
    center.push(notification("other", json!({ "type": "INFINITE" }), no_action()), now);

    // not visible yet
    assert_eq!(center.activate("link", now), None);

    tokio::time::advance(Duration::from_millis(100)).await;
    center.tick(Instant::now());

    assert_eq!(
        center.activate("link", Instant::now()),
        Some(ActionEffect::OpenTab("https://devpost.example/rules".into()))
    );
    assert_matches::assert_matches!(center.phase("link"), Some(DisplayPhase::Exiting { .. }));

    let closed = center.close("other").expect("closed entry");
    assert_eq!(closed.id, "other");
    assert!(center.close("other").is_none());

    center.run_until_idle().await;
    assert!(center.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_keypad_grants_with_correct_code() {
    let settings = Settings::default();
    let granted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&granted);
    let mut keypad = Keypad::from_config(&settings.keypad)
        .expect("keypad")
        .on_granted(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    for digit in settings.keypad.unlock_code.chars() {
        assert!(keypad.press(digit));
    }
    assert_eq!(keypad.display(), settings.keypad.unlock_code);

    let start = Instant::now();
    let state = keypad.run_attempt().await;

    assert_eq!(state, KeypadState::Granted);
    assert_eq!(keypad.status(), STATUS_GRANTED);
    assert_eq!(granted.load(Ordering::SeqCst), 1);
    assert_eq!(start.elapsed(), cracking_duration());

    // further input is ignored once granted
    assert!(!keypad.press('1'));
}

#[tokio::test(start_paused = true)]
async fn test_keypad_crashes_then_resets_on_wrong_code() {
    let mut keypad = Keypad::new("234567").expect("keypad");
    for digit in "111111".chars() {
        keypad.press(digit);
    }

    let start = Instant::now();
    let state = keypad.run_attempt().await;

    assert_eq!(state, KeypadState::Entering);
    assert_eq!(keypad.status(), STATUS_ENTERING);
    assert_eq!(keypad.filled(), 0);
    assert_eq!(keypad.display(), "******");
    assert_eq!(start.elapsed(), cracking_duration() + Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_keypad_attempt_needs_full_code() {
    let mut keypad = Keypad::new("234567").expect("keypad");
    keypad.press('2');
    keypad.press('3');

    let start = Instant::now();
    assert_eq!(keypad.run_attempt().await, KeypadState::Entering);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(keypad.filled(), 2);
}

#[test]
fn test_keypad_rejects_malformed_code() {
    assert!(Keypad::new("12345").is_err());
    assert!(Keypad::new("12a456").is_err());
    assert!(Keypad::new("1234567").is_err());
}

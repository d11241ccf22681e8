//! Unit tests for `SessionManager`.
//!
//! These tests exercise the session registry directly, without HTTP. They
//! verify create/get/remove semantics, isolation between sessions, idle
//! expiry, and shutdown behaviour.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use trainreg_api::sessions::SessionManager;
use trainreg_core::cache::CacheWindows;

const IDLE: Duration = Duration::from_secs(60);

fn manager() -> SessionManager {
    SessionManager::new(CacheWindows::default(), IDLE)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

// ---------------------------------------------------------------------------
// Test: create() registers a retrievable session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_registers_session() {
    let manager = manager();
    assert_eq!(manager.session_count().await, 0);

    let (id, session) = manager.create(today()).await;

    assert_eq!(manager.session_count().await, 1);
    let found = manager.get(id).await.expect("Session should be registered");
    assert!(Arc::ptr_eq(&found, &session));
}

// ---------------------------------------------------------------------------
// Test: a new session starts idle with today's date selected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_session_starts_idle_with_today() {
    let manager = manager();
    let (_, session) = manager.create(today()).await;

    let session = session.lock().await;
    assert!(session.workflow().is_idle());
    assert_eq!(session.selection().training_date, Some(today()));
    assert_eq!(session.cursor().page(), 1);
}

// ---------------------------------------------------------------------------
// Test: sessions get distinct ids and independent state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sessions_are_independent() {
    let manager = manager();
    let (first_id, first) = manager.create(today()).await;
    let (second_id, second) = manager.create(today()).await;

    assert_ne!(first_id, second_id);
    assert!(!Arc::ptr_eq(&first, &second));
}

// ---------------------------------------------------------------------------
// Test: remove() ends a session exactly once
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_ends_session_once() {
    let manager = manager();
    let (id, _) = manager.create(today()).await;

    assert!(manager.remove(id).await);
    assert!(!manager.remove(id).await);
    assert!(manager.get(id).await.is_none());
}

// ---------------------------------------------------------------------------
// Test: clear() discards every session and reports how many
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clear_discards_all_sessions() {
    let manager = manager();
    manager.create(today()).await;
    manager.create(today()).await;

    assert_eq!(manager.clear().await, 2);
    assert_eq!(manager.session_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: a session left idle past the timeout is discarded on next lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn idle_session_expires() {
    let manager = manager();
    let start = Instant::now();
    let (id, _) = manager.create_at(today(), start).await;

    let later = start + IDLE + Duration::from_secs(1);
    assert!(manager.get_at(id, later).await.is_none());
    assert_eq!(manager.session_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: each lookup restarts the idle clock
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lookup_keeps_session_alive() {
    let manager = manager();
    let start = Instant::now();
    let (id, _) = manager.create_at(today(), start).await;

    let halfway = start + IDLE / 2;
    assert!(manager.get_at(id, halfway).await.is_some());

    // Past the timeout measured from creation, but not from the last lookup.
    let later = start + IDLE + Duration::from_secs(1);
    assert!(manager.get_at(id, later).await.is_some());
}

// ---------------------------------------------------------------------------
// Test: abandoned sessions are reclaimed when another session starts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_reclaims_abandoned_sessions() {
    let manager = manager();
    let start = Instant::now();
    for _ in 0..100 {
        manager.create_at(today(), start).await;
    }
    assert_eq!(manager.session_count().await, 100);

    let (id, _) = manager.create_at(today(), start + IDLE).await;

    assert_eq!(manager.session_count().await, 1);
    assert!(manager.get_at(id, start + IDLE).await.is_some());
}

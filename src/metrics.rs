//! Process-wide counters for the pet service.
//! Exposed as JSON on `/api/metrics`; reset only by restarting the process.
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static POLLS: AtomicU64 = AtomicU64::new(0);
static ACTIONS: AtomicU64 = AtomicU64::new(0);
static FALLBACK_ACTIONS: AtomicU64 = AtomicU64::new(0);
static REJECTED_ACTIONS: AtomicU64 = AtomicU64::new(0);
static DECAY_APPLIED: AtomicU64 = AtomicU64::new(0);
static DECAY_SKIPPED: AtomicU64 = AtomicU64::new(0);
static POOP_EVENTS: AtomicU64 = AtomicU64::new(0);
static SICKNESS_ONSETS: AtomicU64 = AtomicU64::new(0);
static RESETS: AtomicU64 = AtomicU64::new(0);

pub fn inc_polls() {
    POLLS.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_actions() {
    ACTIONS.fetch_add(1, Ordering::Relaxed);
}
/// An action whose subtype was missing or unrecognized and got the lenient default.
pub fn inc_fallback_actions() {
    FALLBACK_ACTIONS.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_rejected_actions() {
    REJECTED_ACTIONS.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_decay_applied() {
    DECAY_APPLIED.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_decay_skipped() {
    DECAY_SKIPPED.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_poop_events() {
    POOP_EVENTS.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_sickness_onsets() {
    SICKNESS_ONSETS.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_resets() {
    RESETS.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub polls: u64,
    pub actions: u64,
    pub fallback_actions: u64,
    pub rejected_actions: u64,
    pub decay_applied: u64,
    pub decay_skipped: u64,
    pub poop_events: u64,
    pub sickness_onsets: u64,
    pub resets: u64,
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        polls: POLLS.load(Ordering::Relaxed),
        actions: ACTIONS.load(Ordering::Relaxed),
        fallback_actions: FALLBACK_ACTIONS.load(Ordering::Relaxed),
        rejected_actions: REJECTED_ACTIONS.load(Ordering::Relaxed),
        decay_applied: DECAY_APPLIED.load(Ordering::Relaxed),
        decay_skipped: DECAY_SKIPPED.load(Ordering::Relaxed),
        poop_events: POOP_EVENTS.load(Ordering::Relaxed),
        sickness_onsets: SICKNESS_ONSETS.load(Ordering::Relaxed),
        resets: RESETS.load(Ordering::Relaxed),
    }
}

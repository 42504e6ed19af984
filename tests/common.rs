//! Test utilities & fixtures.
//! Each test gets its own temp data directory; nothing touches tracked files.

use chrono::{DateTime, TimeZone, Utc};
use petdash::pet::{Pet, SequenceRandom};
use petdash::service::{PetService, ServiceSettings};
use petdash::storage::JsonFileStore;

/// Fixed reference instant so timestamps in assertions are stable.
#[allow(dead_code)]
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
}

/// A default pet last updated at [`t0`].
#[allow(dead_code)]
pub fn fresh_pet() -> Pet {
    Pet::new(1, "Buddy", t0())
}

/// Draws that never fire the poop or sickness roll.
#[allow(dead_code)]
pub fn quiet_rng() -> SequenceRandom {
    SequenceRandom::constant(0.999_999)
}

/// A file-backed service rooted in a fresh temp dir; keep the `TempDir` alive.
#[allow(dead_code)]
pub fn file_service(
    rng: SequenceRandom,
    settings: ServiceSettings,
) -> (tempfile::TempDir, PetService<JsonFileStore>) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::open(tmp.path()).expect("open store");
    (tmp, PetService::new(store, rng, settings))
}

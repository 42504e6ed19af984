//! # Storage Module - Pet Persistence
//!
//! The service talks to storage only through [`PetRepository`], so the
//! simulation can run against the on-disk [`JsonFileStore`] in production and
//! against [`MemoryStore`] in tests.
//!
//! ## Layout
//!
//! ```text
//! data/
//! └── pet/
//!     ├── pet.json   ← { "next_id": 3, "pet": { ... } }
//!     └── pet.lock   ← fs2 lock target (shared for reads, exclusive for writes)
//! ```
//!
//! Writes go to `pet.json.tmp` first and are renamed over `pet.json`, so a
//! crash mid-write leaves the previous record intact. Pet ids come from
//! `next_id` and are never reused, even across resets.

use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::pet::entity::Pet;
use crate::pet::errors::PetError;

pub mod memory;

pub use memory::MemoryStore;

/// Load/save contract for the single live pet.
pub trait PetRepository: Send {
    /// Return the stored pet, creating and persisting a default one named
    /// `default_name` if none exists.
    fn load_or_create(&mut self, default_name: &str, now: DateTime<Utc>) -> Result<Pet, PetError>;

    /// Persist `pet`. A pet that has been replaced by a reset is not written back.
    fn save(&mut self, pet: &Pet) -> Result<(), PetError>;

    /// Delete the current pet and persist a fresh one named `name`.
    fn reset_and_create(&mut self, name: &str, now: DateTime<Utc>) -> Result<Pet, PetError>;
}

/// On-disk schema of `pet.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetFile {
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub pet: Option<Pet>,
}

fn first_id() -> u64 {
    1
}

impl Default for PetFile {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            pet: None,
        }
    }
}

impl PetFile {
    /// Replace the current pet with a new one and return a copy of it.
    pub(crate) fn hatch(&mut self, name: &str, now: DateTime<Utc>) -> Pet {
        let pet = Pet::new(self.next_id, name, now);
        self.next_id = self.next_id.saturating_add(1);
        self.pet = Some(pet.clone());
        pet
    }

    /// Store `pet` if it is still the live one; returns false for stale writes.
    pub(crate) fn update(&mut self, pet: &Pet) -> bool {
        match self.pet {
            Some(ref current) if current.id == pet.id => {
                self.pet = Some(pet.clone());
                true
            }
            _ => false,
        }
    }
}

/// JSON file repository under `<data_dir>/pet/`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (creating the directory if needed) the store rooted at `data_dir`.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, PetError> {
        let dir = data_dir.as_ref().join("pet");
        fs::create_dir_all(&dir)?;
        debug!("storage: pet store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn record_path(&self) -> PathBuf {
        self.dir.join("pet.json")
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join("pet.lock")
    }

    fn lock_file(&self) -> Result<File, PetError> {
        Ok(OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?)
    }

    fn read_unlocked(&self) -> Result<PetFile, PetError> {
        let path = self.record_path();
        let raw = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PetFile::default()),
            Err(e) => return Err(e.into()),
        };
        let cleaned = raw.trim_start_matches('\0').trim();
        if cleaned.is_empty() {
            return Ok(PetFile::default());
        }
        Ok(serde_json::from_str(cleaned)?)
    }

    fn write_unlocked(&self, file: &PetFile) -> Result<(), PetError> {
        let path = self.record_path();
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(file)?;
        {
            let mut f = File::create(&tmp)?;
            f.write_all(&data)?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Read the whole record under a shared lock.
    pub fn read(&self) -> Result<PetFile, PetError> {
        let lock = self.lock_file()?;
        lock.lock_shared()?;
        let result = self.read_unlocked();
        let _ = lock.unlock();
        result
    }

    /// Like `read_unlocked`, but an unparseable record yields an empty one
    /// that keeps whatever id counter can still be recovered from the text.
    fn read_salvaging(&self) -> Result<PetFile, PetError> {
        match self.read_unlocked() {
            Err(PetError::Json(e)) => {
                let next_id = self.salvage_next_id().unwrap_or_else(first_id);
                warn!(
                    "storage: discarding unreadable pet record ({}), next id {}",
                    e, next_id
                );
                Ok(PetFile { next_id, pet: None })
            }
            other => other,
        }
    }

    fn salvage_next_id(&self) -> Option<u64> {
        let raw = fs::read_to_string(self.record_path()).ok()?;
        let value: serde_json::Value =
            serde_json::from_str(raw.trim_start_matches('\0').trim()).ok()?;
        let stored = value.get("next_id").and_then(|v| v.as_u64());
        let after_pet = value
            .pointer("/pet/id")
            .and_then(|v| v.as_u64())
            .map(|id| id.saturating_add(1));
        stored.max(after_pet)
    }

    /// Read, modify and write the record under one exclusive lock.
    fn modify<T>(&self, f: impl FnOnce(&mut PetFile) -> (T, bool)) -> Result<T, PetError> {
        self.modify_with(Self::read_unlocked, f)
    }

    fn modify_with<T>(
        &self,
        load: fn(&Self) -> Result<PetFile, PetError>,
        f: impl FnOnce(&mut PetFile) -> (T, bool),
    ) -> Result<T, PetError> {
        let lock = self.lock_file()?;
        lock.lock_exclusive()?;
        let result = load(self).and_then(|mut file| {
            let (value, dirty) = f(&mut file);
            if dirty {
                self.write_unlocked(&file)?;
            }
            Ok(value)
        });
        let _ = lock.unlock();
        result
    }
}

impl PetRepository for JsonFileStore {
    fn load_or_create(&mut self, default_name: &str, now: DateTime<Utc>) -> Result<Pet, PetError> {
        if let Some(mut pet) = self.read()?.pet {
            if pet.clamp_all() {
                warn!(
                    "storage: pet id={} had out-of-range stats on disk, clamped",
                    pet.id
                );
            }
            debug!(
                "storage: loaded id={} name={} hunger={} last_update={}",
                pet.id, pet.name, pet.hunger, pet.last_update
            );
            return Ok(pet);
        }
        self.modify(|file| match file.pet {
            // another process created one between our read and the lock
            Some(ref pet) => (pet.clone(), false),
            None => {
                let pet = file.hatch(default_name, now);
                info!("storage: no pet found, created {} (id {})", pet.name, pet.id);
                (pet, true)
            }
        })
    }

    fn save(&mut self, pet: &Pet) -> Result<(), PetError> {
        debug!(
            "storage: save id={} hunger={} last_update={}",
            pet.id, pet.hunger, pet.last_update
        );
        let written = self.modify(|file| {
            let ok = file.update(pet);
            (ok, ok)
        })?;
        if !written {
            warn!("storage: dropped stale save for pet id={}", pet.id);
        }
        Ok(())
    }

    fn reset_and_create(&mut self, name: &str, now: DateTime<Utc>) -> Result<Pet, PetError> {
        // a reset must succeed even when the old record is unreadable
        let pet = self.modify_with(Self::read_salvaging, |file| (file.hatch(name, now), true))?;
        info!("storage: reset, created {} (id {})", pet.name, pet.id);
        Ok(pet)
    }
}

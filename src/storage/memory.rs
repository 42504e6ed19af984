//! In-memory [`PetRepository`] with the same semantics as the JSON store.

use chrono::{DateTime, Utc};

use super::{PetFile, PetRepository};
use crate::pet::entity::Pet;
use crate::pet::errors::PetError;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    file: PetFile,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `pet`.
    pub fn with_pet(pet: Pet) -> Self {
        let next_id = pet.id.saturating_add(1);
        Self {
            file: PetFile {
                next_id,
                pet: Some(pet),
            },
            saves: 0,
        }
    }

    pub fn current(&self) -> Option<&Pet> {
        self.file.pet.as_ref()
    }

    /// Number of successful writes (creation, save, reset).
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl PetRepository for MemoryStore {
    fn load_or_create(&mut self, default_name: &str, now: DateTime<Utc>) -> Result<Pet, PetError> {
        if let Some(ref pet) = self.file.pet {
            let mut pet = pet.clone();
            pet.clamp_all();
            return Ok(pet);
        }
        self.saves += 1;
        Ok(self.file.hatch(default_name, now))
    }

    fn save(&mut self, pet: &Pet) -> Result<(), PetError> {
        if self.file.update(pet) {
            self.saves += 1;
        }
        Ok(())
    }

    fn reset_and_create(&mut self, name: &str, now: DateTime<Utc>) -> Result<Pet, PetError> {
        self.saves += 1;
        Ok(self.file.hatch(name, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mirrors_file_store_contract() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let mut store = MemoryStore::new();
        let mut pet = store.load_or_create("Buddy", now).unwrap();
        assert_eq!(pet.id, 1);
        pet.hunger = 12;
        store.save(&pet).unwrap();
        assert_eq!(store.current().map(|p| p.hunger), Some(12));

        let fresh = store.reset_and_create("Rex", now).unwrap();
        assert_eq!(fresh.id, 2);
        store.save(&pet).unwrap();
        assert_eq!(store.current(), Some(&fresh));
        assert_eq!(store.saves(), 3);
    }

    #[test]
    fn loads_clamp_seeded_pet() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let mut wild = Pet::new(4, "Buddy", now);
        wild.hygiene = -3;
        let mut store = MemoryStore::with_pet(wild);
        assert_eq!(store.load_or_create("Buddy", now).unwrap().hygiene, 0);
    }
}

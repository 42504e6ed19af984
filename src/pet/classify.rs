//! Visual state and attention flag derived from a pet's stats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pet::entity::Pet;

/// Sprite selector, chosen by the first matching rule in [`STATE_RULES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualState {
    Sick,
    Dirty,
    Hungry,
    Sad,
    Happy,
    Normal,
}

impl VisualState {
    pub const ALL: [VisualState; 6] = [
        VisualState::Sick,
        VisualState::Dirty,
        VisualState::Hungry,
        VisualState::Sad,
        VisualState::Happy,
        VisualState::Normal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VisualState::Sick => "sick",
            VisualState::Dirty => "dirty",
            VisualState::Hungry => "hungry",
            VisualState::Sad => "sad",
            VisualState::Happy => "happy",
            VisualState::Normal => "normal",
        }
    }
}

impl fmt::Display for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisualState::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// One `(predicate, label)` entry of the priority chain.
pub struct StateRule {
    pub state: VisualState,
    pub applies: fn(&Pet) -> bool,
}

fn is_sick(p: &Pet) -> bool {
    p.is_sick || p.health < 30
}

fn is_dirty(p: &Pet) -> bool {
    p.hygiene < 20 || p.poop_count >= 3
}

fn is_hungry(p: &Pet) -> bool {
    p.hunger < 20
}

fn is_sad(p: &Pet) -> bool {
    p.happiness < 20
}

fn is_happy(p: &Pet) -> bool {
    p.happiness > 70 && p.health > 70
}

/// Highest priority first; a pet matching none of these is [`VisualState::Normal`].
pub static STATE_RULES: [StateRule; 5] = [
    StateRule { state: VisualState::Sick, applies: is_sick },
    StateRule { state: VisualState::Dirty, applies: is_dirty },
    StateRule { state: VisualState::Hungry, applies: is_hungry },
    StateRule { state: VisualState::Sad, applies: is_sad },
    StateRule { state: VisualState::Happy, applies: is_happy },
];

pub fn classify(pet: &Pet) -> VisualState {
    STATE_RULES
        .iter()
        .find(|rule| (rule.applies)(pet))
        .map(|rule| rule.state)
        .unwrap_or(VisualState::Normal)
}

/// Whether the pet is calling for the player; looser than the visual state.
pub fn needs_attention(pet: &Pet) -> bool {
    pet.hunger < 30
        || pet.happiness < 30
        || pet.hygiene < 30
        || pet.is_sick
        || pet.poop_count >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn pet() -> Pet {
        Pet::new(1, "Buddy", Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap())
    }

    #[test]
    fn happy_when_content_and_healthy() {
        let mut p = pet();
        p.health = 80;
        p.hygiene = 50;
        p.hunger = 50;
        p.happiness = 75;
        assert_eq!(classify(&p), VisualState::Happy);
    }

    #[test]
    fn sick_beats_everything() {
        let mut p = pet();
        p.is_sick = true;
        p.hygiene = 0;
        p.poop_count = 9;
        p.hunger = 0;
        p.happiness = 0;
        assert_eq!(classify(&p), VisualState::Sick);

        let mut low = pet();
        low.health = 29;
        assert_eq!(classify(&low), VisualState::Sick);
    }

    #[test]
    fn priority_order_dirty_hungry_sad() {
        let mut p = pet();
        p.poop_count = 3;
        p.hunger = 5;
        p.happiness = 5;
        assert_eq!(classify(&p), VisualState::Dirty);
        p.poop_count = 0;
        assert_eq!(classify(&p), VisualState::Hungry);
        p.hunger = 50;
        assert_eq!(classify(&p), VisualState::Sad);
        p.happiness = 50;
        assert_eq!(classify(&p), VisualState::Normal);
    }

    #[test]
    fn thresholds_are_strict() {
        let mut p = pet();
        p.happiness = 70;
        assert_eq!(classify(&p), VisualState::Normal);
        p.happiness = 71;
        p.health = 70;
        assert_eq!(classify(&p), VisualState::Normal);
        p.health = 30;
        p.hygiene = 20;
        p.hunger = 20;
        p.happiness = 20;
        assert_eq!(classify(&p), VisualState::Normal);
    }

    #[test]
    fn attention_flag_is_independent_of_state() {
        let mut p = pet();
        assert!(!needs_attention(&p));
        p.poop_count = 2;
        assert!(needs_attention(&p));
        assert_eq!(classify(&p), VisualState::Happy);
        p.poop_count = 0;
        p.hunger = 29;
        assert!(needs_attention(&p));
        assert_eq!(classify(&p), VisualState::Happy);
    }

    #[test]
    fn labels_round_trip_through_strings() {
        for v in VisualState::ALL {
            assert_eq!(v.as_str().parse::<VisualState>(), Ok(v));
        }
        assert_eq!("HAPPY".parse::<VisualState>(), Ok(VisualState::Happy));
        assert!("asleep".parse::<VisualState>().is_err());
    }
}

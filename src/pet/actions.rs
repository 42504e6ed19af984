//! Player actions and their effects.
//!
//! Requests name a category (`feed`, `play`, `clean`, `discipline`, `cure`)
//! and, for some categories, a subtype. Unknown or missing subtypes are not
//! rejected by default: they fall back to the category's lenient effect and
//! the outcome is flagged so callers can log and count it. Strict callers use
//! [`Action::is_fallback`] to refuse them before anything is mutated.

use std::fmt;

use log::{info, warn};

use crate::metrics;
use crate::pet::entity::{bump, clamp_weight, Pet};
use crate::pet::errors::PetError;

pub const FEED_MEAL_HUNGER: i64 = 20;
pub const FEED_MEAL_WEIGHT: f64 = 0.5;
pub const FEED_SNACK_HUNGER: i64 = 10;
pub const FEED_SNACK_WEIGHT: f64 = 0.2;
pub const PLAY_HAPPINESS: i64 = 15;
pub const PLAY_SICK_HAPPINESS: i64 = 5;
pub const PLAY_WEIGHT: f64 = -0.3;
pub const PLAY_HUNGER: i64 = -5;
pub const BATH_HYGIENE: i64 = 40;
pub const BATH_HAPPINESS: i64 = -5;
pub const CLEAN_POOP_HYGIENE: i64 = 10;
pub const SCOLD_DISCIPLINE: i64 = 10;
pub const SCOLD_HAPPINESS: i64 = -5;
pub const PRAISE_DISCIPLINE: i64 = 5;
pub const PRAISE_HAPPINESS: i64 = 3;
pub const MEDICINE_HEALTH: i64 = 30;
/// Health at or above which medicine clears sickness.
pub const CURE_THRESHOLD: i32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedKind {
    Meal,
    Snack,
    /// Missing (`None`) or unrecognized subtype.
    Other(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanKind {
    Bath,
    Poop,
    Other(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisciplineKind {
    Scold,
    Praise,
    Other(Option<String>),
}

/// One discrete player interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Feed(FeedKind),
    Play,
    Clean(CleanKind),
    Discipline(DisciplineKind),
    Cure,
}

fn normalize(subtype: Option<&str>) -> Option<String> {
    subtype
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
}

impl Action {
    /// Build an action from request parameters.
    ///
    /// Only the category can fail; subtypes always resolve, possibly to a fallback.
    pub fn parse(category: &str, subtype: Option<&str>) -> Result<Self, PetError> {
        let sub = normalize(subtype);
        let action = match category.trim().to_ascii_lowercase().as_str() {
            "feed" => Action::Feed(match sub.as_deref() {
                Some("meal") => FeedKind::Meal,
                Some("snack") => FeedKind::Snack,
                _ => FeedKind::Other(sub),
            }),
            "play" => Action::Play,
            "clean" => Action::Clean(match sub.as_deref() {
                Some("bath") => CleanKind::Bath,
                Some("poop") => CleanKind::Poop,
                _ => CleanKind::Other(sub),
            }),
            "discipline" => Action::Discipline(match sub.as_deref() {
                Some("scold") => DisciplineKind::Scold,
                Some("praise") => DisciplineKind::Praise,
                _ => DisciplineKind::Other(sub),
            }),
            "cure" | "medicine" => Action::Cure,
            other => return Err(PetError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }

    pub fn category(&self) -> &'static str {
        match self {
            Action::Feed(_) => "feed",
            Action::Play => "play",
            Action::Clean(_) => "clean",
            Action::Discipline(_) => "discipline",
            Action::Cure => "cure",
        }
    }

    /// True when the subtype was missing or unrecognized.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            Action::Feed(FeedKind::Other(_))
                | Action::Clean(CleanKind::Other(_))
                | Action::Discipline(DisciplineKind::Other(_))
        )
    }

    /// The subtype text that triggered a fallback, if any.
    pub fn fallback_subtype(&self) -> Option<&str> {
        match self {
            Action::Feed(FeedKind::Other(s))
            | Action::Clean(CleanKind::Other(s))
            | Action::Discipline(DisciplineKind::Other(s)) => s.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sub = match self {
            Action::Feed(FeedKind::Meal) => Some("meal"),
            Action::Feed(FeedKind::Snack) => Some("snack"),
            Action::Clean(CleanKind::Bath) => Some("bath"),
            Action::Clean(CleanKind::Poop) => Some("poop"),
            Action::Discipline(DisciplineKind::Scold) => Some("scold"),
            Action::Discipline(DisciplineKind::Praise) => Some("praise"),
            _ => self.fallback_subtype(),
        };
        match sub {
            Some(s) => write!(f, "{}:{}", self.category(), s),
            None => write!(f, "{}", self.category()),
        }
    }
}

/// Result of applying an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub message: String,
    pub fallback: bool,
}

/// Apply `action` to `pet`; deterministic, never touches `is_sick` except via cure.
pub fn apply_action(pet: &mut Pet, action: &Action) -> ActionOutcome {
    let name = pet.name.clone();
    let message = match action {
        Action::Feed(kind) => feed(pet, kind, &name),
        Action::Play => play(pet, &name),
        Action::Clean(kind) => clean(pet, kind, &name),
        Action::Discipline(kind) => discipline(pet, kind, &name),
        Action::Cure => cure(pet, &name),
    };

    let fallback = action.is_fallback();
    metrics::inc_actions();
    if fallback {
        metrics::inc_fallback_actions();
        warn!(
            "action: {} got {} subtype {:?}; applied lenient default",
            action.category(),
            if action.fallback_subtype().is_some() { "unrecognized" } else { "missing" },
            action.fallback_subtype().unwrap_or("")
        );
    }
    info!("action: {} -> {}", action, message);
    ActionOutcome { message, fallback }
}

fn feed(pet: &mut Pet, kind: &FeedKind, name: &str) -> String {
    match kind {
        FeedKind::Meal => {
            pet.hunger = bump(pet.hunger, FEED_MEAL_HUNGER);
            pet.weight = clamp_weight(pet.weight + FEED_MEAL_WEIGHT);
            format!("{} enjoyed a tasty meal!", name)
        }
        FeedKind::Snack => {
            pet.hunger = bump(pet.hunger, FEED_SNACK_HUNGER);
            pet.weight = clamp_weight(pet.weight + FEED_SNACK_WEIGHT);
            format!("{} loved the snack!", name)
        }
        FeedKind::Other(_) => {
            pet.hunger = bump(pet.hunger, FEED_SNACK_HUNGER);
            format!("{} ate something.", name)
        }
    }
}

fn play(pet: &mut Pet, name: &str) -> String {
    if pet.is_sick {
        pet.happiness = bump(pet.happiness, PLAY_SICK_HAPPINESS);
        return format!("{} tried to play but doesn't feel well...", name);
    }
    pet.happiness = bump(pet.happiness, PLAY_HAPPINESS);
    pet.weight = clamp_weight(pet.weight + PLAY_WEIGHT);
    pet.hunger = bump(pet.hunger, PLAY_HUNGER);
    format!("{} had fun playing!", name)
}

fn clean(pet: &mut Pet, kind: &CleanKind, name: &str) -> String {
    match kind {
        CleanKind::Bath => {
            pet.hygiene = bump(pet.hygiene, BATH_HYGIENE);
            pet.happiness = bump(pet.happiness, BATH_HAPPINESS);
            format!("{} is squeaky clean!", name)
        }
        CleanKind::Poop => {
            if pet.poop_count == 0 {
                return "Nothing to clean up!".to_string();
            }
            pet.poop_count -= 1;
            pet.hygiene = bump(pet.hygiene, CLEAN_POOP_HYGIENE);
            format!("You cleaned up after {}.", name)
        }
        CleanKind::Other(_) => "Nothing happened.".to_string(),
    }
}

fn discipline(pet: &mut Pet, kind: &DisciplineKind, name: &str) -> String {
    match kind {
        DisciplineKind::Scold => {
            pet.discipline = bump(pet.discipline, SCOLD_DISCIPLINE);
            pet.happiness = bump(pet.happiness, SCOLD_HAPPINESS);
            format!("You scolded {}.", name)
        }
        DisciplineKind::Praise => {
            pet.discipline = bump(pet.discipline, PRAISE_DISCIPLINE);
            pet.happiness = bump(pet.happiness, PRAISE_HAPPINESS);
            format!("Good boy, {}!", name)
        }
        DisciplineKind::Other(_) => "Nothing happened.".to_string(),
    }
}

fn cure(pet: &mut Pet, name: &str) -> String {
    if !pet.is_sick {
        return format!("{} is already healthy!", name);
    }
    pet.health = bump(pet.health, MEDICINE_HEALTH);
    if pet.health >= CURE_THRESHOLD {
        pet.is_sick = false;
        return format!("{} feels much better now!", name);
    }
    "The medicine helped a little.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn pet() -> Pet {
        Pet::new(1, "Buddy", Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap())
    }

    #[test]
    fn parse_known_and_fallback_subtypes() {
        assert_eq!(
            Action::parse("feed", Some("meal")).unwrap(),
            Action::Feed(FeedKind::Meal)
        );
        assert_eq!(
            Action::parse("FEED", Some(" Snack ")).unwrap(),
            Action::Feed(FeedKind::Snack)
        );
        assert_eq!(
            Action::parse("feed", None).unwrap(),
            Action::Feed(FeedKind::Other(None))
        );
        assert_eq!(
            Action::parse("clean", Some("shower")).unwrap(),
            Action::Clean(CleanKind::Other(Some("shower".into())))
        );
        assert_eq!(Action::parse("play", Some("fetch")).unwrap(), Action::Play);
        assert!(!Action::parse("play", Some("fetch")).unwrap().is_fallback());
        assert!(Action::parse("discipline", Some("")).unwrap().is_fallback());
        assert!(matches!(
            Action::parse("dance", None),
            Err(PetError::UnknownAction(_))
        ));
    }

    #[test]
    fn display_includes_subtype() {
        assert_eq!(Action::Feed(FeedKind::Meal).to_string(), "feed:meal");
        assert_eq!(Action::Cure.to_string(), "cure");
        assert_eq!(
            Action::Clean(CleanKind::Other(Some("mop".into()))).to_string(),
            "clean:mop"
        );
    }

    #[test]
    fn meal_clamps_hunger_and_adds_weight() {
        let mut p = pet();
        p.hunger = 90;
        let out = apply_action(&mut p, &Action::Feed(FeedKind::Meal));
        assert_eq!(p.hunger, 100);
        assert!((p.weight - 5.5).abs() < 1e-9);
        assert_eq!(out.message, "Buddy enjoyed a tasty meal!");
        assert!(!out.fallback);
    }

    #[test]
    fn meal_weight_caps_at_ten() {
        let mut p = pet();
        p.weight = 9.8;
        apply_action(&mut p, &Action::Feed(FeedKind::Meal));
        assert_eq!(p.weight, 10.0);
    }

    #[test]
    fn unknown_feed_acts_like_snack_without_weight() {
        let mut p = pet();
        p.hunger = 50;
        let out = apply_action(&mut p, &Action::Feed(FeedKind::Other(Some("cake".into()))));
        assert_eq!(p.hunger, 60);
        assert_eq!(p.weight, 5.0);
        assert_eq!(out.message, "Buddy ate something.");
        assert!(out.fallback);
    }

    #[test]
    fn play_depends_on_sickness() {
        let mut p = pet();
        apply_action(&mut p, &Action::Play);
        assert_eq!(p.happiness, 95);
        assert_eq!(p.hunger, 75);
        assert!((p.weight - 4.7).abs() < 1e-9);

        let mut sick = pet();
        sick.is_sick = true;
        let out = apply_action(&mut sick, &Action::Play);
        assert_eq!(sick.happiness, 85);
        assert_eq!(sick.hunger, 80);
        assert_eq!(sick.weight, 5.0);
        assert!(out.message.contains("doesn't feel well"));
    }

    #[test]
    fn bath_trades_happiness_for_hygiene() {
        let mut p = pet();
        apply_action(&mut p, &Action::Clean(CleanKind::Bath));
        assert_eq!(p.hygiene, 100);
        assert_eq!(p.happiness, 75);
    }

    #[test]
    fn poop_cleanup_with_and_without_poop() {
        let mut p = pet();
        let before = p.clone();
        let out = apply_action(&mut p, &Action::Clean(CleanKind::Poop));
        assert_eq!(out.message, "Nothing to clean up!");
        assert_eq!(p, before);

        p.poop_count = 2;
        p.hygiene = 95;
        apply_action(&mut p, &Action::Clean(CleanKind::Poop));
        assert_eq!(p.poop_count, 1);
        assert_eq!(p.hygiene, 100);
    }

    #[test]
    fn unknown_clean_and_discipline_are_no_ops() {
        let mut p = pet();
        let before = p.clone();
        let a = apply_action(&mut p, &Action::Clean(CleanKind::Other(None)));
        let b = apply_action(&mut p, &Action::Discipline(DisciplineKind::Other(None)));
        assert_eq!(p, before);
        assert_eq!(a.message, "Nothing happened.");
        assert_eq!(b.message, "Nothing happened.");
        assert!(a.fallback && b.fallback);
    }

    #[test]
    fn scold_and_praise() {
        let mut p = pet();
        apply_action(&mut p, &Action::Discipline(DisciplineKind::Scold));
        assert_eq!((p.discipline, p.happiness), (60, 75));
        apply_action(&mut p, &Action::Discipline(DisciplineKind::Praise));
        assert_eq!((p.discipline, p.happiness), (65, 78));
    }

    #[test]
    fn cure_is_two_stage() {
        let mut healthy = pet();
        let out = apply_action(&mut healthy, &Action::Cure);
        assert_eq!(out.message, "Buddy is already healthy!");
        assert_eq!(healthy.health, 100);

        let mut p = pet();
        p.is_sick = true;
        p.health = 10;
        let first = apply_action(&mut p, &Action::Cure);
        assert_eq!(p.health, 40);
        assert!(p.is_sick);
        assert_eq!(first.message, "The medicine helped a little.");

        let second = apply_action(&mut p, &Action::Cure);
        assert_eq!(p.health, 70);
        assert!(!p.is_sick);
        assert_eq!(second.message, "Buddy feels much better now!");
    }

    #[test]
    fn no_action_makes_a_pet_sick() {
        let all = [
            Action::Feed(FeedKind::Meal),
            Action::Feed(FeedKind::Snack),
            Action::Feed(FeedKind::Other(None)),
            Action::Play,
            Action::Clean(CleanKind::Bath),
            Action::Clean(CleanKind::Poop),
            Action::Clean(CleanKind::Other(None)),
            Action::Discipline(DisciplineKind::Scold),
            Action::Discipline(DisciplineKind::Praise),
            Action::Discipline(DisciplineKind::Other(None)),
            Action::Cure,
        ];
        for action in &all {
            let mut p = pet();
            p.hunger = 0;
            p.happiness = 100;
            p.hygiene = 0;
            p.discipline = 100;
            p.weight = 1.0;
            apply_action(&mut p, action);
            assert!(!p.is_sick, "{} made the pet sick", action);
            assert!(p.within_bounds(), "{} broke bounds: {:?}", action, p);
        }
    }
}

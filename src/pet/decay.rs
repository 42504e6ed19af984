//! Decay engine: advances a pet's stats by the wall-clock time since it was
//! last observed.
//!
//! Rules, applied in this order on every qualifying pass:
//! 1. hunger, happiness and hygiene drop by `trunc(rate * hours)`
//! 2. a sick pet loses `trunc(10 * hours)` health, never below 10
//! 3. poop event with probability `hours / 3` (not capped, so a gap of three
//!    hours or more makes it certain): one more poop and -5 hygiene
//! 4. a healthy pet rolls for sickness against the summed risk of its poor stats
//! 5. a healthy, fed, clean, content pet regains `trunc(2 * hours)` health
//! 6. `last_update` moves to `now`
//!
//! Passes closer than [`MIN_TICK_HOURS`] to the previous one change nothing,
//! including `last_update`, so the skipped time is carried into the next
//! qualifying pass rather than lost.

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::metrics;
use crate::pet::entity::{bump, clamp_stat, Pet, SICK_HEALTH_FLOOR, STAT_MAX};
use crate::pet::rng::RandomSource;

/// Stat loss per elapsed hour.
pub const HUNGER_DECAY_PER_HOUR: f64 = 5.0;
pub const HAPPINESS_DECAY_PER_HOUR: f64 = 3.0;
pub const HYGIENE_DECAY_PER_HOUR: f64 = 4.0;
pub const HEALTH_DECAY_WHEN_SICK: f64 = 10.0;
/// Health regained per hour while conditions are good.
pub const HEALTH_REGEN_PER_HOUR: f64 = 2.0;

/// Passes shorter than this (about 36 seconds) are ignored.
pub const MIN_TICK_HOURS: f64 = 0.01;
/// Expected hours between poop events.
pub const POOP_INTERVAL_HOURS: f64 = 3.0;
pub const POOP_HYGIENE_PENALTY: i64 = 5;
pub const SICKNESS_HAPPINESS_PENALTY: i64 = 10;

/// What a single decay pass did, for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecayReport {
    pub hours: f64,
    pub skipped: bool,
    pub hunger_lost: i32,
    pub happiness_lost: i32,
    pub hygiene_lost: i32,
    pub health_lost: i32,
    pub health_regained: i32,
    pub pooped: bool,
    pub became_sick: bool,
}

/// Elapsed hours between `since` and `now`; negative when the clock went backwards.
pub fn elapsed_hours(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let delta = now - since;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 3_600_000_000.0,
        // microseconds overflow past ~292k years
        None => delta.num_milliseconds() as f64 / 3_600_000.0,
    }
}

fn decay_amount(rate: f64, hours: f64) -> i64 {
    // truncation toward zero; `as` saturates for absurd gaps
    (rate * hours) as i64
}

/// Sum of the fixed sickness penalties for the pet's current poor stats.
pub fn sickness_risk(pet: &Pet) -> f64 {
    let mut risk = 0.0;
    if pet.hunger < 20 {
        risk += 0.10;
    }
    if pet.hygiene < 20 {
        risk += 0.15;
    }
    if pet.poop_count >= 3 {
        risk += 0.10;
    }
    if pet.health < 50 {
        risk += 0.10;
    }
    risk
}

/// Apply time-based decay to `pet` as of `now`.
pub fn apply_decay<R>(pet: &mut Pet, now: DateTime<Utc>, rng: &mut R) -> DecayReport
where
    R: RandomSource + ?Sized,
{
    let hours = elapsed_hours(pet.last_update, now);
    let mut report = DecayReport {
        hours,
        ..DecayReport::default()
    };

    if hours < MIN_TICK_HOURS {
        debug!(
            "decay: skipped ({:.4}h since {}), carrying time forward",
            hours, pet.last_update
        );
        report.skipped = true;
        metrics::inc_decay_skipped();
        return report;
    }

    let old_hunger = pet.hunger;
    let old_happiness = pet.happiness;
    let old_hygiene = pet.hygiene;
    let old_health = pet.health;

    pet.hunger = bump(pet.hunger, -decay_amount(HUNGER_DECAY_PER_HOUR, hours));
    pet.happiness = bump(pet.happiness, -decay_amount(HAPPINESS_DECAY_PER_HOUR, hours));
    pet.hygiene = bump(pet.hygiene, -decay_amount(HYGIENE_DECAY_PER_HOUR, hours));

    if pet.is_sick {
        pet.health = clamp_stat(
            pet.health as i64 - decay_amount(HEALTH_DECAY_WHEN_SICK, hours),
            SICK_HEALTH_FLOOR,
            STAT_MAX,
        );
        report.health_lost = old_health - pet.health;
    }

    report.hunger_lost = old_hunger - pet.hunger;
    report.happiness_lost = old_happiness - pet.happiness;
    report.hygiene_lost = old_hygiene - pet.hygiene;

    if rng.next_unit() < hours / POOP_INTERVAL_HOURS {
        pet.poop_count = pet.poop_count.saturating_add(1);
        pet.hygiene = bump(pet.hygiene, -POOP_HYGIENE_PENALTY);
        report.pooped = true;
        metrics::inc_poop_events();
        info!("decay: {} pooped (now {} to clean)", pet.name, pet.poop_count);
    }

    if !pet.is_sick {
        let risk = sickness_risk(pet);
        if rng.next_unit() < risk {
            pet.is_sick = true;
            pet.happiness = bump(pet.happiness, -SICKNESS_HAPPINESS_PENALTY);
            report.became_sick = true;
            metrics::inc_sickness_onsets();
            info!("decay: {} fell sick (risk {:.2})", pet.name, risk);
        }
    }

    if !pet.is_sick && pet.hunger > 50 && pet.hygiene > 50 && pet.happiness > 30 {
        let before = pet.health;
        pet.health = bump(pet.health, decay_amount(HEALTH_REGEN_PER_HOUR, hours));
        report.health_regained = pet.health - before;
    }

    pet.last_update = now;
    metrics::inc_decay_applied();
    debug!(
        "decay: {:.4}h hunger {} -> {} happiness {} -> {} hygiene {} -> {}",
        hours, old_hunger, pet.hunger, old_happiness, pet.happiness, old_hygiene, pet.hygiene
    );
    report
}

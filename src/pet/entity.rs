//! The pet record and the numeric rules that bound it.
//!
//! Every integer stat lives in `[0, 100]` (health additionally has a floor of
//! [`SICK_HEALTH_FLOOR`] while sickness drains it) and weight lives in
//! `[MIN_WEIGHT, MAX_WEIGHT]`. All mutations in this module tree go through
//! [`clamp_stat`] / [`clamp_weight`] so the ranges hold after every step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest value any bounded stat may take.
pub const STAT_MIN: i32 = 0;
/// Highest value any bounded stat may take.
pub const STAT_MAX: i32 = 100;
/// Sickness alone never pushes health below this.
pub const SICK_HEALTH_FLOOR: i32 = 10;

pub const MIN_WEIGHT: f64 = 1.0;
pub const MAX_WEIGHT: f64 = 10.0;
pub const NORMAL_WEIGHT: f64 = 5.0;

/// Longest name accepted for a fresh pet.
pub const MAX_NAME_CHARS: usize = 24;

/// Live state of the single pet served by this deployment.
///
/// Field names double as the JSON keys the display firmware reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    /// 0-100, 100 = full
    pub hunger: i32,
    pub happiness: i32,
    /// 0-100, 100 = clean
    pub hygiene: i32,
    /// 0-100, 100 = well trained
    pub discipline: i32,
    /// 1.0-10.0, 5.0 = normal
    pub weight: f64,
    pub health: i32,
    pub is_sick: bool,
    pub poop_count: u32,
    #[serde(with = "crate::pet::entity::tolerant_time")]
    pub last_update: DateTime<Utc>,
    #[serde(with = "crate::pet::entity::tolerant_time")]
    pub created_at: DateTime<Utc>,
}

impl Pet {
    /// A freshly hatched pet with the stock starting stats.
    pub fn new(id: u64, name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.to_string(),
            hunger: 80,
            happiness: 80,
            hygiene: 80,
            discipline: 50,
            weight: NORMAL_WEIGHT,
            health: 100,
            is_sick: false,
            poop_count: 0,
            last_update: now,
            created_at: now,
        }
    }

    /// True when every bounded field sits inside its documented range.
    pub fn within_bounds(&self) -> bool {
        let stat = |v: i32| (STAT_MIN..=STAT_MAX).contains(&v);
        stat(self.hunger)
            && stat(self.happiness)
            && stat(self.hygiene)
            && stat(self.discipline)
            && stat(self.health)
            && (MIN_WEIGHT..=MAX_WEIGHT).contains(&self.weight)
    }

    /// Pull every bounded field back into range; true if anything changed.
    pub fn clamp_all(&mut self) -> bool {
        let before = self.clone();
        for stat in [
            &mut self.hunger,
            &mut self.happiness,
            &mut self.hygiene,
            &mut self.discipline,
            &mut self.health,
        ] {
            *stat = clamp_stat(*stat as i64, STAT_MIN, STAT_MAX);
        }
        self.weight = if self.weight.is_finite() {
            clamp_weight(self.weight)
        } else {
            NORMAL_WEIGHT
        };
        *self != before
    }
}

/// Clamp a (possibly wide) intermediate value into `[min, max]`.
pub fn clamp_stat(value: i64, min: i32, max: i32) -> i32 {
    value.clamp(min as i64, max as i64) as i32
}

/// Add a signed delta to a `[0, 100]` stat.
pub fn bump(stat: i32, delta: i64) -> i32 {
    clamp_stat(stat as i64 + delta, STAT_MIN, STAT_MAX)
}

pub fn clamp_weight(value: f64) -> f64 {
    value.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// Normalise a requested pet name; `None` when it is empty or too long.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > MAX_NAME_CHARS || trimmed.chars().any(|c| c.is_control()) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Timestamp (de)serialisation that never fails on load.
///
/// Writes RFC 3339 with sub-second precision. Reads RFC 3339, then the legacy
/// `YYYY-MM-DD HH:MM:SS` form (taken as UTC), and finally falls back to the
/// Unix epoch so a damaged record still loads.
pub mod tolerant_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use log::warn;
    use serde::{Deserialize, Deserializer, Serializer};

    const LEGACY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(parse(&raw))
    }

    pub fn parse(raw: &str) -> DateTime<Utc> {
        if let Ok(t) = DateTime::parse_from_rfc3339(raw.trim()) {
            return t.with_timezone(&Utc);
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw.trim(), LEGACY_FORMAT) {
            return naive.and_utc();
        }
        warn!("unparseable timestamp {:?}; using epoch", raw);
        DateTime::<Utc>::UNIX_EPOCH
    }
}

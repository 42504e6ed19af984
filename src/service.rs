//! Request orchestration: load → decay → act → save → classify → render.
//!
//! [`PetService`] keeps the repository and the random source behind a single
//! async mutex, so overlapping requests are applied one after another instead
//! of racing on the stored record.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::metrics;
use crate::pet::entity::{sanitize_name, Pet};
use crate::pet::sprite::{render_base64, SPRITE_HEIGHT, SPRITE_WIDTH};
use crate::pet::{
    apply_action, apply_decay, classify, needs_attention, Action, PetError, RandomSource,
    SeededRandom, ThreadRandom, VisualState,
};
use crate::storage::PetRepository;

/// JSON body returned by every pet endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameResponse {
    /// Serialized as `dog`, the key the display firmware reads.
    #[serde(rename = "dog")]
    pub pet: Pet,
    pub state: VisualState,
    pub needs_attention: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Base64 RGB565 sprite data
    pub image: String,
    pub img_width: usize,
    pub img_height: usize,
}

impl GameResponse {
    pub fn build(pet: Pet, message: Option<String>) -> Self {
        let state = classify(&pet);
        Self {
            needs_attention: needs_attention(&pet),
            image: render_base64(state),
            img_width: SPRITE_WIDTH,
            img_height: SPRITE_HEIGHT,
            state,
            message,
            pet,
        }
    }
}

/// Behaviour switches taken from the `[pet]` and `[simulation]` config sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub default_name: String,
    pub strict_actions: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            default_name: "Buddy".to_string(),
            strict_actions: false,
        }
    }
}

impl ServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_name: config.pet.default_name.clone(),
            strict_actions: config.simulation.strict_actions,
        }
    }
}

/// Thread RNG unless a seed is configured.
pub fn random_source(seed: Option<u64>) -> Box<dyn RandomSource + Send> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}

struct Inner<R> {
    repo: R,
    rng: Box<dyn RandomSource + Send>,
}

pub struct PetService<R> {
    inner: Mutex<Inner<R>>,
    settings: ServiceSettings,
}

impl<R: PetRepository> PetService<R> {
    pub fn new<G>(repo: R, rng: G, mut settings: ServiceSettings) -> Self
    where
        G: RandomSource + Send + 'static,
    {
        // stored trimmed so polls and resets hatch the same name
        if let Some(name) = sanitize_name(&settings.default_name) {
            settings.default_name = name;
        }
        Self {
            inner: Mutex::new(Inner {
                repo,
                rng: Box::new(rng),
            }),
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Poll: decay the pet up to `now`, persist it and describe it.
    pub async fn status(&self, now: DateTime<Utc>) -> Result<GameResponse, PetError> {
        let mut guard = self.inner.lock().await;
        let Inner { repo, rng } = &mut *guard;
        let mut pet = repo.load_or_create(&self.settings.default_name, now)?;
        apply_decay(&mut pet, now, rng);
        repo.save(&pet)?;
        metrics::inc_polls();
        Ok(GameResponse::build(pet, None))
    }

    /// Decay the pet up to `now`, apply `action`, persist and describe it.
    pub async fn act(&self, action: Action, now: DateTime<Utc>) -> Result<GameResponse, PetError> {
        if self.settings.strict_actions && action.is_fallback() {
            metrics::inc_rejected_actions();
            let subtype = action.fallback_subtype().unwrap_or("(missing)").to_string();
            warn!("action: rejected {} subtype {:?} (strict mode)", action.category(), subtype);
            return Err(PetError::RejectedSubtype {
                category: action.category().to_string(),
                subtype,
            });
        }

        let mut guard = self.inner.lock().await;
        let Inner { repo, rng } = &mut *guard;
        let mut pet = repo.load_or_create(&self.settings.default_name, now)?;
        apply_decay(&mut pet, now, rng);
        let outcome = apply_action(&mut pet, &action);
        repo.save(&pet)?;
        Ok(GameResponse::build(pet, Some(outcome.message)))
    }

    /// Replace the pet with a fresh one; `None` uses the configured default name.
    pub async fn reset(
        &self,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<GameResponse, PetError> {
        let requested = name.unwrap_or(&self.settings.default_name);
        let name = sanitize_name(requested)
            .ok_or_else(|| PetError::InvalidName(requested.to_string()))?;

        let mut guard = self.inner.lock().await;
        let pet = guard.repo.reset_and_create(&name, now)?;
        metrics::inc_resets();
        info!("reset: new pet {} (id {})", pet.name, pet.id);
        let message = format!("Welcome, {}!", pet.name);
        Ok(GameResponse::build(pet, Some(message)))
    }

    /// Run `f` against the repository while holding the service lock.
    pub async fn with_repo<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        let guard = self.inner.lock().await;
        f(&guard.repo)
    }
}

//! # Pet Simulation Core
//!
//! Everything that decides what the pet looks like and how it reacts lives
//! here; none of it does I/O.
//!
//! ## Components
//!
//! - [`entity`] - the pet record, stat ranges and clamp helpers
//! - [`decay`] - time-based stat decay, poop events and the sickness roll
//! - [`actions`] - feed / play / clean / discipline / cure
//! - [`classify`] - visual state and attention flag
//! - [`sprite`] - procedural RGB565 sprite per visual state
//! - [`rng`] - injectable random source for the decay engine
//! - [`errors`] - error type for the layers wrapped around the core
//!
//! ## Request Flow
//!
//! ```text
//! load pet ─▶ apply_decay(now) ─▶ apply_action? ─▶ save
//!                                                   │
//!          response ◀─ render(state) ◀─ classify ◀──┘
//! ```

pub mod actions;
pub mod classify;
pub mod decay;
pub mod entity;
pub mod errors;
pub mod rng;
pub mod sprite;

pub use actions::{apply_action, Action, ActionOutcome};
pub use classify::{classify, needs_attention, VisualState};
pub use decay::{apply_decay, DecayReport};
pub use entity::Pet;
pub use errors::PetError;
pub use rng::{RandomSource, SeededRandom, SequenceRandom, ThreadRandom};

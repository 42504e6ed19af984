//! # Petdash - Virtual Pet Simulation and Sprite Server
//!
//! Petdash keeps a single virtual pet alive for a small desk display. The
//! display polls over HTTP; every poll advances the pet's stats by the real
//! time that has passed, and the response carries a ready-to-blit RGB565
//! sprite of the pet's current mood.
//!
//! ## Features
//!
//! - **Time-based decay**: Hunger, happiness and hygiene drop per hour, with random poop and sickness events.
//! - **Care actions**: Feed, play, clean, discipline and cure, each with bounded effects.
//! - **Visual states**: Six priority-ordered moods (sick, dirty, hungry, sad, happy, normal).
//! - **Procedural sprites**: 80x80 little-endian RGB565 images, deterministic per state.
//! - **Persistence**: One JSON record on disk, guarded by file locks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use petdash::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     petdash::server::serve(&config).await
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`pet`] - Simulation core: entity, decay, actions, classification, sprites
//! - [`storage`] - Pet repository trait with file and in-memory stores
//! - [`service`] - Load / decay / act / save cycle behind one lock
//! - [`server`] - HTTP routes
//! - [`config`] - Configuration management and validation
//! - [`metrics`] - Process-wide counters
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Server   │ ← Routes, CORS, error mapping
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   PetService    │ ← Serialised request cycle
//! └─────────────────┘
//!     │         │
//! ┌────────┐ ┌─────────┐
//! │  pet   │ │ storage │ ← Pure simulation / JSON record
//! └────────┘ └─────────┘
//! ```

pub mod config;
pub mod metrics;
pub mod pet;
pub mod server;
pub mod service;
pub mod storage;

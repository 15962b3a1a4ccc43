//! # UI Particles
//!
//! A lightweight CPU particle engine for decorative UI effects such as
//! confetti, sparks and click feedback.
//!
//! ## Features
//!
//! - **Rate-based emission**: Time accumulator turns a continuous rate into discrete spawns
//! - **Fixed-capacity pool**: Dead slots are recycled, identities stay stable
//! - **Physics**: Constant acceleration, exponential drag, rotation
//! - **Sequences**: Size, transparency and color keyed over particle lifetime
//! - **Rendering-agnostic**: Hand attribute snapshots to any renderer
//! - **ECS integration**: Optional `bevy_ecs` components and systems
//!
//! ## Example
//!
//! ```
//! use ui_particles::config::EmitterConfig;
//! use ui_particles::particles::ParticleEngine;
//!
//! let mut engine = ParticleEngine::new(EmitterConfig::default().with_rate(0.0)).unwrap();
//! engine.emit(10);
//! engine.advance_physics(0.016);
//! assert_eq!(engine.snapshot().len(), 10);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Error types and shared macros
//! - [`config`]: Emitter configuration, config files and logging setup
//! - [`particles`]: Emission, pool, physics and attribute evaluation
//! - [`ecs`]: Entity Component System adapter

/// Error types and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Particle simulation
pub mod particles;
/// Entity Component System adapter
pub mod ecs;

pub use config::{EmitterConfig, ParticlesConfig};
pub use core::{ParticleError, ParticleResult};
pub use particles::{ParticleAttributes, ParticleEngine};

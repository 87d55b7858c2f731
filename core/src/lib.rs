//! Freemium game economy simulation core.
//!
//! Three independent simulators share one configuration shape:
//!   - `economy_simulator`     — token/revenue accumulation per player segment
//!   - `player_journey`        — archetype trajectories and churn risk
//!   - `monetization_analyzer` — catalog performance and ad-reward engagement
//!
//! All randomness flows through an explicit `rng::SimRng`.

pub mod config;
pub mod economy_simulator;
pub mod error;
pub mod monetization_analyzer;
pub mod player_journey;
pub mod rng;
pub mod stats;
pub mod types;

//! Shared primitive types used across all three simulators.

/// A count of simulated days. One step of a run = one in-game day.
pub type Days = u32;

/// Number of independent runs averaged into one aggregate insight.
pub const DEFAULT_SIMULATION_RUNS: u32 = 100;

/// Length of a run inside the multi-run aggregators.
pub const DEFAULT_RUN_DAYS: Days = 30;

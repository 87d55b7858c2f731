//! Random number generation for the simulators.
//!
//! RULE: No simulator touches a thread-local or global RNG.
//! Every stochastic method takes a `&mut SimRng` from its caller.
//!
//! Production callers use `SimRng::from_entropy()`. Tests and
//! reproducible runs derive one stream per simulator from a single
//! master seed through `RngBank`, seeded from
//! (master_seed XOR slot-index hash). This means:
//!   - Adding a new slot never changes existing simulators' streams.
//!   - Each simulator's stream is fully reproducible in isolation.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named random stream for a single simulator.
pub struct SimRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SimRng {
    /// Stream derived from a master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Non-reproducible stream seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            name: "entropy",
            inner: Pcg64Mcg::from_entropy(),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Roll a float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Pick one element uniformly. `None` only for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_u64_below(items.len() as u64) as usize;
        items.get(idx)
    }
}

/// All simulator streams for one seeded session, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_slot(&self, slot: SimulatorSlot) -> SimRng {
        SimRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries — only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SimulatorSlot {
    Economy = 0,
    Journey = 1,
    Monetization = 2,
}

impl SimulatorSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Journey => "journey",
            Self::Monetization => "monetization",
        }
    }
}

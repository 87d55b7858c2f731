//! Player journey model — archetype trajectories and churn scoring.
//!
//! A journey run draws one activity trial per day. Only on active days
//! does the player progress and get a second, nested purchase trial.
//!
//! Churn risk is a closed-form linear heuristic over three normalised
//! signals; it never samples.

use crate::{
    config::JourneyConfig,
    error::{SimError, SimResult},
    rng::SimRng,
    stats::mean,
    types::{Days, DEFAULT_RUN_DAYS},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const RETENTION_WEIGHT: f64 = 0.4;
pub const PROGRESSION_WEIGHT: f64 = 0.3;
pub const IAP_WEIGHT: f64 = 0.3;

/// Purchases beyond this count no longer lower churn risk.
pub const IAP_COUNT_CAP: f64 = 5.0;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JourneyRun {
    pub archetype:         String,
    pub total_sessions:    Days,
    pub retention_rate:    f64,
    pub progression_level: f64,
    pub iap_count:         u32,
    pub engagement_score:  f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchetypeMetrics {
    pub avg_retention_rate:   f64,
    pub avg_sessions:         f64,
    pub avg_progression:      f64,
    pub avg_iap_count:        f64,
    pub avg_engagement_score: f64,
}

impl ArchetypeMetrics {
    pub fn from_runs(runs: &[JourneyRun]) -> Self {
        Self {
            avg_retention_rate:   mean(runs.iter().map(|r| r.retention_rate)),
            avg_sessions:         mean(runs.iter().map(|r| r.total_sessions as f64)),
            avg_progression:      mean(runs.iter().map(|r| r.progression_level)),
            avg_iap_count:        mean(runs.iter().map(|r| r.iap_count as f64)),
            avg_engagement_score: mean(runs.iter().map(|r| r.engagement_score)),
        }
    }
}

/// Observed state of one player. Absent fields read as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerSnapshot {
    /// Percent of days active, 0–100.
    pub retention_rate:    f64,
    pub progression_level: f64,
    pub iap_count:         f64,
}

/// Snapshot signals scaled so that 1.0 is "fully engaged".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerMetrics {
    pub retention_score:   f64,
    pub progression_score: f64,
    pub purchase_score:    f64,
}

// ── Model ────────────────────────────────────────────────────────────────────

pub struct PlayerJourneyModel {
    config: JourneyConfig,
}

impl PlayerJourneyModel {
    pub fn new(config: JourneyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JourneyConfig {
        &self.config
    }

    pub fn simulate_player_journey(
        &self,
        archetype_name: &str,
        game_duration: Days,
        rng: &mut SimRng,
    ) -> SimResult<JourneyRun> {
        let profile = self.config.archetype(archetype_name)?;
        if game_duration == 0 {
            return Err(SimError::ZeroDuration);
        }

        let mut total_sessions: Days = 0;
        let mut retention_days: Days = 0;
        let mut total_progression = 0.0;
        let mut iap_count = 0u32;

        for _ in 0..game_duration {
            if !rng.chance(profile.retention_base) {
                continue;
            }
            total_sessions += 1;
            retention_days += 1;
            total_progression += profile.progression_speed;

            if rng.chance(profile.iap_likelihood) {
                iap_count += 1;
            }
        }

        let duration = game_duration as f64;
        Ok(JourneyRun {
            archetype: profile.name.clone(),
            total_sessions,
            retention_rate: retention_days as f64 / duration * 100.0,
            progression_level: total_progression,
            iap_count,
            engagement_score: total_sessions as f64 * profile.progression_speed / duration,
        })
    }

    pub fn compare_player_archetypes(
        &self,
        simulation_runs: u32,
        rng: &mut SimRng,
    ) -> SimResult<BTreeMap<String, ArchetypeMetrics>> {
        let mut comparison = BTreeMap::new();

        for profile in &self.config.archetypes {
            let runs = (0..simulation_runs)
                .map(|_| self.simulate_player_journey(&profile.name, DEFAULT_RUN_DAYS, rng))
                .collect::<SimResult<Vec<_>>>()?;

            let metrics = ArchetypeMetrics::from_runs(&runs);
            log::debug!(
                "journey: archetype={} runs={simulation_runs} retention={:.1}% iap={:.2}",
                profile.name, metrics.avg_retention_rate, metrics.avg_iap_count,
            );
            comparison.insert(profile.name.clone(), metrics);
        }

        log::info!("journey: compared {} archetypes", comparison.len());
        Ok(comparison)
    }

    pub fn player_metrics(snapshot: &PlayerSnapshot) -> PlayerMetrics {
        PlayerMetrics {
            retention_score:   snapshot.retention_rate / 100.0,
            progression_score: snapshot.progression_level / 100.0,
            purchase_score:    (snapshot.iap_count / IAP_COUNT_CAP).min(1.0),
        }
    }

    /// Churn risk in [0, 100]. Higher means more likely to leave.
    pub fn predict_churn_risk(&self, snapshot: &PlayerSnapshot) -> f64 {
        let m = Self::player_metrics(snapshot);
        let risk = ((1.0 - m.retention_score) * RETENTION_WEIGHT
            + (1.0 - m.progression_score) * PROGRESSION_WEIGHT
            + (1.0 - m.purchase_score) * IAP_WEIGHT)
            * 100.0;
        risk.clamp(0.0, 100.0)
    }
}

//! Economy simulator — per-player token and revenue accumulation.
//!
//! One run walks a single player of a named segment through `days`
//! independent daily steps. Each day draws two independent trials:
//!   1. played today   → daily login reward, +1 active day
//!   2. purchased today → one pack chosen uniformly from the catalog
//!
//! The purchase trial does NOT depend on the player having played.

use crate::{
    config::{EconomyConfig, IapPack},
    error::{SimError, SimResult},
    rng::SimRng,
    stats::mean,
    types::{Days, DEFAULT_RUN_DAYS, DEFAULT_SIMULATION_RUNS},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Below this mean retention (%) for `free_to_play`, the login reward is flagged.
pub const RETENTION_ADVISORY_THRESHOLD: f64 = 50.0;

/// Below this mean revenue for `casual_spender`, IAP pricing is flagged.
pub const REVENUE_ADVISORY_THRESHOLD: f64 = 10.0;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressionRun {
    pub player_type:       String,
    pub total_tokens:      f64,
    pub total_iap_revenue: f64,
    pub days_played:       Days,
    pub retention_rate:    f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentInsight {
    pub avg_tokens:         f64,
    pub avg_revenue:        f64,
    pub avg_retention_rate: f64,
}

impl SegmentInsight {
    pub fn from_runs(runs: &[ProgressionRun]) -> Self {
        Self {
            avg_tokens:         mean(runs.iter().map(|r| r.total_tokens)),
            avg_revenue:        mean(runs.iter().map(|r| r.total_iap_revenue)),
            avg_retention_rate: mean(runs.iter().map(|r| r.retention_rate)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation<T> {
    pub current:          T,
    pub suggestion:       String,
    pub needs_adjustment: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EconomyRecommendations {
    pub daily_login_reward: Recommendation<f64>,
    pub iap_pricing:        Recommendation<Vec<IapPack>>,
}

// ── Simulator ────────────────────────────────────────────────────────────────

pub struct EconomySimulator {
    config: EconomyConfig,
}

impl EconomySimulator {
    pub fn new(config: EconomyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn simulate_player_progression(
        &self,
        segment_name: &str,
        days: Days,
        rng: &mut SimRng,
    ) -> SimResult<ProgressionRun> {
        let segment = self.config.segment(segment_name)?;
        if days == 0 {
            return Err(SimError::ZeroDuration);
        }

        let mut total_tokens = 0.0;
        let mut total_iap_revenue = 0.0;
        let mut days_played: Days = 0;

        for _ in 0..days {
            if rng.chance(segment.daily_play_chance) {
                total_tokens += self.config.daily_login_reward;
                days_played += 1;
            }

            if rng.chance(segment.iap_conversion_rate) {
                // An empty catalog sells nothing.
                if let Some(pack) = rng.choose(&self.config.iap_tiers) {
                    total_tokens += pack.tokens;
                    total_iap_revenue += pack.price;
                }
            }
        }

        Ok(ProgressionRun {
            player_type: segment.name.clone(),
            total_tokens,
            total_iap_revenue,
            days_played,
            retention_rate: days_played as f64 / days as f64 * 100.0,
        })
    }

    /// Mean tokens, revenue and retention per segment over
    /// `simulation_runs` independent 30-day runs.
    pub fn analyze_monetization_strategies(
        &self,
        simulation_runs: u32,
        rng: &mut SimRng,
    ) -> SimResult<BTreeMap<String, SegmentInsight>> {
        let mut insights = BTreeMap::new();

        for segment in &self.config.segments {
            let runs = (0..simulation_runs)
                .map(|_| self.simulate_player_progression(&segment.name, DEFAULT_RUN_DAYS, rng))
                .collect::<SimResult<Vec<_>>>()?;

            let insight = SegmentInsight::from_runs(&runs);
            log::debug!(
                "economy: segment={} runs={simulation_runs} tokens={:.1} revenue={:.2} retention={:.1}%",
                segment.name, insight.avg_tokens, insight.avg_revenue, insight.avg_retention_rate,
            );
            insights.insert(segment.name.clone(), insight);
        }

        log::info!("economy: analysed {} segments", insights.len());
        Ok(insights)
    }

    /// Static two-rule advisory over a fresh default-size analysis.
    /// `current` supplies the login reward echoed back to the caller.
    pub fn optimize_economy(
        &self,
        current: &EconomyConfig,
        rng: &mut SimRng,
    ) -> SimResult<EconomyRecommendations> {
        let insights = self.analyze_monetization_strategies(DEFAULT_SIMULATION_RUNS, rng)?;
        Self::recommend(&insights, current.daily_login_reward, &self.config.iap_tiers)
    }

    fn recommend(
        insights: &BTreeMap<String, SegmentInsight>,
        current_login_reward: f64,
        iap_tiers: &[IapPack],
    ) -> SimResult<EconomyRecommendations> {
        let lookup = |name: &str| {
            insights
                .get(name)
                .ok_or_else(|| SimError::UnknownSegment { name: name.to_string() })
        };

        let low_retention = lookup("free_to_play")?.avg_retention_rate < RETENTION_ADVISORY_THRESHOLD;
        let low_revenue = lookup("casual_spender")?.avg_revenue < REVENUE_ADVISORY_THRESHOLD;

        Ok(EconomyRecommendations {
            daily_login_reward: Recommendation {
                current: current_login_reward,
                suggestion: if low_retention {
                    "Consider increasing daily login reward to improve retention"
                } else {
                    "Current daily reward seems optimal"
                }
                .to_string(),
                needs_adjustment: low_retention,
            },
            iap_pricing: Recommendation {
                current: iap_tiers.to_vec(),
                suggestion: if low_revenue {
                    "Introduce more granular IAP tiers to cater to different spending habits"
                } else {
                    "Current IAP structure appears effective"
                }
                .to_string(),
                needs_adjustment: low_revenue,
            },
        })
    }
}

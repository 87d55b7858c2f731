//! Monetization analyzer — catalog performance over historical records,
//! plus a stochastic model of ad-reward engagement.
//!
//! Historical records join to the catalog by tier name. Prices always
//! come from the catalog, never from the record.

use crate::{
    config::MonetizationConfig,
    rng::SimRng,
    stats::{mean, percent_or_zero, share},
    types::Days,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Fraction of ad views whose reward is claimed.
pub const CLAIM_THROUGH_RATE: f64 = 0.8;

/// Bounds of the per-reward-type daily view probability.
pub const AD_VIEW_PROBABILITY_RANGE: (f64, f64) = (0.2, 0.5);

/// How many content flags are reported per tier.
pub const POPULAR_CONTENTS_LIMIT: usize = 3;

// ── Historical records ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesRecord {
    pub tier_name: String,
    #[serde(default)]
    pub contents: Map<String, Value>,
}

fn default_duration_months() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionRecord {
    pub tier_name: String,
    #[serde(default = "default_duration_months")]
    pub duration_months: f64,
}

// ── Results ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IapTierPerformance {
    pub total_sales:                usize,
    pub total_revenue:              f64,
    pub average_purchase_frequency: f64,
    pub most_popular_contents:      Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdRewardImpact {
    pub total_ad_views:  u64,
    pub rewards_claimed: u64,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionPerformance {
    pub total_subscribers:             usize,
    pub total_revenue:                 f64,
    pub average_subscription_duration: f64,
    pub retention_rate:                f64,
}

// ── Analyzer ─────────────────────────────────────────────────────────────────

pub struct MonetizationAnalyzer {
    config: MonetizationConfig,
}

impl MonetizationAnalyzer {
    pub fn new(config: MonetizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonetizationConfig {
        &self.config
    }

    pub fn analyze_iap_performance(
        &self,
        sales: &[SalesRecord],
    ) -> BTreeMap<String, IapTierPerformance> {
        let mut performance = BTreeMap::new();

        for tier in &self.config.iap_tiers {
            let tier_sales: Vec<&SalesRecord> =
                sales.iter().filter(|s| s.tier_name == tier.name).collect();

            performance.insert(
                tier.name.clone(),
                IapTierPerformance {
                    total_sales:                tier_sales.len(),
                    total_revenue:              tier_sales.len() as f64 * tier.price,
                    average_purchase_frequency: share(tier_sales.len(), sales.len()),
                    most_popular_contents:      most_popular_contents(&tier_sales),
                },
            );
        }

        log::debug!("monetization: analysed {} sales across {} tiers", sales.len(), performance.len());
        performance
    }

    /// One view probability is drawn per reward type for the whole
    /// call, not per player or per day.
    pub fn simulate_ad_reward_impact(
        &self,
        player_base_size: u64,
        days: Days,
        rng: &mut SimRng,
    ) -> BTreeMap<String, AdRewardImpact> {
        let (lo, hi) = AD_VIEW_PROBABILITY_RANGE;
        let mut impact = BTreeMap::new();

        for reward in &self.config.ad_rewards {
            let view_probability = rng.uniform(lo, hi);

            let total_ad_views = (player_base_size as f64 * view_probability * days as f64) as u64;
            let rewards_claimed = (total_ad_views as f64 * CLAIM_THROUGH_RATE) as u64;

            log::debug!(
                "monetization: ad={} p_view={view_probability:.3} views={total_ad_views}",
                reward.reward_type,
            );

            impact.insert(
                reward.reward_type.clone(),
                AdRewardImpact {
                    total_ad_views,
                    rewards_claimed,
                    engagement_rate: percent_or_zero(rewards_claimed as f64, total_ad_views as f64),
                },
            );
        }

        impact
    }

    pub fn evaluate_subscription_value(
        &self,
        subscriptions: &[SubscriptionRecord],
    ) -> BTreeMap<String, SubscriptionPerformance> {
        let mut performance = BTreeMap::new();

        for tier in &self.config.subscriptions {
            let tier_subs: Vec<&SubscriptionRecord> =
                subscriptions.iter().filter(|s| s.tier_name == tier.name).collect();

            performance.insert(
                tier.name.clone(),
                SubscriptionPerformance {
                    total_subscribers:             tier_subs.len(),
                    total_revenue:                 tier_subs.len() as f64 * tier.price,
                    average_subscription_duration: mean(tier_subs.iter().map(|s| s.duration_months)),
                    retention_rate:                share(tier_subs.len(), subscriptions.len()) * 100.0,
                },
            );
        }

        performance
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Truthy content flags ranked by occurrence, ties in first-seen order.
fn most_popular_contents(sales: &[&SalesRecord]) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for sale in sales {
        for (flag, value) in &sale.contents {
            if !is_truthy(value) {
                continue;
            }
            match counts.iter_mut().find(|(name, _)| *name == flag.as_str()) {
                Some((_, n)) => *n += 1,
                None => counts.push((flag.as_str(), 1)),
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(POPULAR_CONTENTS_LIMIT)
        .map(|(name, _)| name.to_string())
        .collect()
}

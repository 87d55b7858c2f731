//! Simulator configuration.
//!
//! Each simulator owns one immutable config value built at construction
//! time. Built-in defaults live in the `Default` impls below; a caller's
//! JSON object replaces only the keys it names. The one exception is
//! `archetypes`, which merges per field into the default profiles.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

// ── Economy ────────────────────────────────────────────────────────

/// A purchasable token pack in the economy model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IapPack {
    pub name: String,
    pub price: f64,
    pub tokens: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSegment {
    pub name: String,
    /// Probability the player logs in on a given day.
    pub daily_play_chance: f64,
    /// Probability the player buys a pack on a given day.
    pub iap_conversion_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomyConfig {
    pub daily_login_reward: f64,
    pub win_reward: f64,
    pub board_unlock_cost: f64,
    pub iap_tiers: Vec<IapPack>,
    pub segments: Vec<PlayerSegment>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            daily_login_reward: 50.0,
            win_reward: 25.0,
            board_unlock_cost: 500.0,
            iap_tiers: vec![
                IapPack { name: "Small Pack".into(),  price: 2.99, tokens: 250.0 },
                IapPack { name: "Medium Pack".into(), price: 4.99, tokens: 500.0 },
                IapPack { name: "Large Pack".into(),  price: 9.99, tokens: 1250.0 },
            ],
            segments: vec![
                PlayerSegment {
                    name: "free_to_play".into(),
                    daily_play_chance: 0.6,
                    iap_conversion_rate: 0.05,
                },
                PlayerSegment {
                    name: "casual_spender".into(),
                    daily_play_chance: 0.8,
                    iap_conversion_rate: 0.2,
                },
                PlayerSegment {
                    name: "whale".into(),
                    daily_play_chance: 0.9,
                    iap_conversion_rate: 0.5,
                },
            ],
        }
    }
}

impl EconomyConfig {
    /// Defaults overlaid with whatever keys `value` carries.
    pub fn from_value(value: Value) -> SimResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// `self` with whatever top-level keys `overrides` carries replaced.
    /// A null or non-object `overrides` leaves `self` unchanged.
    pub fn overlay(&self, overrides: Value) -> SimResult<Self> {
        let mut merged = serde_json::to_value(self)?;
        if let (Value::Object(base), Value::Object(keys)) = (&mut merged, overrides) {
            base.extend(keys);
        }
        Self::from_value(merged)
    }

    pub fn segment(&self, name: &str) -> SimResult<&PlayerSegment> {
        self.segments
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SimError::UnknownSegment { name: name.to_string() })
    }
}

// ── Player journey ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchetypeProfile {
    pub name: String,
    /// Probability the player is active on a given day.
    pub retention_base: f64,
    /// Probability of a purchase on an active day.
    pub iap_likelihood: f64,
    /// Progression gained per active day.
    pub progression_speed: f64,
}

/// Partial archetype parameters. Absent fields keep the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArchetypeOverride {
    pub retention_base: Option<f64>,
    pub iap_likelihood: Option<f64>,
    pub progression_speed: Option<f64>,
}

impl ArchetypeProfile {
    fn apply(&mut self, o: &ArchetypeOverride) {
        if let Some(v) = o.retention_base    { self.retention_base = v; }
        if let Some(v) = o.iap_likelihood    { self.iap_likelihood = v; }
        if let Some(v) = o.progression_speed { self.progression_speed = v; }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JourneyConfig {
    pub archetypes: Vec<ArchetypeProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct JourneyConfigFile {
    archetypes: HashMap<String, ArchetypeOverride>,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            archetypes: vec![
                ArchetypeProfile {
                    name: "explorer".into(),
                    retention_base: 0.7,
                    iap_likelihood: 0.1,
                    progression_speed: 0.6,
                },
                ArchetypeProfile {
                    name: "competitive".into(),
                    retention_base: 0.8,
                    iap_likelihood: 0.3,
                    progression_speed: 0.9,
                },
                ArchetypeProfile {
                    name: "casual".into(),
                    retention_base: 0.5,
                    iap_likelihood: 0.05,
                    progression_speed: 0.4,
                },
            ],
        }
    }
}

impl JourneyConfig {
    /// Default archetypes with `overrides` merged in field by field.
    /// Overrides for archetypes that are not configured are dropped.
    pub fn with_overrides(overrides: &HashMap<String, ArchetypeOverride>) -> Self {
        let mut config = Self::default();
        for (name, o) in overrides {
            match config.archetypes.iter_mut().find(|a| &a.name == name) {
                Some(profile) => profile.apply(o),
                None => log::warn!("journey: ignoring override for unknown archetype '{name}'"),
            }
        }
        config
    }

    /// Parse `{ "archetypes": { "<name>": { ...partial... } } }`.
    pub fn from_value(value: Value) -> SimResult<Self> {
        let file: JourneyConfigFile = serde_json::from_value(value)?;
        Ok(Self::with_overrides(&file.archetypes))
    }

    pub fn archetype(&self, name: &str) -> SimResult<&ArchetypeProfile> {
        self.archetypes
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| SimError::UnknownArchetype { name: name.to_string() })
    }
}

// ── Monetization catalogs ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IapTier {
    pub name: String,
    pub price: f64,
    /// Opaque content flags, e.g. `{"special_board": true}`.
    #[serde(default)]
    pub contents: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdReward {
    #[serde(rename = "type")]
    pub reward_type: String,
    pub reward: f64,
    pub cooldown_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionTier {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonetizationConfig {
    pub iap_tiers: Vec<IapTier>,
    pub ad_rewards: Vec<AdReward>,
    pub subscriptions: Vec<SubscriptionTier>,
}

fn flags(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

impl Default for MonetizationConfig {
    fn default() -> Self {
        Self {
            iap_tiers: vec![
                IapTier {
                    name: "Starter Pack".into(),
                    price: 2.99,
                    contents: flags(&[
                        ("tokens", Value::from(250)),
                        ("special_board", Value::from(false)),
                        ("ad_removal", Value::from(false)),
                    ]),
                },
                IapTier {
                    name: "Premium Pack".into(),
                    price: 9.99,
                    contents: flags(&[
                        ("tokens", Value::from(1000)),
                        ("special_board", Value::from(true)),
                        ("ad_removal", Value::from(true)),
                    ]),
                },
                IapTier {
                    name: "Ultimate Pack".into(),
                    price: 19.99,
                    contents: flags(&[
                        ("tokens", Value::from(2500)),
                        ("special_board", Value::from(true)),
                        ("ad_removal", Value::from(true)),
                        ("exclusive_pieces", Value::from(true)),
                    ]),
                },
            ],
            ad_rewards: vec![
                AdReward { reward_type: "token_boost".into(), reward: 50.0, cooldown_hours: 4.0 },
                AdReward { reward_type: "extra_move".into(),  reward: 1.0,  cooldown_hours: 2.0 },
            ],
            subscriptions: vec![
                SubscriptionTier {
                    name: "Monthly Gamer".into(),
                    price: 4.99,
                    benefits: vec![
                        "Daily token bonus".into(),
                        "Exclusive monthly board".into(),
                        "Ad-free experience".into(),
                    ],
                },
                SubscriptionTier {
                    name: "Annual Strategist".into(),
                    price: 49.99,
                    benefits: vec![
                        "Daily token bonus".into(),
                        "Exclusive monthly boards".into(),
                        "Ad-free experience".into(),
                        "20% bonus on all purchases".into(),
                    ],
                },
            ],
        }
    }
}

impl MonetizationConfig {
    pub fn from_value(value: Value) -> SimResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

// ── Bundle ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameConfig {
    pub economy: EconomyConfig,
    pub journey: JourneyConfig,
    pub monetization: MonetizationConfig,
}

impl GameConfig {
    /// Load from a data directory holding `economy.json`,
    /// `journey.json` and `monetization.json`. A missing file
    /// means that simulator runs on its defaults.
    pub fn load(data_dir: impl AsRef<Path>) -> SimResult<Self> {
        let dir = data_dir.as_ref();

        let economy = match read_optional(&dir.join("economy.json"))? {
            Some(v) => EconomyConfig::from_value(v)?,
            None => EconomyConfig::default(),
        };
        let journey = match read_optional(&dir.join("journey.json"))? {
            Some(v) => JourneyConfig::from_value(v)?,
            None => JourneyConfig::default(),
        };
        let monetization = match read_optional(&dir.join("monetization.json"))? {
            Some(v) => MonetizationConfig::from_value(v)?,
            None => MonetizationConfig::default(),
        };

        Ok(Self { economy, journey, monetization })
    }
}

fn read_optional(path: &Path) -> SimResult<Option<Value>> {
    if !path.exists() {
        log::debug!("config: {} not found, using defaults", path.display());
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(serde_json::from_str(&content)?))
}

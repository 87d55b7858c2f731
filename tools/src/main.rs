//! sim-runner: headless runner for the freemium economy simulators.
//!
//! Usage:
//!   sim-runner --runs 100 --data-dir ./data
//!   sim-runner --seed 12345 --runs 1000
//!   sim-runner --ipc-mode            (line-delimited JSON on stdin/stdout)

use anyhow::Result;
use chrono::{DateTime, Utc};
use freemium_core::{
    config::{EconomyConfig, GameConfig},
    economy_simulator::{EconomyRecommendations, EconomySimulator, SegmentInsight},
    error::SimResult,
    monetization_analyzer::{
        AdRewardImpact, IapTierPerformance, MonetizationAnalyzer, SalesRecord,
        SubscriptionPerformance, SubscriptionRecord,
    },
    player_journey::{ArchetypeMetrics, PlayerJourneyModel, PlayerMetrics, PlayerSnapshot},
    rng::{RngBank, SimRng, SimulatorSlot},
    types::{Days, DEFAULT_SIMULATION_RUNS},
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};

fn default_player_base() -> u64 {
    10_000
}

fn default_days() -> Days {
    30
}

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    SimulateEconomy {
        #[serde(default)]
        config: Value,
    },
    AnalyzePlayers {
        #[serde(default)]
        snapshot: Option<PlayerSnapshot>,
    },
    AnalyzeMonetization {
        #[serde(default = "default_player_base")]
        player_base_size: u64,
        #[serde(default = "default_days")]
        days: Days,
        #[serde(default)]
        sales: Option<Vec<SalesRecord>>,
        #[serde(default)]
        subscriptions: Option<Vec<SubscriptionRecord>>,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct Envelope<T: serde::Serialize> {
    request_id:   String,
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    body:         T,
}

impl<T: serde::Serialize> Envelope<T> {
    fn new(body: T) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            body,
        }
    }
}

#[derive(serde::Serialize)]
struct EconomyReport {
    monetization_insights:    BTreeMap<String, SegmentInsight>,
    optimization_suggestions: EconomyRecommendations,
}

#[derive(serde::Serialize)]
struct PlayerReport {
    archetype_comparison: BTreeMap<String, ArchetypeMetrics>,
    churn_risk:           f64,
    player_metrics:       PlayerMetrics,
}

#[derive(serde::Serialize)]
struct MonetizationReport {
    ad_reward_impact:         BTreeMap<String, AdRewardImpact>,
    iap_performance:          BTreeMap<String, IapTierPerformance>,
    subscription_performance: BTreeMap<String, SubscriptionPerformance>,
}

/// Simulators built once per process plus one random stream each.
struct Session {
    runs:             u32,
    journey:          PlayerJourneyModel,
    monetization:     MonetizationAnalyzer,
    base_economy:     EconomyConfig,
    economy_rng:      SimRng,
    journey_rng:      SimRng,
    monetization_rng: SimRng,
}

impl Session {
    fn new(config: GameConfig, seed: Option<u64>, runs: u32) -> Self {
        let (economy_rng, journey_rng, monetization_rng) = match seed {
            Some(seed) => {
                let bank = RngBank::new(seed);
                (
                    bank.for_slot(SimulatorSlot::Economy),
                    bank.for_slot(SimulatorSlot::Journey),
                    bank.for_slot(SimulatorSlot::Monetization),
                )
            }
            None => (
                SimRng::from_entropy().with_name("economy"),
                SimRng::from_entropy().with_name("journey"),
                SimRng::from_entropy().with_name("monetization"),
            ),
        };

        Self {
            runs,
            journey: PlayerJourneyModel::new(config.journey),
            monetization: MonetizationAnalyzer::new(config.monetization),
            base_economy: config.economy,
            economy_rng,
            journey_rng,
            monetization_rng,
        }
    }

    /// A fresh simulator is built from the `--data-dir` economy with the
    /// request's keys laid over it.
    fn simulate_economy(&mut self, overrides: Value) -> SimResult<EconomyReport> {
        let config = self.base_economy.overlay(overrides)?;
        let simulator = EconomySimulator::new(config.clone());

        Ok(EconomyReport {
            monetization_insights: simulator
                .analyze_monetization_strategies(self.runs, &mut self.economy_rng)?,
            optimization_suggestions: simulator.optimize_economy(&config, &mut self.economy_rng)?,
        })
    }

    fn analyze_players(&mut self, snapshot: Option<PlayerSnapshot>) -> SimResult<PlayerReport> {
        let snapshot = snapshot.unwrap_or_else(sample_player);

        Ok(PlayerReport {
            archetype_comparison: self
                .journey
                .compare_player_archetypes(self.runs, &mut self.journey_rng)?,
            churn_risk: self.journey.predict_churn_risk(&snapshot),
            player_metrics: PlayerJourneyModel::player_metrics(&snapshot),
        })
    }

    fn analyze_monetization(
        &mut self,
        player_base_size: u64,
        days: Days,
        sales: Option<Vec<SalesRecord>>,
        subscriptions: Option<Vec<SubscriptionRecord>>,
    ) -> MonetizationReport {
        let sales = sales.unwrap_or_else(sample_sales);
        let subscriptions = subscriptions.unwrap_or_else(sample_subscriptions);

        MonetizationReport {
            ad_reward_impact: self.monetization.simulate_ad_reward_impact(
                player_base_size,
                days,
                &mut self.monetization_rng,
            ),
            iap_performance: self.monetization.analyze_iap_performance(&sales),
            subscription_performance: self.monetization.evaluate_subscription_value(&subscriptions),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = args
        .windows(2)
        .find(|w| w[0] == "--seed")
        .and_then(|w| w[1].parse::<u64>().ok());
    let runs = parse_arg(&args, "--runs", DEFAULT_SIMULATION_RUNS);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let config = GameConfig::load(data_dir)?;

    if !ipc_mode {
        println!("Freemium economy — sim-runner");
        match seed {
            Some(s) => println!("  seed:      {s}"),
            None => println!("  seed:      (entropy)"),
        }
        println!("  runs:      {runs}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let mut session = Session::new(config, seed, runs);

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        print_summary(&mut session)?;
    }

    Ok(())
}

fn run_ipc_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, "Invalid command", &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::SimulateEconomy { config } => match session.simulate_economy(config) {
                Ok(report) => write_line(&mut stdout, &Envelope::new(report))?,
                Err(e) => {
                    log::error!("Economy simulation error: {e}");
                    write_error(&mut stdout, "Simulation failed", &e.to_string())?;
                }
            },
            IpcCommand::AnalyzePlayers { snapshot } => match session.analyze_players(snapshot) {
                Ok(report) => write_line(&mut stdout, &Envelope::new(report))?,
                Err(e) => {
                    log::error!("Player analysis error: {e}");
                    write_error(&mut stdout, "Player analysis failed", &e.to_string())?;
                }
            },
            IpcCommand::AnalyzeMonetization { player_base_size, days, sales, subscriptions } => {
                let report = session.analyze_monetization(player_base_size, days, sales, subscriptions);
                write_line(&mut stdout, &Envelope::new(report))?;
            }
        }
    }
    Ok(())
}

fn write_line<T: serde::Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(value)?)?;
    out.flush()?;
    Ok(())
}

fn write_error(out: &mut impl Write, error: &str, details: &str) -> Result<()> {
    write_line(out, &serde_json::json!({ "error": error, "details": details }))
}

fn print_summary(session: &mut Session) -> Result<()> {
    let economy = session.simulate_economy(Value::Null)?;
    let players = session.analyze_players(None)?;
    let monetization = session.analyze_monetization(default_player_base(), default_days(), None, None);

    println!("=== SEGMENT ECONOMY ({} runs × 30 days) ===", session.runs);
    for (segment, i) in &economy.monetization_insights {
        println!(
            "  {segment:<16} tokens: {:>8.1} | revenue: ${:>7.2} | retention: {:>5.1}%",
            i.avg_tokens, i.avg_revenue, i.avg_retention_rate
        );
    }
    let rec = &economy.optimization_suggestions;
    println!("  login reward:  {}", rec.daily_login_reward.suggestion);
    println!("  iap pricing:   {}", rec.iap_pricing.suggestion);

    println!();
    println!("=== PLAYER ARCHETYPES ===");
    for (archetype, m) in &players.archetype_comparison {
        println!(
            "  {archetype:<12} retention: {:>5.1}% | sessions: {:>5.1} | iap: {:>4.2} | engagement: {:.3}",
            m.avg_retention_rate, m.avg_sessions, m.avg_iap_count, m.avg_engagement_score
        );
    }
    println!("  sample churn risk: {:.1}%", players.churn_risk);

    println!();
    println!("=== MONETIZATION ===");
    for (kind, ad) in &monetization.ad_reward_impact {
        println!(
            "  ad {kind:<14} views: {:>7} | claimed: {:>7} | engagement: {:.1}%",
            ad.total_ad_views, ad.rewards_claimed, ad.engagement_rate
        );
    }
    for (tier, p) in &monetization.iap_performance {
        println!(
            "  iap {tier:<14} sales: {} | revenue: ${:.2} | top: {}",
            p.total_sales, p.total_revenue, p.most_popular_contents.join(", ")
        );
    }
    for (tier, s) in &monetization.subscription_performance {
        println!(
            "  sub {tier:<18} subscribers: {} | revenue: ${:.2} | avg months: {:.1}",
            s.total_subscribers, s.total_revenue, s.average_subscription_duration
        );
    }
    Ok(())
}

fn sample_player() -> PlayerSnapshot {
    PlayerSnapshot {
        retention_rate: 60.0,
        progression_level: 40.0,
        iap_count: 2.0,
    }
}

fn sample_sales() -> Vec<SalesRecord> {
    let contents = |flags: &[&str]| -> Map<String, Value> {
        flags.iter().map(|f| (f.to_string(), Value::Bool(true))).collect()
    };
    vec![
        SalesRecord { tier_name: "Starter Pack".into(), contents: contents(&["tokens"]) },
        SalesRecord {
            tier_name: "Premium Pack".into(),
            contents: contents(&["special_board", "ad_removal"]),
        },
    ]
}

fn sample_subscriptions() -> Vec<SubscriptionRecord> {
    vec![
        SubscriptionRecord { tier_name: "Monthly Gamer".into(), duration_months: 3.0 },
        SubscriptionRecord { tier_name: "Annual Strategist".into(), duration_months: 12.0 },
    ]
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

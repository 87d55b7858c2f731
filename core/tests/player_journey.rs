//! Player journey model tests — archetype runs and comparison.

use freemium_core::{
    config::{ArchetypeOverride, ArchetypeProfile, JourneyConfig},
    error::SimError,
    player_journey::PlayerJourneyModel,
    rng::{RngBank, SimRng, SimulatorSlot},
};
use std::collections::HashMap;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn rng(seed: u64) -> SimRng {
    RngBank::new(seed).for_slot(SimulatorSlot::Journey)
}

fn model_with(profile: ArchetypeProfile) -> PlayerJourneyModel {
    PlayerJourneyModel::new(JourneyConfig { archetypes: vec![profile] })
}

fn profile(name: &str, retention: f64, iap: f64, speed: f64) -> ArchetypeProfile {
    ArchetypeProfile {
        name: name.into(),
        retention_base: retention,
        iap_likelihood: iap,
        progression_speed: speed,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn unknown_archetype_is_rejected() {
    let model = PlayerJourneyModel::new(JourneyConfig::default());
    let err = model.simulate_player_journey("speedrunner", 30, &mut rng(1)).unwrap_err();
    assert!(matches!(err, SimError::UnknownArchetype { ref name } if name == "speedrunner"));
}

#[test]
fn zero_duration_is_rejected() {
    let model = PlayerJourneyModel::new(JourneyConfig::default());
    let err = model.simulate_player_journey("casual", 0, &mut rng(1)).unwrap_err();
    assert!(matches!(err, SimError::ZeroDuration));
}

#[test]
fn always_active_player_progresses_every_day() {
    let model = model_with(profile("grinder", 1.0, 0.0, 0.75));
    let run = model.simulate_player_journey("grinder", 20, &mut rng(3)).unwrap();

    assert_eq!(run.total_sessions, 20);
    assert_eq!(run.retention_rate, 100.0);
    assert!((run.progression_level - 15.0).abs() < 1e-9);
    assert!((run.engagement_score - 0.75).abs() < 1e-9);
    assert_eq!(run.iap_count, 0);
}

/// Purchase trials only happen on active days.
#[test]
fn inactive_player_never_purchases() {
    let model = model_with(profile("lurker", 0.0, 1.0, 0.5));
    let run = model.simulate_player_journey("lurker", 30, &mut rng(4)).unwrap();

    assert_eq!(run.total_sessions, 0);
    assert_eq!(run.iap_count, 0);
    assert_eq!(run.progression_level, 0.0);
    assert_eq!(run.engagement_score, 0.0);
}

#[test]
fn purchases_never_exceed_sessions() {
    let model = PlayerJourneyModel::new(JourneyConfig::default());
    let mut rng = rng(77);

    for name in ["explorer", "competitive", "casual"] {
        for _ in 0..200 {
            let run = model.simulate_player_journey(name, 30, &mut rng).unwrap();
            assert!(run.iap_count <= run.total_sessions, "{name}: {run:?}");
            assert!((0.0..=100.0).contains(&run.retention_rate));
        }
    }
}

#[test]
fn certain_buyer_buys_on_every_active_day() {
    let model = model_with(profile("whale", 0.5, 1.0, 1.0));
    let run = model.simulate_player_journey("whale", 60, &mut rng(12)).unwrap();
    assert_eq!(run.iap_count, run.total_sessions);
}

#[test]
fn comparison_covers_every_archetype() {
    let model = PlayerJourneyModel::new(JourneyConfig::default());
    let comparison = model.compare_player_archetypes(10, &mut rng(42)).unwrap();

    let names: Vec<&str> = comparison.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["casual", "competitive", "explorer"]);
}

/// At N=1000 mean retention sits within 5pp of retention_base × 100.
#[test]
fn mean_retention_converges_to_retention_base() {
    let model = PlayerJourneyModel::new(JourneyConfig::default());
    let comparison = model.compare_player_archetypes(1000, &mut rng(2024)).unwrap();

    for archetype in &model.config().archetypes {
        let metrics = &comparison[&archetype.name];
        let expected = archetype.retention_base * 100.0;
        assert!(
            (metrics.avg_retention_rate - expected).abs() < 5.0,
            "{}: {:.2} vs expected {expected:.2}", archetype.name, metrics.avg_retention_rate
        );

        // Sessions and progression follow from the same activity trial.
        let expected_sessions = metrics.avg_retention_rate / 100.0 * 30.0;
        assert!((metrics.avg_sessions - expected_sessions).abs() < 1e-6);
        assert!(
            (metrics.avg_progression - metrics.avg_sessions * archetype.progression_speed).abs() < 1e-6
        );
    }
}

#[test]
fn override_merges_single_field_into_one_archetype() {
    let overrides: HashMap<String, ArchetypeOverride> = [(
        "explorer".to_string(),
        ArchetypeOverride { iap_likelihood: Some(0.9), ..Default::default() },
    )]
    .into();

    let merged = JourneyConfig::with_overrides(&overrides);
    let defaults = JourneyConfig::default();

    let explorer = merged.archetype("explorer").unwrap();
    assert_eq!(explorer.iap_likelihood, 0.9);
    assert_eq!(explorer.retention_base, 0.7);
    assert_eq!(explorer.progression_speed, 0.6);

    for name in ["competitive", "casual"] {
        assert_eq!(merged.archetype(name).unwrap(), defaults.archetype(name).unwrap());
    }
}

#[test]
fn override_for_unknown_archetype_is_ignored() {
    let overrides: HashMap<String, ArchetypeOverride> = [(
        "speedrunner".to_string(),
        ArchetypeOverride { retention_base: Some(1.0), ..Default::default() },
    )]
    .into();

    let merged = JourneyConfig::with_overrides(&overrides);
    assert_eq!(merged, JourneyConfig::default());
    assert!(merged.archetype("speedrunner").is_err());
}

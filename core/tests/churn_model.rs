//! Churn risk scoring — closed-form, no sampling.

use freemium_core::{
    config::JourneyConfig,
    player_journey::{PlayerJourneyModel, PlayerSnapshot},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn model() -> PlayerJourneyModel {
    PlayerJourneyModel::new(JourneyConfig::default())
}

fn snapshot(retention_rate: f64, progression_level: f64, iap_count: f64) -> PlayerSnapshot {
    PlayerSnapshot { retention_rate, progression_level, iap_count }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn empty_snapshot_is_maximum_risk() {
    assert_close(model().predict_churn_risk(&PlayerSnapshot::default()), 100.0);
}

#[test]
fn absent_fields_deserialize_as_zero() {
    let snap: PlayerSnapshot = serde_json::from_str("{}").unwrap();
    assert_eq!(snap, PlayerSnapshot::default());

    let partial: PlayerSnapshot = serde_json::from_str(r#"{"iap_count": 5}"#).unwrap();
    assert_close(model().predict_churn_risk(&partial), 70.0);
}

#[test]
fn fully_engaged_player_has_no_risk() {
    assert_close(model().predict_churn_risk(&snapshot(100.0, 100.0, 5.0)), 0.0);
}

/// 0.4×0.4 + 0.3×0.6 + 0.3×0.6 = 0.52
#[test]
fn sample_player_scores_fifty_two() {
    assert_close(model().predict_churn_risk(&snapshot(60.0, 40.0, 2.0)), 52.0);
}

#[test]
fn out_of_range_inputs_are_clamped() {
    let m = model();
    assert_eq!(m.predict_churn_risk(&snapshot(300.0, 500.0, 50.0)), 0.0);
    assert_eq!(m.predict_churn_risk(&snapshot(-200.0, -100.0, 0.0)), 100.0);
}

#[test]
fn risk_never_increases_with_retention_or_progression() {
    let m = model();
    let mut prev_r = f64::INFINITY;
    let mut prev_p = f64::INFINITY;

    for step in 0..=20 {
        let level = step as f64 * 5.0;

        let r = m.predict_churn_risk(&snapshot(level, 30.0, 1.0));
        assert!(r <= prev_r, "risk rose with retention at {level}");
        prev_r = r;

        let p = m.predict_churn_risk(&snapshot(30.0, level, 1.0));
        assert!(p <= prev_p, "risk rose with progression at {level}");
        prev_p = p;
    }
}

#[test]
fn purchases_lower_risk_until_cap_then_flat() {
    let m = model();
    let risks: Vec<f64> = (0..=8)
        .map(|n| m.predict_churn_risk(&snapshot(50.0, 50.0, n as f64)))
        .collect();

    for pair in risks[..=5].windows(2) {
        assert!(pair[1] < pair[0], "risk should fall below the cap: {risks:?}");
    }
    for r in &risks[5..] {
        assert_close(*r, risks[5]);
    }
}

#[test]
fn player_metrics_normalise_snapshot() {
    let metrics = PlayerJourneyModel::player_metrics(&snapshot(60.0, 40.0, 7.0));
    assert_close(metrics.retention_score, 0.6);
    assert_close(metrics.progression_score, 0.4);
    assert_close(metrics.purchase_score, 1.0);
}

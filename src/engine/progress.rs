use super::indices::round2;
use crate::models::{
    AnalysisSnapshot, ImpactLog, ProgressOutcome, ProgressReport, TimeSeriesPoint, Trend,
};
use chrono::Utc;

// Guard against near-zero baselines when computing percentage change
const BASELINE_EPSILON: f64 = 0.01;

/// Compare the oldest and newest snapshots of one plot's history and
/// summarize the change. Input must be ordered ascending by `analyzed_at`;
/// baseline and latest are the full-history extremes.
pub fn track(snapshots: &[AnalysisSnapshot]) -> ProgressOutcome {
    if snapshots.len() < 2 {
        return ProgressOutcome::InsufficientData {
            data_points: snapshots.len(),
        };
    }

    let baseline = &snapshots[0];
    let latest = &snapshots[snapshots.len() - 1];
    let period_days = (latest.analyzed_at - baseline.analyzed_at).num_days();

    let ndvi_delta = latest.ndvi - baseline.ndvi;
    let evi_delta = latest.evi - baseline.evi;
    let soil_quality_delta = latest.soil_quality - baseline.soil_quality;

    let ndvi_pct = ndvi_delta / baseline.ndvi.abs().max(BASELINE_EPSILON) * 100.0;
    let soil_pct = soil_quality_delta / baseline.soil_quality.abs().max(BASELINE_EPSILON) * 100.0;
    let improvement_pct = round2(0.6 * ndvi_pct + 0.4 * soil_pct);

    let trend = if improvement_pct > 5.0 {
        Trend::Improving
    } else if improvement_pct < -5.0 {
        Trend::Declining
    } else {
        Trend::Stable
    };

    let mut insights = Vec::new();
    if ndvi_delta > 0.1 {
        insights.push("Significant vegetation improvement detected");
    } else if ndvi_delta < -0.1 {
        insights.push("Vegetation decline - immediate intervention needed");
    }
    if soil_quality_delta > 10.0 {
        insights.push("Soil health showing strong recovery");
    } else if soil_quality_delta < -10.0 {
        insights.push("Soil degradation accelerating");
    }
    if latest.water_stress < baseline.water_stress {
        insights.push("Water retention improving");
    }

    let time_series = snapshots
        .iter()
        .map(|s| TimeSeriesPoint {
            date: s.analyzed_at,
            ndvi: s.ndvi,
            evi: s.evi,
            soil_quality: s.soil_quality,
            water_stress: s.water_stress,
        })
        .collect();

    let impact = ImpactLog {
        id: None,
        plot_id: baseline.plot_id,
        baseline_analysis_id: baseline.id,
        latest_analysis_id: latest.id,
        period_days,
        ndvi_delta,
        evi_delta,
        soil_quality_delta,
        improvement_pct,
        trend,
        created_at: Utc::now(),
    };

    ProgressOutcome::Report(ProgressReport {
        impact,
        data_points: snapshots.len(),
        time_series,
        insights,
        recommended_actions: recommended_actions(trend),
    })
}

/// Fixed follow-up actions keyed purely by trend.
pub fn recommended_actions(trend: Trend) -> [&'static str; 3] {
    match trend {
        Trend::Declining => [
            "Reassess current practices",
            "Consider soil amendments",
            "Increase monitoring frequency",
        ],
        Trend::Improving => [
            "Continue current practices",
            "Document successful interventions",
            "Share learnings with community",
        ],
        Trend::Stable => [
            "Monitor closely",
            "Consider testing new regenerative practices",
            "Maintain current care routine",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisMethod, IndexReadings, RiskLevel};
    use chrono::{Duration, TimeZone, Utc};

    fn snapshot_at(days: i64, ndvi: f64, soil: f64, water: f64) -> AnalysisSnapshot {
        let mut snap = AnalysisSnapshot::new(
            7,
            IndexReadings {
                ndvi,
                evi: ndvi * 0.8,
                soil_quality: soil,
                water_stress: water,
            },
            RiskLevel::Medium,
            AnalysisMethod::Coordinates,
        );
        snap.id = Some(days);
        snap.analyzed_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(days);
        snap
    }

    #[test]
    fn fewer_than_two_snapshots_is_insufficient_data() {
        assert!(matches!(
            track(&[]),
            ProgressOutcome::InsufficientData { data_points: 0 }
        ));
        let one = snapshot_at(0, 0.5, 60.0, 30.0);
        assert!(matches!(
            track(&[one]),
            ProgressOutcome::InsufficientData { data_points: 1 }
        ));
    }

    #[test]
    fn improving_scenario_matches_expected_arithmetic() {
        let baseline = snapshot_at(0, 0.45, 50.0, 40.0);
        let latest = snapshot_at(10, 0.62, 65.0, 35.0);
        let report = match track(&[baseline, latest]) {
            ProgressOutcome::Report(r) => r,
            other => panic!("expected report, got {:?}", other),
        };

        assert_eq!(report.impact.period_days, 10);
        assert!((report.impact.ndvi_delta - 0.17).abs() < 1e-9);
        assert!((report.impact.soil_quality_delta - 15.0).abs() < 1e-9);
        // ndvi_pct = 0.17/0.45*100 = 37.78, soil_pct = 30
        // overall = 0.6*37.78 + 0.4*30 = 34.67
        assert!((report.impact.improvement_pct - 34.67).abs() < 1e-9);
        assert_eq!(report.impact.trend, Trend::Improving);
        assert!(report
            .insights
            .contains(&"Significant vegetation improvement detected"));
        assert!(report.insights.contains(&"Soil health showing strong recovery"));
        assert!(report.insights.contains(&"Water retention improving"));
        assert_eq!(report.data_points, 2);
        assert_eq!(report.time_series.len(), 2);
    }

    #[test]
    fn baseline_and_latest_are_history_extremes() {
        let history = vec![
            snapshot_at(0, 0.30, 40.0, 60.0),
            snapshot_at(15, 0.90, 95.0, 10.0),
            snapshot_at(30, 0.45, 55.0, 45.0),
        ];
        let report = match track(&history) {
            ProgressOutcome::Report(r) => r,
            other => panic!("expected report, got {:?}", other),
        };
        // Middle spike must not affect deltas
        assert_eq!(report.impact.baseline_analysis_id, Some(0));
        assert_eq!(report.impact.latest_analysis_id, Some(30));
        assert_eq!(report.impact.period_days, 30);
        assert!((report.impact.ndvi_delta - 0.15).abs() < 1e-9);
        assert_eq!(report.time_series.len(), 3);
    }

    #[test]
    fn trend_boundaries_are_strict() {
        // Soil-only change producing exactly +5%: 0.6*0 + 0.4*12.5 = 5.0
        let baseline = snapshot_at(0, 0.5, 40.0, 30.0);
        let latest = snapshot_at(7, 0.5, 45.0, 30.0);
        let report = match track(&[baseline, latest]) {
            ProgressOutcome::Report(r) => r,
            other => panic!("expected report, got {:?}", other),
        };
        assert!((report.impact.improvement_pct - 5.0).abs() < 1e-9);
        assert_eq!(report.impact.trend, Trend::Stable);

        // Exactly -5% is not declining
        let baseline = snapshot_at(0, 0.5, 40.0, 30.0);
        let latest = snapshot_at(7, 0.5, 35.0, 30.0);
        let report = match track(&[baseline, latest]) {
            ProgressOutcome::Report(r) => r,
            other => panic!("expected report, got {:?}", other),
        };
        assert!((report.impact.improvement_pct + 5.0).abs() < 1e-9);
        assert_eq!(report.impact.trend, Trend::Stable);
    }

    #[test]
    fn decline_produces_decline_insights_and_actions() {
        let baseline = snapshot_at(0, 0.6, 70.0, 20.0);
        let latest = snapshot_at(60, 0.35, 45.0, 55.0);
        let report = match track(&[baseline, latest]) {
            ProgressOutcome::Report(r) => r,
            other => panic!("expected report, got {:?}", other),
        };
        assert_eq!(report.impact.trend, Trend::Declining);
        assert!(report
            .insights
            .contains(&"Vegetation decline - immediate intervention needed"));
        assert!(report.insights.contains(&"Soil degradation accelerating"));
        // Water stress rose, so no water insight
        assert!(!report.insights.contains(&"Water retention improving"));
        assert_eq!(
            report.recommended_actions,
            [
                "Reassess current practices",
                "Consider soil amendments",
                "Increase monitoring frequency"
            ]
        );
    }

    #[test]
    fn near_zero_baseline_uses_epsilon_guard() {
        let baseline = snapshot_at(0, 0.0, 50.0, 40.0);
        let latest = snapshot_at(5, 0.2, 50.0, 40.0);
        let report = match track(&[baseline, latest]) {
            ProgressOutcome::Report(r) => r,
            other => panic!("expected report, got {:?}", other),
        };
        // ndvi_pct = 0.2/0.01*100 = 2000, overall = 0.6*2000 = 1200
        assert!((report.impact.improvement_pct - 1200.0).abs() < 1e-9);
        assert_eq!(report.impact.trend, Trend::Improving);
    }

    #[test]
    fn stable_trend_actions() {
        assert_eq!(
            recommended_actions(Trend::Stable),
            [
                "Monitor closely",
                "Consider testing new regenerative practices",
                "Maintain current care routine"
            ]
        );
    }

    #[test]
    fn partial_day_periods_floor_to_whole_days() {
        let baseline = snapshot_at(0, 0.4, 50.0, 40.0);
        let mut latest = snapshot_at(3, 0.5, 55.0, 35.0);
        latest.analyzed_at = latest.analyzed_at + Duration::hours(11);
        let report = match track(&[baseline, latest]) {
            ProgressOutcome::Report(r) => r,
            other => panic!("expected report, got {:?}", other),
        };
        assert_eq!(report.impact.period_days, 3);
    }
}

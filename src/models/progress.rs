use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "improving" => Some(Trend::Improving),
            "stable" => Some(Trend::Stable),
            "declining" => Some(Trend::Declining),
            _ => None,
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable record of change between a plot's earliest and latest
/// analysis. Baseline and latest are always the full-history extremes,
/// never a rolling window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactLog {
    pub id: Option<i64>,
    pub plot_id: i64,
    pub baseline_analysis_id: Option<i64>,
    pub latest_analysis_id: Option<i64>,
    pub period_days: i64,
    pub ndvi_delta: f64,
    pub evi_delta: f64,
    pub soil_quality_delta: f64,
    pub improvement_pct: f64,
    pub trend: Trend,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: DateTime<Utc>,
    pub ndvi: f64,
    pub evi: f64,
    pub soil_quality: f64,
    pub water_stress: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub impact: ImpactLog,
    pub data_points: usize,
    pub time_series: Vec<TimeSeriesPoint>,
    pub insights: Vec<&'static str>,
    pub recommended_actions: [&'static str; 3],
}

/// Outcome of a progress-tracking run. Fewer than two snapshots is a
/// normal result, not an error, and produces no impact log.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProgressOutcome {
    Report(ProgressReport),
    InsufficientData { data_points: usize },
}

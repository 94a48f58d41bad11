use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered degradation-risk categories, healthiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }

    /// Urgency weight fed into recommendation priority derivation.
    pub fn priority_boost(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMethod {
    Bands,
    Coordinates,
}

impl AnalysisMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMethod::Bands => "bands",
            AnalysisMethod::Coordinates => "coordinates",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bands" | "image" => Some(AnalysisMethod::Bands),
            "coordinates" => Some(AnalysisMethod::Coordinates),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw reflectance bands from an imagery source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReflectanceBands {
    pub red: f64,
    pub nir: f64,
    pub blue: f64,
}

/// The numeric quad produced by index calculation, before risk
/// classification. NDVI/EVI are rounded to 4 decimal places, soil quality
/// and water stress clamped to [0, 100] and rounded to 2.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndexReadings {
    pub ndvi: f64,
    pub evi: f64,
    pub soil_quality: f64,
    pub water_stress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub id: Option<i64>,
    pub plot_id: i64,
    pub ndvi: f64,
    pub evi: f64,
    pub soil_quality: f64,
    pub water_stress: f64,
    pub degradation_risk: RiskLevel,
    pub method: AnalysisMethod,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisSnapshot {
    pub fn new(
        plot_id: i64,
        readings: IndexReadings,
        risk: RiskLevel,
        method: AnalysisMethod,
    ) -> Self {
        Self {
            id: None,
            plot_id,
            ndvi: readings.ndvi,
            evi: readings.evi,
            soil_quality: readings.soil_quality,
            water_stress: readings.water_stress,
            degradation_risk: risk,
            method,
            analyzed_at: Utc::now(),
        }
    }

    pub fn vegetation_health(&self) -> &'static str {
        if self.ndvi > 0.6 {
            "Excellent"
        } else if self.ndvi > 0.4 {
            "Good"
        } else if self.ndvi > 0.2 {
            "Fair"
        } else {
            "Poor"
        }
    }

    pub fn soil_condition(&self) -> &'static str {
        if self.soil_quality > 70.0 {
            "Excellent"
        } else if self.soil_quality > 50.0 {
            "Good"
        } else {
            "Needs improvement"
        }
    }

    pub fn water_status(&self) -> &'static str {
        if self.water_stress < 30.0 {
            "Adequate"
        } else if self.water_stress < 60.0 {
            "Moderate stress"
        } else {
            "High stress"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(ndvi: f64, soil: f64, water: f64) -> AnalysisSnapshot {
        AnalysisSnapshot::new(
            1,
            IndexReadings {
                ndvi,
                evi: ndvi * 0.8,
                soil_quality: soil,
                water_stress: water,
            },
            RiskLevel::Medium,
            AnalysisMethod::Coordinates,
        )
    }

    #[test]
    fn risk_level_ordering_healthiest_first() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn risk_level_round_trip() {
        for level in [
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::Critical,
        ] {
            assert_eq!(RiskLevel::from_str(level.as_str()), Some(level));
        }
        assert_eq!(RiskLevel::from_str("CRITICAL"), Some(RiskLevel::Critical));
        assert_eq!(RiskLevel::from_str("severe"), None);
    }

    #[test]
    fn risk_level_priority_boost() {
        assert_eq!(RiskLevel::Low.priority_boost(), 0);
        assert_eq!(RiskLevel::Medium.priority_boost(), 1);
        assert_eq!(RiskLevel::High.priority_boost(), 2);
        assert_eq!(RiskLevel::Critical.priority_boost(), 3);
    }

    #[test]
    fn analysis_method_from_str_accepts_legacy_image_label() {
        assert_eq!(
            AnalysisMethod::from_str("image"),
            Some(AnalysisMethod::Bands)
        );
        assert_eq!(
            AnalysisMethod::from_str("coordinates"),
            Some(AnalysisMethod::Coordinates)
        );
        assert_eq!(AnalysisMethod::from_str("satellite"), None);
    }

    #[test]
    fn vegetation_health_labels() {
        assert_eq!(snapshot(0.7, 50.0, 40.0).vegetation_health(), "Excellent");
        assert_eq!(snapshot(0.5, 50.0, 40.0).vegetation_health(), "Good");
        assert_eq!(snapshot(0.3, 50.0, 40.0).vegetation_health(), "Fair");
        assert_eq!(snapshot(0.1, 50.0, 40.0).vegetation_health(), "Poor");
        // Thresholds are strict
        assert_eq!(snapshot(0.6, 50.0, 40.0).vegetation_health(), "Good");
    }

    #[test]
    fn soil_and_water_labels() {
        assert_eq!(snapshot(0.5, 75.0, 40.0).soil_condition(), "Excellent");
        assert_eq!(snapshot(0.5, 60.0, 40.0).soil_condition(), "Good");
        assert_eq!(
            snapshot(0.5, 50.0, 40.0).soil_condition(),
            "Needs improvement"
        );
        assert_eq!(snapshot(0.5, 60.0, 20.0).water_status(), "Adequate");
        assert_eq!(snapshot(0.5, 60.0, 45.0).water_status(), "Moderate stress");
        assert_eq!(snapshot(0.5, 60.0, 60.0).water_status(), "High stress");
    }
}

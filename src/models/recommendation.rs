use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Crop,
    Tree,
    Practice,
}

impl CandidateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Crop => "crop",
            CandidateKind::Tree => "tree",
            CandidateKind::Practice => "practice",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "crop" => Some(CandidateKind::Crop),
            "tree" => Some(CandidateKind::Tree),
            "practice" => Some(CandidateKind::Practice),
            _ => None,
        }
    }
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterTolerance {
    Low,
    Moderate,
    High,
}

/// One entry of the static planting/practice registry. All fields are
/// `'static` so the registry can live in a static slice shared across
/// concurrent scoring calls.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationCandidate {
    pub name: &'static str,
    pub kind: CandidateKind,
    pub min_ndvi: f64,
    pub max_ndvi: f64,
    pub min_soil_quality: f64,
    pub nitrogen_fixing: bool,
    pub water_tolerance: WaterTolerance,
    pub reason: &'static str,
    pub impact: CandidateImpact,
    pub notes: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct CandidateImpact {
    pub ndvi_increase: f64,
    pub soil_improvement: f64,
    pub timeframe: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedImpact {
    pub ndvi_increase: f64,
    pub soil_improvement: f64,
    pub timeframe: String,
}

impl From<CandidateImpact> for ExpectedImpact {
    fn from(impact: CandidateImpact) -> Self {
        Self {
            ndvi_increase: impact.ndvi_increase,
            soil_improvement: impact.soil_improvement,
            timeframe: impact.timeframe.to_string(),
        }
    }
}

/// A scored recommendation tied to the analysis snapshot it was derived
/// from. Confidence is a bounded strength signal in [0, 0.99], not a
/// probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub id: Option<i64>,
    pub analysis_id: Option<i64>,
    pub name: String,
    pub kind: CandidateKind,
    pub reason: String,
    pub confidence: f64,
    pub priority: Priority,
    pub expected_impact: ExpectedImpact,
    pub implementation_notes: String,
}

/// Roll-up of one scoring run, shown alongside the ranked list.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSummary {
    pub total: usize,
    pub urgent_actions: usize,
    pub focus_area: &'static str,
}

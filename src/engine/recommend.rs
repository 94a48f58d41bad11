use super::indices::round2;
use crate::models::{
    AnalysisSnapshot, CandidateImpact, CandidateKind, Priority, RecommendationCandidate,
    RecommendationResult, RecommendationSummary, RiskLevel, WaterTolerance,
};

/// Static planting/practice registry, built once and shared read-only
/// across all scoring calls.
pub static REGISTRY: &[RecommendationCandidate] = &[
    RecommendationCandidate {
        name: "Legumes (Beans, Peas)",
        kind: CandidateKind::Crop,
        min_ndvi: 0.0,
        max_ndvi: 0.5,
        min_soil_quality: 30.0,
        nitrogen_fixing: true,
        water_tolerance: WaterTolerance::Moderate,
        reason: "Nitrogen-fixing properties improve soil health",
        impact: CandidateImpact {
            ndvi_increase: 0.15,
            soil_improvement: 25.0,
            timeframe: "3-6 months",
        },
        notes: "Plant in well-drained soil. Rotate with cereal crops.",
    },
    RecommendationCandidate {
        name: "Cover Crops (Clover, Vetch)",
        kind: CandidateKind::Practice,
        min_ndvi: 0.0,
        max_ndvi: 0.4,
        min_soil_quality: 20.0,
        nitrogen_fixing: true,
        water_tolerance: WaterTolerance::High,
        reason: "Prevents erosion and adds organic matter",
        impact: CandidateImpact {
            ndvi_increase: 0.2,
            soil_improvement: 30.0,
            timeframe: "6-12 months",
        },
        notes: "Plant between main crop seasons. Incorporate into soil before flowering.",
    },
    RecommendationCandidate {
        name: "Moringa Trees",
        kind: CandidateKind::Tree,
        min_ndvi: 0.2,
        max_ndvi: 0.6,
        min_soil_quality: 40.0,
        nitrogen_fixing: false,
        water_tolerance: WaterTolerance::Low,
        reason: "Fast-growing, nutrient-rich, drought-resistant",
        impact: CandidateImpact {
            ndvi_increase: 0.25,
            soil_improvement: 20.0,
            timeframe: "12-24 months",
        },
        notes: "Space 2-3 meters apart. Prune regularly for optimal growth.",
    },
    RecommendationCandidate {
        name: "Agroforestry (Mixed System)",
        kind: CandidateKind::Practice,
        min_ndvi: 0.3,
        max_ndvi: 1.0,
        min_soil_quality: 50.0,
        nitrogen_fixing: false,
        water_tolerance: WaterTolerance::Moderate,
        reason: "Combines trees with crops for biodiversity",
        impact: CandidateImpact {
            ndvi_increase: 0.3,
            soil_improvement: 40.0,
            timeframe: "24-36 months",
        },
        notes: "Integrate nitrogen-fixing trees with annual crops. Plan for long-term benefits.",
    },
    RecommendationCandidate {
        name: "Sorghum",
        kind: CandidateKind::Crop,
        min_ndvi: 0.3,
        max_ndvi: 0.7,
        min_soil_quality: 45.0,
        nitrogen_fixing: false,
        water_tolerance: WaterTolerance::Low,
        reason: "Drought-tolerant cereal with deep roots",
        impact: CandidateImpact {
            ndvi_increase: 0.1,
            soil_improvement: 15.0,
            timeframe: "4-6 months",
        },
        notes: "Suitable for semi-arid regions. Requires minimal irrigation.",
    },
    RecommendationCandidate {
        name: "Bamboo Groves",
        kind: CandidateKind::Tree,
        min_ndvi: 0.4,
        max_ndvi: 1.0,
        min_soil_quality: 60.0,
        nitrogen_fixing: false,
        water_tolerance: WaterTolerance::High,
        reason: "Rapid carbon sequestration and erosion control",
        impact: CandidateImpact {
            ndvi_increase: 0.35,
            soil_improvement: 35.0,
            timeframe: "18-30 months",
        },
        notes: "Excellent for riparian zones. Harvest sustainably for income.",
    },
];

/// Score the registry against one analysis snapshot and return the top
/// recommendations, ranked by confidence (ties keep registry order).
///
/// Scoring: base 0.5; +0.2 for nitrogen fixers in poor soil; +0.15 for
/// drought-tolerant options under water stress; +0.15 for practices on
/// degraded land. Priority derives jointly from the raw score and a
/// risk-level boost, with the boost dominating: a high-risk plot never
/// yields a Low-priority recommendation.
pub fn score(
    snapshot: &AnalysisSnapshot,
    registry: &[RecommendationCandidate],
) -> Vec<RecommendationResult> {
    let boost = snapshot.degradation_risk.priority_boost();

    let mut scored: Vec<RecommendationResult> = registry
        .iter()
        .filter(|c| {
            snapshot.ndvi >= c.min_ndvi
                && snapshot.ndvi <= c.max_ndvi
                && snapshot.soil_quality >= c.min_soil_quality
        })
        .map(|c| {
            let mut score: f64 = 0.5;

            if c.nitrogen_fixing && snapshot.soil_quality < 50.0 {
                score += 0.2;
            }
            if c.water_tolerance == WaterTolerance::Low && snapshot.water_stress > 50.0 {
                score += 0.15;
            }
            if c.kind == CandidateKind::Practice && snapshot.degradation_risk != RiskLevel::Low {
                score += 0.15;
            }

            let priority = if score > 0.8 || boost >= 2 {
                Priority::Urgent
            } else if score > 0.65 || boost >= 1 {
                Priority::High
            } else if score < 0.4 {
                Priority::Low
            } else {
                Priority::Medium
            };

            RecommendationResult {
                id: None,
                analysis_id: snapshot.id,
                name: c.name.to_string(),
                kind: c.kind,
                reason: c.reason.to_string(),
                confidence: score.min(0.99),
                priority,
                expected_impact: c.impact.into(),
                implementation_notes: c.notes.to_string(),
            }
        })
        .collect();

    // Stable sort: equal confidence preserves registry order
    scored.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    scored.truncate(5);

    for rec in &mut scored {
        rec.confidence = round2(rec.confidence);
    }

    scored
}

pub fn summarize(results: &[RecommendationResult], risk: RiskLevel) -> RecommendationSummary {
    RecommendationSummary {
        total: results.len(),
        urgent_actions: results
            .iter()
            .filter(|r| r.priority == Priority::Urgent)
            .count(),
        focus_area: if risk >= RiskLevel::High {
            "Soil regeneration"
        } else {
            "Sustainable intensification"
        },
    }
}

use crate::models::RiskLevel;

/// Classify degradation risk from vegetation greenness and soil quality.
///
/// Rules are evaluated top to bottom with strict comparisons; the first
/// match wins, so a plot with healthy NDVI but poor soil falls through to
/// the NDVI-only rule.
pub fn classify(ndvi: f64, soil_quality: f64) -> RiskLevel {
    if ndvi > 0.6 && soil_quality > 70.0 {
        RiskLevel::Low
    } else if ndvi > 0.4 && soil_quality > 50.0 {
        RiskLevel::Medium
    } else if ndvi > 0.2 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_table() {
        assert_eq!(classify(0.7, 80.0), RiskLevel::Low);
        assert_eq!(classify(0.5, 60.0), RiskLevel::Medium);
        assert_eq!(classify(0.3, 40.0), RiskLevel::High);
        assert_eq!(classify(0.1, 20.0), RiskLevel::Critical);
    }

    #[test]
    fn boundaries_use_strict_comparison() {
        // Exactly at the low thresholds -> Medium, not Low
        assert_eq!(classify(0.6, 70.0), RiskLevel::Medium);
        assert_eq!(classify(0.7, 70.0), RiskLevel::Medium);
        assert_eq!(classify(0.6, 80.0), RiskLevel::Medium);
        // Exactly at the medium thresholds -> High
        assert_eq!(classify(0.4, 50.0), RiskLevel::High);
        // Exactly at the high threshold -> Critical
        assert_eq!(classify(0.2, 90.0), RiskLevel::Critical);
    }

    #[test]
    fn good_ndvi_with_poor_soil_falls_through_to_high() {
        // Medium's soil condition fails, so the NDVI-only rule applies
        assert_eq!(classify(0.5, 40.0), RiskLevel::High);
        assert_eq!(classify(0.65, 30.0), RiskLevel::High);
    }

    #[test]
    fn classification_is_monotonic() {
        // Improving either input never worsens the category
        let steps = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];
        let soils = [0.0, 25.0, 50.0, 60.0, 70.0, 80.0, 100.0];
        for (i, &ndvi) in steps.iter().enumerate() {
            for (j, &soil) in soils.iter().enumerate() {
                let here = classify(ndvi, soil);
                if i + 1 < steps.len() {
                    assert!(classify(steps[i + 1], soil) <= here);
                }
                if j + 1 < soils.len() {
                    assert!(classify(ndvi, soils[j + 1]) <= here);
                }
            }
        }
    }
}

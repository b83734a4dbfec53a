//! Scoring for the wellness questionnaire. Pure arithmetic over the answers;
//! persistence and presentation live elsewhere.

use std::collections::BTreeMap;

use crate::metrics::{ActivityLevel, PainArea, PainSeverity};

/// Normalized questionnaire answers, each in [0, 1]. Sleep quality and
/// work-life balance must be inverted by the caller before normalizing,
/// since high satisfaction means low stress.
#[derive(Debug, Clone, Copy)]
pub struct StressResponses {
    pub work_stress: f64,
    pub sleep_quality: f64,
    pub anxiety_level: f64,
    pub work_life_balance: f64,
}

/// Weighted stress score on a 0-10 scale.
pub fn stress_score(responses: &StressResponses) -> u8 {
    let score = responses.work_stress * 0.3
        + responses.sleep_quality * 0.2
        + responses.anxiety_level * 0.3
        + responses.work_life_balance * 0.2;
    (score * 10.0).round().clamp(0.0, 10.0) as u8
}

/// BMI from weight (kg) and height (m), rounded to one decimal.
/// Returns 0.0 for a zero or negative height rather than failing.
pub fn bmi(weight_kg: f64, height_m: f64) -> f64 {
    if height_m <= 0.0 {
        return 0.0;
    }
    let raw = weight_kg / (height_m * height_m);
    (raw * 10.0).round() / 10.0
}

/// Summed severity over all reported pain areas.
pub fn physical_score(pain_points: &BTreeMap<PainArea, PainSeverity>) -> u8 {
    pain_points.values().map(|severity| severity.score()).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscomfortRisk {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for DiscomfortRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscomfortRisk::Low => write!(f, "Low"),
            DiscomfortRisk::Medium => write!(f, "Medium"),
            DiscomfortRisk::High => write!(f, "High"),
        }
    }
}

pub fn discomfort_risk(physical_score: u8) -> DiscomfortRisk {
    if physical_score > 8 {
        DiscomfortRisk::High
    } else if physical_score > 4 {
        DiscomfortRisk::Medium
    } else {
        DiscomfortRisk::Low
    }
}

/// Weekly activity score out of 10: session points summed and halved.
pub fn activity_score(sessions: &[ActivityLevel]) -> f64 {
    let points: u32 = sessions.iter().map(|level| level.points()).sum();
    (points as f64 / 2.0).min(10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stress_score_weighting() {
        // All answers at maximum stress.
        let worst = StressResponses {
            work_stress: 1.0,
            sleep_quality: 1.0,
            anxiety_level: 1.0,
            work_life_balance: 1.0,
        };
        assert_eq!(stress_score(&worst), 10);

        let calm = StressResponses {
            work_stress: 0.0,
            sleep_quality: 0.0,
            anxiety_level: 0.0,
            work_life_balance: 0.0,
        };
        assert_eq!(stress_score(&calm), 0);

        // 0.5*0.3 + 0.0*0.2 + 1.0*0.3 + 0.5*0.2 = 0.55 -> 6 after rounding.
        let mixed = StressResponses {
            work_stress: 0.5,
            sleep_quality: 0.0,
            anxiety_level: 1.0,
            work_life_balance: 0.5,
        };
        assert_eq!(stress_score(&mixed), 6);
    }

    #[test]
    fn test_bmi_rounding_and_zero_height() {
        assert_eq!(bmi(70.0, 1.7), 24.2);
        assert_eq!(bmi(90.0, 1.7), 31.1);
        assert_eq!(bmi(70.0, 0.0), 0.0);
    }

    #[test]
    fn test_discomfort_risk_bands() {
        assert_eq!(discomfort_risk(0), DiscomfortRisk::Low);
        assert_eq!(discomfort_risk(4), DiscomfortRisk::Low);
        assert_eq!(discomfort_risk(5), DiscomfortRisk::Medium);
        assert_eq!(discomfort_risk(8), DiscomfortRisk::Medium);
        assert_eq!(discomfort_risk(9), DiscomfortRisk::High);
    }

    #[test]
    fn test_physical_score_sums_severities() {
        let mut pain = BTreeMap::new();
        pain.insert(PainArea::Neck, PainSeverity::Severe);
        pain.insert(PainArea::Back, PainSeverity::Moderate);
        pain.insert(PainArea::Head, PainSeverity::None);
        assert_eq!(physical_score(&pain), 5);
    }

    #[test]
    fn test_activity_score_capped() {
        let light_week = [ActivityLevel::Light, ActivityLevel::Moderate];
        assert_eq!(activity_score(&light_week), 2.5);

        let heavy_week = [ActivityLevel::Vigorous; 10];
        assert_eq!(activity_score(&heavy_week), 10.0);
    }
}

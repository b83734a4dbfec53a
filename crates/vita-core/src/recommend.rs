//! Fixed recommendation tables keyed by assessment results. Data, not code:
//! the selection logic stays trivial so the tables can grow freely.

use std::collections::BTreeMap;

use crate::metrics::{ActivityLevel, PainArea, PainSeverity};

const HIGH_STRESS: &[&str] = &[
    "Practice deep breathing exercises 3 times daily",
    "Take regular breaks every 45 minutes",
    "Consider meditation or mindfulness practices",
    "Schedule regular video calls with colleagues or friends",
];

const MEDIUM_STRESS: &[&str] = &[
    "Take short walks during breaks",
    "Practice desk stretches",
    "Maintain a consistent work schedule",
    "Create a dedicated workspace",
];

const LOW_STRESS: &[&str] = &[
    "Continue your current stress management practices",
    "Schedule regular exercise",
    "Maintain work-life boundaries",
    "Stay connected with colleagues",
];

pub fn stress_recommendations(stress_score: u8) -> &'static [&'static str] {
    if stress_score >= 7 {
        HIGH_STRESS
    } else if stress_score >= 4 {
        MEDIUM_STRESS
    } else {
        LOW_STRESS
    }
}

const NECK: &[&str] = &[
    "Position screen at eye level",
    "Use a document holder",
    "Take regular neck stretching breaks",
];

const SHOULDERS: &[&str] = &[
    "Keep elbows close to body while typing",
    "Use armrests if available",
    "Practice shoulder rolls",
];

const BACK: &[&str] = &[
    "Use a chair with good lumbar support",
    "Maintain proper posture",
    "Take standing breaks every hour",
];

const WRISTS: &[&str] = &[
    "Keep wrists straight while typing",
    "Use wrist rests",
    "Perform wrist stretches",
];

fn area_recommendations(area: PainArea) -> Option<&'static [&'static str]> {
    match area {
        PainArea::Neck => Some(NECK),
        PainArea::Shoulders => Some(SHOULDERS),
        PainArea::Back => Some(BACK),
        PainArea::Wrists => Some(WRISTS),
        // No dedicated ergonomic advice for headaches.
        PainArea::Head => None,
    }
}

pub fn ergonomic_recommendations(
    pain_points: &BTreeMap<PainArea, PainSeverity>,
) -> Vec<&'static str> {
    let mut result = Vec::new();
    for (area, severity) in pain_points {
        if *severity == PainSeverity::None {
            continue;
        }
        if let Some(recs) = area_recommendations(*area) {
            result.extend_from_slice(recs);
        }
    }
    result
}

const ACTIVITY_BASE: &[&str] = &[
    "Aim for 150 minutes of moderate activity per week",
    "Include both cardio and strength training",
    "Take regular walking breaks during work hours",
    "Set up a standing desk if possible",
];

const HIGH_BMI_EXTRAS: &[&str] = &[
    "Focus on low-impact activities initially",
    "Gradually increase activity duration",
    "Consider consulting a healthcare provider",
];

const SEDENTARY_EXTRAS: &[&str] = &[
    "Start with 5-10 minute walking breaks",
    "Try desk exercises",
    "Set hourly movement reminders",
];

pub fn activity_recommendations(bmi: f64, activity_level: ActivityLevel) -> Vec<&'static str> {
    let mut result = ACTIVITY_BASE.to_vec();
    if bmi >= 25.0 {
        result.extend_from_slice(HIGH_BMI_EXTRAS);
    }
    if activity_level == ActivityLevel::Sedentary {
        result.extend_from_slice(SEDENTARY_EXTRAS);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stress_bands() {
        assert_eq!(stress_recommendations(9), HIGH_STRESS);
        assert_eq!(stress_recommendations(7), HIGH_STRESS);
        assert_eq!(stress_recommendations(6), MEDIUM_STRESS);
        assert_eq!(stress_recommendations(4), MEDIUM_STRESS);
        assert_eq!(stress_recommendations(3), LOW_STRESS);
    }

    #[test]
    fn test_ergonomic_skips_painless_and_uncovered_areas() {
        let mut pain = BTreeMap::new();
        pain.insert(PainArea::Neck, PainSeverity::Mild);
        pain.insert(PainArea::Back, PainSeverity::None);
        pain.insert(PainArea::Head, PainSeverity::Severe);

        let recs = ergonomic_recommendations(&pain);
        assert_eq!(recs.len(), NECK.len());
        assert!(recs.contains(&"Position screen at eye level"));
    }

    #[test]
    fn test_activity_extras_stack() {
        let base = activity_recommendations(22.0, ActivityLevel::Moderate);
        assert_eq!(base.len(), ACTIVITY_BASE.len());

        let heavy_and_sedentary = activity_recommendations(27.5, ActivityLevel::Sedentary);
        assert_eq!(
            heavy_and_sedentary.len(),
            ACTIVITY_BASE.len() + HIGH_BMI_EXTRAS.len() + SEDENTARY_EXTRAS.len()
        );
    }
}

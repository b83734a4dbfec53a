use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Self-reported daily activity level from the assessment questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Vigorous,
}

impl ActivityLevel {
    /// Points per session, used by the weekly activity score.
    pub fn points(&self) -> u32 {
        match self {
            ActivityLevel::Sedentary => 1,
            ActivityLevel::Light => 2,
            ActivityLevel::Moderate => 3,
            ActivityLevel::Vigorous => 4,
        }
    }
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityLevel::Sedentary => write!(f, "sedentary"),
            ActivityLevel::Light => write!(f, "light"),
            ActivityLevel::Moderate => write!(f, "moderate"),
            ActivityLevel::Vigorous => write!(f, "vigorous"),
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "vigorous" => Ok(ActivityLevel::Vigorous),
            other => Err(Error::invalid_request(format!(
                "unknown activity level: {other}"
            ))),
        }
    }
}

/// Kind of a single logged activity session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Walking,
    Stretching,
    Exercise,
    Standing,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Walking => write!(f, "walking"),
            ActivityKind::Stretching => write!(f, "stretching"),
            ActivityKind::Exercise => write!(f, "exercise"),
            ActivityKind::Standing => write!(f, "standing"),
        }
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walking" => Ok(ActivityKind::Walking),
            "stretching" => Ok(ActivityKind::Stretching),
            "exercise" => Ok(ActivityKind::Exercise),
            "standing" => Ok(ActivityKind::Standing),
            other => Err(Error::invalid_request(format!(
                "unknown activity kind: {other}"
            ))),
        }
    }
}

/// Body area covered by the pain questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PainArea {
    Neck,
    Shoulders,
    Back,
    Wrists,
    Head,
}

impl PainArea {
    pub const ALL: [PainArea; 5] = [
        PainArea::Neck,
        PainArea::Shoulders,
        PainArea::Back,
        PainArea::Wrists,
        PainArea::Head,
    ];
}

impl std::fmt::Display for PainArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PainArea::Neck => write!(f, "neck"),
            PainArea::Shoulders => write!(f, "shoulders"),
            PainArea::Back => write!(f, "back"),
            PainArea::Wrists => write!(f, "wrists"),
            PainArea::Head => write!(f, "head"),
        }
    }
}

impl std::str::FromStr for PainArea {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neck" => Ok(PainArea::Neck),
            "shoulders" => Ok(PainArea::Shoulders),
            "back" => Ok(PainArea::Back),
            "wrists" => Ok(PainArea::Wrists),
            "head" => Ok(PainArea::Head),
            other => Err(Error::invalid_request(format!("unknown pain area: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PainSeverity {
    #[default]
    None,
    Mild,
    Moderate,
    Severe,
}

impl PainSeverity {
    pub fn score(&self) -> u8 {
        match self {
            PainSeverity::None => 0,
            PainSeverity::Mild => 1,
            PainSeverity::Moderate => 2,
            PainSeverity::Severe => 3,
        }
    }
}

impl std::fmt::Display for PainSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PainSeverity::None => write!(f, "none"),
            PainSeverity::Mild => write!(f, "mild"),
            PainSeverity::Moderate => write!(f, "moderate"),
            PainSeverity::Severe => write!(f, "severe"),
        }
    }
}

impl std::str::FromStr for PainSeverity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(PainSeverity::None),
            "mild" => Ok(PainSeverity::Mild),
            "moderate" => Ok(PainSeverity::Moderate),
            "severe" => Ok(PainSeverity::Severe),
            other => Err(Error::invalid_request(format!(
                "unknown pain severity: {other}"
            ))),
        }
    }
}

/// One completed wellness assessment. Scores are snapshots; the raw
/// questionnaire answers are not kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub timestamp: DateTime<Utc>,
    /// Weighted stress score, 0-10.
    pub stress_score: u8,
    pub bmi: f64,
    pub activity_level: ActivityLevel,
    /// Summed pain-point severity, 0-15.
    pub physical_score: u8,
    pub pain_points: BTreeMap<PainArea, PainSeverity>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightLog {
    pub timestamp: DateTime<Utc>,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StressLog {
    pub timestamp: DateTime<Utc>,
    /// 0-10.
    pub score: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActivityLog {
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    /// Session length in minutes, > 0.
    pub minutes: u32,
}

/// Point-in-time bundle of a user's wellness history. Every series is
/// ordered newest-first, matching how the store reads them back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub assessments: Vec<Assessment>,
    pub weight_logs: Vec<WeightLog>,
    pub stress_logs: Vec<StressLog>,
    pub activity_logs: Vec<ActivityLog>,
}

impl MetricSnapshot {
    pub fn latest_assessment(&self) -> Option<&Assessment> {
        self.assessments.first()
    }
}

/// Qualitative BMI banding. Thresholds partition the whole input range:
/// <18.5, <25, <30, <35, <40, and everything above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    ObesityI,
    ObesityII,
    ObesityIII,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else if bmi < 35.0 {
            BmiCategory::ObesityI
        } else if bmi < 40.0 {
            BmiCategory::ObesityII
        } else {
            BmiCategory::ObesityIII
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BmiCategory::Underweight => write!(f, "Underweight"),
            BmiCategory::Normal => write!(f, "Normal"),
            BmiCategory::Overweight => write!(f, "Overweight"),
            BmiCategory::ObesityI => write!(f, "Obesity I"),
            BmiCategory::ObesityII => write!(f, "Obesity II"),
            BmiCategory::ObesityIII => write!(f, "Obesity III"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_thresholds_partition() {
        // Just below and at each boundary.
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.9), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.9), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::ObesityI);
        assert_eq!(BmiCategory::from_bmi(34.9), BmiCategory::ObesityI);
        assert_eq!(BmiCategory::from_bmi(35.0), BmiCategory::ObesityII);
        assert_eq!(BmiCategory::from_bmi(39.9), BmiCategory::ObesityII);
        assert_eq!(BmiCategory::from_bmi(40.0), BmiCategory::ObesityIII);
        assert_eq!(BmiCategory::from_bmi(55.0), BmiCategory::ObesityIII);
    }

    #[test]
    fn test_bmi_category_monotonic() {
        let order = |c: BmiCategory| match c {
            BmiCategory::Underweight => 0,
            BmiCategory::Normal => 1,
            BmiCategory::Overweight => 2,
            BmiCategory::ObesityI => 3,
            BmiCategory::ObesityII => 4,
            BmiCategory::ObesityIII => 5,
        };
        let mut previous = 0;
        let mut bmi = 10.0;
        while bmi < 50.0 {
            let rank = order(BmiCategory::from_bmi(bmi));
            assert!(rank >= previous, "category regressed at bmi {bmi}");
            previous = rank;
            bmi += 0.1;
        }
    }

    #[test]
    fn test_activity_level_round_trip() {
        for level in [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Vigorous,
        ] {
            assert_eq!(level.to_string().parse::<ActivityLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_pain_severity_scores() {
        assert_eq!(PainSeverity::None.score(), 0);
        assert_eq!(PainSeverity::Severe.score(), 3);
    }

    #[test]
    fn test_latest_assessment_is_first() {
        let snapshot = MetricSnapshot::default();
        assert!(snapshot.latest_assessment().is_none());
    }
}

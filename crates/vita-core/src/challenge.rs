use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Active,
    Completed,
}

impl std::fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChallengeStatus::Active => write!(f, "active"),
            ChallengeStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for ChallengeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ChallengeStatus::Active),
            "completed" => Ok(ChallengeStatus::Completed),
            other => Err(Error::serialization(format!(
                "unknown challenge status: {other}"
            ))),
        }
    }
}

/// Mutable part of a challenge, stored as a JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub current_day: u32,
    pub completed_tasks: Vec<String>,
}

impl Default for ChallengeProgress {
    fn default() -> Self {
        Self {
            current_day: 1,
            completed_tasks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: i64,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: ChallengeStatus,
    pub progress: ChallengeProgress,
}

impl Challenge {
    /// Whole-day span from start to end. Equals the duration the challenge
    /// was started with when end = start + duration days.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn is_active(&self) -> bool {
        self.status == ChallengeStatus::Active
    }

    /// Record a completed task and advance the day counter. The counter is
    /// capped so it never exceeds span + 1.
    pub fn complete_task(&mut self, task: impl Into<String>) {
        self.progress.completed_tasks.push(task.into());
        let cap = (self.span_days() + 1).max(1) as u32;
        self.progress.current_day = (self.progress.current_day + 1).min(cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn week_challenge() -> Challenge {
        let start = Utc::now();
        Challenge {
            id: 1,
            name: "7-Day Posture Challenge".to_string(),
            start_date: start,
            end_date: start + Duration::days(7),
            status: ChallengeStatus::Active,
            progress: ChallengeProgress::default(),
        }
    }

    #[test]
    fn test_complete_task_advances_day() {
        let mut challenge = week_challenge();
        challenge.complete_task("Set hourly posture reminders");
        assert_eq!(challenge.progress.current_day, 2);
        assert_eq!(challenge.progress.completed_tasks.len(), 1);
    }

    #[test]
    fn test_current_day_capped_at_span_plus_one() {
        let mut challenge = week_challenge();
        for day in 0..20 {
            challenge.complete_task(format!("task {day}"));
        }
        assert_eq!(challenge.progress.current_day, 8);
        assert_eq!(challenge.progress.completed_tasks.len(), 20);
    }

    #[test]
    fn test_progress_json_shape() {
        let progress = ChallengeProgress::default();
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["current_day"], 1);
        assert!(json["completed_tasks"].as_array().unwrap().is_empty());
    }
}

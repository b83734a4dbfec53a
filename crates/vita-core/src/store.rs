use chrono::{DateTime, Utc};

use crate::challenge::{Challenge, ChallengeProgress};
use crate::error::Error;
use crate::message::ChatTurn;
use crate::metrics::{ActivityLog, Assessment, MetricSnapshot, StressLog, WeightLog};
use crate::profile::{UserId, UserProfile};

/// Persistent store for user data, keyed by an opaque user id.
///
/// Log-shaped data (assessments, metric logs, chat turns) is append-only and
/// reads back newest-first. Challenge progress is the one record mutated in
/// place. Writes for a given user are serialized by the caller, so
/// implementations need no per-user coordination beyond connection safety.
pub trait UserStore: Send + Sync {
    fn create_user(&self, name: &str, email: &str) -> Result<UserId, Error>;

    fn user_by_email(&self, email: &str) -> Result<Option<UserProfile>, Error>;

    fn profile(&self, user: UserId) -> Result<Option<UserProfile>, Error>;

    fn save_assessment(&self, user: UserId, assessment: &Assessment) -> Result<(), Error>;

    fn log_weight(&self, user: UserId, entry: &WeightLog) -> Result<(), Error>;

    fn log_stress(&self, user: UserId, entry: &StressLog) -> Result<(), Error>;

    fn log_activity(&self, user: UserId, entry: &ActivityLog) -> Result<(), Error>;

    /// Full metric history, every series newest-first.
    fn metrics(&self, user: UserId) -> Result<MetricSnapshot, Error>;

    /// Create an active challenge running from `start` for `duration_days`,
    /// with progress at day 1 and no completed tasks. Returns the challenge id.
    fn start_challenge(
        &self,
        user: UserId,
        name: &str,
        start: DateTime<Utc>,
        duration_days: u32,
    ) -> Result<i64, Error>;

    /// Active challenges, most recently started first.
    fn active_challenges(&self, user: UserId) -> Result<Vec<Challenge>, Error>;

    fn update_challenge_progress(
        &self,
        challenge_id: i64,
        progress: &ChallengeProgress,
    ) -> Result<(), Error>;

    fn append_chat_turn(&self, user: UserId, turn: &ChatTurn) -> Result<(), Error>;

    /// The most recent chat turns, newest-first, at most `limit` of them.
    fn recent_chat_turns(&self, user: UserId, limit: usize) -> Result<Vec<ChatTurn>, Error>;
}

//! Loads the per-user bundle the context builder works from.

use tracing::debug;

use vita_core::store::UserStore;
use vita_core::{Challenge, ChatTurn, Error, MetricSnapshot, Result, UserId, UserProfile};

/// How many recent chat turns are pulled into context.
pub const RECENT_TURN_WINDOW: usize = 15;

/// Everything the assistant knows about a user at the start of a turn.
/// All series are newest-first, as the store returns them.
#[derive(Debug, Clone)]
pub struct UserHistory {
    pub profile: UserProfile,
    pub metrics: MetricSnapshot,
    pub active_challenges: Vec<Challenge>,
    pub recent_turns: Vec<ChatTurn>,
}

impl UserHistory {
    /// The assistant's most recent persisted reply, if any.
    pub fn previous_reply(&self) -> Option<&str> {
        self.recent_turns
            .iter()
            .find(|turn| turn.role == vita_core::Role::Assistant)
            .map(|turn| turn.content.as_str())
    }
}

/// Fetch the full bundle for one user. A missing profile is fatal for the
/// request; every downstream section depends on it.
pub fn load(store: &dyn UserStore, user: UserId) -> Result<UserHistory> {
    let profile = store
        .profile(user)?
        .ok_or_else(|| Error::missing_user_data(format!("no profile for user {user}")))?;

    let metrics = store.metrics(user)?;
    let active_challenges = store.active_challenges(user)?;
    let recent_turns = store.recent_chat_turns(user, RECENT_TURN_WINDOW)?;

    debug!(
        user,
        assessments = metrics.assessments.len(),
        challenges = active_challenges.len(),
        turns = recent_turns.len(),
        "loaded user history"
    );

    Ok(UserHistory {
        profile,
        metrics,
        active_challenges,
        recent_turns,
    })
}

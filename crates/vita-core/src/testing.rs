//! Test utilities shared across the workspace.
//! Only compiled when running tests or with the `testing` feature.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::challenge::{Challenge, ChallengeProgress, ChallengeStatus};
use crate::error::Error;
use crate::message::{ChatTurn, Message, Usage};
use crate::metrics::{ActivityLog, Assessment, MetricSnapshot, StressLog, WeightLog};
use crate::profile::{UserId, UserProfile};
use crate::provider::{CompletionRequest, CompletionResponse, FinishReason, Provider};
use crate::store::UserStore;

/// A mock provider that returns pre-configured responses.
pub struct MockProvider {
    responses: Mutex<Vec<CompletionResponse>>,
    /// Captured requests (for assertion).
    pub captured_requests: Mutex<Vec<CompletionRequest>>,
    pub name: String,
    pub default_model: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            captured_requests: Mutex::new(Vec::new()),
            name: "mock".to_string(),
            default_model: None,
        }
    }

    /// Queue a response to be returned by the next complete() call.
    /// Responses are returned in FIFO order (first queued = first returned).
    pub fn queue_response(&self, content: &str) {
        self.queue_raw_response(CompletionResponse {
            message: Message::assistant(content),
            usage: Usage::new(0, 0),
            model: "mock-model".to_string(),
            finish_reason: FinishReason::Stop,
        });
    }

    /// Queue a response whose finish reason says the token budget ran out.
    pub fn queue_truncated_response(&self, content: &str) {
        self.queue_raw_response(CompletionResponse {
            message: Message::assistant(content),
            usage: Usage::new(0, 0),
            model: "mock-model".to_string(),
            finish_reason: FinishReason::Length,
        });
    }

    /// Queue a raw CompletionResponse.
    pub fn queue_raw_response(&self, response: CompletionResponse) {
        self.responses.lock().unwrap().insert(0, response);
    }

    /// Get the number of captured requests.
    pub fn request_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    /// Get the last captured request.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, Error> {
        self.captured_requests.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop() {
            Some(response) => Ok(response),
            None => Err(Error::Unknown("No mock response queued".to_string())),
        }
    }
}

#[derive(Default)]
struct StoreData {
    users: Vec<UserProfile>,
    assessments: HashMap<UserId, Vec<Assessment>>,
    weight_logs: HashMap<UserId, Vec<WeightLog>>,
    stress_logs: HashMap<UserId, Vec<StressLog>>,
    activity_logs: HashMap<UserId, Vec<ActivityLog>>,
    challenges: Vec<(UserId, Challenge)>,
    chat_turns: HashMap<UserId, Vec<ChatTurn>>,
}

/// An in-memory store for exercising chat flows without SQLite.
/// Entries are appended in call order; reads reverse them, so tests see the
/// same newest-first ordering the real store produces.
#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<StoreData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T: Clone>(entries: Option<&Vec<T>>) -> Vec<T> {
    entries
        .map(|list| list.iter().rev().cloned().collect())
        .unwrap_or_default()
}

impl UserStore for InMemoryStore {
    fn create_user(&self, name: &str, email: &str) -> Result<UserId, Error> {
        let mut data = self.data.lock().unwrap();
        if data.users.iter().any(|user| user.email == email) {
            return Err(Error::storage(format!("email already registered: {email}")));
        }
        let id = data.users.len() as UserId + 1;
        data.users.push(UserProfile::new(id, name, email));
        Ok(id)
    }

    fn user_by_email(&self, email: &str) -> Result<Option<UserProfile>, Error> {
        let data = self.data.lock().unwrap();
        Ok(data.users.iter().find(|user| user.email == email).cloned())
    }

    fn profile(&self, user: UserId) -> Result<Option<UserProfile>, Error> {
        let data = self.data.lock().unwrap();
        Ok(data.users.iter().find(|profile| profile.id == user).cloned())
    }

    fn save_assessment(&self, user: UserId, assessment: &Assessment) -> Result<(), Error> {
        let mut data = self.data.lock().unwrap();
        data.assessments
            .entry(user)
            .or_default()
            .push(assessment.clone());
        Ok(())
    }

    fn log_weight(&self, user: UserId, entry: &WeightLog) -> Result<(), Error> {
        let mut data = self.data.lock().unwrap();
        data.weight_logs.entry(user).or_default().push(*entry);
        Ok(())
    }

    fn log_stress(&self, user: UserId, entry: &StressLog) -> Result<(), Error> {
        let mut data = self.data.lock().unwrap();
        data.stress_logs.entry(user).or_default().push(*entry);
        Ok(())
    }

    fn log_activity(&self, user: UserId, entry: &ActivityLog) -> Result<(), Error> {
        let mut data = self.data.lock().unwrap();
        data.activity_logs.entry(user).or_default().push(*entry);
        Ok(())
    }

    fn metrics(&self, user: UserId) -> Result<MetricSnapshot, Error> {
        let data = self.data.lock().unwrap();
        Ok(MetricSnapshot {
            assessments: newest_first(data.assessments.get(&user)),
            weight_logs: newest_first(data.weight_logs.get(&user)),
            stress_logs: newest_first(data.stress_logs.get(&user)),
            activity_logs: newest_first(data.activity_logs.get(&user)),
        })
    }

    fn start_challenge(
        &self,
        user: UserId,
        name: &str,
        start: DateTime<Utc>,
        duration_days: u32,
    ) -> Result<i64, Error> {
        let mut data = self.data.lock().unwrap();
        let id = data.challenges.len() as i64 + 1;
        data.challenges.push((
            user,
            Challenge {
                id,
                name: name.to_string(),
                start_date: start,
                end_date: start + Duration::days(duration_days as i64),
                status: ChallengeStatus::Active,
                progress: ChallengeProgress::default(),
            },
        ));
        Ok(id)
    }

    fn active_challenges(&self, user: UserId) -> Result<Vec<Challenge>, Error> {
        let data = self.data.lock().unwrap();
        Ok(data
            .challenges
            .iter()
            .rev()
            .filter(|(owner, challenge)| *owner == user && challenge.is_active())
            .map(|(_, challenge)| challenge.clone())
            .collect())
    }

    fn update_challenge_progress(
        &self,
        challenge_id: i64,
        progress: &ChallengeProgress,
    ) -> Result<(), Error> {
        let mut data = self.data.lock().unwrap();
        match data
            .challenges
            .iter_mut()
            .find(|(_, challenge)| challenge.id == challenge_id)
        {
            Some((_, challenge)) => {
                challenge.progress = progress.clone();
                Ok(())
            }
            None => Err(Error::storage(format!(
                "no challenge with id {challenge_id}"
            ))),
        }
    }

    fn append_chat_turn(&self, user: UserId, turn: &ChatTurn) -> Result<(), Error> {
        let mut data = self.data.lock().unwrap();
        data.chat_turns.entry(user).or_default().push(turn.clone());
        Ok(())
    }

    fn recent_chat_turns(&self, user: UserId, limit: usize) -> Result<Vec<ChatTurn>, Error> {
        let data = self.data.lock().unwrap();
        Ok(data
            .chat_turns
            .get(&user)
            .map(|turns| turns.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

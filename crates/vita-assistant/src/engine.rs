//! The assistant engine: one entry point per user turn.
//!
//! `Assistant::respond` runs the whole pipeline — load history, build
//! context, classify intent, call the completion service, reflow the reply,
//! decide on a continuation — and persists both sides of the exchange. A
//! completion failure never escapes this boundary; it degrades into an
//! apology that is stored like any other assistant turn.

use std::sync::Arc;

use tracing::{debug, info, warn};

use vita_core::store::UserStore;
use vita_core::{ChatTurn, CompletionRequest, Message, Provider, Result, Role, UserId};

use crate::context::{auxiliary_instruction, build_system_prompt};
use crate::continuation::{
    continuation_prompt, guess_language, needs_continuation, ContinuationPolicy,
};
use crate::format::format_reply;
use crate::history::{self, UserHistory};
use crate::intent::{classify, Intent};
use crate::session::ChatSession;

/// Token budget for a single reply. Deliberately small; long answers are
/// handled through the continuation flow instead.
pub const MAX_REPLY_TOKENS: u32 = 300;

pub const REPLY_TEMPERATURE: f32 = 0.7;

/// Sent in place of the user's message when pre-generating a continuation.
const CONTINUE_INSTRUCTION: &str =
    "continue your previous response from where it left off, without repeating anything";

fn apology(detail: &str) -> String {
    format!(
        "I'm sorry, I couldn't reach the wellness assistant just now ({detail}). \
         Please try again in a moment."
    )
}

/// The chat engine. Stateless itself; all mutable state lives in the
/// caller's `ChatSession` and in the store.
pub struct Assistant {
    provider: Arc<dyn Provider>,
    store: Arc<dyn UserStore>,
    policy: ContinuationPolicy,
}

impl Assistant {
    pub fn new(provider: Arc<dyn Provider>, store: Arc<dyn UserStore>) -> Self {
        Self {
            provider,
            store,
            policy: ContinuationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ContinuationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Process one user message and return the finalized, user-visible
    /// reply. Persists the user message and the assistant reply as chat
    /// turns. Fails only when the user is unknown or the store itself
    /// fails; completion-service trouble comes back as an apology string.
    pub async fn respond(
        &self,
        user: UserId,
        message: &str,
        session: &mut ChatSession,
    ) -> Result<String> {
        let history = history::load(self.store.as_ref(), user)?;

        // Persist the user's side first so history stays consistent even
        // when the completion call fails.
        self.store.append_chat_turn(user, &ChatTurn::user(message))?;

        let intent = classify(message, history.previous_reply());
        debug!(user, %intent, "classified message");

        if intent == Intent::Continuation {
            if let Some(pending) = session.take_pending() {
                info!(user, "serving pre-generated continuation");
                self.store
                    .append_chat_turn(user, &ChatTurn::assistant(&pending.text))?;
                return Ok(pending.text);
            }
        } else if session.has_pending() {
            // The conversation moved on; the buffered text no longer fits.
            debug!(user, "discarding stale pending continuation");
            session.discard_pending();
        }

        let messages = self.build_messages(&history, intent, message)?;

        let request = CompletionRequest::new(messages.clone())
            .with_temperature(REPLY_TEMPERATURE)
            .with_max_tokens(MAX_REPLY_TOKENS);

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(user, error = %err, "completion call failed");
                let reply = apology(&err.to_string());
                self.store
                    .append_chat_turn(user, &ChatTurn::assistant(&reply))?;
                return Ok(reply);
            }
        };

        let formatted = format_reply(&response.message.content);

        let mut visible = formatted.clone();
        if needs_continuation(&formatted, intent, response.truncated(), &self.policy) {
            let language = guess_language(message);
            visible = format!("{formatted}\n\n{}", continuation_prompt(language));
            self.pregenerate_continuation(session, messages, &response.message.content)
                .await;
        }

        self.store
            .append_chat_turn(user, &ChatTurn::assistant(&visible))?;
        Ok(visible)
    }

    /// Replay the exchange with an added "continue" instruction and cache
    /// the result, so a literal continuation request needs no new call.
    /// Failure here is invisible: the offer stays, and a later "continue"
    /// regenerates through the normal path.
    async fn pregenerate_continuation(
        &self,
        session: &mut ChatSession,
        mut messages: Vec<Message>,
        reply: &str,
    ) {
        messages.push(Message::assistant(reply));
        messages.push(Message::user(CONTINUE_INSTRUCTION));

        let request = CompletionRequest::new(messages)
            .with_temperature(REPLY_TEMPERATURE)
            .with_max_tokens(MAX_REPLY_TOKENS);

        match self.provider.complete(request).await {
            Ok(response) => {
                session.store_pending(format_reply(&response.message.content));
            }
            Err(err) => {
                warn!(error = %err, "continuation pre-generation failed");
            }
        }
    }

    /// Assemble the request: system prompt, auxiliary instruction for the
    /// intent, recent history oldest-first, then the new message.
    fn build_messages(
        &self,
        history: &UserHistory,
        intent: Intent,
        message: &str,
    ) -> Result<Vec<Message>> {
        let mut messages = vec![Message::system(build_system_prompt(history)?)];
        if let Some(instruction) = auxiliary_instruction(intent) {
            messages.push(Message::system(instruction));
        }
        messages.extend(
            history
                .recent_turns
                .iter()
                .rev()
                .filter(|turn| turn.role != Role::System)
                .map(ChatTurn::to_message),
        );
        messages.push(Message::user(message));
        Ok(messages)
    }
}

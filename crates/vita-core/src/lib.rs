//! vita-core: Core types and traits for vita
//!
//! This crate provides the foundational types and traits used throughout
//! the vita wellness tracker: the domain model, the completion-provider and
//! user-store abstractions, assessment scoring, and the built-in content
//! tables.

pub mod assessment;
pub mod catalog;
pub mod challenge;
pub mod error;
pub mod message;
pub mod metrics;
pub mod profile;
pub mod provider;
pub mod recommend;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use challenge::{Challenge, ChallengeProgress, ChallengeStatus};
pub use error::Error;
pub use message::{ChatTurn, Message, Role, Usage};
pub use metrics::{
    ActivityKind, ActivityLevel, ActivityLog, Assessment, BmiCategory, MetricSnapshot, PainArea,
    PainSeverity, StressLog, WeightLog,
};
pub use profile::{UserId, UserProfile};
pub use provider::{CompletionRequest, CompletionResponse, FinishReason, Provider};
pub use store::UserStore;

pub type Result<T> = std::result::Result<T, Error>;

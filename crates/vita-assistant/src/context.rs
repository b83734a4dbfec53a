//! System-prompt assembly.
//!
//! Builds the personalized system message from the loaded user history, and
//! selects the auxiliary instruction attached for a given intent. Both are
//! pure functions: identical inputs produce byte-identical output, and no
//! external call happens here.

use vita_core::{BmiCategory, Error, Result};

use crate::history::UserHistory;
use crate::intent::Intent;

/// Build the system message for one chat turn. Sections with no data are
/// omitted rather than rendered empty.
///
/// Fails with `Error::MissingUserData` when the profile carries no name: the
/// prompt addresses the user by name and a placeholder would leak into every
/// reply.
pub fn build_system_prompt(history: &UserHistory) -> Result<String> {
    let name = history.profile.name.trim();
    if name.is_empty() {
        return Err(Error::missing_user_data("profile has no name"));
    }

    let mut sections = Vec::new();

    sections.push(format!(
        "You are a wellness assistant for remote workers. You are talking to {name}. \
         Address them by name, ground your answers in their data below, and keep \
         advice practical. You are not a medical professional and do not diagnose."
    ));

    if let Some(assessment) = history.metrics.latest_assessment() {
        let category = BmiCategory::from_bmi(assessment.bmi);
        sections.push(format!(
            "Latest assessment:\n\
             - Stress score: {}/10\n\
             - BMI: {:.1} ({category})\n\
             - Activity level: {}",
            assessment.stress_score, assessment.bmi, assessment.activity_level
        ));
    }

    if !history.metrics.activity_logs.is_empty() {
        sections.push(format!(
            "Logged activities: {}",
            history.metrics.activity_logs.len()
        ));
    }

    if !history.metrics.weight_logs.is_empty() {
        let entries: Vec<String> = history
            .metrics
            .weight_logs
            .iter()
            .map(|log| {
                format!(
                    "({}, {:.1} kg)",
                    log.timestamp.format("%Y-%m-%d"),
                    log.weight_kg
                )
            })
            .collect();
        sections.push(format!("Weight history: {}", entries.join(", ")));
    }

    if !history.active_challenges.is_empty() {
        let mut lines = vec!["Active challenges:".to_string()];
        for challenge in &history.active_challenges {
            lines.push(format!(
                "- {} (day {})",
                challenge.name, challenge.progress.current_day
            ));
            for task in &challenge.progress.completed_tasks {
                lines.push(format!("  - done: {task}"));
            }
        }
        sections.push(lines.join("\n"));
    }

    Ok(sections.join("\n\n"))
}

/// The exact sentence a story reply must close with. The continuation
/// detector treats it as a closing phrase, so a marked story is never
/// offered a continuation.
pub const STORY_ENDING_MARKER: &str = "This concludes the story.";

/// Extra system instruction attached for an intent, if the intent calls for
/// one. Sent as a second system message right before the user turn.
pub fn auxiliary_instruction(intent: Intent) -> Option<&'static str> {
    match intent {
        Intent::Continuation => Some(
            "Continue your previous response from where it left off. \
             Do not repeat content you already gave.",
        ),
        Intent::EndingQuery => Some(
            "The user is asking whether the previous story or narrative has \
             concluded. Answer that directly; do not start a new one.",
        ),
        Intent::DataRequest => Some(
            "Present the user's stored wellness data as short headers with \
             bullet points under each. Use only the data you were given.",
        ),
        Intent::HealthNarrativeRequest => Some(
            "Tell the user's wellness journey as a short narrative grounded \
             in their stored metrics, from their first records to now.",
        ),
        Intent::StoryRequest => Some(
            "The user wants a short wellness-themed story. Tell a complete \
             story and mark the ending with the exact sentence \
             \"This concludes the story.\"",
        ),
        Intent::EmotionalSupport => Some(
            "The user is expressing distress. Respond with empathy first, \
             then offer one small, concrete next step.",
        ),
        Intent::Generic => None,
    }
}

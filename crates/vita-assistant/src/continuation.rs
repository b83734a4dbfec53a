//! Heuristics for deciding whether a reply looks cut short.
//!
//! Everything here is fixed-table string matching over the formatted reply
//! and the originating message. The tables are the behavior; the control
//! flow around them stays trivial.

use crate::intent::Intent;

/// Tunable knobs for the detector. Defaults match production behavior.
#[derive(Debug, Clone)]
pub struct ContinuationPolicy {
    /// Replies shorter than this many words are never flagged (unless the
    /// service itself reported truncation).
    pub min_reply_words: usize,
}

impl Default for ContinuationPolicy {
    fn default() -> Self {
        Self {
            min_reply_words: 100,
        }
    }
}

/// Phrases that mark a reply as deliberately wrapped up. Matched against the
/// tail of the reply, case-insensitively.
const CLOSING_PHRASES: &[&str] = &[
    "here to help",
    "hope this helps",
    "let me know if",
    "feel free to ask",
    "anything else i can",
    "this concludes the story",
    "take care",
    "aqui para ayudar",
    "espero que esto ayude",
    "avisame si",
];

/// Terms that make a long data reply look like a genuine data dump worth
/// continuing, rather than small talk that happens to be long.
const HEALTH_TERMS: &[&str] = &[
    "stress", "bmi", "weight", "kg", "/10", "activity", "score", "challenge", "assessment",
    "estres", "peso", "actividad",
];

/// How much of the reply tail the closing-phrase scan looks at. Closing
/// phrases sit in the final sentence, not necessarily at the last byte.
const CLOSING_SCAN_WINDOW: usize = 80;

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn ends_with_closing_phrase(reply: &str) -> bool {
    let lowered = reply.to_lowercase();
    let tail_start = lowered
        .char_indices()
        .rev()
        .nth(CLOSING_SCAN_WINDOW)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let tail = &lowered[tail_start..];
    CLOSING_PHRASES.iter().any(|phrase| tail.contains(phrase))
}

/// A reply ending in a list item or a measurement is a finished data line,
/// not a trailing thought: digit-dot, digit-paren, "kg", "/10", or a closing
/// parenthesis.
fn ends_with_data_item(reply: &str) -> bool {
    let trimmed = reply.trim_end();
    if trimmed.ends_with(')') || trimmed.ends_with("kg") || trimmed.ends_with("/10") {
        return true;
    }
    let mut tail = trimmed.chars().rev();
    matches!(
        (tail.next(), tail.next()),
        (Some('.'), Some(previous)) if previous.is_ascii_digit()
    )
}

fn mentions_health_data(reply: &str) -> bool {
    let lowered = reply.to_lowercase();
    lowered.chars().any(|c| c.is_ascii_digit())
        || HEALTH_TERMS.iter().any(|term| lowered.contains(term))
}

/// Decide whether `reply` should be offered a continuation.
///
/// A truncation report from the service always flags. Otherwise every
/// condition must hold: the reply is long, it does not close itself off, it
/// does not end on a data item, and the originating intent is one that
/// produces multi-part output.
pub fn needs_continuation(
    reply: &str,
    intent: Intent,
    truncated: bool,
    policy: &ContinuationPolicy,
) -> bool {
    if truncated {
        return true;
    }
    if intent == Intent::EndingQuery {
        return false;
    }
    if word_count(reply) < policy.min_reply_words {
        return false;
    }
    if ends_with_closing_phrase(reply) || ends_with_data_item(reply) {
        return false;
    }
    match intent {
        Intent::StoryRequest | Intent::HealthNarrativeRequest => true,
        Intent::DataRequest => mentions_health_data(reply),
        _ => false,
    }
}

/// Best-effort language guess for the continuation prompt. One hit on the
/// marker table selects Spanish; this is deliberately not an i18n subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
}

const SPANISH_MARKERS: &[&str] = &[
    "hola",
    "gracias",
    "por favor",
    "continuar",
    "cuentame",
    "historia",
    "salud",
    "quiero",
    "dime",
    "como estoy",
    "mis datos",
    "mi progreso",
];

pub fn guess_language(message: &str) -> Language {
    let lowered = message.to_lowercase();
    if SPANISH_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        Language::Spanish
    } else {
        Language::English
    }
}

pub const CONTINUE_PROMPT_EN: &str = "Would you like to see more?... (Write 'continue')";
pub const CONTINUE_PROMPT_ES: &str = "¿Te gustaría ver más?... (Escribe 'continuar')";

pub fn continuation_prompt(language: Language) -> &'static str {
    match language {
        Language::English => CONTINUE_PROMPT_EN,
        Language::Spanish => CONTINUE_PROMPT_ES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_reply(words: usize) -> String {
        let mut text = std::iter::repeat("wellness")
            .take(words)
            .collect::<Vec<_>>()
            .join(" ");
        text.push_str(" and the routine grew from there");
        text
    }

    #[test]
    fn test_truncation_flag_always_wins() {
        let policy = ContinuationPolicy::default();
        assert!(needs_continuation("short", Intent::Generic, true, &policy));
    }

    #[test]
    fn test_closing_phrase_suppresses_regardless_of_length() {
        let policy = ContinuationPolicy::default();
        let reply = format!(
            "{}. Please let me know if you need anything else.",
            long_reply(150)
        );
        assert!(!needs_continuation(
            &reply,
            Intent::StoryRequest,
            false,
            &policy
        ));
    }

    #[test]
    fn test_long_story_without_closing_is_flagged() {
        let policy = ContinuationPolicy::default();
        let reply = long_reply(150);
        assert!(needs_continuation(
            &reply,
            Intent::StoryRequest,
            false,
            &policy
        ));
        assert!(needs_continuation(
            &reply,
            Intent::HealthNarrativeRequest,
            false,
            &policy
        ));
    }

    #[test]
    fn test_short_reply_not_flagged() {
        let policy = ContinuationPolicy::default();
        assert!(!needs_continuation(
            &long_reply(40),
            Intent::StoryRequest,
            false,
            &policy
        ));
    }

    #[test]
    fn test_ending_query_never_flagged() {
        let policy = ContinuationPolicy::default();
        assert!(!needs_continuation(
            &long_reply(150),
            Intent::EndingQuery,
            false,
            &policy
        ));
    }

    #[test]
    fn test_story_ending_marker_suppresses() {
        let policy = ContinuationPolicy::default();
        let reply = format!("{} This concludes the story.", long_reply(150));
        assert!(!needs_continuation(
            &reply,
            Intent::StoryRequest,
            false,
            &policy
        ));
    }

    #[test]
    fn test_data_item_endings() {
        assert!(ends_with_data_item("Your last reading was 72.5 kg"));
        assert!(ends_with_data_item("Stress came in at 6/10"));
        assert!(ends_with_data_item("Logged on Monday (morning session)"));
        assert!(ends_with_data_item("3. Do wrist stretches. 4."));
        assert!(!ends_with_data_item("and the story went on"));
    }

    #[test]
    fn test_data_request_needs_health_terms() {
        let policy = ContinuationPolicy::default();
        let chatty = std::iter::repeat("pleasant")
            .take(150)
            .collect::<Vec<_>>()
            .join(" ");
        assert!(!needs_continuation(&chatty, Intent::DataRequest, false, &policy));

        let data_like = format!("{chatty} and your stress trend is improving overall");
        assert!(needs_continuation(
            &data_like,
            Intent::DataRequest,
            false,
            &policy
        ));
    }

    #[test]
    fn test_generic_intent_not_flagged() {
        let policy = ContinuationPolicy::default();
        assert!(!needs_continuation(
            &long_reply(200),
            Intent::Generic,
            false,
            &policy
        ));
    }

    #[test]
    fn test_language_guess() {
        assert_eq!(guess_language("tell me a story"), Language::English);
        assert_eq!(guess_language("cuéntame una historia por favor"), Language::Spanish);
        assert_eq!(
            continuation_prompt(Language::Spanish),
            CONTINUE_PROMPT_ES
        );
    }
}

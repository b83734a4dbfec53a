//! Keyword-based classification of user messages.
//!
//! The classifier scans the message against fixed English/Spanish phrase
//! tables in a fixed priority order. The tables are data, not code: extending
//! a category never touches the control flow.

/// The classified purpose of a user message. Drives which auxiliary system
/// instruction is sent along with the completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The user wants the previous reply continued.
    Continuation,
    /// The user asks whether a story or narrative has ended.
    EndingQuery,
    /// The user asks for their stored records.
    DataRequest,
    /// The user asks for their wellness journey as a narrative.
    HealthNarrativeRequest,
    /// The user asks for a made-up story.
    StoryRequest,
    /// The user expresses distress.
    EmotionalSupport,
    Generic,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Continuation => write!(f, "continuation"),
            Intent::EndingQuery => write!(f, "ending_query"),
            Intent::DataRequest => write!(f, "data_request"),
            Intent::HealthNarrativeRequest => write!(f, "health_narrative"),
            Intent::StoryRequest => write!(f, "story_request"),
            Intent::EmotionalSupport => write!(f, "emotional_support"),
            Intent::Generic => write!(f, "generic"),
        }
    }
}

const CONTINUATION_PHRASES: &[&str] = &[
    "continue",
    "more",
    "go on",
    "what's next",
    "whats next",
    "proceed",
    "keep going",
    "continuar",
    "sigue",
    "que sigue",
];

const ENDING_QUERY_PHRASES: &[&str] = &[
    "end of story",
    "end of the story",
    "is that the end",
    "is it over",
    "is the story over",
    "did it end",
    "fin de la historia",
    "es el final",
    "ya termino",
];

const DATA_REQUEST_PHRASES: &[&str] = &[
    "my data",
    "my records",
    "my history",
    "my logs",
    "about me",
    "mis datos",
    "mis registros",
    "mi historial",
    "sobre mi",
];

const HEALTH_NARRATIVE_PHRASES: &[&str] = &[
    "my journey",
    "my health story",
    "my wellness story",
    "my progress",
    "how far i've come",
    "mi progreso",
    "mi camino",
    "mi historia de salud",
];

const STORY_REQUEST_PHRASES: &[&str] = &[
    "tell me a story",
    "make up a story",
    "tell a story",
    "write me a story",
    "cuentame una historia",
    "cuentame un cuento",
];

const EMOTIONAL_SUPPORT_PHRASES: &[&str] = &[
    "sad",
    "anxious",
    "stressed out",
    "overwhelmed",
    "tired",
    "exhausted",
    "lonely",
    "help me",
    "triste",
    "ansioso",
    "ansiosa",
    "agotado",
    "agotada",
    "ayudame",
];

/// Priority order is fixed and total: the first category whose table matches
/// wins, even when several tables match.
const PRIORITY: &[(Intent, &[&str])] = &[
    (Intent::Continuation, CONTINUATION_PHRASES),
    (Intent::EndingQuery, ENDING_QUERY_PHRASES),
    (Intent::DataRequest, DATA_REQUEST_PHRASES),
    (Intent::HealthNarrativeRequest, HEALTH_NARRATIVE_PHRASES),
    (Intent::StoryRequest, STORY_REQUEST_PHRASES),
    (Intent::EmotionalSupport, EMOTIONAL_SUPPORT_PHRASES),
];

fn matches_any(message: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| message.contains(phrase))
}

/// Strip accents and curly apostrophes the tables don't carry, so "ayúdame"
/// matches "ayudame" and "what’s next" matches "what's next".
fn fold_accents(message: &str) -> String {
    message
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Classify a user message. `previous_reply` is the assistant's last reply,
/// when there is one; without it a continuation request has nothing to
/// continue, so the continuation table is skipped entirely and words like
/// "more" fall through to the other categories.
pub fn classify(message: &str, previous_reply: Option<&str>) -> Intent {
    let normalized = fold_accents(&message.to_lowercase());

    for (intent, phrases) in PRIORITY {
        if *intent == Intent::Continuation && previous_reply.is_none() {
            continue;
        }
        if matches_any(&normalized, phrases) {
            return *intent;
        }
    }
    Intent::Generic
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIOR: Option<&str> = Some("Here is what I found earlier.");

    #[test]
    fn test_basic_categories() {
        assert_eq!(classify("continue", PRIOR), Intent::Continuation);
        assert_eq!(classify("Is that the end?", PRIOR), Intent::EndingQuery);
        assert_eq!(classify("show me my data", None), Intent::DataRequest);
        assert_eq!(
            classify("tell me about my journey", None),
            Intent::HealthNarrativeRequest
        );
        assert_eq!(classify("Tell me a story!", None), Intent::StoryRequest);
        assert_eq!(classify("I feel so sad today", None), Intent::EmotionalSupport);
        assert_eq!(classify("what is a standing desk", None), Intent::Generic);
    }

    #[test]
    fn test_priority_continuation_beats_data_request() {
        assert_eq!(
            classify("continue showing my data", PRIOR),
            Intent::Continuation
        );
    }

    #[test]
    fn test_continuation_requires_previous_reply() {
        assert_eq!(classify("continue", None), Intent::Generic);
        // "more" alone on a first message must not classify as continuation.
        assert_eq!(classify("tell me more about my data", None), Intent::DataRequest);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("CONTINUE", PRIOR), Intent::Continuation);
        assert_eq!(classify("My Data please", None), Intent::DataRequest);
    }

    #[test]
    fn test_curly_apostrophe_folds_to_ascii() {
        assert_eq!(classify("what\u{2019}s next", PRIOR), Intent::Continuation);
        assert_eq!(
            classify("how far I\u{2019}ve come this year", None),
            Intent::HealthNarrativeRequest
        );
    }

    #[test]
    fn test_spanish_phrases() {
        assert_eq!(classify("continuar", PRIOR), Intent::Continuation);
        assert_eq!(classify("muestrame mis datos", None), Intent::DataRequest);
        assert_eq!(
            classify("cuéntame una historia", None),
            Intent::StoryRequest
        );
        assert_eq!(classify("estoy muy triste", None), Intent::EmotionalSupport);
    }

    #[test]
    fn test_only_one_intent_per_message() {
        // Matches ending-query and story tables; ending query has priority.
        assert_eq!(
            classify("is that the end or will you tell me a story", PRIOR),
            Intent::EndingQuery
        );
    }
}

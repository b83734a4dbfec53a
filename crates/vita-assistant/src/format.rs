//! Reflows raw completion text into short paragraphs.
//!
//! Purely textual: sentences are split on `". "`, accumulated, and flushed
//! into a paragraph after every two sentences or when a sentence closes a
//! quotation. No semantic understanding anywhere.

/// Continuation-prompt fragments from earlier pipeline stages. They are
/// stripped when a persisted reply is replayed through the formatter, so the
/// offer never appears twice.
const BOILERPLATE_FRAGMENTS: &[&str] = &[
    "Would you like to see more?... (Write 'continue')",
    "¿Te gustaría ver más?... (Escribe 'continuar')",
    "Would you like to see more.",
];

const SENTENCES_PER_PARAGRAPH: usize = 2;

fn strip_boilerplate(text: &str) -> String {
    let mut result = text.to_string();
    for fragment in BOILERPLATE_FRAGMENTS {
        result = result.replace(fragment, "");
    }
    result.trim().to_string()
}

fn closes_quotation(sentence: &str) -> bool {
    matches!(sentence.chars().last(), Some('"' | '\u{201d}' | '\u{2019}'))
}

/// Reflow a raw reply into paragraphs of at most two sentences, separated by
/// blank lines. An already short, well-formed input comes back unchanged. If
/// the heuristics would produce nothing, the raw text is returned as-is.
pub fn format_reply(raw: &str) -> String {
    let stripped = strip_boilerplate(raw);

    let parts: Vec<&str> = stripped.split(". ").collect();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut buffer: Vec<String> = Vec::new();

    for (i, part) in parts.iter().enumerate() {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        // A part ending in a quotation mark closed a quote right before the
        // split point; that paragraph should not run on.
        let flush = closes_quotation(trimmed);

        // The split ate the terminal period of every sentence but the last.
        let sentence = if i + 1 < parts.len() {
            format!("{trimmed}.")
        } else {
            trimmed.to_string()
        };

        buffer.push(sentence);
        if flush || buffer.len() >= SENTENCES_PER_PARAGRAPH {
            paragraphs.push(std::mem::take(&mut buffer).join(" "));
        }
    }
    if !buffer.is_empty() {
        paragraphs.push(buffer.join(" "));
    }

    if paragraphs.is_empty() {
        // Degraded, not an error: hand the raw text back untouched.
        return raw.to_string();
    }

    paragraphs.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sentences_per_paragraph() {
        let raw = "One is here. Two is here. Three is here. Four is here.";
        assert_eq!(
            format_reply(raw),
            "One is here. Two is here.\n\nThree is here. Four is here."
        );
    }

    #[test]
    fn test_short_input_unchanged() {
        let raw = "First sentence. Second sentence.";
        assert_eq!(format_reply(raw), raw);
    }

    #[test]
    fn test_already_formatted_is_idempotent() {
        let raw = "First sentence. Second sentence.";
        let once = format_reply(raw);
        assert_eq!(format_reply(&once), once);
    }

    #[test]
    fn test_quotation_flushes_early() {
        let raw = "She said \"rest now\". The advice landed. More text follows. And ends here.";
        assert_eq!(
            format_reply(raw),
            "She said \"rest now\".\n\nThe advice landed. More text follows.\n\nAnd ends here."
        );
    }

    #[test]
    fn test_boilerplate_stripped() {
        let raw = "Here is your data. That is all.\n\nWould you like to see more?... (Write 'continue')";
        let formatted = format_reply(raw);
        assert!(!formatted.contains("Would you like to see more"));
        assert!(formatted.contains("That is all."));
    }

    #[test]
    fn test_empty_input_falls_back_to_raw() {
        assert_eq!(format_reply(""), "");
        assert_eq!(format_reply("   "), "   ");
    }

    #[test]
    fn test_odd_sentence_count_keeps_tail() {
        let raw = "One is here. Two is here. Three stands alone.";
        assert_eq!(
            format_reply(raw),
            "One is here. Two is here.\n\nThree stands alone."
        );
    }
}

// src/text.rs

//! Small text helpers shared by the message renderers

/// Maximum length of the build-list fragment used in summaries
///
/// Summaries are subject-line analogues, so the space-joined build list is
/// bounded to this many characters, marker included.
pub const BUILDS_SUMMARY_MAX_LEN: usize = 40;

/// Marker appended when a build list is cut
pub const TRUNCATION_MARKER: &str = "...";

/// Verbs whose past tense the regular rule would get wrong
const IRREGULAR_PAST: &[(&str, &str)] = &[("submit", "submitted")];

/// Past-tense form of an action verb
///
/// The event vocabulary is a small fixed set, not open text: irregular
/// verbs come from a closed lookup and everything else takes the regular
/// rule (trailing 'e' adds "d", otherwise "ed").
pub fn past_tense(verb: &str) -> String {
    for (present, past) in IRREGULAR_PAST {
        if *present == verb {
            return (*past).to_string();
        }
    }
    if verb.ends_with('e') {
        format!("{}d", verb)
    } else {
        format!("{}ed", verb)
    }
}

/// Truncate text to [`BUILDS_SUMMARY_MAX_LEN`] characters
pub fn truncate(text: &str) -> String {
    truncate_to(text, BUILDS_SUMMARY_MAX_LEN)
}

/// Truncate text to at most `max` characters
///
/// Text that fits is returned unchanged. Otherwise the text is cut so the
/// result, marker included, never exceeds `max`; whitespace before the
/// marker is trimmed. A `max` smaller than the marker yields a prefix of
/// the marker alone. Counted in characters, not bytes.
pub fn truncate_to(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let marker_len = TRUNCATION_MARKER.chars().count();
    if max <= marker_len {
        return TRUNCATION_MARKER.chars().take(max).collect();
    }
    let cut: String = text.chars().take(max - marker_len).collect();
    format!("{}{}", cut.trim_end(), TRUNCATION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_past_tense_regular() {
        assert_eq!(past_tense("unpush"), "unpushed");
    }

    #[test]
    fn test_past_tense_trailing_e() {
        assert_eq!(past_tense("revoke"), "revoked");
        assert_eq!(past_tense("obsolete"), "obsoleted");
    }

    #[test]
    fn test_past_tense_irregular() {
        assert_eq!(past_tense("submit"), "submitted");
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("httpd-2.4.37-3.fc30"), "httpd-2.4.37-3.fc30");
    }

    #[test]
    fn test_truncate_exact_length_unchanged() {
        let text = "x".repeat(BUILDS_SUMMARY_MAX_LEN);
        assert_eq!(truncate(&text), text);
    }

    #[test]
    fn test_truncate_long_text_bounded_with_marker() {
        let text = "httpd-2.4.37-3.fc30 kernel-6.8.9-300.fc40 zsh-5.9-1.fc40";
        let result = truncate(text);
        assert!(result.chars().count() <= BUILDS_SUMMARY_MAX_LEN);
        assert!(result.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncate_trims_whitespace_before_marker() {
        let text = format!("{} {}", "a".repeat(36), "b".repeat(10));
        let result = truncate_to(&text, 40);
        assert_eq!(result, format!("{}{}", "a".repeat(36), TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncate_to_max_smaller_than_marker_stays_bounded() {
        assert_eq!(truncate_to("abcdefghij", 2), "..");
        assert_eq!(truncate_to("abcdefghij", 0), "");
        for max in 0..=5 {
            let result = truncate_to("abcdefghij", max);
            assert!(
                result.chars().count() <= max,
                "{result:?} has {} chars for max {max}",
                result.chars().count()
            );
        }
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(50);
        let result = truncate_to(&text, 10);
        assert!(result.chars().count() <= 10);
        assert!(result.ends_with(TRUNCATION_MARKER));
    }
}

//! Project-wide constants.

/// Identity reported when no `OFFICIAL_EMAIL` is configured.
pub const DEFAULT_OFFICIAL_EMAIL: &str = "your.email@chitkara.edu.in";

/// Default Gemini model when none is specified.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST root (the model path is appended per request).
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound on a single provider round trip, in seconds.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;

/// Request bodies larger than this are rejected before validation.
pub const MAX_BODY_BYTES: usize = 10 * 1024;

pub const MAX_FIBONACCI_TERMS: i64 = 1000;
pub const MAX_PRIME_INPUTS: usize = 10_000;
pub const MAX_LCM_HCF_INPUTS: usize = 100;
pub const MAX_QUESTION_CHARS: usize = 1000;

/// Answers from the provider are cut down to this many words.
pub const MAX_ANSWER_WORDS: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts_are_non_empty() {
        assert!(!DEFAULT_OFFICIAL_EMAIL.is_empty());
        assert!(!DEFAULT_MODEL.is_empty());
        assert!(DEFAULT_GEMINI_BASE_URL.starts_with("https://"));
    }

    #[test]
    fn limits_are_ordered() {
        assert!(MAX_LCM_HCF_INPUTS < MAX_PRIME_INPUTS);
        assert!(MAX_ANSWER_WORDS > 0);
        assert!(MAX_BODY_BYTES >= MAX_QUESTION_CHARS);
    }
}

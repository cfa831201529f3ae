pub mod gemini;
pub mod mock;

use async_trait::async_trait;

use crate::consts::MAX_ANSWER_WORDS;

/// Why a provider could not produce an answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Unreachable, or it answered with an error status.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider timed out")]
    Timeout,
    /// Answered, but nothing usable could be extracted.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Something that can answer a free-form question with a short phrase.
///
/// Implementations are not trusted to keep it short; callers run the raw
/// text through [`normalize_answer`].
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, ProviderError>;
}

const QUOTES: [char; 2] = ['"', '\''];
const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

/// Cut raw provider text down to at most [`MAX_ANSWER_WORDS`] words on a
/// single line, without surrounding quotes or trailing punctuation.
///
/// Returns `None` when nothing is left.
pub fn normalize_answer(raw: &str) -> Option<String> {
    let unquoted = raw.trim().trim_matches(|c: char| QUOTES.contains(&c));
    let words: Vec<&str> = unquoted.split_whitespace().take(MAX_ANSWER_WORDS).collect();
    let joined = words.join(" ");
    let answer = joined
        .trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || QUOTES.contains(&c))
        .trim_end();
    if answer.is_empty() {
        None
    } else {
        Some(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_answer_untouched() {
        assert_eq!(normalize_answer("Paris").as_deref(), Some("Paris"));
        assert_eq!(normalize_answer("New Delhi").as_deref(), Some("New Delhi"));
    }

    #[test]
    fn strips_trailing_punctuation() {
        assert_eq!(normalize_answer("Paris.").as_deref(), Some("Paris"));
        assert_eq!(normalize_answer("Mumbai!?").as_deref(), Some("Mumbai"));
        assert_eq!(normalize_answer("Yes,").as_deref(), Some("Yes"));
    }

    #[test]
    fn keeps_inner_punctuation() {
        assert_eq!(normalize_answer("St. Louis").as_deref(), Some("St. Louis"));
    }

    #[test]
    fn strips_surrounding_quotes() {
        assert_eq!(normalize_answer("\"Paris\"").as_deref(), Some("Paris"));
        assert_eq!(normalize_answer("'Tokyo.'").as_deref(), Some("Tokyo"));
    }

    #[test]
    fn truncates_to_three_words() {
        assert_eq!(
            normalize_answer("The capital is Paris, obviously.").as_deref(),
            Some("The capital is")
        );
        assert_eq!(
            normalize_answer("New York City, USA").as_deref(),
            Some("New York City")
        );
    }

    #[test]
    fn collapses_whitespace_and_newlines() {
        assert_eq!(
            normalize_answer("  Rio\n de\t\tJaneiro \n").as_deref(),
            Some("Rio de Janeiro")
        );
    }

    #[test]
    fn nothing_left_is_none() {
        assert_eq!(normalize_answer(""), None);
        assert_eq!(normalize_answer("   \n "), None);
        assert_eq!(normalize_answer("\"...\""), None);
    }
}

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{AnswerProvider, ProviderError};

/// A scripted provider for tests. Returns pre-defined replies in order.
pub struct MockProvider {
    replies: Vec<Result<String, ProviderError>>,
    index: AtomicUsize,
    delay: Option<Duration>,
}

impl MockProvider {
    pub fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Always answers with `text`.
    pub fn answering(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// Sleep before every reply, to exercise caller timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many questions have been asked so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerProvider for MockProvider {
    async fn answer(&self, _question: &str) -> Result<String, ProviderError> {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        // A single scripted reply repeats forever
        let reply = match self.replies.as_slice() {
            [only] => only,
            replies => replies.get(i).ok_or_else(|| {
                ProviderError::Unavailable(format!(
                    "MockProvider: no more replies (called {} times)",
                    i + 1
                ))
            })?,
        };
        reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_in_order_then_runs_out() {
        let provider = MockProvider::new(vec![
            Ok("one".to_string()),
            Err(ProviderError::Timeout),
        ]);
        assert_eq!(provider.answer("q").await.unwrap(), "one");
        assert_eq!(provider.answer("q").await, Err(ProviderError::Timeout));
        assert!(matches!(
            provider.answer("q").await,
            Err(ProviderError::Unavailable(_))
        ));
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn single_reply_repeats() {
        let provider = MockProvider::answering("Paris");
        for _ in 0..3 {
            assert_eq!(provider.answer("capital?").await.unwrap(), "Paris");
        }
    }
}

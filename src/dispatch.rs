//! Runs a validated request: per-operation limits, then the arithmetic or the
//! AI provider.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::consts::{
    MAX_FIBONACCI_TERMS, MAX_LCM_HCF_INPUTS, MAX_PRIME_INPUTS, MAX_QUESTION_CHARS,
};
use crate::envelope::OperationResult;
use crate::error::{ApiError, ApiResult};
use crate::math;
use crate::provider::{AnswerProvider, normalize_answer};
use crate::request::{OperationKind, ValidatedRequest};

/// Lower bound on array elements.
#[derive(Debug, Clone, Copy)]
enum Sign {
    NonNegative,
    Positive,
}

impl Sign {
    fn admits(self, value: u64) -> bool {
        match self {
            Sign::NonNegative => true,
            Sign::Positive => value > 0,
        }
    }

    fn violation(self, label: &'static str) -> ApiError {
        match self {
            Sign::NonNegative => ApiError::NegativeElement { label },
            Sign::Positive => ApiError::NonPositiveElement { label },
        }
    }
}

/// Limits on an integer array operand.
#[derive(Debug, Clone, Copy)]
struct ArrayRules {
    max_len: usize,
    sign: Sign,
}

const PRIME_RULES: ArrayRules = ArrayRules {
    max_len: MAX_PRIME_INPUTS,
    sign: Sign::NonNegative,
};

const LCM_HCF_RULES: ArrayRules = ArrayRules {
    max_len: MAX_LCM_HCF_INPUTS,
    sign: Sign::Positive,
};

/// 2^64, the first float past `u64::MAX`.
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

/// Maps each operation to its handler. Holds no per-request state, so one
/// instance is shared by every request.
pub struct Dispatcher {
    provider: Option<Arc<dyn AnswerProvider>>,
    provider_timeout: Duration,
}

impl Dispatcher {
    /// `provider` is `None` when no credential is configured.
    pub fn new(provider: Option<Arc<dyn AnswerProvider>>, provider_timeout: Duration) -> Self {
        Self {
            provider,
            provider_timeout,
        }
    }

    pub async fn dispatch(&self, request: ValidatedRequest) -> ApiResult<OperationResult> {
        let ValidatedRequest { kind, value } = request;
        debug!(operation = kind.key(), "dispatching");
        match kind {
            OperationKind::Fibonacci => fibonacci(&value),
            OperationKind::Prime => {
                let values = integers(kind, &value, PRIME_RULES)?;
                compute(move || OperationResult::Primes(math::filter_primes(&values))).await
            }
            OperationKind::Lcm => {
                let values = integers(kind, &value, LCM_HCF_RULES)?;
                compute(move || OperationResult::Multiple(math::array_lcm(&values))).await
            }
            OperationKind::Hcf => {
                let values = integers(kind, &value, LCM_HCF_RULES)?;
                compute(move || OperationResult::Divisor(math::array_gcd(&values))).await
            }
            OperationKind::Ai => self.answer(&value).await,
        }
    }

    async fn answer(&self, value: &Value) -> ApiResult<OperationResult> {
        let question = value.as_str().ok_or(ApiError::TypeMismatch {
            key: OperationKind::Ai.key(),
            expected: "a string",
        })?;
        if question.trim().is_empty() {
            return Err(ApiError::EmptyQuestion);
        }
        if question.chars().count() > MAX_QUESTION_CHARS {
            return Err(ApiError::QuestionTooLong {
                max: MAX_QUESTION_CHARS,
            });
        }

        let provider = self
            .provider
            .as_ref()
            .ok_or(ApiError::ConfigurationMissing("GEMINI_API_KEY"))?;

        let raw = tokio::time::timeout(self.provider_timeout, provider.answer(question))
            .await
            .map_err(|_| ApiError::ProviderTimeout)??;

        let answer = normalize_answer(&raw).ok_or_else(|| {
            debug!(%raw, "provider answer empty after normalization");
            ApiError::ProviderMalformedResponse
        })?;
        Ok(OperationResult::Answer(answer))
    }
}

/// Run arithmetic on the blocking pool. Trial division over large elements
/// can take seconds and must not hold a runtime worker.
async fn compute<F>(work: F) -> ApiResult<OperationResult>
where
    F: FnOnce() -> OperationResult + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("arithmetic task failed: {e}")))
}

fn fibonacci(value: &Value) -> ApiResult<OperationResult> {
    let label = OperationKind::Fibonacci.label();
    let too_large = ApiError::InputTooLarge {
        label,
        max: MAX_FIBONACCI_TERMS,
    };
    let n = match value.as_i64() {
        Some(n) => n,
        // integers past i64::MAX are certainly too large
        None if value.is_u64() => return Err(too_large),
        None => {
            return Err(ApiError::TypeMismatch {
                key: OperationKind::Fibonacci.key(),
                expected: "an integer",
            });
        }
    };
    if n < 0 {
        return Err(ApiError::NegativeInput { label });
    }
    if n > MAX_FIBONACCI_TERMS {
        return Err(too_large);
    }
    let count = usize::try_from(n).map_err(|_| too_large)?;
    Ok(OperationResult::Sequence(math::fibonacci(count)))
}

/// Check an array operand against `rules` and read it as `u64`s.
fn integers(kind: OperationKind, value: &Value, rules: ArrayRules) -> ApiResult<Vec<u64>> {
    let label = kind.label();
    let items = value.as_array().ok_or(ApiError::TypeMismatch {
        key: kind.key(),
        expected: "an array",
    })?;
    if items.is_empty() {
        return Err(ApiError::EmptyCollection { label });
    }
    if items.len() > rules.max_len {
        return Err(ApiError::CollectionTooLarge {
            label,
            max: rules.max_len,
        });
    }

    items
        .iter()
        .map(|item| {
            let n = element(item, label, rules.sign)?;
            if rules.sign.admits(n) {
                Ok(n)
            } else {
                Err(rules.sign.violation(label))
            }
        })
        .collect()
}

/// Read one array element. Floats with no fractional part count as integers.
fn element(item: &Value, label: &'static str, sign: Sign) -> ApiResult<u64> {
    if let Some(n) = item.as_u64() {
        return Ok(n);
    }
    if item.is_i64() {
        return Err(sign.violation(label));
    }
    match item.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            if f < 0.0 {
                Err(sign.violation(label))
            } else if f < U64_BOUND {
                // exact: f is integral and below 2^64
                Ok(f as u64)
            } else {
                Err(ApiError::ElementTooLarge {
                    label,
                    max: u64::MAX,
                })
            }
        }
        _ => Err(ApiError::NonIntegerElement { label }),
    }
}

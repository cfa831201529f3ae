//! The JSON wrapper every response is sent in.

use num_bigint::BigUint;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

/// What a successful operation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    /// Fibonacci terms.
    Sequence(Vec<BigUint>),
    /// Primes kept from the input, in input order.
    Primes(Vec<u64>),
    /// Least common multiple.
    Multiple(BigUint),
    /// Highest common factor.
    Divisor(u64),
    /// Normalized short answer from the AI provider.
    Answer(String),
}

impl Serialize for OperationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OperationResult::Sequence(terms) => {
                serializer.collect_seq(terms.iter().map(JsonInteger))
            }
            OperationResult::Primes(primes) => primes.serialize(serializer),
            OperationResult::Multiple(value) => JsonInteger(value).serialize(serializer),
            OperationResult::Divisor(value) => serializer.serialize_u64(*value),
            OperationResult::Answer(answer) => serializer.serialize_str(answer),
        }
    }
}

/// Writes a big integer as a bare JSON number, never as a float or a string.
struct JsonInteger<'a>(&'a BigUint);

impl Serialize for JsonInteger<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match u64::try_from(self.0) {
            Ok(small) => serializer.serialize_u64(small),
            Err(_) => RawValue::from_string(self.0.to_string())
                .map_err(S::Error::custom)?
                .serialize(serializer),
        }
    }
}

/// `{is_success, official_email?, data?, error?}`.
///
/// Built only through the constructors so that `data` and `error` never
/// appear together.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    official_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<OperationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Envelope {
    pub fn success(official_email: &str, data: OperationResult) -> Self {
        Self {
            is_success: true,
            official_email: Some(official_email.to_string()),
            data: Some(data),
            error: None,
        }
    }

    pub fn health(official_email: &str) -> Self {
        Self {
            is_success: true,
            official_email: Some(official_email.to_string()),
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            official_email: None,
            data: None,
            error: Some(message.into()),
        }
    }
}

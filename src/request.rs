//! Shape gate for incoming bodies.
//!
//! Only checks that exactly one functional key is present and that its value
//! has the right JSON type. Sizes, ranges and element types are the
//! dispatcher's business.

use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// The five operations a body can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Fibonacci,
    Prime,
    Lcm,
    Hcf,
    Ai,
}

impl OperationKind {
    /// Every kind, in the order they are listed when none is given.
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Fibonacci,
        OperationKind::Prime,
        OperationKind::Lcm,
        OperationKind::Hcf,
        OperationKind::Ai,
    ];

    /// The JSON key that selects this operation.
    pub fn key(self) -> &'static str {
        match self {
            OperationKind::Fibonacci => "fibonacci",
            OperationKind::Prime => "prime",
            OperationKind::Lcm => "lcm",
            OperationKind::Hcf => "hcf",
            OperationKind::Ai => "AI",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Name used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Fibonacci => "Fibonacci",
            OperationKind::Prime => "Prime",
            OperationKind::Lcm => "LCM",
            OperationKind::Hcf => "HCF",
            OperationKind::Ai => "AI",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            OperationKind::Fibonacci => value.is_i64() || value.is_u64(),
            OperationKind::Prime | OperationKind::Lcm | OperationKind::Hcf => value.is_array(),
            OperationKind::Ai => value.is_string(),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            OperationKind::Fibonacci => "an integer",
            OperationKind::Prime | OperationKind::Lcm | OperationKind::Hcf => "an array",
            OperationKind::Ai => "a string",
        }
    }
}

/// A body that passed the shape gate: one operation and its untouched value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub kind: OperationKind,
    pub value: Value,
}

/// Validate a parsed body. `None` means the body was missing or not JSON.
pub fn validate(body: Option<&Value>) -> ApiResult<ValidatedRequest> {
    let Some(Value::Object(fields)) = body else {
        return Err(ApiError::InvalidBody);
    };

    // body order: the map keeps keys as they were sent
    let present: Vec<OperationKind> = fields
        .keys()
        .filter_map(|key| OperationKind::from_key(key))
        .collect();

    let kind = match present.as_slice() {
        [] => return Err(ApiError::NoRecognizedKey),
        [kind] => *kind,
        many => {
            return Err(ApiError::MultipleRecognizedKeys(
                many.iter().map(|kind| kind.key()).collect(),
            ));
        }
    };

    let value = &fields[kind.key()];
    if !kind.accepts(value) {
        return Err(ApiError::TypeMismatch {
            key: kind.key(),
            expected: kind.expected(),
        });
    }

    Ok(ValidatedRequest {
        kind,
        value: value.clone(),
    })
}

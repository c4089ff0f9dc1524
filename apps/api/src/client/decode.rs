//! Response decoding.
//!
//! `decode_strict` fails on any shape mismatch. `decode_best_effort` never
//! fails: a response that does not match the expected type is logged and
//! handed back raw, so a slightly drifted server does not break the editor.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Valid(T),
    /// The response did not match `T`; this is the untouched payload.
    Drifted(Value),
}

impl<T> Decoded<T> {
    pub fn valid(self) -> Option<T> {
        match self {
            Decoded::Valid(value) => Some(value),
            Decoded::Drifted(_) => None,
        }
    }

    pub fn as_valid(&self) -> Option<&T> {
        match self {
            Decoded::Valid(value) => Some(value),
            Decoded::Drifted(_) => None,
        }
    }

    pub fn is_drifted(&self) -> bool {
        matches!(self, Decoded::Drifted(_))
    }
}

pub fn decode_strict<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

pub fn decode_best_effort<T: DeserializeOwned>(value: Value) -> Decoded<T> {
    match T::deserialize(&value) {
        Ok(parsed) => Decoded::Valid(parsed),
        Err(e) => {
            warn!("Response failed schema validation, passing raw data through: {e}");
            Decoded::Drifted(value)
        }
    }
}

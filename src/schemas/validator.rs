use crate::{
    schemas::{validation::validate_against_schema, ResponseContract},
    types::decode_contract,
    Result,
};
use serde_json::Value;

/// Validation strategies for generated payloads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validator {
    /// Decode with serde, reporting the failing path
    #[default]
    SerdeFirst,
    /// Check against the contract's JSON Schema before decoding
    Strict,
}

impl Validator {
    /// Validate and decode a payload into the contract type
    pub fn decode<T: ResponseContract>(&self, payload: &Value) -> Result<T> {
        if let Validator::Strict = self {
            validate_against_schema(T::schema(), payload)?;
        }
        decode_contract::<T>(payload)
    }
}

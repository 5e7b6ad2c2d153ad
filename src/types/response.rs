use serde_json::Value;

use crate::{
    error::{PlannerError, Result},
    schemas::ResponseContract,
};

/// Decode a payload into a contract type, naming the failing path on error.
pub fn decode_contract<T>(payload: &Value) -> Result<T>
where
    T: ResponseContract,
{
    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::Contract(format!(
            "failed to decode `{}` at {}: {}",
            T::schema().schema_name(),
            location,
            err.inner()
        ))
    })
}

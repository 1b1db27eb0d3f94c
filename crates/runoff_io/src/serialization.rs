//! JSON helpers that map failures onto [`IoError`].

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};

pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Deserializes from a JSON string. Empty input is a validation error.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use runoff_data::TileState;

    #[test]
    fn test_empty_json_rejected() {
        let result: Result<TileState> = from_json("   ");
        assert!(matches!(result, Err(IoError::Validation(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result: Result<TileState> = from_json("{\"count\": -1}");
        assert!(matches!(result, Err(IoError::Serialization(_))));
    }

    #[test]
    fn test_tile_state_json_shape() {
        let json = to_json(&TileState::new(12)).unwrap();
        assert_eq!(json, "{\"count\":12}");
    }
}

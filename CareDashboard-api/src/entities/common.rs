use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by the admin endpoints
///
/// Serializes to exactly `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Error message
    pub error: String,
}

impl ErrorBody {
    /// Create an error body
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_has_single_field() {
        let body = serde_json::to_string(&ErrorBody::new("Failed to get users")).unwrap();
        assert_eq!(body, r#"{"error":"Failed to get users"}"#);
    }
}

//! # API Error Type
//!
//! The failure envelope printed when a command fails.
//!
//! ## Serialization
//! ```json
//! {
//!   "success": false,
//!   "code": "NOT_FOUND",
//!   "message": "No active shops found"
//! }
//! ```

use serde::Serialize;
use shopcart_core::CoreError;

use crate::config::ConfigError;

/// Error codes for failure envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No shop or cart item to act on
    NotFound,

    /// Request failed validation
    ValidationError,

    /// Input file could not be read or parsed
    InvalidInput,

    /// A `SHOPCART_*` variable has an unusable value
    InvalidConfig,
}

/// A command failure, serialized as the response body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub success: bool,

    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            success: false,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::NoActiveShops | CoreError::CartItemNotFound(_) => ErrorCode::NotFound,
            CoreError::EmptyCart
            | CoreError::InvalidLineItem { .. }
            | CoreError::NonFiniteDistance { .. }
            | CoreError::AmountOverflow(_)
            | CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::InvalidConfig, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopcart_core::ValidationError;

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(CoreError::NoActiveShops);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "No active shops found");

        let err = ApiError::from(CoreError::EmptyCart);
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = ApiError::from(CoreError::from(ValidationError::Required {
            field: "user_id".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Validation error: user_id is required");

        let err = ApiError::from(CoreError::AmountOverflow("order total".to_string()));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_config_error_mapping() {
        let err = ApiError::from(ConfigError::InvalidValue("SHOPCART_PRETTY_JSON".to_string()));
        assert_eq!(err.code, ErrorCode::InvalidConfig);
        assert_eq!(err.message, "Invalid value for SHOPCART_PRETTY_JSON");

        let json = serde_json::to_value(err).unwrap();
        assert_eq!(json["code"], "INVALID_CONFIG");
    }

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(ApiError::invalid_input("bad json")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["message"], "bad json");
    }
}

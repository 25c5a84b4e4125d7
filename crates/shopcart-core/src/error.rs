//! # Error Types
//!
//! Domain-specific error types for shopcart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopcart-core errors (this file)                                      │
//! │  ├── CoreError        - Pricing and cart failures                      │
//! │  └── ValidationError  - Request boundary failures                      │
//! │                                                                         │
//! │  quote-cli errors (app)                                                │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → JSON envelope          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are retried internally. Retry policy belongs to the caller.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No shop candidates were supplied.
    ///
    /// ## When This Occurs
    /// - No shop has status `active`
    /// - Every active shop is missing its coordinates
    #[error("No active shops found")]
    NoActiveShops,

    /// The cart has no line items.
    #[error("No items received")]
    EmptyCart,

    /// A cart line is malformed (missing name, zero quantity).
    #[error("Invalid line item at index {index}: {reason}")]
    InvalidLineItem { index: usize, reason: String },

    /// A computed distance could not be represented as a decimal.
    ///
    /// ## When This Occurs
    /// Only with non-finite coordinates, which the request boundary rejects.
    #[error("Distance between {from} and {to} is not a finite number")]
    NonFiniteDistance { from: String, to: String },

    /// An amount grew past what a decimal can hold.
    ///
    /// ## When This Occurs
    /// - `cost × quantity` of a line is too large
    /// - `distance × rate` of a configured tariff is too large
    /// - The order total is too large
    #[error("Amount out of range: {0}")]
    AmountOverflow(String),

    /// Cart item to remove does not exist.
    #[error("Item not found in cart: {0}")]
    CartItemNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors raised while turning request payloads into
/// typed values.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g., a coordinate pair without a comma).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

//! Common error types used throughout marquee.
//!
//! This module provides a unified error type that covers the failure cases
//! the aggregation engine distinguishes: invalid input, a provider that is
//! not registered, a single provider operation failing, and internal errors.

/// Common error type for marquee.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input was provided to a use case.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The named provider is not registered.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// A single provider operation failed.
    #[error("Provider '{provider_id}' failed: {message}")]
    Provider {
        /// Identifier of the failing provider.
        provider_id: String,
        /// Human-readable failure message, taken verbatim from the provider.
        message: String,
    },

    /// The requested item was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serializing or deserializing persisted state failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new ProviderNotFound error.
    pub fn provider_not_found<S: Into<String>>(provider_id: S) -> Self {
        Self::ProviderNotFound(provider_id.into())
    }

    /// Create a new Provider error.
    pub fn provider<P: Into<String>, M: Into<String>>(provider_id: P, message: M) -> Self {
        Self::Provider {
            provider_id: provider_id.into(),
            message: message.into(),
        }
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

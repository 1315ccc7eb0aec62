//! Error types for the storefront.

use stellar_burger_core::lifecycle::FALLBACK_ERROR_MESSAGE;
use stellar_burger_runtime::StoreError;
use thiserror::Error;

/// Result type alias for backend calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure of a backend call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never got an answer.
    #[error("Network error: {message}")]
    Network {
        /// Transport error text
        message: String,
    },

    /// The backend answered with an error payload.
    #[error("{message}")]
    Rejected {
        /// Error text from the backend
        message: String,
    },
}

impl ApiError {
    /// Transport failure.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Error payload from the backend.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// The message a slice records for this failure.
    ///
    /// A blank message becomes [`FALLBACK_ERROR_MESSAGE`].
    #[must_use]
    pub fn into_message(self) -> String {
        let message = match self {
            Self::Network { message } | Self::Rejected { message } => message,
        };
        if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Errors returned by the [`Storefront`](crate::Storefront) facade.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The action needs a signed-in user.
    #[error("Sign in to place an order")]
    NotAuthenticated,

    /// The constructor needs a bun and at least one filling.
    #[error("Burger needs a bun and at least one filling")]
    IncompleteBurger,

    /// The backend rejected the order.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// The store failed or timed out.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Invalid configuration value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("{key}={value:?} is not a valid {expected}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
        /// What was expected
        expected: &'static str,
    },

    /// A value parsed but is out of range.
    #[error("{key} must be greater than zero")]
    Zero {
        /// Variable name
        key: &'static str,
    },
}

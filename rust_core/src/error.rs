//! Error type shared by the pricing engine and its storage backends.

use thiserror::Error;

/// Errors surfaced by pricing operations.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The storage collaborator failed to return a snapshot.
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("service not found: {0}")]
    ServiceNotFound(String),

    /// The service exists but is not being sold, so it has no dynamic price.
    #[error("service is inactive: {0}")]
    ServiceInactive(String),

    #[error("invalid pricing config: {0}")]
    InvalidConfig(String),

    #[error("local event calendar error: {0}")]
    EventCalendar(String),
}

pub type Result<T> = std::result::Result<T, PricingError>;

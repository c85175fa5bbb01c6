use rentbook_domain::DomainError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Inconsistent history: {0}")]
    InconsistentHistory(String),
    #[error("Room not found: {0}")]
    RoomNotFound(String),
    #[error("Person not found: {0}")]
    PersonNotFound(String),
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}

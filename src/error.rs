use thiserror::Error;

/// Error taxonomy for the contact service.
///
/// Every variant surfaces to GraphQL clients as a plain error message; there
/// are no structured error codes on the wire, so the message text is the
/// contract.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("invalid contact id '{0}'")]
    InvalidId(String),

    #[error("phone number {0} is already registered")]
    PhoneTaken(String),

    #[error("phone number {0} is already registered to another contact")]
    PhoneConflict(String),

    #[error("phone number {0} is not valid")]
    InvalidPhone(String),

    #[error("not all referenced contacts exist")]
    MissingReferences,

    #[error("at least one of name or phone must be provided")]
    NoUpdateField,

    #[error("contact not found: {0}")]
    NotFound(String),

    #[error("phone service returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("phone service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type ContactResult<T> = Result<T, ContactError>;

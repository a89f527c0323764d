use thiserror::Error;

/// Errors related to registration, login, and token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username, email, and password are all required")]
    MissingFields,

    #[error("email and password are both required")]
    MissingCredentials,

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    #[error("no account exists for that email")]
    UnknownEmail,

    #[error("incorrect password")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("credential hashing failed")]
    HashingFailed,

    #[error("token signing failed")]
    SigningFailed,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from the agent gateway boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("agent connection failed: {0}")]
    Connect(String),

    #[error("agent stream error: {0}")]
    Stream(String),

    #[error("malformed agent fragment: {0}")]
    Deserialization(String),
}

/// Errors from repository operations (used by trait definitions in
/// threadline-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

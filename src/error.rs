use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("not signed in")]
    NotSignedIn,

    #[error("could not place order: {0}")]
    OrderRejected(String),

    #[error("order can no longer be followed: {0}")]
    OrderLost(String),
}

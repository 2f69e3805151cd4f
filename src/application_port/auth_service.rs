use crate::domain_model::*;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no session token presented")]
    Unauthenticated,
    #[error("token invalid")]
    TokenInvalid,
    #[error("token expired")]
    TokenExpired,
    #[error("token claims malformed: {0}")]
    MalformedClaims(&'static str),
    #[error("session revoked")]
    SessionRevoked,
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
    #[error("invalid password")]
    InvalidPassword,
    #[error("user not found")]
    UserNotFound,
    #[error("user already exists")]
    UserExists,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionToken(pub String);

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user_id: UserId,
    pub token: SessionToken,
    pub expires_at: DateTime<Utc>,
}

/// Signs and checks session tokens. Never touches the revocation store.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, subject: UserId) -> Result<(SessionToken, SessionClaims), AuthError>;

    /// Signature, expiry and required claims, in that order.
    fn verify(&self, token: &SessionToken) -> Result<SessionClaims, AuthError>;

    /// Like `verify` but accepts tokens whose expiry has passed.
    fn read_signed(&self, token: &SessionToken) -> Result<SessionClaims, AuthError>;
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, request: RegisterInput) -> Result<UserId, AuthError>;
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError>;
    async fn verify_token(&self, token: Option<&str>) -> Result<Identity, AuthError>;
    async fn logout(&self, identity: &Identity, token: &str) -> Result<(), AuthError>;
}

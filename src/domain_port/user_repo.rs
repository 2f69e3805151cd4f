use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `AuthError::UserExists` when the email or username is taken.
    async fn create(
        &self,
        user_id: UserId,
        email: &str,
        username: Option<&str>,
        password_hash: &str,
    ) -> Result<(), AuthError>;

    async fn get_credentials(
        &self,
        identity: &LoginIdentity,
    ) -> Result<Option<UserCredentials>, AuthError>;
}

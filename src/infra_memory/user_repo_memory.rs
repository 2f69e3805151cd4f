use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[derive(Default)]
pub struct MemoryUserRepo {
    users: DashMap<UserId, UserCredentials>,
    by_email: DashMap<String, UserId>,
    by_username: DashMap<String, UserId>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(
        &self,
        user_id: UserId,
        email: &str,
        username: Option<&str>,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        match self.by_email.entry(email.to_string()) {
            Entry::Occupied(_) => return Err(AuthError::UserExists),
            Entry::Vacant(v) => {
                v.insert(user_id);
            }
        }

        if let Some(name) = username {
            match self.by_username.entry(name.to_string()) {
                Entry::Occupied(_) => {
                    self.by_email.remove(email);
                    return Err(AuthError::UserExists);
                }
                Entry::Vacant(v) => {
                    v.insert(user_id);
                }
            }
        }

        self.users.insert(
            user_id,
            UserCredentials {
                user_id,
                email: email.to_string(),
                username: username.map(str::to_string),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(())
    }

    async fn get_credentials(
        &self,
        identity: &LoginIdentity,
    ) -> Result<Option<UserCredentials>, AuthError> {
        let user_id = match identity {
            LoginIdentity::Email(email) => self.by_email.get(email).map(|id| *id),
            LoginIdentity::Username(name) => self.by_username.get(name).map(|id| *id),
        };
        Ok(user_id.and_then(|id| self.users.get(&id).map(|u| u.value().clone())))
    }
}

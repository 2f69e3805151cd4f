use super::util::is_dup_key;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    fn row_to_credentials(row: MySqlRow) -> Result<UserCredentials, AuthError> {
        let user_id: UserId = row
            .try_get("user_id")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let email: String = row
            .try_get("email")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let username: Option<String> = row
            .try_get("username")
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(UserCredentials {
            user_id,
            email,
            username,
            password_hash,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn create(
        &self,
        user_id: UserId,
        email: &str,
        username: Option<&str>,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let res = sqlx::query(
            r#"
INSERT INTO user (user_id, email, username, password_hash)
VALUES (?, ?, ?, ?)
"#,
        )
        .bind(user_id)
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(e) if is_dup_key(&e) => Err(AuthError::UserExists),
            Err(e) => Err(AuthError::Store(format!("insert user: {e}"))),
        }
    }

    async fn get_credentials(
        &self,
        identity: &LoginIdentity,
    ) -> Result<Option<UserCredentials>, AuthError> {
        let (sql, value) = match identity {
            LoginIdentity::Email(email) => (
                r#"
SELECT user_id, email, username, password_hash
FROM user
WHERE email = ?
"#,
                email,
            ),
            LoginIdentity::Username(username) => (
                r#"
SELECT user_id, email, username, password_hash
FROM user
WHERE username = ?
"#,
                username,
            ),
        };

        let row_opt: Option<MySqlRow> = sqlx::query(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::Store(format!("query credentials: {e}")))?;

        row_opt.map(Self::row_to_credentials).transpose()
    }
}

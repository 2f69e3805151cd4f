use super::deadline::within;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Lifetime of every session token.
pub const SESSION_TTL: TimeDelta = TimeDelta::hours(24);

/// Value written under a revoked session id.
pub const REVOKED_MARKER: &str = "revoked";

pub struct Argon2PasswordHasher;

#[async_trait::async_trait]
impl CredentialHasher for Argon2PasswordHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = argon2::password_hash::SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::InternalError(format!("invalid PHC hash: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::InternalError(format!("verify error: {e}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub signing_key: Vec<u8>,
}

/// Payload as it travels inside the token.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jti: Option<String>,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
}

fn unix_to_datetime(secs: i64, field: &'static str) -> Result<DateTime<Utc>, AuthError> {
    DateTime::from_timestamp(secs, 0).ok_or(AuthError::MalformedClaims(field))
}

fn required(value: Option<String>, field: &'static str) -> Result<String, AuthError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AuthError::MalformedClaims(field)),
    }
}

pub struct JwtHs256Codec {
    cfg: JwtConfig,
}

impl JwtHs256Codec {
    pub fn new(cfg: JwtConfig) -> Self {
        JwtHs256Codec { cfg }
    }

    /// Signs arbitrary claims. `issue` is the normal entry point.
    pub fn encode_claims(&self, claims: &SessionClaims) -> Result<SessionToken, AuthError> {
        let wire = WireClaims {
            user_id: Some(claims.subject.to_string()),
            jti: Some(claims.session_id.0.clone()),
            exp: claims.expires_at.timestamp(),
            iat: Some(claims.issued_at.timestamp()),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &wire,
            &EncodingKey::from_secret(&self.cfg.signing_key),
        )
        .map_err(|e| AuthError::InternalError(format!("signing failure: {e}")))?;
        Ok(SessionToken(token))
    }

    fn decode(&self, token: &SessionToken, check_expiry: bool) -> Result<SessionClaims, AuthError> {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 0;
        v.validate_exp = check_expiry;
        v.set_required_spec_claims(&["exp"]);

        // Signature and algorithm first; the payload stays untyped until then.
        let data = decode::<serde_json::Value>(
            &token.0,
            &DecodingKey::from_secret(&self.cfg.signing_key),
            &v,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::MissingRequiredClaim(_) => AuthError::MalformedClaims("exp"),
            _ => AuthError::TokenInvalid,
        })?;

        // Expiry is judged on `exp` alone, before the rest of the payload is typed.
        let exp = data
            .claims
            .get("exp")
            .and_then(serde_json::Value::as_i64)
            .ok_or(AuthError::MalformedClaims("exp"))?;
        let expires_at = unix_to_datetime(exp, "exp")?;
        if check_expiry && Utc::now() >= expires_at {
            return Err(AuthError::TokenExpired);
        }

        let wire: WireClaims = serde_json::from_value(data.claims)
            .map_err(|_| AuthError::MalformedClaims("claims"))?;

        let subject = required(wire.user_id, "user_id")?
            .parse::<UserId>()
            .map_err(|_| AuthError::MalformedClaims("user_id"))?;
        let session_id = SessionId(required(wire.jti, "jti")?);
        let issued_at = unix_to_datetime(wire.iat.ok_or(AuthError::MalformedClaims("iat"))?, "iat")?;

        Ok(SessionClaims {
            subject,
            session_id,
            issued_at,
            expires_at,
        })
    }
}

impl TokenCodec for JwtHs256Codec {
    fn issue(&self, subject: UserId) -> Result<(SessionToken, SessionClaims), AuthError> {
        let issued_at = Utc::now().trunc_subsecs(0);
        let claims = SessionClaims {
            subject,
            session_id: SessionId::generate(),
            issued_at,
            expires_at: issued_at + SESSION_TTL,
        };
        let token = self.encode_claims(&claims)?;
        Ok((token, claims))
    }

    fn verify(&self, token: &SessionToken) -> Result<SessionClaims, AuthError> {
        self.decode(token, true)
    }

    fn read_signed(&self, token: &SessionToken) -> Result<SessionClaims, AuthError> {
        self.decode(token, false)
    }
}

/// Remaining lifetime of a session, clamped at zero.
pub fn revocation_ttl(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (expires_at - now).to_std().unwrap_or(Duration::ZERO)
}

pub struct RealAuthService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    token_codec: Arc<dyn TokenCodec>,
    revocation_store: Arc<dyn RevocationStore>,
    store_timeout: Duration,
    query_timeout: Duration,
}

impl RealAuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        token_codec: Arc<dyn TokenCodec>,
        revocation_store: Arc<dyn RevocationStore>,
        store_timeout: Duration,
        query_timeout: Duration,
    ) -> Self {
        Self {
            user_repo,
            credential_hasher,
            token_codec,
            revocation_store,
            store_timeout,
            query_timeout,
        }
    }

    #[inline]
    fn new_user_id() -> UserId {
        UserId(Uuid::new_v4())
    }

    fn store_error(e: StoreError) -> AuthError {
        AuthError::Store(e.to_string())
    }

    fn query_elapsed(limit: Duration) -> AuthError {
        AuthError::Store(format!("user query timed out after {limit:?}"))
    }

    fn store_elapsed(limit: Duration) -> StoreError {
        StoreError::Unavailable(format!("timed out after {limit:?}"))
    }

    fn login_identity(email: Option<String>, username: Option<String>) -> Option<LoginIdentity> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        non_empty(email)
            .map(LoginIdentity::Email)
            .or_else(|| non_empty(username).map(LoginIdentity::Username))
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn register(&self, request: RegisterInput) -> Result<UserId, AuthError> {
        let RegisterInput {
            email,
            username,
            password,
        } = request;

        if email.trim().is_empty() {
            return Err(AuthError::InvalidRequest("email is required"));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidRequest("password is required"));
        }
        let username = username.filter(|u| !u.trim().is_empty());

        let password_hash = self.credential_hasher.hash_password(&password).await?;
        let user_id = Self::new_user_id();
        within(
            self.query_timeout,
            self.user_repo
                .create(user_id, &email, username.as_deref(), &password_hash),
            Self::query_elapsed,
        )
        .await?;

        info!(%user_id, "user registered");
        Ok(user_id)
    }

    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let LoginInput {
            email,
            username,
            password,
        } = request;

        let identity = Self::login_identity(email, username)
            .ok_or(AuthError::InvalidRequest("email or username must be provided"))?;

        let rec = within(
            self.query_timeout,
            self.user_repo.get_credentials(&identity),
            Self::query_elapsed,
        )
        .await?
        .ok_or(AuthError::UserNotFound)?;

        let ok = self
            .credential_hasher
            .verify_password(&password, &rec.password_hash)
            .await?;
        if !ok {
            return Err(AuthError::InvalidPassword);
        }

        let (token, claims) = self.token_codec.issue(rec.user_id)?;
        debug!(user_id = %rec.user_id, session_id = %claims.session_id, "session issued");

        Ok(LoginResult {
            user_id: rec.user_id,
            token,
            expires_at: claims.expires_at,
        })
    }

    async fn verify_token(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthenticated)?;

        let claims = self.token_codec.verify(&SessionToken(token.to_string()))?;

        let revoked = within(
            self.store_timeout,
            self.revocation_store.exists(claims.session_id.as_str()),
            Self::store_elapsed,
        )
        .await
        .map_err(Self::store_error)?;
        if revoked {
            return Err(AuthError::SessionRevoked);
        }

        Ok(Identity {
            user_id: claims.subject,
            session_id: claims.session_id,
        })
    }

    async fn logout(&self, identity: &Identity, token: &str) -> Result<(), AuthError> {
        let claims = self
            .token_codec
            .read_signed(&SessionToken(token.to_string()))?;
        if claims.session_id != identity.session_id || claims.subject != identity.user_id {
            return Err(AuthError::TokenInvalid);
        }

        let ttl = revocation_ttl(claims.expires_at, Utc::now());
        within(
            self.store_timeout,
            self.revocation_store
                .set_with_ttl(claims.session_id.as_str(), REVOKED_MARKER, ttl),
            Self::store_elapsed,
        )
        .await
        .map_err(Self::store_error)?;

        info!(
            user_id = %identity.user_id,
            session_id = %identity.session_id,
            ttl_secs = ttl.as_secs(),
            "session revoked"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::*;
    use std::collections::HashSet;

    const SECRET: &[u8] = b"test-secret";

    fn codec(secret: &[u8]) -> JwtHs256Codec {
        JwtHs256Codec::new(JwtConfig {
            signing_key: secret.to_vec(),
        })
    }

    struct Fixture {
        service: RealAuthService,
        store: Arc<MemoryRevocationStore>,
        codec: Arc<JwtHs256Codec>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryRevocationStore::new());
        let codec = Arc::new(codec(SECRET));
        let service = RealAuthService::new(
            Arc::new(MemoryUserRepo::new()),
            Arc::new(Argon2PasswordHasher),
            codec.clone(),
            store.clone(),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        Fixture {
            service,
            store,
            codec,
        }
    }

    fn user() -> UserId {
        UserId(Uuid::new_v4())
    }

    fn claims_expiring(subject: UserId, expires_at: DateTime<Utc>) -> SessionClaims {
        let expires_at = expires_at.trunc_subsecs(0);
        SessionClaims {
            subject,
            session_id: SessionId::generate(),
            issued_at: expires_at - SESSION_TTL,
            expires_at,
        }
    }

    fn raw_token(payload: serde_json::Value, alg: Algorithm, secret: &[u8]) -> String {
        encode(&Header::new(alg), &payload, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn issued_token_verifies_with_same_subject() {
        let codec = codec(SECRET);
        let subject = user();
        let (token, issued) = codec.issue(subject).unwrap();
        let verified = codec.verify(&token).unwrap();
        assert_eq!(verified, issued);
        assert_eq!(verified.subject, subject);
        assert_eq!(verified.expires_at - verified.issued_at, SESSION_TTL);
    }

    #[test]
    fn every_issue_mints_a_fresh_session_id() {
        let codec = codec(SECRET);
        let subject = user();
        let ids: HashSet<_> = (0..50)
            .map(|_| codec.issue(subject).unwrap().1.session_id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (token, _) = codec(b"other-secret").issue(user()).unwrap();
        assert!(matches!(
            codec(SECRET).verify(&token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn other_algorithms_are_rejected() {
        let exp = (Utc::now() + SESSION_TTL).timestamp();
        let payload = serde_json::json!({
            "user_id": user().to_string(),
            "jti": "abc",
            "exp": exp,
            "iat": exp - 10,
        });
        let token = SessionToken(raw_token(payload, Algorithm::HS384, SECRET));
        assert!(matches!(
            codec(SECRET).verify(&token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let token = SessionToken("not.a.token".to_string());
        assert!(matches!(
            codec(SECRET).verify(&token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let codec = codec(SECRET);
        let claims = claims_expiring(user(), Utc::now() - TimeDelta::seconds(5));
        let token = codec.encode_claims(&claims).unwrap();
        assert!(matches!(codec.verify(&token), Err(AuthError::TokenExpired)));
        assert_eq!(codec.read_signed(&token).unwrap(), claims);
    }

    #[test]
    fn missing_or_empty_claims_are_malformed() {
        let exp = (Utc::now() + SESSION_TTL).timestamp();
        let codec = codec(SECRET);

        let no_jti = serde_json::json!({ "user_id": user().to_string(), "exp": exp, "iat": exp });
        let token = SessionToken(raw_token(no_jti, Algorithm::HS256, SECRET));
        assert!(matches!(
            codec.verify(&token),
            Err(AuthError::MalformedClaims("jti"))
        ));

        let empty_user =
            serde_json::json!({ "user_id": "", "jti": "abc", "exp": exp, "iat": exp });
        let token = SessionToken(raw_token(empty_user, Algorithm::HS256, SECRET));
        assert!(matches!(
            codec.verify(&token),
            Err(AuthError::MalformedClaims("user_id"))
        ));

        let no_exp = serde_json::json!({ "user_id": user().to_string(), "jti": "abc" });
        let token = SessionToken(raw_token(no_exp, Algorithm::HS256, SECRET));
        assert!(matches!(
            codec.verify(&token),
            Err(AuthError::MalformedClaims("exp"))
        ));
    }

    #[test]
    fn expiry_is_checked_before_claim_presence() {
        let exp = (Utc::now() - TimeDelta::minutes(1)).timestamp();
        let payload = serde_json::json!({ "exp": exp });
        let token = SessionToken(raw_token(payload, Algorithm::HS256, SECRET));
        assert!(matches!(
            codec(SECRET).verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn expiry_wins_over_mistyped_claims() {
        let exp = (Utc::now() - TimeDelta::minutes(1)).timestamp();
        let payload = serde_json::json!({ "user_id": 42, "jti": [], "iat": "yesterday", "exp": exp });
        let token = SessionToken(raw_token(payload, Algorithm::HS256, SECRET));
        assert!(matches!(
            codec(SECRET).verify(&token),
            Err(AuthError::TokenExpired)
        ));

        let exp = (Utc::now() + SESSION_TTL).timestamp();
        let payload = serde_json::json!({ "user_id": 42, "jti": "abc", "iat": exp, "exp": exp });
        let token = SessionToken(raw_token(payload, Algorithm::HS256, SECRET));
        assert!(matches!(
            codec(SECRET).verify(&token),
            Err(AuthError::MalformedClaims("claims"))
        ));
    }

    #[test]
    fn ttl_is_clamped_at_zero() {
        let now = Utc::now();
        assert_eq!(
            revocation_ttl(now - TimeDelta::seconds(30), now),
            Duration::ZERO
        );
        assert_eq!(
            revocation_ttl(now + TimeDelta::seconds(30), now),
            Duration::from_secs(30)
        );
    }

    #[tokio::test]
    async fn missing_token_is_unauthenticated() {
        let f = fixture();
        assert!(matches!(
            f.service.verify_token(None).await,
            Err(AuthError::Unauthenticated)
        ));
        assert!(matches!(
            f.service.verify_token(Some("")).await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn fresh_token_is_authorized() {
        let f = fixture();
        let subject = user();
        let (token, claims) = f.codec.issue(subject).unwrap();
        let identity = f.service.verify_token(Some(&token.0)).await.unwrap();
        assert_eq!(identity.user_id, subject);
        assert_eq!(identity.session_id, claims.session_id);
    }

    #[tokio::test]
    async fn expired_token_never_reaches_the_store() {
        let f = fixture();
        f.store.set_unavailable(true);
        let claims = claims_expiring(user(), Utc::now() - TimeDelta::hours(1));
        let token = f.codec.encode_claims(&claims).unwrap();
        assert!(matches!(
            f.service.verify_token(Some(&token.0)).await,
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn store_outage_fails_closed() {
        let f = fixture();
        let (token, _) = f.codec.issue(user()).unwrap();
        f.store.set_unavailable(true);
        assert!(matches!(
            f.service.verify_token(Some(&token.0)).await,
            Err(AuthError::Store(_))
        ));
    }

    #[tokio::test]
    async fn logout_revokes_the_session_immediately() {
        let f = fixture();
        let (token, _) = f.codec.issue(user()).unwrap();
        let identity = f.service.verify_token(Some(&token.0)).await.unwrap();

        f.service.logout(&identity, &token.0).await.unwrap();

        assert!(matches!(
            f.service.verify_token(Some(&token.0)).await,
            Err(AuthError::SessionRevoked)
        ));
        let ttl = f.store.ttl_of(identity.session_id.as_str()).unwrap();
        assert!(ttl <= SESSION_TTL.to_std().unwrap());
        assert!(ttl > Duration::from_secs(23 * 3600));
    }

    #[tokio::test]
    async fn repeated_logout_never_extends_the_ttl() {
        let f = fixture();
        let (token, claims) = f.codec.issue(user()).unwrap();
        let identity = f.service.verify_token(Some(&token.0)).await.unwrap();

        f.service.logout(&identity, &token.0).await.unwrap();
        let first = f.store.ttl_of(identity.session_id.as_str()).unwrap();
        f.service.logout(&identity, &token.0).await.unwrap();
        let second = f.store.ttl_of(identity.session_id.as_str()).unwrap();

        assert!(second <= first);
        assert!(second <= revocation_ttl(claims.expires_at, Utc::now()) + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn logout_of_expired_token_writes_zero_ttl() {
        let f = fixture();
        let claims = claims_expiring(user(), Utc::now() - TimeDelta::minutes(10));
        let token = f.codec.encode_claims(&claims).unwrap();
        let identity = Identity {
            user_id: claims.subject,
            session_id: claims.session_id.clone(),
        };

        f.service.logout(&identity, &token.0).await.unwrap();

        assert_eq!(f.store.ttl_of(claims.session_id.as_str()), Some(Duration::ZERO));
        assert!(!f.store.exists(claims.session_id.as_str()).await.unwrap());
    }

    #[tokio::test]
    async fn logout_rejects_foreign_or_forged_tokens() {
        let f = fixture();
        let (token, _) = f.codec.issue(user()).unwrap();
        let identity = f.service.verify_token(Some(&token.0)).await.unwrap();

        let (other, _) = f.codec.issue(identity.user_id).unwrap();
        assert!(matches!(
            f.service.logout(&identity, &other.0).await,
            Err(AuthError::TokenInvalid)
        ));

        let (forged, _) = codec(b"forger").issue(identity.user_id).unwrap();
        assert!(matches!(
            f.service.logout(&identity, &forged.0).await,
            Err(AuthError::TokenInvalid)
        ));
        assert!(f.service.verify_token(Some(&token.0)).await.is_ok());
    }

    #[tokio::test]
    async fn register_then_login_by_email_or_username() {
        let f = fixture();
        let user_id = f
            .service
            .register(RegisterInput {
                email: "ann@example.com".to_string(),
                username: Some("ann".to_string()),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();

        let by_email = f
            .service
            .login(LoginInput {
                email: Some("ann@example.com".to_string()),
                username: None,
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(by_email.user_id, user_id);

        let by_username = f
            .service
            .login(LoginInput {
                email: Some(String::new()),
                username: Some("ann".to_string()),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();
        let identity = f
            .service
            .verify_token(Some(&by_username.token.0))
            .await
            .unwrap();
        assert_eq!(identity.user_id, user_id);
    }

    #[tokio::test]
    async fn login_failures_are_distinguished() {
        let f = fixture();
        f.service
            .register(RegisterInput {
                email: "bob@example.com".to_string(),
                username: None,
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        let attempt = |email: Option<&str>, password: &str| LoginInput {
            email: email.map(str::to_string),
            username: None,
            password: password.to_string(),
        };

        assert!(matches!(
            f.service.login(attempt(Some("bob@example.com"), "nope")).await,
            Err(AuthError::InvalidPassword)
        ));
        assert!(matches!(
            f.service.login(attempt(Some("eve@example.com"), "secret")).await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            f.service.login(attempt(None, "secret")).await,
            Err(AuthError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let f = fixture();
        let input = RegisterInput {
            email: "cat@example.com".to_string(),
            username: None,
            password: "meow".to_string(),
        };
        f.service.register(input.clone()).await.unwrap();
        assert!(matches!(
            f.service.register(input).await,
            Err(AuthError::UserExists)
        ));
    }

    /// User repo that answers nothing until `delay` has passed.
    struct SlowUserRepo {
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl UserRepo for SlowUserRepo {
        async fn create(
            &self,
            _user_id: UserId,
            _email: &str,
            _username: Option<&str>,
            _password_hash: &str,
        ) -> Result<(), AuthError> {
            tokio::time::sleep(self.delay).await;
            Ok(())
        }

        async fn get_credentials(
            &self,
            _identity: &LoginIdentity,
        ) -> Result<Option<UserCredentials>, AuthError> {
            tokio::time::sleep(self.delay).await;
            Ok(None)
        }
    }

    #[tokio::test]
    async fn slow_user_queries_are_cut_off() {
        let service = RealAuthService::new(
            Arc::new(SlowUserRepo {
                delay: Duration::from_secs(5),
            }),
            Arc::new(Argon2PasswordHasher),
            Arc::new(codec(SECRET)),
            Arc::new(MemoryRevocationStore::new()),
            Duration::from_secs(1),
            Duration::from_millis(50),
        );

        let started = std::time::Instant::now();
        let login = service
            .login(LoginInput {
                email: Some("slow@example.com".to_string()),
                username: None,
                password: "pw".to_string(),
            })
            .await;
        assert!(matches!(login, Err(AuthError::Store(_))));

        let register = service
            .register(RegisterInput {
                email: "slow@example.com".to_string(),
                username: None,
                password: "pw".to_string(),
            })
            .await;
        assert!(matches!(register, Err(AuthError::Store(_))));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}

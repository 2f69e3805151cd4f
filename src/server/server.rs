use crate::api::v1::SessionCookie;
use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::{DatabaseBackend, Settings, StoreBackend};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub post_service: Arc<dyn PostService>,
    pub session_cookie: SessionCookie,
    revocation_store: Mutex<Option<Arc<dyn RevocationStore>>>,
    pool: Option<MySqlPool>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let revocation_store: Arc<dyn RevocationStore> = match settings.store.backend {
            StoreBackend::Redis => {
                let redis_client = redis::Client::open(settings.store.redis_dsn.as_str())?;
                let redis_manager = redis_client.get_connection_manager().await?;
                Arc::new(RedisRevocationStore::new(
                    redis_manager,
                    settings.store.key_prefix.clone(),
                ))
            }
            StoreBackend::Memory => {
                warn!("revocation store is in memory, logouts will not survive a restart");
                Arc::new(MemoryRevocationStore::new())
            }
        };

        let (pool, user_repo, post_repo): (Option<MySqlPool>, Arc<dyn UserRepo>, Arc<dyn PostRepo>) =
            match settings.database.backend {
                DatabaseBackend::Mysql => {
                    let pool = MySqlPoolOptions::new()
                        .max_connections(settings.database.max_connections)
                        .acquire_timeout(settings.database.timeout())
                        .connect(&settings.database.mysql_dsn)
                        .await?;
                    (
                        Some(pool.clone()),
                        Arc::new(MySqlUserRepo::new(pool.clone())),
                        Arc::new(MySqlPostRepo::new(pool)),
                    )
                }
                DatabaseBackend::Memory => (
                    None,
                    Arc::new(MemoryUserRepo::new()),
                    Arc::new(MemoryPostRepo::new()),
                ),
            };

        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(JwtConfig {
            signing_key: settings.auth.jwt_secret.clone().into_bytes(),
        }));

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            user_repo,
            Arc::new(Argon2PasswordHasher),
            token_codec,
            revocation_store.clone(),
            settings.store.timeout(),
            settings.database.timeout(),
        ));
        let post_service: Arc<dyn PostService> = Arc::new(RealPostService::new(
            post_repo,
            settings.database.timeout(),
        ));

        info!(
            store = ?settings.store.backend,
            database = ?settings.database.backend,
            "server started"
        );

        Ok(Self::new(
            auth_service,
            post_service,
            SessionCookie::new(settings.auth.cookie_secure),
            Some(revocation_store),
            pool,
        ))
    }

    pub fn new(
        auth_service: Arc<dyn AuthService>,
        post_service: Arc<dyn PostService>,
        session_cookie: SessionCookie,
        revocation_store: Option<Arc<dyn RevocationStore>>,
        pool: Option<MySqlPool>,
    ) -> Self {
        Self {
            auth_service,
            post_service,
            session_cookie,
            revocation_store: Mutex::new(revocation_store),
            pool,
        }
    }

    /// Call only once no request task is left running; see `drain_or_abort`.
    pub async fn shutdown(&self) {
        info!("server shutting down...");
        if let Ok(mut lock) = self.revocation_store.lock() {
            if lock.take().is_some() {
                info!("revocation store handle dropped");
            }
        }
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("mysql pool closed");
        }
    }
}

/// Waits up to `grace` for the http server to finish in-flight requests, then
/// aborts it. Returns whether it drained on its own.
pub async fn drain_or_abort(mut serving: JoinHandle<()>, grace: Duration) -> bool {
    match tokio::time::timeout(grace, &mut serving).await {
        Ok(res) => {
            if let Err(e) = res {
                warn!("http server task failed: {}", e);
            }
            info!("in-flight requests drained");
            true
        }
        Err(_) => {
            warn!(?grace, "shutdown grace elapsed, aborting in-flight requests");
            serving.abort();
            // Resolves once the aborted task has been dropped.
            let _ = serving.await;
            false
        }
    }
}

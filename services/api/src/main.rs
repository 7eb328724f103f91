use std::sync::Arc;

use anyhow::Result;
use api::{
    AppState,
    config::{ServerConfig, StorageBackend},
    create_router,
    uploads::UploadStore,
};
use auth::{
    AuthConfig, AuthState,
    repositories::{
        CustomerRepository, CustomerStore, MemoryCustomerStore, MemoryOperatorStore,
        OperatorRepository, OperatorStore,
    },
    revocation::{MemoryRevocationStore, RedisRevocationStore, RevocationStore},
};
use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting API service");

    let server_config = ServerConfig::from_env()?;
    let auth_config = AuthConfig::from_env()?;
    if auth_config.recovery_key.is_none() {
        info!("ADMIN_RECOVERY_KEY not set; operator secret reset is disabled");
    }

    let uploads = UploadStore::new(&server_config.upload_dir, server_config.upload_max_bytes);
    uploads.ensure_root().await?;

    let revocations = revocation_store().await?;

    let app_state = match server_config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            // Check database connectivity
            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            run_migrations(&pool, &sqlx::migrate!()).await?;

            let customers: Arc<dyn CustomerStore> =
                Arc::new(CustomerRepository::new(pool.clone()));
            let operators: Arc<dyn OperatorStore> =
                Arc::new(OperatorRepository::new(pool.clone()));
            let auth = AuthState::new(auth_config, customers, operators, revocations);

            AppState::postgres(auth, pool, uploads)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; all data is lost on restart");
            let auth = AuthState::new(
                auth_config,
                Arc::new(MemoryCustomerStore::new()),
                Arc::new(MemoryOperatorStore::new()),
                revocations,
            );

            AppState::with_auth(auth, uploads)
        }
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = create_router(app_state);

    let listener = TcpListener::bind(&server_config.bind_address).await?;
    info!("API service listening on {}", server_config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis deny-list when `REDIS_URL` is set, in-process otherwise
async fn revocation_store() -> Result<Arc<dyn RevocationStore>> {
    match RedisConfig::from_env() {
        Some(config) => {
            let pool = RedisPool::new(&config).await?;
            if !pool.health_check().await? {
                anyhow::bail!("Redis did not answer PING");
            }
            info!("Token revocation backed by Redis");
            Ok(Arc::new(RedisRevocationStore::new(pool)))
        }
        None => {
            warn!("REDIS_URL not set; revoked tokens are kept in memory");
            Ok(Arc::new(MemoryRevocationStore::new()))
        }
    }
}

use std::sync::Arc;

use crate::{
    auth::{jwt::JwtKeys, password::PasswordHasher, repo::UserStore, services::AuthService},
    config::AppConfig,
    db::PgStore,
    stats::repo::StatsStore,
    testimonials::repo::TestimonialStore,
};

/// Everything a handler needs. Built once at startup and cloned per request;
/// nothing in here is mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub auth: AuthService,
    pub stats: Arc<dyn StatsStore>,
    pub testimonials: Arc<dyn TestimonialStore>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store = PgStore::connect(&config).await?;

        // Run migrations if present
        if let Err(e) = sqlx::migrate!("./migrations").run(&store.pool).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let store = Arc::new(store);
        Self::from_parts(config, store.clone(), store.clone(), store)
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        stats: Arc<dyn StatsStore>,
        testimonials: Arc<dyn TestimonialStore>,
    ) -> anyhow::Result<Self> {
        let keys = JwtKeys::new(&config.jwt);
        let hasher = PasswordHasher::new(config.hash_cost)?;
        Ok(Self {
            auth: AuthService::new(users, hasher, keys.clone()),
            keys,
            stats,
            testimonials,
            config: Arc::new(config),
        })
    }
}

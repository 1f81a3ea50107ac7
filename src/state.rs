use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{
    repo::{PgUserStore, UserStore},
    services::AuthService,
};
use crate::config::AppConfig;
use crate::db;
use crate::mailer::{Mailer, SmtpMailer};
use crate::resources::{
    repo::{PgResourceStore, ResourceStore},
    services::ResourceService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub resources: ResourceService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config.database_url).await?;
        db::migrate(&pool).await;

        let users = Arc::new(PgUserStore::new(pool.clone())) as Arc<dyn UserStore>;
        let resources = Arc::new(PgResourceStore::new(pool)) as Arc<dyn ResourceStore>;
        let mailer = Arc::new(SmtpMailer::new(&config.mail)?) as Arc<dyn Mailer>;

        Ok(Self::from_parts(config, users, resources, mailer))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        resources: Arc<dyn ResourceStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let auth = AuthService::new(users, mailer, &config.reset_url_base);
        Self {
            config,
            auth,
            resources: ResourceService::new(resources),
        }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for ResourceService {
    fn from_ref(state: &AppState) -> Self {
        state.resources.clone()
    }
}

use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::resources::repo_types::Resource;

#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Resource>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Resource>>;
}

#[derive(Clone)]
pub struct PgResourceStore {
    db: PgPool,
}

impl PgResourceStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Resource>> {
        let rows = sqlx::query_as::<_, Resource>(
            r#"
            SELECT id, title, description, type, category, duration, url
            FROM resources
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list resources")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Resource>> {
        let row = sqlx::query_as::<_, Resource>(
            r#"
            SELECT id, title, description, type, category, duration, url
            FROM resources
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("get resource {}", id))?;
        Ok(row)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryResourceStore {
        resources: Mutex<Vec<Resource>>,
        pub fail: bool,
    }

    impl MemoryResourceStore {
        pub fn with(resources: Vec<Resource>) -> Self {
            Self {
                resources: Mutex::new(resources),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ResourceStore for MemoryResourceStore {
        async fn find_all(&self) -> anyhow::Result<Vec<Resource>> {
            anyhow::ensure!(!self.fail, "store unavailable");
            Ok(self.resources.lock().unwrap().clone())
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Resource>> {
            anyhow::ensure!(!self.fail, "store unavailable");
            Ok(self
                .resources
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned())
        }
    }
}

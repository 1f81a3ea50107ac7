use std::sync::Arc;

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    resources::{repo::ResourceStore, repo_types::Resource},
};

#[derive(Clone)]
pub struct ResourceService {
    store: Arc<dyn ResourceStore>,
}

impl ResourceService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Resource>, AppError> {
        let resources = self
            .store
            .find_all()
            .await
            .map_err(|e| AppError::server("Failed to fetch resources", e))?;
        debug!(count = resources.len(), "resources fetched");
        Ok(resources)
    }

    /// A malformed id is reported as not found.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Resource, AppError> {
        let not_found = || AppError::NotFound("Resource not found".into());
        let Ok(id) = Uuid::parse_str(id) else {
            warn!(id = %id, "malformed resource id");
            return Err(not_found());
        };
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| AppError::server("Failed to fetch the resource", e))?
            .ok_or_else(not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::repo::memory::MemoryResourceStore;

    fn sample(title: &str) -> Resource {
        Resource {
            id: Uuid::new_v4(),
            title: Some(title.into()),
            description: Some("Intro".into()),
            kind: Some("video".into()),
            category: Some("mindfulness".into()),
            duration: Some("10 min".into()),
            url: Some("https://example.com/v".into()),
        }
    }

    #[tokio::test]
    async fn list_returns_everything_in_store_order() {
        let items = vec![sample("one"), sample("two"), sample("three")];
        let service = ResourceService::new(Arc::new(MemoryResourceStore::with(items.clone())));
        assert_eq!(service.list().await.unwrap(), items);
    }

    #[tokio::test]
    async fn list_empty_store() {
        let service = ResourceService::new(Arc::new(MemoryResourceStore::default()));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_by_id() {
        let item = sample("one");
        let service = ResourceService::new(Arc::new(MemoryResourceStore::with(vec![item.clone()])));
        assert_eq!(service.get(&item.id.to_string()).await.unwrap(), item);
    }

    #[tokio::test]
    async fn get_unknown_or_malformed_id_is_not_found() {
        let service = ResourceService::new(Arc::new(MemoryResourceStore::with(vec![sample("x")])));
        let unknown = service.get(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(&unknown, AppError::NotFound(m) if m == "Resource not found"));
        let malformed = service.get("not-an-id").await.unwrap_err();
        assert!(matches!(malformed, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_failure_is_server_error() {
        let service = ResourceService::new(Arc::new(MemoryResourceStore::failing()));
        let err = service.list().await.unwrap_err();
        assert!(matches!(err, AppError::Internal { message: "Failed to fetch resources", .. }));
        let err = service.get(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[test]
    fn serializes_kind_as_type() {
        let json = serde_json::to_value(sample("one")).unwrap();
        assert_eq!(json["type"], "video");
        assert!(json.get("kind").is_none());
    }
}

//! Service Use Case

use std::sync::Arc;

use kernel::id::ServiceId;
use platform::revalidate::Revalidator;

use crate::application::support::{non_empty, require};
use crate::domain::entity::{NewService, Service};
use crate::domain::repository::ServiceRepository;
use crate::error::{ContentError, ContentResult};

const NOT_FOUND: &str = "Service not found";

pub struct ServiceUseCase<S>
where
    S: ServiceRepository,
{
    services: Arc<S>,
    revalidator: Revalidator,
}

impl<S> ServiceUseCase<S>
where
    S: ServiceRepository,
{
    pub fn new(services: Arc<S>, revalidator: Revalidator) -> Self {
        Self {
            services,
            revalidator,
        }
    }

    pub async fn list(&self) -> ContentResult<Vec<Service>> {
        self.services.list_services().await
    }

    pub async fn get(&self, id: ServiceId) -> ContentResult<Service> {
        self.services
            .find_service(id)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn get_by_slug(&self, slug: &str) -> ContentResult<Service> {
        self.services
            .find_service_by_slug(slug)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn create(&self, input: NewService) -> ContentResult<ServiceId> {
        let record = normalize(input)?;
        let id = self.services.create_service(&record).await?;

        tracing::info!(service_id = %id, slug = %record.slug, "Service created");
        self.revalidate(&record.slug);
        Ok(id)
    }

    pub async fn update(&self, id: ServiceId, input: NewService) -> ContentResult<()> {
        let record = normalize(input)?;
        let current = self.get(id).await?;

        if !self.services.update_service(id, &record).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }

        tracing::info!(service_id = %id, slug = %record.slug, "Service updated");
        if current.slug != record.slug {
            self.revalidator.revalidate(format!("/services/{}", current.slug));
        }
        self.revalidate(&record.slug);
        Ok(())
    }

    pub async fn delete(&self, id: ServiceId) -> ContentResult<()> {
        let current = self.get(id).await?;
        if !self.services.delete_service(id).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }

        tracing::info!(service_id = %id, slug = %current.slug, "Service deleted");
        self.revalidate(&current.slug);
        Ok(())
    }

    fn revalidate(&self, slug: &str) {
        self.revalidator.revalidate_all([
            "/admin/services".to_string(),
            "/services".to_string(),
            format!("/services/{slug}"),
        ]);
    }
}

fn normalize(input: NewService) -> ContentResult<NewService> {
    require(&[&input.title, &input.slug], "Title and slug are required")?;
    Ok(NewService {
        title: input.title.trim().to_string(),
        slug: input.slug.trim().to_string(),
        description: non_empty(input.description),
        icon: non_empty(input.icon),
        features: input.features,
        use_cases: input.use_cases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryContentRepository;

    fn service(slug: &str) -> NewService {
        NewService {
            title: "Computer Vision".into(),
            slug: slug.into(),
            description: Some("See things".into()),
            icon: Some("eye".into()),
            features: vec!["Detection".into(), "Tracking".into(), "OCR".into()],
            use_cases: vec!["Retail".into(), "Manufacturing".into()],
        }
    }

    #[tokio::test]
    async fn test_list_fields_survive_storage() {
        let repo = Arc::new(MemoryContentRepository::new());
        let uc = ServiceUseCase::new(repo, Revalidator::default());

        let id = uc.create(service("vision")).await.unwrap();
        let stored = uc.get(id).await.unwrap();

        assert_eq!(stored.features, vec!["Detection", "Tracking", "OCR"]);
        assert_eq!(stored.use_cases, vec!["Retail", "Manufacturing"]);
        assert_eq!(uc.get_by_slug("vision").await.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_update_replaces_row_and_revalidates_old_slug() {
        let repo = Arc::new(MemoryContentRepository::new());
        let bus = Revalidator::default();
        let uc = ServiceUseCase::new(repo, bus.clone());
        let id = uc.create(service("vision")).await.unwrap();

        let mut rx = bus.subscribe();
        let mut changed = service("sight");
        changed.features = Vec::new();
        changed.icon = None;
        uc.update(id, changed).await.unwrap();

        let stored = uc.get(id).await.unwrap();
        assert_eq!(stored.slug, "sight");
        assert!(stored.features.is_empty());
        assert_eq!(stored.icon, None);

        let mut paths = Vec::new();
        while let Ok(path) = rx.try_recv() {
            paths.push(path);
        }
        assert_eq!(
            paths,
            vec!["/services/vision", "/admin/services", "/services", "/services/sight"]
        );
    }

    #[tokio::test]
    async fn test_requires_title_and_slug() {
        let repo = Arc::new(MemoryContentRepository::new());
        let uc = ServiceUseCase::new(repo, Revalidator::default());

        let err = uc.create(service("")).await.unwrap_err();
        assert_eq!(err.to_string(), "Title and slug are required");
        assert!(matches!(
            uc.update(ServiceId::new(7), service("x")).await,
            Err(ContentError::NotFound(_))
        ));
    }
}

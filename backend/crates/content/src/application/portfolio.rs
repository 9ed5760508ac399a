//! Portfolio Use Case

use std::sync::Arc;

use kernel::id::PortfolioItemId;
use platform::revalidate::Revalidator;

use crate::application::support::{non_empty, require};
use crate::domain::entity::{NewPortfolioItem, PortfolioItem};
use crate::domain::repository::PortfolioRepository;
use crate::error::{ContentError, ContentResult};

const NOT_FOUND: &str = "Portfolio item not found";

pub struct PortfolioUseCase<P>
where
    P: PortfolioRepository,
{
    items: Arc<P>,
    revalidator: Revalidator,
}

impl<P> PortfolioUseCase<P>
where
    P: PortfolioRepository,
{
    pub fn new(items: Arc<P>, revalidator: Revalidator) -> Self {
        Self { items, revalidator }
    }

    pub async fn list(&self) -> ContentResult<Vec<PortfolioItem>> {
        self.items.list_items().await
    }

    pub async fn get(&self, id: PortfolioItemId) -> ContentResult<PortfolioItem> {
        self.items
            .find_item(id)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn categories(&self) -> ContentResult<Vec<String>> {
        self.items.item_categories().await
    }

    pub async fn create(&self, input: NewPortfolioItem) -> ContentResult<PortfolioItemId> {
        let record = normalize(input)?;
        let id = self.items.create_item(&record).await?;

        tracing::info!(item_id = %id, "Portfolio item created");
        self.revalidate(id);
        Ok(id)
    }

    pub async fn update(&self, id: PortfolioItemId, input: NewPortfolioItem) -> ContentResult<()> {
        let record = normalize(input)?;
        if !self.items.update_item(id, &record).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }

        tracing::info!(item_id = %id, "Portfolio item updated");
        self.revalidate(id);
        Ok(())
    }

    pub async fn delete(&self, id: PortfolioItemId) -> ContentResult<()> {
        if !self.items.delete_item(id).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }

        tracing::info!(item_id = %id, "Portfolio item deleted");
        self.revalidate(id);
        Ok(())
    }

    fn revalidate(&self, id: PortfolioItemId) {
        self.revalidator.revalidate_all([
            "/admin/portfolio".to_string(),
            "/portfolio".to_string(),
            format!("/portfolio/{id}"),
        ]);
    }
}

fn normalize(input: NewPortfolioItem) -> ContentResult<NewPortfolioItem> {
    require(&[&input.title], "Title is required")?;
    Ok(NewPortfolioItem {
        title: input.title.trim().to_string(),
        description: non_empty(input.description),
        full_description: non_empty(input.full_description),
        client: non_empty(input.client),
        image_url: non_empty(input.image_url),
        tags: input.tags,
        category: non_empty(input.category),
        results: input.results,
    })
}

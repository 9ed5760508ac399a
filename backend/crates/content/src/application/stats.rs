//! Dashboard Stats Use Case

use std::sync::Arc;

use crate::domain::entity::ContentStats;
use crate::domain::repository::StatsRepository;
use crate::error::ContentResult;

pub struct StatsUseCase<R>
where
    R: StatsRepository,
{
    repo: Arc<R>,
}

impl<R> StatsUseCase<R>
where
    R: StatsRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> ContentResult<ContentStats> {
        self.repo.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::NewService;
    use crate::domain::repository::ServiceRepository;
    use crate::infra::memory::MemoryContentRepository;

    #[tokio::test]
    async fn test_counts() {
        let repo = MemoryContentRepository::new();
        repo.seed_author("Admin", true).await;
        repo.seed_author("Ana", false).await;
        repo.create_service(&NewService {
            title: "S".into(),
            slug: "s".into(),
            ..Default::default()
        })
        .await
        .unwrap();

        let stats = StatsUseCase::new(Arc::new(repo)).execute().await.unwrap();
        assert_eq!(
            stats,
            ContentStats {
                users: 2,
                blog_posts: 0,
                services: 1,
                portfolio_items: 0,
            }
        );
    }
}

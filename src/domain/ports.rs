use crate::domain::model::{BadgeRecord, RenderedBadge};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&mut self) -> Result<Vec<BadgeRecord>>;
    async fn transform(&self, records: Vec<BadgeRecord>) -> Result<Vec<RenderedBadge>>;
    async fn load(&self, badges: Vec<RenderedBadge>) -> Result<String>;
}

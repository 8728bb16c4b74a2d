use crate::core::{BadgeRecord, Pipeline};
use crate::utils::error::Result;

pub struct BadgeEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BadgeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Fetches and classifies without rendering anything.
    pub async fn preview(&mut self) -> Result<Vec<BadgeRecord>> {
        tracing::info!("Fetching badge list (dry run)...");
        self.pipeline.extract().await
    }

    pub async fn run(&mut self) -> Result<String> {
        tracing::info!("Starting badge run...");

        tracing::info!("Fetching tickets...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Classified {} badges", records.len());

        tracing::info!("Rendering badges...");
        let badges = self.pipeline.transform(records).await?;
        tracing::info!("Rendered {} badges", badges.len());

        tracing::info!("Writing badges...");
        let output_path = self.pipeline.load(badges).await?;
        tracing::info!("Badges saved to: {}", output_path);

        Ok(output_path)
    }
}

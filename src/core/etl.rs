use crate::core::{Pipeline, TransformResult};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let result = self.extract_and_transform().await?;

        // Load
        tracing::info!("Writing {} pages...", result.pages.len());
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }

    /// Runs extract and transform only; nothing is written.
    pub async fn dry_run(&self) -> Result<TransformResult> {
        self.extract_and_transform().await
    }

    async fn extract_and_transform(&self) -> Result<TransformResult> {
        tracing::info!("Starting schema injection...");

        // Extract
        let pages = self.pipeline.extract().await?;
        tracing::info!("Extracted {} pages", pages.len());

        // Transform
        let result = self.pipeline.transform(pages).await?;
        tracing::info!(
            "Transformed {} pages ({} failed)",
            result.reports.len(),
            result.failures.len()
        );
        for failure in &result.failures {
            tracing::warn!("⚠️ {} left unchanged: {}", failure.path, failure.message);
        }

        Ok(result)
    }
}

use crate::core::{Pipeline, SitemapDocument};
use crate::utils::error::Result;

pub struct SitemapEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SitemapEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Fetches every source, renders the sitemap and writes it.
    /// Returns the path that was written.
    pub async fn run(&self) -> Result<String> {
        let document = self.build().await?;

        println!("Writing sitemap...");
        let output_path = self.pipeline.load(document).await?;
        println!("Sitemap written to {}", output_path);
        tracing::info!("Sitemap written to {}", output_path);

        Ok(output_path)
    }

    /// Same as [`run`](Self::run) without the write.
    pub async fn preview(&self) -> Result<SitemapDocument> {
        self.build().await
    }

    async fn build(&self) -> Result<SitemapDocument> {
        println!("Starting sitemap generation...");

        let sources = self.pipeline.extract().await?;
        println!("Fetched {} entries", sources.total());

        println!("Generating sitemap...");
        let document = self.pipeline.transform(sources).await?;
        if !document.degraded.is_empty() {
            let degraded: Vec<String> = document.degraded.iter().map(|k| k.to_string()).collect();
            tracing::warn!(
                "Sitemap generated without: {}",
                degraded.join(", ")
            );
        }
        println!("Generated {} sitemap entries", document.entries.len());

        Ok(document)
    }
}

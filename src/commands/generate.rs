//! Generate the static home page

use anyhow::{Context, Result};

use crate::cms::ContentClient;
use crate::generator::Generator;
use crate::loader::load_home_page;
use crate::pagination::PaginationController;
use crate::Site;

/// Fetch the first page of posts and write the home page
///
/// A failed query aborts the build before anything is written.
pub async fn run(site: &Site) -> Result<PaginationController> {
    let start = std::time::Instant::now();

    let client = ContentClient::new(&site.config.api).context("invalid api configuration")?;
    let controller = build(site, &client).await?;

    let generator = Generator::new(site)?;
    generator.generate(&controller)?;

    let duration = start.elapsed();
    tracing::info!("Completed in {:.2}s", duration.as_secs_f64());
    Ok(controller)
}

/// Load the first page into a fresh controller
pub async fn build(site: &Site, client: &ContentClient) -> Result<PaginationController> {
    let formatter = site.date_formatter();
    let initial = load_home_page(client, &site.config.api, &formatter)
        .await
        .with_context(|| format!("failed to load posts from {}", client.endpoint()))?;

    Ok(PaginationController::new(initial, formatter))
}

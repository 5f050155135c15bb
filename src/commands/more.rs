//! Append pages to an already generated home page

use anyhow::{Context, Result};

use crate::cms::{ContentClient, PageSource};
use crate::generator::Generator;
use crate::pagination::LoadOutcome;
use crate::Site;

/// Load up to `count` more pages into the generated home page
pub async fn run(site: &Site, count: usize) -> Result<()> {
    let client = ContentClient::new(&site.config.api).context("invalid api configuration")?;
    let generator = Generator::new(site)?;
    load_more(&generator, &client, count).await?;
    Ok(())
}

/// Apply up to `count` pages from `source` and rewrite the output
///
/// Returns the outcome of the last trigger, `None` when `count` is zero.
/// A failed fetch still rewrites the page so the error is shown; the saved
/// state keeps the failure, and later runs stop with [`LoadOutcome::Halted`]
/// until the site is generated again.
pub async fn load_more<S>(
    generator: &Generator,
    source: &S,
    count: usize,
) -> Result<Option<LoadOutcome>>
where
    S: PageSource + ?Sized,
{
    let saved = generator.load_state()?;
    let mut controller = saved.into_controller(generator.site().date_formatter());

    let mut appended = 0;
    let mut last = None;
    let mut failure = None;
    for _ in 0..count {
        match controller.load_next_page(source).await {
            Ok(LoadOutcome::Appended { count, page }) => {
                appended += count;
                tracing::info!("Page {}: {} posts", page, count);
                last = Some(LoadOutcome::Appended { count, page });
            }
            Ok(LoadOutcome::Halted) => {
                tracing::warn!(
                    "Pagination halted by an earlier failure ({}), run `spacetraveling generate` to start over",
                    controller.failure().unwrap_or("unknown error")
                );
                last = Some(LoadOutcome::Halted);
                break;
            }
            Ok(outcome) => {
                tracing::info!("Stopped: {:?}", outcome);
                last = Some(outcome);
                break;
            }
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    generator.generate(&controller)?;
    tracing::info!("Appended {} posts", appended);

    match failure {
        Some(e) => Err(e).context("failed to load the next page"),
        None => Ok(last),
    }
}

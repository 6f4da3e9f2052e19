use crate::{
    configuration::Settings,
    domain::record::{extract_record, Record},
};

use super::{ListingPage, Locator, PageElement, RevealDriver};

/// Loads the listing page, reveals every item and parses each one.
///
/// Only a failed navigation is returned as an error. Items whose text can't be
/// read are logged and skipped.
pub async fn harvest<P: ListingPage>(
    page: &P,
    settings: &Settings,
) -> anyhow::Result<Vec<Record>> {
    let url = settings.application.target_url()?;
    page.navigate(url.as_str()).await?;
    tokio::time::sleep(settings.application.initial_load()).await;

    log::info!("Loading all listings...");
    log::info!("URL: {}", url);

    let item_locator = Locator::class_name(settings.application.item_class.as_str());
    let summary = RevealDriver::new(page, &item_locator, &settings.reveal)
        .run()
        .await;
    log::info!(
        "Finished loading after {} iterations ({:?}). Collecting all listings...",
        summary.iterations,
        summary.termination
    );

    let items = match page.query_elements(&item_locator).await {
        Ok(items) => items,
        Err(e) => {
            log::error!("Failed to enumerate listing items: {:?}", e);
            return Ok(vec![]);
        }
    };
    log::info!("Total items found: {}", items.len());
    log::info!("Extracting data...");

    Ok(extract_items(&items).await)
}

pub async fn extract_items<E: PageElement>(items: &[E]) -> Vec<Record> {
    let mut records = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let idx = idx + 1;
        match item.text().await {
            Ok(text) => {
                let record = extract_record(&text);
                log::info!("✓ Item #{}: {}", idx, record.car_name);
                records.push(record);
            }
            Err(e) => log::error!("✗ Error extracting item #{}: {:?}", idx, e),
        }
    }

    records
}

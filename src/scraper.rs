use std::sync::Arc;

use scraper::Html;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::fetch::{FetchError, Fetcher};
use crate::parser::sections::scan_sections;
use crate::parser::tables::extract_tables;
use crate::parser::TableMap;
use crate::records::SectionRecord;

/// Everything scraped from one road page: section records, the detail
/// tables of every section (empty mapping where the section has no
/// detail page), and the row-scan diagnostics.
pub struct RoadScan {
    pub sections: Vec<SectionRecord>,
    pub details: Vec<TableMap>,
    pub rows_seen: usize,
    pub rows_matched: usize,
}

/// Scrape one road: fetch its page, scan the section rows, then fetch
/// every detail page concurrently under a bounded semaphore.
///
/// Detail results are awaited in section order, so the emitted sequences
/// follow source row order regardless of fetch completion order. A
/// failed detail fetch degrades to an empty mapping for that section
/// only; the road-page fetch itself is the one fatal error here.
pub async fn scrape_road(
    fetcher: &Fetcher,
    road_id: &str,
    road_url: &Url,
    cfg: &ScrapeConfig,
) -> Result<RoadScan, FetchError> {
    let body = fetcher.fetch(road_url.as_str()).await?;
    let scan = {
        let doc = Html::parse_document(&body);
        scan_sections(&doc, road_id, road_url, cfg)
    };
    debug!(
        "road {}: {} rows seen, {} sections",
        road_id, scan.rows_seen, scan.rows_matched
    );

    let semaphore = Arc::new(Semaphore::new(cfg.concurrency.max(1)));
    let mut handles = Vec::with_capacity(scan.detail_urls.len());
    for url in &scan.detail_urls {
        match url {
            Some(url) => {
                let fetcher = fetcher.clone();
                let url = url.clone();
                let semaphore = Arc::clone(&semaphore);
                handles.push(Some(tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                    fetch_detail_tables(&fetcher, &url).await
                })));
            }
            None => handles.push(None),
        }
    }

    let mut details = Vec::with_capacity(handles.len());
    for (i, handle) in handles.into_iter().enumerate() {
        let tables = match handle {
            Some(handle) => match handle.await {
                Ok(Ok(tables)) => tables,
                Ok(Err(e)) => {
                    warn!("detail page failed for {}: {}", scan.sections[i].id, e);
                    TableMap::new()
                }
                Err(e) => {
                    warn!("detail task failed for {}: {}", scan.sections[i].id, e);
                    TableMap::new()
                }
            },
            None => TableMap::new(),
        };
        details.push(tables);
    }

    Ok(RoadScan {
        sections: scan.sections,
        details,
        rows_seen: scan.rows_seen,
        rows_matched: scan.rows_matched,
    })
}

async fn fetch_detail_tables(fetcher: &Fetcher, url: &Url) -> Result<TableMap, FetchError> {
    let body = fetcher.fetch(url.as_str()).await?;
    let doc = Html::parse_document(&body);
    Ok(extract_tables(&doc))
}

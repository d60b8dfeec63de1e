use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use crate::config::ScrapeConfig;
use crate::records::SectionRecord;

static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// 7th column of the fixed section-row layout; holds the detail marker.
const DETAIL_CELL_INDEX: usize = 6;

/// Result of scanning one road page: section records and, positionally
/// aligned with them, the resolved detail-page URL of every section that
/// carries the detail marker. `rows_seen`/`rows_matched` expose how many
/// `tr` elements were visited vs. accepted by the cell-count sniff.
#[derive(Debug)]
pub struct SectionScan {
    pub sections: Vec<SectionRecord>,
    pub detail_urls: Vec<Option<Url>>,
    pub rows_seen: usize,
    pub rows_matched: usize,
}

/// Scan every row of a road page for section rows.
///
/// A row is a section iff it has exactly `cfg.section_cell_count` cells
/// of the configured data-cell class; any other count is ignored, header
/// and decorative rows included. Accepted rows get the id
/// `{road_id}_{n}` with `n` counting accepted rows from 1. The detail
/// marker test compares the raw 7th-cell text against
/// `cfg.detail_marker` verbatim; on a match the cell's first anchor is
/// resolved against the road's own URL.
pub fn scan_sections(
    doc: &Html,
    road_id: &str,
    road_url: &Url,
    cfg: &ScrapeConfig,
) -> SectionScan {
    let cell_sel =
        Selector::parse(&cfg.data_cell_selector()).expect("data cell class must be a valid selector");

    let mut sections = Vec::new();
    let mut detail_urls = Vec::new();
    let mut rows_seen = 0;
    let mut index = 0u32;

    for tr in doc.select(&ROW_SEL) {
        rows_seen += 1;
        let cells: Vec<ElementRef> = tr.select(&cell_sel).collect();
        if cells.len() != cfg.section_cell_count {
            continue;
        }

        index += 1;
        let id = format!("{}_{}", road_id, index);

        let detail_url = cells
            .get(DETAIL_CELL_INDEX)
            .filter(|cell| raw_text(**cell) == cfg.detail_marker)
            .and_then(|cell| resolve_detail_link(*cell, road_url, &id));

        let text = |i: usize| trimmed_text(cells[i]);
        sections.push(SectionRecord {
            id,
            district_no: text(0),
            district: text(1),
            limits: text(2),
            start_km: text(3),
            end_km: text(4),
            tmda: text(5),
            more_info: text(6),
            observations: text(7),
            detail_link: detail_url
                .as_ref()
                .map(Url::to_string)
                .unwrap_or_default(),
        });
        detail_urls.push(detail_url);
    }

    SectionScan {
        sections,
        detail_urls,
        rows_seen,
        rows_matched: index as usize,
    }
}

fn raw_text(cell: ElementRef) -> String {
    cell.text().collect()
}

fn trimmed_text(cell: ElementRef) -> String {
    raw_text(cell).trim().to_string()
}

/// First anchor href of the marker cell, joined onto the road URL. A
/// marker cell without a usable link degrades to the no-detail path.
fn resolve_detail_link(cell: ElementRef, road_url: &Url, section_id: &str) -> Option<Url> {
    let href = match cell
        .select(&ANCHOR_SEL)
        .next()
        .and_then(|a| a.value().attr("href"))
    {
        Some(href) => href,
        None => {
            warn!("section {}: detail marker present but no link found", section_id);
            return None;
        }
    };
    match road_url.join(href) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("section {}: cannot resolve detail link {:?}: {}", section_id, href, e);
            None
        }
    }
}

// ── Tests ──

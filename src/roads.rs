use std::sync::LazyLock;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use scraper::{Html, Selector};
use tracing::{info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::fetch::Fetcher;

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Fetch a year's index page and return `road id → road page URL` in
/// discovery order.
pub async fn fetch_road_links(
    fetcher: &Fetcher,
    cfg: &ScrapeConfig,
    year: &str,
) -> Result<IndexMap<String, Url>> {
    let index_url = cfg.year_index_url(year);
    info!("fetching year index: {}", index_url);
    let base = Url::parse(&index_url)
        .with_context(|| format!("invalid year index url: {}", index_url))?;
    let body = fetcher.fetch(&index_url).await?;

    let doc = Html::parse_document(&body);
    let links = road_links(&doc, &base, cfg);
    info!("roads discovered for {}: {}", year, links.len());
    Ok(links)
}

/// Every anchor inside a data cell contributes
/// `anchor text → href joined onto the index URL`. A road id listed
/// twice keeps its first position with the later URL.
pub fn road_links(doc: &Html, base: &Url, cfg: &ScrapeConfig) -> IndexMap<String, Url> {
    let cell_sel =
        Selector::parse(&cfg.data_cell_selector()).expect("data cell class must be a valid selector");

    let mut links = IndexMap::new();
    for cell in doc.select(&cell_sel) {
        for anchor in cell.select(&ANCHOR_SEL) {
            let href = match anchor.value().attr("href") {
                Some(href) => href.trim(),
                None => continue,
            };
            let road_id = anchor.text().collect::<String>().trim().to_string();
            if road_id.is_empty() {
                continue;
            }
            match base.join(href) {
                Ok(url) => {
                    links.insert(road_id, url);
                }
                Err(e) => warn!("skipping unresolvable road link {:?}: {}", href, e),
            }
        }
    }
    links
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_URL: &str =
        "http://transito.vialidad.gov.ar:8080/SelCE_WEB/tmda_libro_web_2010/index.html";

    fn links_from(html: &str) -> IndexMap<String, Url> {
        let doc = Html::parse_document(html);
        road_links(
            &doc,
            &Url::parse(INDEX_URL).unwrap(),
            &ScrapeConfig::default(),
        )
    }

    #[test]
    fn anchors_in_data_cells_resolve_against_index() {
        let links = links_from(
            r#"<table><tr>
                <td class="FILA"><a href="html_rutas/0001.html">0001</a></td>
                <td class="FILA"><a href="html_rutas/0003.html">0003</a></td>
                <td class="OTRA"><a href="html_rutas/9999.html">9999</a></td>
            </tr></table>"#,
        );
        assert_eq!(links.len(), 2);
        assert_eq!(
            links["0001"].as_str(),
            "http://transito.vialidad.gov.ar:8080/SelCE_WEB/tmda_libro_web_2010/html_rutas/0001.html"
        );
        assert!(!links.contains_key("9999"));
    }

    #[test]
    fn duplicate_road_id_keeps_later_url() {
        let links = links_from(
            r#"<table><tr>
                <td class="FILA"><a href="html_rutas/0003.html">0003</a></td>
                <td class="FILA"><a href="html_rutas/0003_bis.html">0003</a></td>
            </tr></table>"#,
        );
        assert_eq!(links.len(), 1);
        assert!(links["0003"].as_str().ends_with("0003_bis.html"));
    }

    #[test]
    fn anchors_without_href_or_text_are_ignored() {
        let links = links_from(
            r#"<table><tr>
                <td class="FILA"><a name="top">0005</a></td>
                <td class="FILA"><a href="html_rutas/0007.html">  </a></td>
            </tr></table>"#,
        );
        assert!(links.is_empty());
    }
}

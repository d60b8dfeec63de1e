/// Scrape parameters for the DNV traffic-volume site.
///
/// The row-detection heuristics (`data_cell_class`, `section_cell_count`,
/// `detail_marker`) are the site's implicit schema: a section row is any
/// `tr` with exactly `section_cell_count` cells of class `data_cell_class`,
/// and the detail page exists only when the 7th cell text equals
/// `detail_marker` verbatim. If the site layout drifts, detection yields
/// zero sections rather than an error.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Year index URL template; `{year}` is substituted per scraped year.
    pub base_url_template: String,
    /// Years to scrape, as they appear in the site URLs.
    pub years: Vec<String>,
    /// Road ids to scrape. `None` scrapes every road discovered on the
    /// year's index page.
    pub roads: Option<Vec<String>>,
    /// CSS class of data cells on index and road pages.
    pub data_cell_class: String,
    /// Exact cell count that identifies a section row.
    pub section_cell_count: usize,
    /// Literal text marking a section with a detail page. Case- and
    /// accent-sensitive.
    pub detail_marker: String,
    /// Max in-flight detail-page fetches per road.
    pub concurrency: usize,
    /// Per-request timeout, seconds.
    pub timeout_secs: u64,
    /// Retries on transient fetch failures.
    pub max_retries: u32,
}

pub const DEFAULT_BASE_URL_TEMPLATE: &str =
    "http://transito.vialidad.gov.ar:8080/SelCE_WEB/tmda_libro_web_{year}/index.html";

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfig {
            base_url_template: DEFAULT_BASE_URL_TEMPLATE.to_string(),
            years: Vec::new(),
            roads: None,
            data_cell_class: "FILA".to_string(),
            section_cell_count: 8,
            detail_marker: "ver detalle".to_string(),
            concurrency: 10,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl ScrapeConfig {
    /// Index URL for one year.
    pub fn year_index_url(&self, year: &str) -> String {
        self.base_url_template.replace("{year}", year)
    }

    /// Selector source for data cells, e.g. `td.FILA`.
    pub fn data_cell_selector(&self) -> String {
        format!("td.{}", self.data_cell_class)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_url_substitution() {
        let cfg = ScrapeConfig::default();
        assert_eq!(
            cfg.year_index_url("2010"),
            "http://transito.vialidad.gov.ar:8080/SelCE_WEB/tmda_libro_web_2010/index.html"
        );
    }

    #[test]
    fn default_site_markers() {
        let cfg = ScrapeConfig::default();
        assert_eq!(cfg.section_cell_count, 8);
        assert_eq!(cfg.detail_marker, "ver detalle");
        assert_eq!(cfg.data_cell_selector(), "td.FILA");
    }
}

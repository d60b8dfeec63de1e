use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

use super::TableMap;
use crate::text::fold_caption;

static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static HEAD_ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("thead tr").unwrap());
static BODY_ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tbody tr").unwrap());
static TH_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static TD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// Extract every captioned table from a detail page.
///
/// Row order per table: one row per `thead tr` (th texts), then one row
/// per `tbody tr` (td texts), all untrimmed. The table name comes from
/// the nearest preceding non-blank sibling node, folded by
/// [`fold_caption`]. A table with no usable caption is skipped and
/// logged; two tables folding to the same name keep only the later one.
pub fn extract_tables(doc: &Html) -> TableMap {
    let mut tables = TableMap::new();

    for table_el in doc.select(&TABLE_SEL) {
        let name = match table_caption(table_el) {
            Some(name) => name,
            None => {
                warn!("skipping table without a preceding caption");
                continue;
            }
        };

        let mut rows = Vec::new();
        for tr in table_el.select(&HEAD_ROW_SEL) {
            rows.push(tr.select(&TH_SEL).map(cell_text).collect());
        }
        for tr in table_el.select(&BODY_ROW_SEL) {
            rows.push(tr.select(&TD_SEL).map(cell_text).collect());
        }

        tables.insert(name, rows);
    }

    tables
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect()
}

/// Walk the table's previous siblings and fold the first non-blank text
/// found. The page places a caption-like node right before each table;
/// whitespace-only text nodes in between are skipped.
fn table_caption(table: ElementRef) -> Option<String> {
    for node in table.prev_siblings() {
        let text: String = match node.value() {
            Node::Text(t) => t.text.to_string(),
            Node::Element(_) => match ElementRef::wrap(node) {
                Some(el) => el.text().collect(),
                None => continue,
            },
            _ => continue,
        };
        if text.trim().is_empty() {
            continue;
        }
        let name = fold_caption(&text);
        return if name.is_empty() { None } else { Some(name) };
    }
    None
}

// ── Tests ──

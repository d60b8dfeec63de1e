use super::TableMap;
use crate::records::{DetailRecord, SectionRecord};

/// Flatten every section's named detail tables into long-format records.
///
/// `details` is positionally aligned with `sections`. For each table,
/// data rows (row 0 is the header and is never emitted) fan out into one
/// record per cell, keyed by section id, table name, trimmed header text
/// and 1-based row instance. Cells past the header width are dropped;
/// short rows simply emit fewer records.
pub fn flatten_details(sections: &[SectionRecord], details: &[TableMap]) -> Vec<DetailRecord> {
    let mut records = Vec::new();

    for (section, tables) in sections.iter().zip(details) {
        let section_id = section.id.trim();
        for (table_id, table) in tables {
            let header = match table.first() {
                Some(header) => header,
                None => continue,
            };
            for (row_idx, row) in table.iter().enumerate().skip(1) {
                for (col, value) in row.iter().enumerate() {
                    let variable = match header.get(col) {
                        Some(variable) => variable,
                        None => continue,
                    };
                    records.push(DetailRecord {
                        section_id: section_id.to_string(),
                        table_id: table_id.clone(),
                        variable: variable.trim().to_string(),
                        row: row_idx as u32,
                        value: value.trim().to_string(),
                    });
                }
            }
        }
    }

    records
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Table;

    fn section(id: &str) -> SectionRecord {
        SectionRecord {
            id: id.to_string(),
            district_no: "23".to_string(),
            district: "Santa Cruz".to_string(),
            limits: "RIO TURBIO (I) - INT.R.P.7".to_string(),
            start_km: "394,43".to_string(),
            end_km: "469,54".to_string(),
            tmda: "500".to_string(),
            more_info: "ver detalle".to_string(),
            observations: "-".to_string(),
            detail_link: String::new(),
        }
    }

    fn table_map(name: &str, table: Table) -> TableMap {
        let mut map = TableMap::new();
        map.insert(name.to_string(), table);
        map
    }

    fn rows(rows: &[&[&str]]) -> Table {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn ruta_table_fans_out_per_cell() {
        let sections = vec![section("0040_1")];
        let details = vec![table_map(
            "ruta",
            rows(&[&["Distrito", "TMDA"], &["Santa Cruz", "500"]]),
        )];
        let records = flatten_details(&sections, &details);
        assert_eq!(
            records,
            vec![
                DetailRecord {
                    section_id: "0040_1".to_string(),
                    table_id: "ruta".to_string(),
                    variable: "Distrito".to_string(),
                    row: 1,
                    value: "Santa Cruz".to_string(),
                },
                DetailRecord {
                    section_id: "0040_1".to_string(),
                    table_id: "ruta".to_string(),
                    variable: "TMDA".to_string(),
                    row: 1,
                    value: "500".to_string(),
                },
            ]
        );
    }

    #[test]
    fn three_columns_two_data_rows_emit_six_records() {
        let sections = vec![section("0040_1")];
        let details = vec![table_map(
            "clasificacion",
            rows(&[
                &["Año", "Mes", "Horas"],
                &["2010", "3", "48"],
                &["2010", "6", "48"],
            ]),
        )];
        let records = flatten_details(&sections, &details);
        assert_eq!(records.len(), 6);
        let instances: Vec<u32> = records.iter().map(|r| r.row).collect();
        assert_eq!(instances, [1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn section_without_details_emits_nothing() {
        let sections = vec![section("0040_1"), section("0040_2")];
        let details = vec![
            TableMap::new(),
            table_map("velocidad", rows(&[&["Estimador"], &["P85"]])),
        ];
        let records = flatten_details(&sections, &details);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].section_id, "0040_2");
    }

    #[test]
    fn ragged_short_rows_emit_fewer_records() {
        let sections = vec![section("0040_1")];
        let details = vec![table_map(
            "velocidad",
            rows(&[&["Estimador", "Liv", "Otros"], &["P85", "135,6"]]),
        )];
        let records = flatten_details(&sections, &details);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].variable, "Estimador");
        assert_eq!(records[1].variable, "Liv");
    }

    #[test]
    fn cells_past_header_width_are_dropped() {
        let sections = vec![section("0040_1")];
        let details = vec![table_map(
            "velocidad",
            rows(&[&["Estimador", "Liv"], &["P85", "135,6", "103,8"]]),
        )];
        let records = flatten_details(&sections, &details);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn header_only_table_emits_nothing() {
        let sections = vec![section("0040_1")];
        let details = vec![table_map("ruta", rows(&[&["Distrito", "TMDA"]]))];
        assert!(flatten_details(&sections, &details).is_empty());
    }

    #[test]
    fn values_and_variables_are_trimmed() {
        let sections = vec![section(" 0040_1 ")];
        let details = vec![table_map(
            "ruta",
            rows(&[&[" TMDA "], &[" 500 "]]),
        )];
        let records = flatten_details(&sections, &details);
        assert_eq!(records[0].section_id, "0040_1");
        assert_eq!(records[0].variable, "TMDA");
        assert_eq!(records[0].value, "500");
    }

    #[test]
    fn flatten_is_deterministic() {
        let sections = vec![section("0040_1")];
        let mut map = TableMap::new();
        map.insert(
            "ruta".to_string(),
            rows(&[&["Distrito", "TMDA"], &["Santa Cruz", "500"]]),
        );
        map.insert(
            "velocidad".to_string(),
            rows(&[&["Estimador", "Liv"], &["P85", "135,6"]]),
        );
        let details = vec![map];
        let first = flatten_details(&sections, &details);
        let second = flatten_details(&sections, &details);
        assert_eq!(first, second);
        let tables: Vec<&str> = first.iter().map(|r| r.table_id.as_str()).collect();
        assert_eq!(tables, ["ruta", "ruta", "velocidad", "velocidad"]);
    }
}

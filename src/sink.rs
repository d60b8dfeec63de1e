use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::records::{DetailRecord, SectionRecord, DETAIL_FIELDS, SIMPLE_FIELDS};

const SIMPLE_SHEET: &str = "principal";
const DETAILS_SHEET: &str = "ver_detalle";

/// Accumulates scraped records and saves them as a two-sheet workbook:
/// `principal` holds one row per section, `ver_detalle` one row per
/// long-format detail cell. Rows keep their append order.
#[derive(Default)]
pub struct TrafficData {
    simple: Vec<SectionRecord>,
    details: Vec<DetailRecord>,
}

impl TrafficData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_simple(&mut self, record: SectionRecord) {
        self.simple.push(record);
    }

    pub fn write_details(&mut self, record: DetailRecord) {
        self.details.push(record);
    }

    pub fn simple_count(&self) -> usize {
        self.simple.len()
    }

    pub fn details_count(&self) -> usize {
        self.details.len()
    }

    /// Write both sheets, header row first, and save the workbook.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name(SIMPLE_SHEET)?;
        write_header(sheet, &SIMPLE_FIELDS)?;
        for (i, record) in self.simple.iter().enumerate() {
            let row = (i + 1) as u32;
            for (col, value) in record.fields().iter().enumerate() {
                sheet.write_string(row, col as u16, *value)?;
            }
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name(DETAILS_SHEET)?;
        write_header(sheet, &DETAIL_FIELDS)?;
        for (i, record) in self.details.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, &record.section_id)?;
            sheet.write_string(row, 1, &record.table_id)?;
            sheet.write_string(row, 2, &record.variable)?;
            sheet.write_number(row, 3, f64::from(record.row))?;
            sheet.write_string(row, 4, &record.value)?;
        }

        workbook
            .save(path)
            .with_context(|| format!("saving workbook to {}", path.display()))?;
        Ok(())
    }
}

fn write_header(sheet: &mut Worksheet, fields: &[&str]) -> Result<()> {
    for (col, name) in fields.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    Ok(())
}

// ── Tests ──

/// Column headers of the `principal` sheet, in write order.
pub const SIMPLE_FIELDS: [&str; 10] = [
    "id_tramo",
    "Nro distrito",
    "Distrito",
    "Limites del tramo",
    "Ini",
    "Fin",
    "TMDA",
    "Mas Info",
    "Observaciones",
    "Link",
];

/// Column headers of the `ver_detalle` sheet, in write order.
pub const DETAIL_FIELDS: [&str; 5] = ["id_tramo", "id_tabla", "variable", "fila", "valor"];

/// One row of a road's section table. `id` is `{road_id}_{n}` with `n`
/// 1-based in discovery order, reset for every road. `detail_link` is the
/// resolved detail-page URL, or empty when the row carries no detail marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRecord {
    pub id: String,
    pub district_no: String,
    pub district: String,
    pub limits: String,
    pub start_km: String,
    pub end_km: String,
    pub tmda: String,
    pub more_info: String,
    pub observations: String,
    pub detail_link: String,
}

impl SectionRecord {
    /// Field values in `SIMPLE_FIELDS` order.
    pub fn fields(&self) -> [&str; 10] {
        [
            &self.id,
            &self.district_no,
            &self.district,
            &self.limits,
            &self.start_km,
            &self.end_km,
            &self.tmda,
            &self.more_info,
            &self.observations,
            &self.detail_link,
        ]
    }
}

/// One long-format cell taken from a named detail table. `row` is the
/// 1-based data-row instance; the header row is never emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    pub section_id: String,
    pub table_id: String,
    pub variable: String,
    pub row: u32,
    pub value: String,
}

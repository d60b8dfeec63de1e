pub mod flatten;
pub mod sections;
pub mod tables;

use indexmap::IndexMap;

/// One extracted table: row 0 is the header, rows 1.. are data. Cell
/// texts are kept raw (untrimmed) at extraction time.
pub type Table = Vec<Vec<String>>;

/// Named tables of one detail page, in document order. Inserting an
/// existing name replaces its table; the later one wins.
pub type TableMap = IndexMap<String, Table>;

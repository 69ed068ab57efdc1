//! The CSV export of the TCGplayer app.

use super::{split_variant, ImportEntry, ImportError};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Simple Name")]
    name: String,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Set Code", default)]
    set_code: Option<String>,
    #[serde(rename = "Product ID", default)]
    product_id: Option<u64>,
}

impl From<Row> for ImportEntry {
    fn from(row: Row) -> Self {
        let (name, variant) = split_variant(&row.name);
        ImportEntry {
            name: name.to_string(),
            quantity: row.quantity,
            set_code: row.set_code.filter(|set| !set.is_empty()),
            product_id: row.product_id,
            variant,
        }
    }
}

pub fn read<R: Read>(reader: R) -> Result<Vec<ImportEntry>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for row in reader.deserialize::<Row>() {
        entries.push(row?.into());
    }

    Ok(entries)
}

pub fn read_path(path: &Path) -> Result<Vec<ImportEntry>, ImportError> {
    read(std::fs::File::open(path)?)
}

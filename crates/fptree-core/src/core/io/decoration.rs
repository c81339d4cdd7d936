//! Per-leaf display records for the external renderer.
//!
//! The engine does not draw anything itself; it hands the renderer one
//! record per leaf with the resolved text color and the shared font/line
//! styling, serialized as CSV.

use serde::Serialize;
use std::io::Write;

/// Display attributes resolved for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafDecoration {
    pub label: String,
    pub color_hex: String,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub font_size: u32,
    pub line_width: u32,
}

const HEADER: [&str; 7] = [
    "label",
    "color_hex",
    "r",
    "g",
    "b",
    "font_size",
    "line_width",
];

/// Writes the decoration records as CSV with a header row.
///
/// The header is written unconditionally, so an empty record set still
/// produces a file with a stable schema.
pub fn write_decorations(
    records: &[LeafDecoration],
    writer: impl Write,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

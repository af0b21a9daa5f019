//! xlsx serialization
//!
//! Writes a [`TabularDocument`] as an Excel workbook.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use super::document::{Cell, TabularDocument};
use super::ExportError;

fn build_workbook(document: &TabularDocument) -> Result<Workbook, ExportError> {
    if document.sheets.is_empty() {
        return Err(ExportError::EmptyBook);
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for sheet in &document.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (r, row) in sheet.rows.iter().enumerate() {
            let row_idx = u32::try_from(r).map_err(|_| ExportError::TooLarge { sheet: sheet.name.clone() })?;

            for (c, cell) in row.iter().enumerate() {
                let col_idx = u16::try_from(c).map_err(|_| ExportError::TooLarge { sheet: sheet.name.clone() })?;

                match cell {
                    Cell::Text(text) if r == 0 => {
                        worksheet.write_string_with_format(row_idx, col_idx, text, &header)?;
                    }
                    Cell::Text(text) => {
                        worksheet.write_string(row_idx, col_idx, text)?;
                    }
                    Cell::Number(value) => {
                        worksheet.write_number(row_idx, col_idx, *value)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
    }

    Ok(workbook)
}

/// Serialize a document to xlsx bytes
pub fn write_xlsx(document: &TabularDocument) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(document)?;
    let bytes = workbook.save_to_buffer()?;

    tracing::debug!(sheets = document.sheets.len(), bytes = bytes.len(), "Wrote workbook");
    Ok(bytes)
}

/// Serialize a document and write it to `path`, returning the byte count
pub fn save_xlsx(document: &TabularDocument, path: &Path) -> Result<usize, ExportError> {
    let bytes = write_xlsx(document)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, &bytes)?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved workbook");
    Ok(bytes.len())
}

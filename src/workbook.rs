//! Excel template filling on top of umya-spreadsheet.
//!
//! Each worksheet is turned into a [`Grid`], run through the substitution
//! engine, and the changed string cells are written back. Styles, formulas
//! and every non-string cell are left as the template had them.

use crate::engine;
use crate::error::{Error, Result};
use crate::grid::{to_a1, Cell, CellKind, Grid};
use crate::record::DataRecord;
use std::io::Cursor;
use umya_spreadsheet::structs::Worksheet;
use umya_spreadsheet::Spreadsheet;

/// Metadata entry holding the used range, e.g. "A1:D12".
pub const REF_META: &str = "!ref";

pub fn open_workbook(template: &[u8]) -> Result<Spreadsheet> {
    umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(template), true)
        .map_err(|e| Error::InvalidWorkbook(e.to_string()))
}

pub fn save_workbook(book: &Spreadsheet) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(book, &mut out)
        .map_err(|e| Error::InvalidWorkbook(e.to_string()))?;
    Ok(out.into_inner())
}

/// Snapshot a worksheet's populated cells as a grid keyed by A1 address.
pub fn grid_from_worksheet(sheet: &Worksheet) -> Grid {
    let mut grid = Grid::new();

    for cell in sheet.get_cell_collection() {
        let address = cell.get_coordinate().get_coordinate();
        let kind = if cell.is_formula() {
            CellKind::Formula
        } else {
            cell_kind(cell.get_data_type())
        };
        grid.insert_cell(address, Cell::new(kind, cell.get_value().to_string()));
    }

    let (max_col, max_row) = sheet.get_highest_column_and_row();
    if max_col > 0 && max_row > 0 {
        grid.insert_meta(REF_META, format!("A1:{}", to_a1(max_col, max_row)));
    }

    grid
}

fn cell_kind(data_type: &str) -> CellKind {
    match data_type {
        "n" => CellKind::Number,
        "b" => CellKind::Boolean,
        "e" => CellKind::Error,
        _ => CellKind::String,
    }
}

/// Write string cells whose text differs from the sheet back into it.
/// Returns the number of cells written.
pub fn apply_grid(sheet: &mut Worksheet, grid: &Grid) -> usize {
    let mut written = 0;

    for (address, cell) in grid.cells() {
        if cell.kind != CellKind::String {
            continue;
        }
        let target = sheet.get_cell_mut(address);
        if target.get_value().as_ref() != cell.value.as_str() {
            target.set_value_string(cell.value.as_str());
            written += 1;
        }
    }

    written
}

/// Fill every worksheet of an `.xlsx` template.
pub fn fill_workbook(book: &mut Spreadsheet, data: &DataRecord) {
    for idx in 0..book.get_sheet_count() {
        let Some(sheet) = book.get_sheet_mut(&idx) else {
            continue;
        };
        let grid = engine::substitute(grid_from_worksheet(sheet), data);
        let written = apply_grid(sheet, &grid);
        tracing::debug!(sheet = %sheet.get_name(), written, "filled worksheet");
    }
}

pub fn fill_xlsx(template: &[u8], data: &DataRecord) -> Result<Vec<u8>> {
    let mut book = open_workbook(template)?;
    fill_workbook(&mut book, data);
    save_workbook(&book)
}

//! In-memory template builders shared by the unit tests.

use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0"?><Types/>"#;

/// Minimal `.docx` container with the given document body and a footer
/// that references `{{nombre}}`.
pub fn docx(document: &str) -> Vec<u8> {
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("word/document.xml", document),
        ("word/footer1.xml", "<w:ftr><w:t>{{nombre}}</w:t></w:ftr>"),
    ];
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
        let options: FileOptions<'static, ()> = FileOptions::default();
        writer.start_file(name, options).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut out = String::new();
    entry.read_to_string(&mut out).unwrap();
    out
}

/// Single-sheet `.xlsx` with the given string cells.
pub fn xlsx(cells: &[(&str, &str)]) -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    for (address, value) in cells {
        sheet.get_cell_mut(*address).set_value_string(*value);
    }
    crate::workbook::save_workbook(&book).unwrap()
}

pub fn xlsx_value(bytes: &[u8], address: &str) -> String {
    let book = crate::workbook::open_workbook(bytes).unwrap();
    book.get_sheet(&0)
        .unwrap()
        .get_cell(address)
        .map(|c| c.get_value().to_string())
        .unwrap_or_default()
}

//! Leave/permission request document generation.
//!
//! Submitted form fields arrive as a flat [`record::DataRecord`]. A stored
//! Word or Excel template is filled by replacing its `{{key}}` placeholders
//! and returned as a new file. The spreadsheet path goes through the
//! [`engine`] over a [`grid::Grid`] snapshot of each worksheet.

pub mod docx;
pub mod engine;
pub mod error;
pub mod grid;
pub mod placeholder;
pub mod record;
pub mod render;
pub mod server;
pub mod store;
pub mod workbook;

#[cfg(test)]
mod fixtures;

pub use error::{Error, Result};

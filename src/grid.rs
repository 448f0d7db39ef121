//! Sparse cell grid used as the substitution input and output.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// Addresses starting with this marker hold grid metadata, not cells.
pub const META_MARKER: char = '!';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    String,
    Number,
    Boolean,
    Formula,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub value: String,
}

impl Cell {
    pub fn new(kind: CellKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(CellKind::String, value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Cell(Cell),
    Meta(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    entries: BTreeMap<String, Entry>,
}

pub fn is_metadata(address: &str) -> bool {
    address.starts_with(META_MARKER)
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_cell(&mut self, address: impl Into<String>, cell: Cell) {
        self.entries.insert(address.into(), Entry::Cell(cell));
    }

    pub fn insert_meta(&mut self, address: impl Into<String>, value: impl Into<String>) {
        self.entries
            .insert(address.into(), Entry::Meta(value.into()));
    }

    pub fn get(&self, address: &str) -> Option<&Entry> {
        self.entries.get(address)
    }

    /// Cell at `address`, ignoring metadata entries.
    pub fn cell(&self, address: &str) -> Option<&Cell> {
        match self.entries.get(address)? {
            Entry::Cell(cell) => Some(cell),
            Entry::Meta(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, Entry> {
        self.entries.iter_mut()
    }

    /// Cells only, in address order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.entries.iter().filter_map(|(address, entry)| match entry {
            Entry::Cell(cell) if !is_metadata(address) => Some((address.as_str(), cell)),
            _ => None,
        })
    }
}

/// Format 1-based (col, row) as A1 notation.
pub fn to_a1(col: u32, row: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect::<String>() + &row.to_string()
}

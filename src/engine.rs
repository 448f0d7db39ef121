//! Grid-wide placeholder substitution.

use crate::grid::{is_metadata, CellKind, Entry, Grid};
use crate::placeholder;
use crate::record::DataRecord;
use std::borrow::Cow;

/// Replace every resolvable `{{key}}` in the string cells of `grid`.
///
/// Metadata entries and non-string cells pass through untouched, as do
/// tokens whose key is not in `data`. Never fails.
pub fn substitute(mut grid: Grid, data: &DataRecord) -> Grid {
    let mut visited = 0usize;
    let mut resolved = 0usize;
    let mut unresolved = 0usize;

    for (address, entry) in grid.iter_mut() {
        if is_metadata(address) {
            continue;
        }
        let Entry::Cell(cell) = entry else {
            continue;
        };
        if cell.kind != CellKind::String {
            continue;
        }
        visited += 1;

        let rendered = placeholder::render(&cell.value, data);
        resolved += rendered.resolved;
        unresolved += rendered.unresolved;

        if let Cow::Owned(value) = rendered.text {
            tracing::trace!(%address, "substituted cell");
            cell.value = value;
        }
    }

    tracing::debug!(visited, resolved, unresolved, "grid substitution done");
    grid
}

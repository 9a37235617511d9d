//! Plain-text field interchange.
//!
//! A field is written row by row: line `y` holds the `width` values of row
//! `y` as decimal numbers separated by single spaces. A blank line ends the
//! block. External inference processes emit fields in this layout.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::core::{Error, Result};
use super::grid::{Grid, ScalarField};

/// Write `field` as text rows followed by a blank line.
pub fn write_rows<W: Write>(field: &ScalarField, mut out: W) -> Result<()> {
    for row in field.rows() {
        let mut first = true;
        for value in row {
            if !first {
                out.write_all(b" ")?;
            }
            write!(out, "{}", value)?;
            first = false;
        }
        out.write_all(b"\n")?;
    }
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Read one field block: rows until a blank line or end of input.
///
/// Values may be separated by any whitespace. Every row must have the same
/// number of values as the first.
pub fn read_rows<R: BufRead>(input: R) -> Result<ScalarField> {
    let mut width = 0usize;
    let mut cells: Vec<f32> = Vec::new();
    let mut height = 0usize;

    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let start = cells.len();
        for token in line.split_whitespace() {
            let value: f32 = token.parse().map_err(|_| {
                Error::field_format(line_no + 1, format!("invalid number '{}'", token))
            })?;
            cells.push(value);
        }

        let row_len = cells.len() - start;
        if height == 0 {
            width = row_len;
        } else if row_len != width {
            return Err(Error::field_format(
                line_no + 1,
                format!("expected {} values, found {}", width, row_len),
            ));
        }
        height += 1;
    }

    if height == 0 {
        return Err(Error::field_format(1, "no rows"));
    }

    // Row lengths were checked above, so the shape always matches
    Grid::from_cells(width, height, cells)
        .ok_or_else(|| Error::field_format(height, "inconsistent field shape"))
}

/// Save a field as text rows.
pub fn save_text(field: &ScalarField, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_rows(field, BufWriter::new(file))
}

/// Load a field from text rows.
pub fn load_text(path: &Path) -> Result<ScalarField> {
    let file = std::fs::File::open(path)?;
    let field = read_rows(BufReader::new(file))?;
    log::debug!("Loaded {}x{} field from {}", field.width(), field.height(), path.display());
    Ok(field)
}

//! CSV export and import of company tables.

use crate::export::{ExportError, ensure_parent};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Write a table to CSV with a header row, creating parent directories.
pub fn export_table(table: &mut DataFrame, path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(table)?;
    info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "table exported"
    );
    Ok(())
}

/// Read a table written by [`export_table`].
///
/// Columns named in `string_columns` are read as strings so codes such
/// as `005930` keep their leading zeros. Names absent from the file are
/// ignored.
pub fn import_table(path: &Path, string_columns: &[&str]) -> Result<DataFrame, ExportError> {
    let headers = csv::Reader::from_path(path)?.headers()?.clone();

    let mut overrides = Schema::default();
    for name in string_columns {
        if headers.iter().any(|h| h == *name) {
            overrides.with_column((*name).into(), DataType::String);
        }
    }

    let table = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(overrides)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    info!(path = %path.display(), rows = table.height(), "table imported");
    Ok(table)
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::Table;

// ---------------------------------------------------------------------------
// Locating the extracted file
// ---------------------------------------------------------------------------

/// Find the dataset file at the top level of `dir`.
///
/// Exactly one regular file is expected. If several are present the
/// lexicographically first name wins and a warning is logged; directory
/// listing order is never relied on.
pub fn locate_single_file(dir: &Path) -> Result<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    match files.len() {
        0 => bail!("No data file found in {}", dir.display()),
        1 => {}
        n => log::warn!(
            "Expected one data file in {} but found {n}; using {}",
            dir.display(),
            files[0].display()
        ),
    }
    Ok(files.swap_remove(0))
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – flat Parquet file, every column rendered as text
/// * anything else      – CSV with a header row
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        _ => load_csv(path),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line. Empty
/// cells are kept as empty strings.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    Table::new(columns, rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Nulls become empty cells, everything else is
/// formatted with Arrow's display rules.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let mut cells = Vec::with_capacity(batch.num_columns());
            for (col_idx, col) in batch.columns().iter().enumerate() {
                let cell = if col.is_null(row) {
                    String::new()
                } else {
                    array_value_to_string(col, row).with_context(|| {
                        format!("Row {row}: formatting column '{}'", columns[col_idx])
                    })?
                };
                cells.push(cell);
            }
            rows.push(cells);
        }
    }

    Table::new(columns, rows)
}

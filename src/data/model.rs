use anyhow::{bail, Context, Result};

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// A loaded tabular dataset.
///
/// Cells are kept as the text they were read as, so rows written back out
/// are byte-identical to the input apart from CSV quoting.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Ordered column names.
    pub columns: Vec<String>,
    /// One `Vec` per row, `columns.len()` cells each.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, checking every row has one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                bail!(
                    "Row {i} has {} cells but the header has {} columns",
                    row.len(),
                    columns.len()
                );
            }
        }
        Ok(Table { columns, rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Parse a column as `f64`. Empty cells and non-numeric text are errors:
    /// the stratification key must be present on every row.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .column_index(name)
            .with_context(|| format!("Table has no '{name}' column"))?;

        self.rows
            .iter()
            .enumerate()
            .map(|(row_no, row)| -> Result<f64> {
                let raw = row[idx].trim();
                let value = raw
                    .parse::<f64>()
                    .with_context(|| format!("Row {row_no}, {name}: '{raw}' is not a number"))?;
                if value.is_nan() {
                    bail!("Row {row_no}, {name}: value is NaN");
                }
                Ok(value)
            })
            .collect()
    }

    /// A new table with the rows at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

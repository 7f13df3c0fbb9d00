//! Editable grid behind the manual test set editor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::playground::enhanced::next_sequence;

/// Columns a new draft starts with.
const INITIAL_COLUMNS: usize = 3;
const INITIAL_ROWS: usize = 3;

/// A saved test set as the backend lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestsetSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TestsetError {
    #[error("Test set name is required")]
    EmptyName,

    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("Add at least one row with data")]
    NoRows,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestsetRow {
    pub id: u64,
    pub cells: Vec<String>,
}

impl TestsetRow {
    fn blank(width: usize) -> Self {
        Self {
            id: next_sequence(),
            cells: vec![String::new(); width],
        }
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// Column names plus rows of cells, cells addressed by column position so a
/// rename never touches row data.
#[derive(Debug, Clone, PartialEq)]
pub struct TestsetDraft {
    columns: Vec<String>,
    rows: Vec<TestsetRow>,
}

impl Default for TestsetDraft {
    fn default() -> Self {
        let columns: Vec<String> = (1..=INITIAL_COLUMNS).map(|i| format!("column{}", i)).collect();
        let rows = (0..INITIAL_ROWS).map(|_| TestsetRow::blank(columns.len())).collect();
        Self { columns, rows }
    }
}

impl TestsetDraft {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TestsetRow] {
        &self.rows
    }

    pub fn cell(&self, row_id: u64, column: usize) -> &str {
        self.rows
            .iter()
            .find(|r| r.id == row_id)
            .and_then(|r| r.cells.get(column))
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn add_row(&mut self) {
        self.rows.push(TestsetRow::blank(self.columns.len()));
    }

    pub fn remove_row(&mut self, row_id: u64) {
        self.rows.retain(|r| r.id != row_id);
    }

    /// Append an empty column named `column<n>`, skipping names already taken.
    /// Returns the new name.
    pub fn add_column(&mut self) -> String {
        let mut n = self.columns.len() + 1;
        let mut name = format!("column{}", n);
        while self.columns.contains(&name) {
            n += 1;
            name = format!("column{}", n);
        }
        self.columns.push(name.clone());
        for row in &mut self.rows {
            row.cells.push(String::new());
        }
        name
    }

    pub fn set_cell(&mut self, row_id: u64, column: usize, text: String) {
        if let Some(cell) = self
            .rows
            .iter_mut()
            .find(|r| r.id == row_id)
            .and_then(|r| r.cells.get_mut(column))
        {
            *cell = text;
        }
    }

    /// Apply the header inputs as column names. A blank input keeps the
    /// current name; a missing one falls back to `newColumn<i>`. Nothing
    /// changes when the result would name two columns the same.
    pub fn rename_columns(&mut self, inputs: &[String]) -> Result<(), TestsetError> {
        let renamed: Vec<String> = (0..self.columns.len())
            .map(|i| match inputs.get(i).map(|s| s.trim()) {
                Some(input) if !input.is_empty() => input.to_string(),
                _ => self
                    .columns
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("newColumn{}", i)),
            })
            .collect();

        for (i, name) in renamed.iter().enumerate() {
            if renamed[..i].contains(name) {
                return Err(TestsetError::DuplicateColumn(name.clone()));
            }
        }
        self.columns = renamed;
        Ok(())
    }

    /// One JSON object per non-blank row, keyed by column name in column order.
    pub fn to_rows(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .filter(|r| !r.is_blank())
            .map(|r| {
                self.columns
                    .iter()
                    .zip(&r.cells)
                    .map(|(column, cell)| (column.clone(), Value::String(cell.clone())))
                    .collect()
            })
            .collect()
    }

    /// Validate the draft for saving under `name`.
    pub fn build_request(&self, name: &str) -> Result<(String, Vec<Map<String, Value>>), TestsetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TestsetError::EmptyName);
        }
        let rows = self.to_rows();
        if rows.is_empty() {
            return Err(TestsetError::NoRows);
        }
        Ok((name.to_string(), rows))
    }
}

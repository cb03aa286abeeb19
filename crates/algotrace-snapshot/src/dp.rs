//! Dynamic-programming tables.

use algotrace_protocol::{AuxSnapshot, CellRef, DpTableSnapshot};

#[derive(Debug, Clone)]
pub struct DpTable {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    cells: Vec<Vec<Option<i64>>>,
}

impl DpTable {
    pub fn new(row_labels: Vec<String>, col_labels: Vec<String>) -> Self {
        let cells = vec![vec![None; col_labels.len()]; row_labels.len()];
        Self {
            row_labels,
            col_labels,
            cells,
        }
    }

    /// Labels from the characters of `s`, prefixed with an empty-string
    /// header (`ε`) for the base-case row or column.
    pub fn char_labels(s: &[char]) -> Vec<String> {
        std::iter::once("ε".to_string())
            .chain(s.iter().map(|c| c.to_string()))
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn cols(&self) -> usize {
        self.col_labels.len()
    }

    pub fn set(&mut self, row: usize, col: usize, value: i64) {
        self.cells[row][col] = Some(value);
    }

    /// Value at a cell; uncomputed cells read as 0.
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.cells[row][col].unwrap_or(0)
    }

    /// Position of the largest computed value (first in row-major order).
    pub fn best(&self) -> Option<CellRef> {
        let mut best: Option<(i64, CellRef)> = None;
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some(v) = *cell {
                    if best.map_or(true, |(b, _)| v > b) {
                        best = Some((v, CellRef { row, col }));
                    }
                }
            }
        }
        best.map(|(_, cell)| cell)
    }

    pub fn snapshot(&self, current: Option<CellRef>) -> AuxSnapshot {
        AuxSnapshot::DpTable(DpTableSnapshot {
            row_labels: self.row_labels.clone(),
            col_labels: self.col_labels.clone(),
            cells: self.cells.clone(),
            current,
            best: self.best(),
        })
    }
}

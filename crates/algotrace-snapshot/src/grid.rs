//! Backtracking boards.

use algotrace_protocol::{AuxSnapshot, CellStatus, GridCell, GridSnapshot, Scalar};

/// Row-major board of values and search states.
#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    values: Vec<Scalar>,
    status: Vec<CellStatus>,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![Scalar::Null; rows * cols],
            status: vec![CellStatus::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(row < self.rows && col < self.cols, "cell ({row}, {col}) outside board");
        row * self.cols + col
    }

    pub fn set(&mut self, row: usize, col: usize, value: impl Into<Scalar>, status: CellStatus) {
        let i = self.offset(row, col);
        self.values[i] = value.into();
        self.status[i] = status;
    }

    pub fn set_status(&mut self, row: usize, col: usize, status: CellStatus) {
        let i = self.offset(row, col);
        self.status[i] = status;
    }

    /// Reset a cell to empty.
    pub fn clear(&mut self, row: usize, col: usize) {
        self.set(row, col, Scalar::Null, CellStatus::Empty);
    }

    pub fn status(&self, row: usize, col: usize) -> CellStatus {
        self.status[self.offset(row, col)]
    }

    /// Set every cell currently in `from` to `to`.
    pub fn replace_status(&mut self, from: CellStatus, to: CellStatus) {
        for s in self.status.iter_mut().filter(|s| **s == from) {
            *s = to;
        }
    }

    pub fn snapshot(&self) -> AuxSnapshot {
        let cells = (0..self.rows * self.cols)
            .map(|i| GridCell {
                row: i / self.cols,
                col: i % self.cols,
                value: self.values[i].clone(),
                status: self.status[i],
            })
            .collect();
        AuxSnapshot::Grid(GridSnapshot {
            rows: self.rows,
            cols: self.cols,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_row_major_and_isolated() {
        let mut board = Board::new(2, 3);
        board.set(1, 2, 'Q', CellStatus::Tentative);
        let snapshot = board.snapshot();
        assert!(snapshot.validate().is_ok());

        board.set(1, 2, 'Q', CellStatus::Conflict);
        board.clear(1, 2);

        match snapshot {
            AuxSnapshot::Grid(g) => {
                let cell = g.cell(1, 2).unwrap();
                assert_eq!(cell.status, CellStatus::Tentative);
                assert_eq!(cell.value, Scalar::Char('Q'));
                assert_eq!(g.count(CellStatus::Empty), 5);
            }
            _ => panic!("expected grid"),
        }
    }

    #[test]
    fn replace_status_promotes_cells() {
        let mut board = Board::new(2, 2);
        board.set(0, 0, 'Q', CellStatus::Placed);
        board.set(1, 1, 'Q', CellStatus::Placed);
        board.replace_status(CellStatus::Placed, CellStatus::Solution);
        assert_eq!(board.status(0, 0), CellStatus::Solution);
        assert_eq!(board.status(0, 1), CellStatus::Empty);
    }
}

//! N-Queens by row-wise backtracking.

use algotrace_engine::{
    AlgorithmDef, AlgorithmError, Category, Descriptor, Difficulty, Input, InputShape, ParamSpec,
    ParamValue, Params, Pointers, RunResult, TimeComplexity, Tracer,
};
use algotrace_protocol::{CellStatus, Outcome};
use algotrace_snapshot::Board;
use futures::future::LocalBoxFuture;

use crate::support::size_between;

const N_QUEENS: &[&str] = &[
    "solve(row):",
    "  if row == n: record solution; return",
    "  for col from 0 to n - 1",
    "    if no queen attacks (row, col)",
    "      place queen at (row, col)",
    "      solve(row + 1)",
    "      remove queen (backtrack)",
];

const DEFAULT_MAX_SOLUTIONS: i64 = 3;

pub fn n_queens() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "n-queens",
            name: "N-Queens",
            category: Category::Backtracking,
            difficulty: Difficulty::Advanced,
            input: InputShape::Size,
            pseudocode: N_QUEENS,
            time: TimeComplexity::uniform("O(n!)"),
            space: "O(n)",
            parameters: vec![
                ParamSpec::select(
                    "mode",
                    "Stop after",
                    &[("first", "First solution"), ("all", "Several solutions")],
                    "first",
                ),
                ParamSpec::range("max_solutions", "Solutions to find", 1, 20, DEFAULT_MAX_SOLUTIONS)
                    .visible_when("mode", ParamValue::Text("all".into())),
            ],
        },
        |input| size_between(input, 4, 10),
        |input, params, tx| Box::pin(queens_run(input, params, tx)),
    )
}

struct Queens {
    tx: Tracer,
    n: usize,
    board: Board,
    /// Column of the queen in each filled row.
    cols: Vec<usize>,
    solutions: Vec<Vec<usize>>,
    wanted: usize,
}

impl Queens {
    /// The row of a queen that attacks `(row, col)`, if any.
    fn attacker(&self, row: usize, col: usize) -> Option<usize> {
        self.cols.iter().enumerate().find_map(|(r, &c)| {
            let same_col = c == col;
            let diagonal = row - r == c.abs_diff(col);
            (same_col || diagonal).then_some(r)
        })
    }
}

async fn queens_run(input: Input, params: Params, tx: Tracer) -> RunResult {
    let n = input.size().unwrap_or(4).clamp(4, 10) as usize;
    let wanted = match params.text("mode") {
        Some("all") => params
            .number("max_solutions")
            .unwrap_or(DEFAULT_MAX_SOLUTIONS)
            .clamp(1, 20) as usize,
        _ => 1,
    };
    tx.info(format!("Placing {n} queens, one per row, none attacking another"))
        .await?;
    let mut run = Queens {
        tx,
        n,
        board: Board::new(n, n),
        cols: Vec::with_capacity(n),
        solutions: Vec::new(),
        wanted,
    };
    run.tx.auxiliary(run.board.snapshot()).await?;
    solve(&mut run, 0).await?;

    let count = run.solutions.len();
    let first = run
        .solutions
        .first()
        .cloned()
        .ok_or_else(|| AlgorithmError::fault(format!("no placement found for n = {n}")))?;
    let caption = if count == 1 {
        "Found 1 solution".to_string()
    } else {
        format!("Found {count} solutions")
    };
    run.tx.result(Outcome::Indices(first), caption).await?;
    Ok(())
}

/// Resolves to `true` once enough solutions are recorded.
fn solve(run: &mut Queens, row: usize) -> LocalBoxFuture<'_, Result<bool, AlgorithmError>> {
    Box::pin(solve_body(run, row))
}

async fn solve_body(run: &mut Queens, row: usize) -> Result<bool, AlgorithmError> {
    run.tx.highlight(&[1, 2]).await?;
    if row == run.n {
        return record(run).await;
    }

    for col in 0..run.n {
        run.tx.highlight(&[3, 4]).await?;
        run.tx
            .pointer(Pointers::new().value("row", row).value("col", col))
            .await?;
        run.board.set(row, col, 'Q', CellStatus::Tentative);
        run.tx.auxiliary(run.board.snapshot()).await?;

        if let Some(r) = run.attacker(row, col) {
            let c = run.cols[r];
            run.board.set(row, col, 'Q', CellStatus::Conflict);
            run.board.set_status(r, c, CellStatus::Conflict);
            run.tx.auxiliary(run.board.snapshot()).await?;
            run.tx
                .explain(format!("({row}, {col}) is attacked by the queen at ({r}, {c})"))
                .await?;
            run.board.clear(row, col);
            run.board.set_status(r, c, CellStatus::Placed);
            continue;
        }

        run.tx.highlight(&[5]).await?;
        run.board.set(row, col, 'Q', CellStatus::Placed);
        run.cols.push(col);
        run.tx.auxiliary(run.board.snapshot()).await?;

        run.tx.highlight(&[6]).await?;
        if solve(run, row + 1).await? {
            return Ok(true);
        }

        run.tx.highlight(&[7]).await?;
        run.cols.pop();
        run.board.clear(row, col);
        run.tx.auxiliary(run.board.snapshot()).await?;
        run.tx
            .explain(format!("Backtrack: remove the queen from ({row}, {col})"))
            .await?;
    }
    Ok(false)
}

async fn record(run: &mut Queens) -> Result<bool, AlgorithmError> {
    run.solutions.push(run.cols.clone());
    run.board.replace_status(CellStatus::Placed, CellStatus::Solution);
    run.tx.auxiliary(run.board.snapshot()).await?;
    run.board.replace_status(CellStatus::Solution, CellStatus::Placed);
    run.tx
        .note(format!(
            "Solution {}: columns {:?}",
            run.solutions.len(),
            run.cols
        ))
        .await?;
    Ok(run.solutions.len() >= run.wanted)
}

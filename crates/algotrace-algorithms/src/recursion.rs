//! Recursion visualized as a call tree.

use algotrace_engine::{
    AlgorithmDef, AlgorithmError, Category, Descriptor, Difficulty, Input, InputShape, Params,
    Pointers, RunResult, TimeComplexity, Tracer,
};
use algotrace_protocol::Outcome;
use algotrace_snapshot::{CallId, CallTree, Pegs};
use futures::future::LocalBoxFuture;

use crate::support::size_between;

// ---------------------------------------------------------------------------
// Fibonacci
// ---------------------------------------------------------------------------

const FIBONACCI: &[&str] = &[
    "fib(n):",
    "  if n <= 1: return n",
    "  return fib(n - 1) + fib(n - 2)",
];

pub fn fibonacci() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "fibonacci",
            name: "Fibonacci (naive recursion)",
            category: Category::Recursion,
            difficulty: Difficulty::Beginner,
            input: InputShape::Size,
            pseudocode: FIBONACCI,
            time: TimeComplexity::uniform("O(2^n)"),
            space: "O(n)",
            parameters: vec![],
        },
        |input| size_between(input, 0, 10),
        |input, params, tx| Box::pin(fib_run(input, params, tx)),
    )
}

struct Fib {
    tx: Tracer,
    calls: CallTree,
}

async fn fib_run(input: Input, _: Params, tx: Tracer) -> RunResult {
    let n = input.size().unwrap_or(0);
    tx.info(format!("fib({n}) recomputes the same subproblems many times"))
        .await?;
    let mut run = Fib {
        tx,
        calls: CallTree::new(),
    };
    let value = fib(&mut run, n, None).await?;
    run.tx
        .result(
            Outcome::String(value.to_string()),
            format!("fib({n}) = {value} after {} calls", run.calls.len()),
        )
        .await?;
    Ok(())
}

fn fib(run: &mut Fib, n: u32, parent: Option<CallId>) -> LocalBoxFuture<'_, Result<u64, AlgorithmError>> {
    Box::pin(fib_body(run, n, parent))
}

async fn fib_body(run: &mut Fib, n: u32, parent: Option<CallId>) -> Result<u64, AlgorithmError> {
    let id = run.tx.next_node_id();
    run.calls.enter(id, "fib", format!("n={n}"), parent);
    run.tx.auxiliary(run.calls.snapshot()).await?;
    run.tx.highlight(&[1, 2]).await?;
    run.tx.pointer(Pointers::new().value("n", n)).await?;

    let value = if n <= 1 {
        u64::from(n)
    } else {
        run.tx.highlight(&[3]).await?;
        let left = fib(run, n - 1, Some(id)).await?;
        run.tx.highlight(&[3]).await?;
        let right = fib(run, n - 2, Some(id)).await?;
        left + right
    };

    run.calls.complete(id, value);
    run.tx.auxiliary(run.calls.snapshot()).await?;
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tower of Hanoi
// ---------------------------------------------------------------------------

const HANOI: &[&str] = &[
    "hanoi(n, from, to, via):",
    "  if n == 1: move disk 1 from -> to; return",
    "  hanoi(n - 1, from, via, to)",
    "  move disk n from -> to",
    "  hanoi(n - 1, via, to, from)",
];

pub fn tower_of_hanoi() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "tower-of-hanoi",
            name: "Tower of Hanoi",
            category: Category::Recursion,
            difficulty: Difficulty::Intermediate,
            input: InputShape::Size,
            pseudocode: HANOI,
            time: TimeComplexity::uniform("O(2^n)"),
            space: "O(n)",
            parameters: vec![],
        },
        |input| size_between(input, 1, 6),
        |input, params, tx| Box::pin(hanoi_run(input, params, tx)),
    )
}

struct Hanoi {
    tx: Tracer,
    calls: CallTree,
    pegs: Pegs,
}

async fn hanoi_run(input: Input, _: Params, tx: Tracer) -> RunResult {
    let n = input.size().unwrap_or(1).max(1);
    tx.info(format!("Move {n} disks from A to C, never a larger disk on a smaller one"))
        .await?;
    let mut run = Hanoi {
        tx,
        calls: CallTree::new(),
        pegs: Pegs::new(n),
    };
    run.tx.auxiliary(run.pegs.snapshot(None)).await?;
    hanoi(&mut run, n, 0, 2, 1, None).await?;

    if !run.pegs.is_solved() {
        return Err(AlgorithmError::fault("disks left outside the target peg"));
    }
    let moves = run.pegs.moves();
    run.tx
        .result(
            Outcome::String(format!("{moves} moves")),
            format!("Solved {n} disks in {moves} moves (2^{n} - 1)"),
        )
        .await?;
    Ok(())
}

fn hanoi(
    run: &mut Hanoi,
    n: u32,
    from: usize,
    to: usize,
    via: usize,
    parent: Option<CallId>,
) -> LocalBoxFuture<'_, RunResult> {
    Box::pin(hanoi_body(run, n, from, to, via, parent))
}

async fn hanoi_body(
    run: &mut Hanoi,
    n: u32,
    from: usize,
    to: usize,
    via: usize,
    parent: Option<CallId>,
) -> RunResult {
    let id = run.tx.next_node_id();
    let args = format!("n={n}, {}→{}", Pegs::name(from), Pegs::name(to));
    run.calls.enter(id, "hanoi", args, parent);
    run.tx.auxiliary(run.calls.snapshot()).await?;
    run.tx.highlight(&[1, 2]).await?;

    if n == 1 {
        move_disk(run, from, to).await?;
    } else {
        run.tx.highlight(&[3]).await?;
        hanoi(run, n - 1, from, via, to, Some(id)).await?;
        run.tx.highlight(&[4]).await?;
        move_disk(run, from, to).await?;
        run.tx.highlight(&[5]).await?;
        hanoi(run, n - 1, via, to, from, Some(id)).await?;
    }

    run.calls.complete(id, "done");
    run.tx.auxiliary(run.calls.snapshot()).await?;
    Ok(())
}

async fn move_disk(run: &mut Hanoi, from: usize, to: usize) -> RunResult {
    let moved = run.pegs.move_disk(from, to).ok_or_else(|| {
        AlgorithmError::fault(format!(
            "illegal move from {} to {}",
            Pegs::name(from),
            Pegs::name(to)
        ))
    })?;
    run.tx.auxiliary(run.pegs.snapshot(Some(moved))).await?;
    run.tx
        .note(format!(
            "Move {}: disk {} from {} to {}",
            run.pegs.moves(),
            moved.disk,
            Pegs::name(from),
            Pegs::name(to)
        ))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{drain, outcome, snapshots};
    use algotrace_engine::Engine;
    use algotrace_protocol::{AuxSnapshot, CallStatus, Event};

    fn final_tree(events: &[Event]) -> &algotrace_protocol::RecursionTreeSnapshot {
        match snapshots(events, "recursion_tree").last().copied() {
            Some(AuxSnapshot::RecursionTree(tree)) => tree,
            _ => panic!("no recursion tree"),
        }
    }

    #[test]
    fn fibonacci_values() {
        for (n, expected) in [(0, "0"), (1, "1"), (2, "1"), (7, "13"), (10, "55")] {
            let events = drain(&fibonacci(), Input::Size(n), Params::new());
            assert_eq!(outcome(&events).0, Outcome::String(expected.into()), "fib({n})");
        }
    }

    #[test]
    fn fibonacci_tree_counts_every_call() {
        let events = drain(&fibonacci(), Input::Size(5), Params::new());
        let tree = final_tree(&events);
        assert_eq!(tree.nodes.len(), 15);
        assert!(tree.nodes.iter().all(|n| n.status == CallStatus::Completed));
        let root = &tree.nodes[0];
        assert_eq!((root.depth, root.children.len()), (0, 2));
        assert_eq!(root.result, Some(algotrace_protocol::Scalar::Int(5)));
    }

    #[test]
    fn hanoi_moves_every_disk() {
        let events = drain(&tower_of_hanoi(), Input::Size(3), Params::new());
        assert_eq!(outcome(&events).0, Outcome::String("7 moves".into()));

        let Some(AuxSnapshot::Hanoi(last)) = snapshots(&events, "hanoi").last().copied() else {
            panic!("no hanoi snapshot");
        };
        assert_eq!(last.pegs[2].disks, vec![3, 2, 1]);
        assert_eq!(last.moves, 7);
    }

    #[test]
    fn hanoi_single_disk_is_the_base_case() {
        let events = drain(&tower_of_hanoi(), Input::Size(1), Params::new());
        assert_eq!(final_tree(&events).nodes.len(), 1);
    }

    #[test]
    fn size_bounds_are_enforced() {
        let engine = Engine::default();
        assert!(engine.start(&fibonacci(), Input::Size(11), &Params::new()).is_err());
        assert!(engine.start(&tower_of_hanoi(), Input::Size(0), &Params::new()).is_err());
        assert!(engine.start(&tower_of_hanoi(), Input::Size(7), &Params::new()).is_err());
    }
}

//! Comparison sorts.

use algotrace_engine::{
    AlgorithmDef, AlgorithmError, Category, Descriptor, Difficulty, Input, InputShape, ParamSpec,
    Params, Pointers, RunResult, TimeComplexity, Tracer, Validation,
};
use algotrace_protocol::{MarkType, Outcome, Relation};
use algotrace_snapshot::{CallId, CallTree};
use futures::future::LocalBoxFuture;

use crate::support::{all, join, numbers, numbers_between, swap, MAX_ARRAY_LEN};

fn validate_array(input: &Input) -> Validation {
    numbers_between(input, 1, MAX_ARRAY_LEN)
}

async fn finish_sorted(tx: &Tracer, a: &[i64], line: usize) -> RunResult {
    tx.mark(&all(a.len()), MarkType::Sorted).await?;
    tx.highlight(&[line]).await?;
    tx.result(Outcome::String(join(a, ", ")), "Sorted").await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Bubble sort
// ---------------------------------------------------------------------------

const BUBBLE: &[&str] = &[
    "for i from 0 to n - 2",
    "  swapped = false",
    "  for j from 0 to n - 2 - i",
    "    if a[j] > a[j + 1]",
    "      swap a[j] and a[j + 1]; swapped = true",
    "  if not swapped: stop",
    "return a",
];

pub fn bubble_sort() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "bubble-sort",
            name: "Bubble Sort",
            category: Category::Sorting,
            difficulty: Difficulty::Beginner,
            input: InputShape::Numbers,
            pseudocode: BUBBLE,
            time: TimeComplexity::new("O(n)", "O(n²)", "O(n²)"),
            space: "O(1)",
            parameters: vec![],
        },
        validate_array,
        |input, params, tx| Box::pin(bubble(input, params, tx)),
    )
}

async fn bubble(input: Input, _: Params, tx: Tracer) -> RunResult {
    let mut a = numbers(&input).to_vec();
    let n = a.len();
    tx.track(n);
    tx.info(format!("Bubble sort on {n} values")).await?;

    for i in 0..n.saturating_sub(1) {
        tx.highlight(&[1, 2]).await?;
        let mut swapped = false;
        for j in 0..n - 1 - i {
            tx.highlight(&[3, 4]).await?;
            tx.pointer(
                Pointers::new()
                    .at("j", j as i64)
                    .at("j+1", j as i64 + 1)
                    .value("pass", i + 1),
            )
            .await?;
            let relation = Relation::of(&a[j], &a[j + 1]);
            tx.compare(j, j + 1, relation).await?;
            if relation == Relation::Gt {
                tx.highlight(&[5]).await?;
                swap(&tx, &mut a, j, j + 1).await?;
                swapped = true;
            }
        }
        tx.mark(&[n - 1 - i], MarkType::Sorted).await?;
        if !swapped {
            tx.highlight(&[6]).await?;
            tx.note("No swaps in this pass, so the rest is already sorted").await?;
            break;
        }
    }

    finish_sorted(&tx, &a, 7).await
}

// ---------------------------------------------------------------------------
// Insertion sort
// ---------------------------------------------------------------------------

const INSERTION: &[&str] = &[
    "for i from 1 to n - 1",
    "  j = i",
    "  while j > 0 and a[j - 1] > a[j]",
    "    swap a[j - 1] and a[j]",
    "    j = j - 1",
    "return a",
];

pub fn insertion_sort() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "insertion-sort",
            name: "Insertion Sort",
            category: Category::Sorting,
            difficulty: Difficulty::Beginner,
            input: InputShape::Numbers,
            pseudocode: INSERTION,
            time: TimeComplexity::new("O(n)", "O(n²)", "O(n²)"),
            space: "O(1)",
            parameters: vec![],
        },
        validate_array,
        |input, params, tx| Box::pin(insertion(input, params, tx)),
    )
}

async fn insertion(input: Input, _: Params, tx: Tracer) -> RunResult {
    let mut a = numbers(&input).to_vec();
    let n = a.len();
    tx.track(n);
    tx.info(format!("Insertion sort on {n} values")).await?;
    tx.mark(&[0], MarkType::Sorted).await?;

    for i in 1..n {
        tx.highlight(&[1, 2]).await?;
        tx.mark(&[i], MarkType::Current).await?;
        let mut j = i;
        while j > 0 {
            tx.highlight(&[3]).await?;
            tx.pointer(Pointers::new().at("i", i as i64).at("j", j as i64).value("key", a[j]))
                .await?;
            let relation = Relation::of(&a[j - 1], &a[j]);
            tx.compare(j - 1, j, relation).await?;
            if relation != Relation::Gt {
                break;
            }
            tx.highlight(&[4, 5]).await?;
            swap(&tx, &mut a, j - 1, j).await?;
            j -= 1;
        }
        tx.unmark(&[i]).await?;
        tx.mark(&all(i + 1), MarkType::Sorted).await?;
    }

    finish_sorted(&tx, &a, 6).await
}

// ---------------------------------------------------------------------------
// Quick sort
// ---------------------------------------------------------------------------

const QUICK: &[&str] = &[
    "quickSort(a, lo, hi)",
    "  if lo >= hi: return",
    "  p = partition(a, lo, hi)",
    "  quickSort(a, lo, p - 1)",
    "  quickSort(a, p + 1, hi)",
    "partition(a, lo, hi): move the chosen pivot to a[hi]; i = lo",
    "  for j from lo to hi - 1",
    "    if a[j] < pivot: swap a[i] and a[j]; i = i + 1",
    "  swap a[i] and a[hi]; return i",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PivotRule {
    First,
    Middle,
    Last,
}

impl PivotRule {
    fn name(self) -> &'static str {
        match self {
            PivotRule::First => "first",
            PivotRule::Middle => "middle",
            PivotRule::Last => "last",
        }
    }

    fn from_params(params: &Params) -> Self {
        match params.text("pivot") {
            Some("first") => PivotRule::First,
            Some("middle") => PivotRule::Middle,
            _ => PivotRule::Last,
        }
    }

    /// Pivot position within `lo..hi` (exclusive).
    fn pick(self, lo: usize, hi: usize) -> usize {
        match self {
            PivotRule::First => lo,
            PivotRule::Middle => lo + (hi - lo - 1) / 2,
            PivotRule::Last => hi - 1,
        }
    }
}

pub fn quick_sort() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "quick-sort",
            name: "Quick Sort",
            category: Category::Sorting,
            difficulty: Difficulty::Intermediate,
            input: InputShape::Numbers,
            pseudocode: QUICK,
            time: TimeComplexity::new("O(n log n)", "O(n log n)", "O(n²)"),
            space: "O(log n)",
            parameters: vec![ParamSpec::select(
                "pivot",
                "Pivot",
                &[("last", "Last element"), ("first", "First element"), ("middle", "Middle element")],
                "last",
            )],
        },
        validate_array,
        |input, params, tx| Box::pin(quick(input, params, tx)),
    )
}

struct QuickSort {
    tx: Tracer,
    a: Vec<i64>,
    calls: CallTree,
    rule: PivotRule,
}

async fn quick(input: Input, params: Params, tx: Tracer) -> RunResult {
    let a = numbers(&input).to_vec();
    tx.track(a.len());
    let mut run = QuickSort {
        rule: PivotRule::from_params(&params),
        tx,
        a,
        calls: CallTree::new(),
    };
    run.tx
        .info(format!("Quick sort with the {} element as pivot", run.rule.name()))
        .await?;
    let n = run.a.len();
    sort_range(&mut run, 0, n, None).await?;
    finish_sorted(&run.tx, &run.a, 1).await
}

/// Sort `lo..hi` (exclusive). Boxed so the recursion has a finite size.
fn sort_range(
    run: &mut QuickSort,
    lo: usize,
    hi: usize,
    parent: Option<CallId>,
) -> LocalBoxFuture<'_, RunResult> {
    Box::pin(sort_range_body(run, lo, hi, parent))
}

async fn sort_range_body(run: &mut QuickSort, lo: usize, hi: usize, parent: Option<CallId>) -> RunResult {
    let id = run.tx.next_node_id();
    let args = if hi > lo {
        format!("lo={lo}, hi={}", hi - 1)
    } else {
        format!("lo={lo}, hi={}", lo as i64 - 1)
    };
    run.calls.enter(id, "quickSort", args, parent);
    run.tx.auxiliary(run.calls.snapshot()).await?;
    run.tx.highlight(&[1, 2]).await?;

    if hi <= lo + 1 {
        if hi == lo + 1 {
            run.tx.mark(&[lo], MarkType::Sorted).await?;
        }
        run.calls.complete(id, "done");
        run.tx.auxiliary(run.calls.snapshot()).await?;
        return Ok(());
    }

    run.tx.highlight(&[3]).await?;
    let p = partition(run, lo, hi).await?;
    run.tx.highlight(&[4]).await?;
    sort_range(run, lo, p, Some(id)).await?;
    run.tx.highlight(&[5]).await?;
    sort_range(run, p + 1, hi, Some(id)).await?;

    run.calls.complete(id, format!("pivot at {p}"));
    run.tx.auxiliary(run.calls.snapshot()).await?;
    Ok(())
}

async fn partition(run: &mut QuickSort, lo: usize, hi: usize) -> Result<usize, AlgorithmError> {
    let tx = run.tx.clone();
    let last = hi - 1;
    let chosen = run.rule.pick(lo, hi);

    tx.highlight(&[6]).await?;
    tx.mark(&[chosen], MarkType::Pivot).await?;
    if chosen != last {
        tx.unmark(&[chosen]).await?;
        swap(&tx, &mut run.a, chosen, last).await?;
        tx.mark(&[last], MarkType::Pivot).await?;
    }
    let pivot = run.a[last];
    tx.note(format!("Pivot is {pivot}")).await?;

    let mut i = lo;
    for j in lo..last {
        tx.highlight(&[7, 8]).await?;
        tx.pointer(
            Pointers::new()
                .at("i", i as i64)
                .at("j", j as i64)
                .value("pivot", pivot),
        )
        .await?;
        let relation = Relation::of(&run.a[j], &pivot);
        tx.compare(j, last, relation).await?;
        if relation == Relation::Lt {
            if i != j {
                swap(&tx, &mut run.a, i, j).await?;
            }
            i += 1;
        }
    }

    tx.highlight(&[9]).await?;
    tx.unmark(&[last]).await?;
    if i != last {
        swap(&tx, &mut run.a, i, last).await?;
    }
    tx.mark(&[i], MarkType::Sorted).await?;
    Ok(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{drain, final_array, outcome, snapshots};
    use algotrace_engine::{Engine, ParamValue};
    use algotrace_protocol::{AuxSnapshot, CallStatus, Payload};
    use proptest::prelude::*;

    fn nums(values: &[i64]) -> Input {
        Input::Numbers(values.to_vec())
    }

    #[test]
    fn bubble_sorts_and_reports() {
        let input = [5, 1, 4, 2, 8];
        let events = drain(&bubble_sort(), nums(&input), Params::new());
        assert_eq!(final_array(&input, &events), vec![1, 2, 4, 5, 8]);
        assert_eq!(outcome(&events).0, Outcome::String("1, 2, 4, 5, 8".into()));
    }

    #[test]
    fn bubble_stops_early_on_sorted_input() {
        let events = drain(&bubble_sort(), nums(&[1, 2, 3, 4]), Params::new());
        let compares = events
            .iter()
            .filter(|e| matches!(e.payload, Payload::Compare { .. }))
            .count();
        assert_eq!(compares, 3);
        assert!(!events.iter().any(|e| matches!(e.payload, Payload::Set { .. })));
    }

    #[test]
    fn insertion_handles_duplicates() {
        let input = [3, 1, 3, 2, 1];
        let events = drain(&insertion_sort(), nums(&input), Params::new());
        assert_eq!(final_array(&input, &events), vec![1, 1, 2, 3, 3]);
    }

    #[test]
    fn single_element_is_sorted() {
        for def in [bubble_sort(), insertion_sort(), quick_sort()] {
            let events = drain(&def, nums(&[7]), Params::new());
            assert_eq!(outcome(&events).0, Outcome::String("7".into()));
        }
    }

    #[test]
    fn rejects_empty_and_oversized_input() {
        let def = bubble_sort();
        let engine = Engine::default();
        assert!(engine.start(&def, nums(&[]), &Params::new()).is_err());
        assert!(engine.start(&def, nums(&[1; 21]), &Params::new()).is_err());
    }

    #[test]
    fn quick_sort_builds_a_completed_tree() {
        let input = [9, 3, 7, 1, 8, 2];
        for rule in ["first", "middle", "last"] {
            let params = Params::new().with("pivot", ParamValue::Text(rule.into()));
            let events = drain(&quick_sort(), nums(&input), params);
            assert_eq!(final_array(&input, &events), vec![1, 2, 3, 7, 8, 9], "pivot={rule}");

            let trees = snapshots(&events, "recursion_tree");
            let Some(AuxSnapshot::RecursionTree(tree)) = trees.last().copied() else {
                panic!("no recursion tree");
            };
            assert!(tree.nodes.iter().all(|n| n.status == CallStatus::Completed));
            assert_eq!(tree.nodes[0].parent_id, None);
            assert_eq!(tree.active_id, None);
        }
    }

    proptest! {
        #[test]
        fn every_sort_sorts(values in proptest::collection::vec(-999i64..=999, 1..=MAX_ARRAY_LEN)) {
            let mut expected = values.clone();
            expected.sort();
            for def in [bubble_sort(), insertion_sort(), quick_sort()] {
                let events = drain(&def, nums(&values), Params::new());
                prop_assert_eq!(final_array(&values, &events), expected.clone());
                prop_assert!(events.last().unwrap().is_result());
            }
        }
    }
}

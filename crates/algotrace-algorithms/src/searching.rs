//! Linear and binary search.

use algotrace_engine::{
    AlgorithmDef, Category, Descriptor, Difficulty, Input, InputShape, ParamSpec, Params, Pointers,
    RunResult, TimeComplexity, Tracer, Validation,
};
use algotrace_protocol::{MarkType, Outcome};

use crate::support::{numbers, numbers_between, MAX_ARRAY_LEN};

const DEFAULT_TARGET: i64 = 7;

fn target_param() -> ParamSpec {
    ParamSpec::range("target", "Target", -999, 999, DEFAULT_TARGET)
}

fn target(params: &Params) -> i64 {
    params.number("target").unwrap_or(DEFAULT_TARGET)
}

async fn report(tx: &Tracer, found: Option<usize>, target: i64, line: usize) -> RunResult {
    tx.highlight(&[line]).await?;
    let caption = match found {
        Some(i) => format!("Found {target} at index {i}"),
        None => format!("{target} is not in the array"),
    };
    tx.result(Outcome::Search(found), caption).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Linear search
// ---------------------------------------------------------------------------

const LINEAR: &[&str] = &[
    "for i from 0 to n - 1",
    "  if a[i] == target",
    "    return i",
    "return -1",
];

pub fn linear_search() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "linear-search",
            name: "Linear Search",
            category: Category::Searching,
            difficulty: Difficulty::Beginner,
            input: InputShape::Numbers,
            pseudocode: LINEAR,
            time: TimeComplexity::new("O(1)", "O(n)", "O(n)"),
            space: "O(1)",
            parameters: vec![target_param()],
        },
        |input| numbers_between(input, 1, MAX_ARRAY_LEN),
        |input, params, tx| Box::pin(linear(input, params, tx)),
    )
}

async fn linear(input: Input, params: Params, tx: Tracer) -> RunResult {
    let a = numbers(&input).to_vec();
    let target = target(&params);
    tx.track(a.len());
    tx.info(format!("Looking for {target} one element at a time")).await?;

    for (i, &value) in a.iter().enumerate() {
        tx.highlight(&[1, 2]).await?;
        tx.pointer(Pointers::new().at("i", i as i64).value("target", target).value("a[i]", value))
            .await?;
        tx.mark(&[i], MarkType::Current).await?;
        if value == target {
            tx.unmark(&[i]).await?;
            tx.mark(&[i], MarkType::Found).await?;
            return report(&tx, Some(i), target, 3).await;
        }
        tx.unmark(&[i]).await?;
        tx.mark(&[i], MarkType::Visited).await?;
    }

    report(&tx, None, target, 4).await
}

// ---------------------------------------------------------------------------
// Binary search
// ---------------------------------------------------------------------------

const BINARY: &[&str] = &[
    "lo = 0; hi = n - 1",
    "while lo <= hi",
    "  mid = (lo + hi) / 2",
    "  if a[mid] == target: return mid",
    "  else if a[mid] < target: lo = mid + 1",
    "  else: hi = mid - 1",
    "return -1",
];

pub fn binary_search() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "binary-search",
            name: "Binary Search",
            category: Category::Searching,
            difficulty: Difficulty::Beginner,
            input: InputShape::Numbers,
            pseudocode: BINARY,
            time: TimeComplexity::new("O(1)", "O(log n)", "O(log n)"),
            space: "O(1)",
            parameters: vec![target_param()],
        },
        validate_sorted,
        |input, params, tx| Box::pin(binary(input, params, tx)),
    )
}

fn validate_sorted(input: &Input) -> Validation {
    let verdict = numbers_between(input, 1, MAX_ARRAY_LEN);
    if !verdict.is_ok() {
        return verdict;
    }
    Validation::require(numbers(input).windows(2).all(|w| w[0] <= w[1]), || {
        "Binary search needs the numbers in ascending order".to_string()
    })
}

async fn binary(input: Input, params: Params, tx: Tracer) -> RunResult {
    let a = numbers(&input).to_vec();
    let target = target(&params);
    tx.track(a.len());
    tx.info(format!("Halving the search range to find {target}")).await?;

    let (mut lo, mut hi) = (0usize, a.len());
    tx.highlight(&[1]).await?;
    tx.mark(&window(lo, hi), MarkType::Window).await?;

    while lo < hi {
        tx.highlight(&[2, 3]).await?;
        let mid = lo + (hi - lo) / 2;
        tx.pointer(
            Pointers::new()
                .at("lo", lo as i64)
                .at("mid", mid as i64)
                .at("hi", hi as i64 - 1)
                .value("target", target),
        )
        .await?;
        tx.mark(&[mid], MarkType::Current).await?;

        tx.highlight(&[4]).await?;
        if a[mid] == target {
            tx.unmark(&window(lo, hi)).await?;
            tx.mark(&[mid], MarkType::Found).await?;
            return report(&tx, Some(mid), target, 4).await;
        }

        let discarded = if a[mid] < target {
            tx.highlight(&[5]).await?;
            tx.explain(format!("{} < {target}, so the answer can only be to the right", a[mid]))
                .await?;
            let gone = window(lo, mid + 1);
            lo = mid + 1;
            gone
        } else {
            tx.highlight(&[6]).await?;
            tx.explain(format!("{} > {target}, so the answer can only be to the left", a[mid]))
                .await?;
            let gone = window(mid, hi);
            hi = mid;
            gone
        };
        tx.unmark(&discarded).await?;
        tx.mark(&discarded, MarkType::Visited).await?;
    }

    report(&tx, None, target, 7).await
}

fn window(lo: usize, hi: usize) -> Vec<usize> {
    (lo..hi).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{drain, outcome};
    use algotrace_engine::{Engine, Frame, ParamValue};

    fn params(target: i64) -> Params {
        Params::new().with("target", ParamValue::Number(target))
    }

    #[test]
    fn linear_finds_first_occurrence() {
        let events = drain(&linear_search(), Input::Numbers(vec![4, 7, 1, 7]), params(7));
        assert_eq!(outcome(&events).0, Outcome::Search(Some(1)));
    }

    #[test]
    fn linear_reports_absence() {
        let input = vec![4, 2, 1];
        let events = drain(&linear_search(), Input::Numbers(input.clone()), params(9));
        assert_eq!(outcome(&events).0, Outcome::Search(None));
        let frame = Frame::replay(&input, &events);
        assert_eq!(frame.marked(MarkType::Visited), vec![0, 1, 2]);
    }

    #[test]
    fn binary_finds_every_element() {
        let sorted = vec![1, 3, 5, 7, 9, 11, 13];
        for (i, &v) in sorted.iter().enumerate() {
            let events = drain(&binary_search(), Input::Numbers(sorted.clone()), params(v));
            assert_eq!(outcome(&events).0, Outcome::Search(Some(i)), "target {v}");
        }
        for missing in [0, 4, 14] {
            let events = drain(&binary_search(), Input::Numbers(sorted.clone()), params(missing));
            assert_eq!(outcome(&events).0, Outcome::Search(None), "target {missing}");
        }
    }

    #[test]
    fn binary_requires_sorted_input() {
        let def = binary_search();
        let err = Engine::default()
            .start(&def, Input::Numbers(vec![3, 1, 2]), &Params::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: Binary search needs the numbers in ascending order"
        );
    }
}

//! Fixed-size sliding window.

use algotrace_engine::{
    AlgorithmDef, Category, Descriptor, Difficulty, Input, InputShape, ParamSpec, Params, Pointers,
    RunResult, TimeComplexity, Tracer,
};
use algotrace_protocol::{MarkType, Outcome};

use crate::support::{numbers, numbers_between, MAX_ARRAY_LEN};

const SLIDING: &[&str] = &[
    "sum = a[0] + ... + a[k - 1]",
    "best = sum; start = 0",
    "for i from k to n - 1",
    "  sum = sum + a[i] - a[i - k]",
    "  if sum beats best: best = sum; start = i - k + 1",
    "return a[start .. start + k - 1]",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Goal {
    Max,
    Min,
}

impl Goal {
    fn beats(self, candidate: i64, best: i64) -> bool {
        match self {
            Goal::Max => candidate > best,
            Goal::Min => candidate < best,
        }
    }

    fn word(self) -> &'static str {
        match self {
            Goal::Max => "Maximum",
            Goal::Min => "Minimum",
        }
    }

    fn mark(self) -> MarkType {
        match self {
            Goal::Max => MarkType::Max,
            Goal::Min => MarkType::Min,
        }
    }
}

pub fn sliding_window() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "sliding-window",
            name: "Sliding Window",
            category: Category::Arrays,
            difficulty: Difficulty::Intermediate,
            input: InputShape::Numbers,
            pseudocode: SLIDING,
            time: TimeComplexity::uniform("O(n)"),
            space: "O(1)",
            parameters: vec![
                ParamSpec::range("window", "Window size", 1, MAX_ARRAY_LEN as i64, 3),
                ParamSpec::select(
                    "goal",
                    "Goal",
                    &[("max", "Maximum sum"), ("min", "Minimum sum")],
                    "max",
                ),
            ],
        },
        |input| numbers_between(input, 1, MAX_ARRAY_LEN),
        |input, params, tx| Box::pin(slide(input, params, tx)),
    )
}

async fn slide(input: Input, params: Params, tx: Tracer) -> RunResult {
    let a = numbers(&input).to_vec();
    let n = a.len();
    tx.track(n);

    let goal = match params.text("goal") {
        Some("min") => Goal::Min,
        _ => Goal::Max,
    };
    let requested = params.number("window").unwrap_or(3).max(1) as usize;
    let k = requested.min(n);
    if k < requested {
        tx.note(format!("Window of {requested} is wider than the array; using {k}"))
            .await?;
    }
    tx.info(format!("{} sum of {k} consecutive values", goal.word())).await?;

    tx.highlight(&[1]).await?;
    let first: Vec<usize> = (0..k).collect();
    tx.mark(&first, MarkType::Window).await?;
    let mut sum: i64 = a[..k].iter().sum();

    tx.highlight(&[2]).await?;
    let (mut best, mut start) = (sum, 0usize);
    tx.mark(&first, goal.mark()).await?;
    watch(&tx, 0, k, sum, best).await?;

    for i in k..n {
        tx.highlight(&[3, 4]).await?;
        let out = i - k;
        tx.unmark(&[out]).await?;
        if (start..start + k).contains(&out) {
            tx.mark(&[out], goal.mark()).await?;
        }
        tx.mark(&[i], MarkType::Window).await?;
        sum += a[i] - a[out];
        let lo = out + 1;
        watch(&tx, lo, k, sum, best).await?;

        tx.highlight(&[5]).await?;
        if goal.beats(sum, best) {
            let old: Vec<usize> = (start..start + k).filter(|&j| j < lo).collect();
            if !old.is_empty() {
                tx.unmark(&old).await?;
            }
            best = sum;
            start = lo;
            let window: Vec<usize> = (lo..=i).collect();
            tx.mark(&window, goal.mark()).await?;
            tx.note(format!("New best {best} for the window starting at {start}"))
                .await?;
        }
    }

    tx.highlight(&[6]).await?;
    let answer: Vec<usize> = (start..start + k).collect();
    tx.mark(&answer, MarkType::Found).await?;
    tx.result(
        Outcome::Indices(answer),
        format!("{} sum {best} at indices {start}..={}", goal.word(), start + k - 1),
    )
    .await?;
    Ok(())
}

async fn watch(tx: &Tracer, lo: usize, k: usize, sum: i64, best: i64) -> RunResult {
    tx.pointer(
        Pointers::new()
            .at("left", lo as i64)
            .at("right", (lo + k) as i64 - 1)
            .value("sum", sum)
            .value("best", best),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{drain, outcome};
    use algotrace_engine::ParamValue;

    fn run(values: &[i64], window: i64, goal: &str) -> (Outcome, String) {
        let params = Params::new()
            .with("window", ParamValue::Number(window))
            .with("goal", ParamValue::Text(goal.into()));
        outcome(&drain(&sliding_window(), Input::Numbers(values.to_vec()), params))
    }

    #[test]
    fn finds_maximum_window() {
        let (result, caption) = run(&[1, 4, 2, 10, 2, 3, 1, 0, 20], 4, "max");
        assert_eq!(result, Outcome::Indices(vec![5, 6, 7, 8]));
        assert!(caption.starts_with("Maximum sum 24"));
    }

    #[test]
    fn finds_minimum_window() {
        let (result, _) = run(&[5, 1, 1, 5, 0, 9], 2, "min");
        assert_eq!(result, Outcome::Indices(vec![1, 2]));
    }

    #[test]
    fn wide_window_is_clamped() {
        let (result, caption) = run(&[2, 3], 5, "max");
        assert_eq!(result, Outcome::Indices(vec![0, 1]));
        assert!(caption.contains("sum 5"));
    }
}

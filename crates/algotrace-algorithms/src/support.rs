//! Helpers shared by the built-in algorithms.

use algotrace_engine::{Input, RunResult, Tracer, Validation};

/// Longest array the array-based visualizations accept.
pub const MAX_ARRAY_LEN: usize = 20;

/// Longest list the linked-list visualizations accept.
pub const MAX_LIST_LEN: usize = 10;

/// The numbers of `input`, or an empty slice for other shapes.
pub fn numbers(input: &Input) -> &[i64] {
    input.numbers().unwrap_or(&[])
}

pub fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

/// Between `min` and `max` numbers, each within ±999 so cells stay legible.
pub fn numbers_between(input: &Input, min: usize, max: usize) -> Validation {
    let values = numbers(input);
    if values.len() < min {
        return Validation::fail(format!("Enter at least {min} number{}", plural(min)));
    }
    if values.len() > max {
        return Validation::fail(format!("Enter at most {max} numbers"));
    }
    Validation::require(values.iter().all(|v| v.abs() <= 999), || {
        "Values must be between -999 and 999".to_string()
    })
}

pub fn size_between(input: &Input, min: u32, max: u32) -> Validation {
    let n = input.size().unwrap_or(0);
    Validation::require((min..=max).contains(&n), || {
        format!("Size must be between {min} and {max}")
    })
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// `1, 2, 3`
pub fn join(values: &[i64], sep: &str) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Swap two cells and emit both writes.
pub async fn swap(tx: &Tracer, a: &mut [i64], i: usize, j: usize) -> RunResult {
    a.swap(i, j);
    tx.set(i, a[i]).await?;
    tx.set(j, a[j]).await?;
    Ok(())
}

/// Indices `0..n` as a list for whole-array marks.
pub fn all(n: usize) -> Vec<usize> {
    (0..n).collect()
}

//! Longest common subsequence, bottom-up.

use algotrace_engine::{
    AlgorithmDef, Category, Descriptor, Difficulty, Input, InputShape, Params, Pointers,
    RunResult, TimeComplexity, Tracer, Validation,
};
use algotrace_protocol::{CellRef, Outcome};
use algotrace_snapshot::DpTable;

use crate::support::chars;

const LCS: &[&str] = &[
    "dp[i][0] = dp[0][j] = 0",
    "for i from 1 to m",
    "  for j from 1 to n",
    "    if a[i] == b[j]: dp[i][j] = dp[i - 1][j - 1] + 1",
    "    else: dp[i][j] = max(dp[i - 1][j], dp[i][j - 1])",
    "walk back from dp[m][n] collecting matched characters",
];

const MAX_LEN: usize = 12;

pub fn longest_common_subsequence() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "longest-common-subsequence",
            name: "Longest Common Subsequence",
            category: Category::Dp,
            difficulty: Difficulty::Intermediate,
            input: InputShape::TextPair,
            pseudocode: LCS,
            time: TimeComplexity::uniform("O(m·n)"),
            space: "O(m·n)",
            parameters: vec![],
        },
        validate_strings,
        |input, params, tx| Box::pin(lcs(input, params, tx)),
    )
}

fn validate_strings(input: &Input) -> Validation {
    let Some((a, b)) = input.pair() else {
        return Validation::fail("Enter two strings");
    };
    let ok = |s: &str| (1..=MAX_LEN).contains(&s.chars().count());
    Validation::require(ok(a) && ok(b), || {
        format!("Both strings must be 1 to {MAX_LEN} characters long")
    })
}

async fn lcs(input: Input, _: Params, tx: Tracer) -> RunResult {
    let (a, b) = input.pair().unwrap_or_default();
    let (a, b) = (chars(a), chars(b));
    let (m, n) = (a.len(), b.len());
    let mut table = DpTable::new(DpTable::char_labels(&a), DpTable::char_labels(&b));
    tx.info(format!("Filling a {} x {} table of prefix answers", m + 1, n + 1))
        .await?;

    tx.highlight(&[1]).await?;
    for i in 0..=m {
        table.set(i, 0, 0);
    }
    for j in 0..=n {
        table.set(0, j, 0);
    }
    tx.auxiliary(table.snapshot(None)).await?;

    for i in 1..=m {
        tx.highlight(&[2]).await?;
        for j in 1..=n {
            tx.highlight(&[3]).await?;
            tx.pointer(
                Pointers::new()
                    .at("i", i as i64)
                    .at("j", j as i64)
                    .value("a[i]", a[i - 1])
                    .value("b[j]", b[j - 1]),
            )
            .await?;
            let value = if a[i - 1] == b[j - 1] {
                tx.highlight(&[4]).await?;
                table.get(i - 1, j - 1) + 1
            } else {
                tx.highlight(&[5]).await?;
                table.get(i - 1, j).max(table.get(i, j - 1))
            };
            table.set(i, j, value);
            tx.auxiliary(table.snapshot(Some(CellRef { row: i, col: j })))
                .await?;
        }
    }

    tx.highlight(&[6]).await?;
    let (mut i, mut j) = (m, n);
    let mut picked = Vec::new();
    while i > 0 && j > 0 {
        tx.auxiliary(table.snapshot(Some(CellRef { row: i, col: j })))
            .await?;
        if a[i - 1] == b[j - 1] {
            picked.push(a[i - 1]);
            tx.note(format!("'{}' is shared; step diagonally", a[i - 1]))
                .await?;
            i -= 1;
            j -= 1;
        } else if table.get(i - 1, j) >= table.get(i, j - 1) {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    let subsequence: String = picked.into_iter().rev().collect();

    let length = table.get(m, n);
    let caption = if subsequence.is_empty() {
        "No common subsequence".to_string()
    } else {
        format!("LCS length {length}")
    };
    tx.result(Outcome::String(subsequence), caption).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{drain, outcome, snapshots};
    use algotrace_engine::Engine;
    use algotrace_protocol::AuxSnapshot;

    fn pair(a: &str, b: &str) -> Input {
        Input::TextPair {
            text: a.into(),
            pattern: b.into(),
        }
    }

    fn is_subsequence(needle: &str, hay: &str) -> bool {
        let mut hay = hay.chars();
        needle.chars().all(|c| hay.any(|h| h == c))
    }

    #[test]
    fn classic_example() {
        let events = drain(&longest_common_subsequence(), pair("ABCBDAB", "BDCABA"), Params::new());
        let (Outcome::String(found), caption) = outcome(&events) else {
            panic!("expected a string result");
        };
        assert_eq!(found.chars().count(), 4);
        assert!(is_subsequence(&found, "ABCBDAB") && is_subsequence(&found, "BDCABA"));
        assert_eq!(caption, "LCS length 4");
    }

    #[test]
    fn disjoint_strings_share_nothing() {
        let events = drain(&longest_common_subsequence(), pair("abc", "xyz"), Params::new());
        assert_eq!(outcome(&events).0, Outcome::String(String::new()));
    }

    #[test]
    fn table_is_complete_at_the_end() {
        let events = drain(&longest_common_subsequence(), pair("ab", "ab"), Params::new());
        assert_eq!(outcome(&events).0, Outcome::String("ab".into()));
        let Some(AuxSnapshot::DpTable(table)) = snapshots(&events, "dp_table").last().copied() else {
            panic!("no table");
        };
        assert!(table.cells.iter().flatten().all(Option::is_some));
        assert_eq!(table.get(2, 2), Some(2));
        assert_eq!(table.row_labels, vec!["ε", "a", "b"]);
    }

    #[test]
    fn length_limits() {
        let def = longest_common_subsequence();
        let engine = Engine::default();
        assert!(engine.start(&def, pair("", "a"), &Params::new()).is_err());
        assert!(engine
            .start(&def, pair("abcdefghijklm", "a"), &Params::new())
            .is_err());
    }
}

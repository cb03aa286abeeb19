//! Substring search: brute force and Rabin-Karp.

use algotrace_engine::{
    AlgorithmDef, Category, Descriptor, Difficulty, Input, InputShape, ParamSpec, Params, Pointers,
    RunResult, TimeComplexity, Tracer, Validation,
};
use algotrace_protocol::Outcome;
use algotrace_snapshot::{Alignment, Probe, RollingHash};

use crate::support::chars;

const MAX_TEXT_LEN: usize = 40;

fn validate_pair(input: &Input) -> Validation {
    let Some((text, pattern)) = input.pair() else {
        return Validation::fail("Enter a text and a pattern");
    };
    let (n, m) = (text.chars().count(), pattern.chars().count());
    if n == 0 || m == 0 {
        return Validation::fail("Text and pattern must not be empty");
    }
    if n > MAX_TEXT_LEN {
        return Validation::fail(format!("Text must be at most {MAX_TEXT_LEN} characters"));
    }
    Validation::require(m <= n, || "Pattern must not be longer than the text".to_string())
}

fn text_and_pattern(input: &Input) -> (Vec<char>, Vec<char>) {
    let (text, pattern) = input.pair().unwrap_or_default();
    (chars(text), chars(pattern))
}

async fn report(tx: &Tracer, matches: Vec<usize>, line: usize) -> RunResult {
    tx.highlight(&[line]).await?;
    let caption = match matches.len() {
        0 => "Pattern not found".to_string(),
        1 => format!("1 match at index {}", matches[0]),
        k => format!("{k} matches"),
    };
    tx.result(Outcome::Indices(matches), caption).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Naive matching
// ---------------------------------------------------------------------------

const NAIVE: &[&str] = &[
    "for s from 0 to n - m",
    "  j = 0",
    "  while j < m and text[s + j] == pattern[j]",
    "    j = j + 1",
    "  if j == m: record a match at s",
    "return matches",
];

pub fn naive_pattern_match() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "naive-pattern-match",
            name: "Naive Pattern Matching",
            category: Category::Strings,
            difficulty: Difficulty::Beginner,
            input: InputShape::TextPair,
            pseudocode: NAIVE,
            time: TimeComplexity::new("O(n)", "O(n·m)", "O(n·m)"),
            space: "O(1)",
            parameters: vec![],
        },
        validate_pair,
        |input, params, tx| Box::pin(naive(input, params, tx)),
    )
}

async fn naive(input: Input, _: Params, tx: Tracer) -> RunResult {
    let (text, pattern) = text_and_pattern(&input);
    let (n, m) = (text.len(), pattern.len());
    let align = Alignment::new(&text, &pattern);
    let mut matches = Vec::new();
    tx.info(format!("Sliding a pattern of {m} over a text of {n}")).await?;

    for s in 0..=n - m {
        tx.highlight(&[1, 2]).await?;
        tx.auxiliary(align.snapshot(s, Probe::Window, &matches)).await?;

        let mut j = 0;
        while j < m {
            tx.highlight(&[3]).await?;
            tx.pointer(Pointers::new().at("s", s as i64).at("j", j as i64)).await?;
            if text[s + j] != pattern[j] {
                tx.auxiliary(align.snapshot(s, Probe::Mismatch(j), &matches)).await?;
                break;
            }
            tx.highlight(&[4]).await?;
            j += 1;
            tx.auxiliary(align.snapshot(s, Probe::Matched(j), &matches)).await?;
        }

        tx.highlight(&[5]).await?;
        if j == m {
            matches.push(s);
            tx.auxiliary(align.snapshot(s, Probe::Found, &matches)).await?;
            tx.note(format!("Match at index {s}")).await?;
        }
    }

    report(&tx, matches, 6).await
}

// ---------------------------------------------------------------------------
// Rabin-Karp
// ---------------------------------------------------------------------------

const RABIN_KARP: &[&str] = &[
    "hp = hash(pattern); ht = hash(text[0 .. m - 1])",
    "for s from 0 to n - m",
    "  if ht == hp",
    "    if text[s .. s + m - 1] == pattern: record a match at s",
    "  if s < n - m: ht = roll(ht, text[s], text[s + m])",
    "return matches",
];

const DEFAULT_BASE: i64 = 256;
const DEFAULT_MODULUS: i64 = 101;

pub fn rabin_karp() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "rabin-karp",
            name: "Rabin-Karp",
            category: Category::Hashing,
            difficulty: Difficulty::Intermediate,
            input: InputShape::TextPair,
            pseudocode: RABIN_KARP,
            time: TimeComplexity::new("O(n + m)", "O(n + m)", "O(n·m)"),
            space: "O(1)",
            parameters: vec![
                ParamSpec::range("base", "Base", 2, 1024, DEFAULT_BASE),
                ParamSpec::range("modulus", "Modulus", 2, 1_000_000_007, DEFAULT_MODULUS),
            ],
        },
        validate_pair,
        |input, params, tx| Box::pin(rabin_karp_run(input, params, tx)),
    )
}

async fn rabin_karp_run(input: Input, params: Params, tx: Tracer) -> RunResult {
    let (text, pattern) = text_and_pattern(&input);
    let (n, m) = (text.len(), pattern.len());
    let base = params.number("base").unwrap_or(DEFAULT_BASE).clamp(2, 1024) as u64;
    let modulus = params
        .number("modulus")
        .unwrap_or(DEFAULT_MODULUS)
        .clamp(2, 1_000_000_007) as u64;

    let align = Alignment::new(&text, &pattern);
    let mut hash = RollingHash::new(base, modulus, n, &pattern);
    let mut matches = Vec::new();

    tx.highlight(&[1]).await?;
    hash.start(&text);
    tx.info(format!(
        "Pattern hash is {} (base {base}, modulus {modulus})",
        hash.pattern_hash()
    ))
    .await?;
    tx.auxiliary(hash.snapshot()).await?;

    for s in 0..=n - m {
        tx.highlight(&[2, 3]).await?;
        tx.pointer(
            Pointers::new()
                .at("s", s as i64)
                .value("ht", hash.window_hash())
                .value("hp", hash.pattern_hash()),
        )
        .await?;
        tx.auxiliary(align.snapshot(s, Probe::Window, &matches)).await?;

        if hash.hashes_match() {
            tx.highlight(&[4]).await?;
            match (0..m).find(|&j| text[s + j] != pattern[j]) {
                None => {
                    matches.push(s);
                    tx.auxiliary(align.snapshot(s, Probe::Found, &matches)).await?;
                    tx.note(format!("Hashes agree and the characters match at {s}")).await?;
                }
                Some(j) => {
                    tx.auxiliary(align.snapshot(s, Probe::Mismatch(j), &matches)).await?;
                    tx.explain(format!(
                        "Spurious hit at {s}: equal hashes, different characters"
                    ))
                    .await?;
                }
            }
        }

        if s < n - m {
            tx.highlight(&[5]).await?;
            hash.roll(text[s], text[s + m]);
            tx.auxiliary(hash.snapshot()).await?;
        }
    }

    report(&tx, matches, 6).await
}

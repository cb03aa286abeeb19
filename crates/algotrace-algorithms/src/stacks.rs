//! Stack and queue applications.

use algotrace_engine::{
    AlgorithmDef, AlgorithmError, Category, Descriptor, Difficulty, Input, InputShape, ParamSpec,
    Params, Pointers, RunResult, TimeComplexity, Tracer, Validation,
};
use algotrace_protocol::{Outcome, Transition};
use algotrace_snapshot::{QueueBuilder, RingBuffer, StackBuilder};

use crate::support::{join, numbers, numbers_between, MAX_ARRAY_LEN};

// ---------------------------------------------------------------------------
// Balanced parentheses
// ---------------------------------------------------------------------------

const BALANCED: &[&str] = &[
    "for each ch in s",
    "  if ch is an opening bracket: push ch",
    "  else if stack is empty or top does not pair with ch: return false",
    "  else: pop",
    "return stack is empty",
];

const MAX_BRACKETS: usize = 30;
const STACK: &str = "stack";

fn partner(close: char) -> Option<char> {
    match close {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

fn is_open(ch: char) -> bool {
    matches!(ch, '(' | '[' | '{')
}

pub fn balanced_parentheses() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "balanced-parentheses",
            name: "Balanced Parentheses",
            category: Category::Stacks,
            difficulty: Difficulty::Beginner,
            input: InputShape::Text,
            pseudocode: BALANCED,
            time: TimeComplexity::uniform("O(n)"),
            space: "O(n)",
            parameters: vec![],
        },
        validate_brackets,
        |input, params, tx| Box::pin(balanced(input, params, tx)),
    )
}

fn validate_brackets(input: &Input) -> Validation {
    let s = input.text().unwrap_or_default();
    if s.is_empty() {
        return Validation::fail("Enter a string of brackets");
    }
    if s.chars().count() > MAX_BRACKETS {
        return Validation::fail(format!("Use at most {MAX_BRACKETS} brackets"));
    }
    Validation::require(s.chars().all(|c| is_open(c) || partner(c).is_some()), || {
        "Only ( ) [ ] { } are allowed".to_string()
    })
}

async fn balanced(input: Input, _: Params, tx: Tracer) -> RunResult {
    let s: Vec<char> = input.text().unwrap_or_default().chars().collect();
    let builder = StackBuilder::new(STACK);
    let mut stack: Vec<char> = Vec::new();
    tx.info("Push every opening bracket; each closing bracket must pop its partner")
        .await?;
    tx.auxiliary(builder.snapshot(&stack)).await?;

    for (i, &ch) in s.iter().enumerate() {
        tx.highlight(&[1]).await?;
        tx.pointer(Pointers::new().at("i", i as i64).value("ch", ch).value("depth", stack.len()))
            .await?;

        if is_open(ch) {
            tx.highlight(&[2]).await?;
            stack.push(ch);
            tx.push(ch, STACK).await?;
            tx.auxiliary(builder.transition(&stack, Transition::Push, ch)).await?;
            continue;
        }

        tx.highlight(&[3]).await?;
        let expected = partner(ch);
        match stack.last().copied() {
            Some(top) if Some(top) == expected => {
                tx.highlight(&[4]).await?;
                stack.pop();
                tx.pop(top, STACK).await?;
                tx.auxiliary(builder.transition(&stack, Transition::Pop, top)).await?;
            }
            top => {
                let why = match top {
                    None => format!("'{ch}' at index {i} has nothing to close"),
                    Some(top) => format!("'{ch}' at index {i} cannot close '{top}'"),
                };
                tx.explain(why).await?;
                tx.auxiliary(builder.snapshot(&stack)).await?;
                tx.result(Outcome::Boolean(false), "NOT BALANCED").await?;
                return Ok(());
            }
        }
    }

    tx.highlight(&[5]).await?;
    if stack.is_empty() {
        tx.auxiliary(builder.snapshot(&stack)).await?;
        tx.result(Outcome::Boolean(true), "BALANCED").await?;
    } else {
        let leftover: String = stack.iter().collect();
        tx.explain(format!("Unclosed brackets left on the stack: {leftover}"))
            .await?;
        tx.auxiliary(builder.snapshot(&stack)).await?;
        tx.result(Outcome::Boolean(false), "NOT BALANCED").await?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Circular queue
// ---------------------------------------------------------------------------

const CIRCULAR: &[&str] = &[
    "for each x in values",
    "  if size == capacity",
    "    dequeue: front = (front + 1) mod capacity",
    "  slots[rear] = x",
    "  rear = (rear + 1) mod capacity",
    "return slots from front to rear",
];

const QUEUE: &str = "queue";
const DEFAULT_CAPACITY: i64 = 4;

pub fn circular_queue() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "circular-queue",
            name: "Circular Queue",
            category: Category::Queues,
            difficulty: Difficulty::Beginner,
            input: InputShape::Numbers,
            pseudocode: CIRCULAR,
            time: TimeComplexity::uniform("O(1) per operation"),
            space: "O(capacity)",
            parameters: vec![ParamSpec::range("capacity", "Capacity", 2, 8, DEFAULT_CAPACITY)],
        },
        |input| numbers_between(input, 1, MAX_ARRAY_LEN),
        |input, params, tx| Box::pin(circular(input, params, tx)),
    )
}

fn ring_fault(err: algotrace_snapshot::RingError) -> AlgorithmError {
    AlgorithmError::fault(format!("ring buffer refused operation: {err:?}"))
}

async fn circular(input: Input, params: Params, tx: Tracer) -> RunResult {
    let values = numbers(&input).to_vec();
    let capacity = params.number("capacity").unwrap_or(DEFAULT_CAPACITY).clamp(2, 8) as usize;
    let builder = QueueBuilder::new(QUEUE);
    let mut ring: RingBuffer<i64> = RingBuffer::new(capacity);
    tx.info(format!(
        "Enqueue {} values into a ring of {capacity}; drop the oldest when full",
        values.len()
    ))
    .await?;
    tx.auxiliary(builder.snapshot(&ring)).await?;

    for &x in &values {
        tx.highlight(&[1]).await?;
        tx.pointer(
            Pointers::new()
                .at("front", ring.front() as i64)
                .at("rear", ring.rear() as i64)
                .value("x", x)
                .value("size", ring.len()),
        )
        .await?;

        tx.highlight(&[2]).await?;
        if ring.is_full() {
            tx.highlight(&[3]).await?;
            let dropped = ring.dequeue().map_err(ring_fault)?;
            tx.pop(dropped, QUEUE).await?;
            tx.auxiliary(builder.transition(&ring, Transition::Pop, dropped)).await?;
        }

        tx.highlight(&[4, 5]).await?;
        let slot = ring.enqueue(x).map_err(ring_fault)?;
        tx.push(x, QUEUE).await?;
        tx.auxiliary(builder.transition(&ring, Transition::Push, x)).await?;
        if slot + 1 == capacity {
            tx.explain("Rear wrapped around to slot 0").await?;
        }
    }

    tx.highlight(&[6]).await?;
    tx.auxiliary(builder.snapshot(&ring)).await?;
    let contents: Vec<i64> = ring.iter().copied().collect();
    tx.result(Outcome::String(join(&contents, ", ")), "Queue contents, front to rear")
        .await?;
    Ok(())
}

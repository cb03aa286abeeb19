//! Fixtures shared by the cross-crate tests.

use algotrace_engine::{Descriptor, Engine, Input, InputShape, Params, Result, RunHandle};
use algotrace_protocol::{Event, Outcome, Payload};

/// A valid input for any built-in, chosen to exercise its interesting paths.
pub fn sample_input(descriptor: &Descriptor) -> Input {
    let pair = |text: &str, pattern: &str| Input::TextPair {
        text: text.into(),
        pattern: pattern.into(),
    };
    match descriptor.id {
        "binary-search" => Input::Numbers(vec![1, 3, 5, 7, 9, 11]),
        "merge-sorted-lists" => Input::Numbers(vec![2, 3, 8]),
        "balanced-parentheses" => Input::Text("{[()()]}".into()),
        "fibonacci" => Input::Size(6),
        "tower-of-hanoi" => Input::Size(3),
        "n-queens" => Input::Size(5),
        "longest-common-subsequence" => pair("AGGTAB", "GXTXAYB"),
        _ => match descriptor.input {
            InputShape::Numbers => Input::Numbers(vec![5, 2, 9, 1, 7, 3]),
            InputShape::Text => Input::Text("abc".into()),
            InputShape::TextPair => pair("abracadabra", "abra"),
            InputShape::Size => Input::Size(4),
        },
    }
}

/// Start a built-in by id with the default engine.
pub fn start(id: &str, input: Input, params: &Params) -> Result<RunHandle> {
    Engine::default().start_by_id(algotrace_algorithms::registry(), id, input, params)
}

/// Drain a built-in with its sample input.
pub fn drain_sample(descriptor: &Descriptor) -> Result<Vec<Event>> {
    start(descriptor.id, sample_input(descriptor), &Params::new())?.drain()
}

/// The outcome and caption of the final event, if it is a result.
pub fn result_of(events: &[Event]) -> Option<(&Outcome, &str)> {
    match &events.last()?.payload {
        Payload::Result { outcome, caption } => Some((outcome, caption.as_str())),
        _ => None,
    }
}

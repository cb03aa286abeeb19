//! Invariants that hold for every run of every built-in.
//!
//! Verifies:
//! 1. Determinism: same input and parameters give an identical event list
//! 2. Sequences start at 0 and increase by exactly 1
//! 3. Exactly one result event, and nothing after it
//! 4. Highlights stay inside the pseudocode
//! 5. Every auxiliary snapshot is well formed and of a known type
//! 6. Rejected input produces no events
//! 7. The event limit faults a run at the configured sequence

use algotrace_algorithms::registry;
use algotrace_engine::{Engine, EngineConfig, EngineError, Input, Params, RunState};
use algotrace_integration_tests::{drain_sample, result_of, sample_input, start};
use algotrace_protocol::{AuxSnapshot, Event, Payload};
use proptest::prelude::*;

fn check_sequences(events: &[Event]) {
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.sequence, i as u64);
    }
}

#[test]
fn every_builtin_drains_to_a_result() {
    for d in registry().list_all() {
        let events = drain_sample(d).unwrap_or_else(|e| panic!("{}: {e}", d.id));
        assert!(result_of(&events).is_some(), "{} did not end with a result", d.id);
        let results = events.iter().filter(|e| e.is_result()).count();
        assert_eq!(results, 1, "{} emitted {results} results", d.id);
        check_sequences(&events);
    }
}

#[test]
fn runs_are_deterministic() {
    for d in registry().list_all() {
        let first = drain_sample(d).unwrap();
        let second = drain_sample(d).unwrap();
        assert_eq!(first, second, "{} is not deterministic", d.id);
    }
}

#[test]
fn highlights_and_snapshots_are_well_formed() {
    for d in registry().list_all() {
        for event in drain_sample(d).unwrap() {
            match &event.payload {
                Payload::Highlight { lines } => {
                    assert!(
                        lines.iter().all(|&l| l >= 1 && l <= d.pseudocode.len()),
                        "{}: highlight {lines:?} outside {} lines",
                        d.id,
                        d.pseudocode.len()
                    );
                }
                Payload::Auxiliary { snapshot } => {
                    assert!(AuxSnapshot::TYPES.contains(&snapshot.type_name()));
                    if let Err(violation) = snapshot.validate() {
                        panic!("{} at {}: {violation}", d.id, event.sequence);
                    }
                }
                _ => {}
            }
        }
    }
}

#[test]
fn events_encode_with_kind_tags() {
    for d in registry().list_all() {
        for event in drain_sample(d).unwrap() {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["sequence"], event.sequence);
            assert_eq!(json["kind"], event.kind().as_str());
            if let Payload::Auxiliary { snapshot } = &event.payload {
                assert_eq!(json["snapshot"]["type"], snapshot.type_name());
            }
        }
    }
}

#[test]
fn rejected_input_emits_nothing() {
    let cases = [
        ("bubble-sort", Input::Numbers(vec![])),
        ("bubble-sort", Input::Text("12".into())),
        ("binary-search", Input::Numbers(vec![3, 2, 1])),
        ("balanced-parentheses", Input::Text("(x)".into())),
        ("fibonacci", Input::Numbers(vec![3])),
        ("n-queens", Input::Size(11)),
        ("longest-common-subsequence", Input::Text("abc".into())),
    ];
    for (id, input) in cases {
        match start(id, input, &Params::new()) {
            Err(EngineError::Validation(message)) => assert!(!message.is_empty(), "{id}"),
            other => panic!("{id}: expected a validation error, got {other:?}"),
        }
    }
}

#[test]
fn unknown_algorithm_is_reported() {
    let err = start("bogo-sort", Input::Numbers(vec![1]), &Params::new()).unwrap_err();
    assert_eq!(err, EngineError::UnknownAlgorithm("bogo-sort".into()));
}

#[test]
fn event_limit_faults_the_run() {
    let algorithm = registry().get("bubble-sort").unwrap();
    let engine = Engine::new(EngineConfig::bounded(10));
    let mut run = engine
        .start(algorithm.as_ref(), Input::Numbers(vec![9, 8, 7, 6, 5]), &Params::new())
        .unwrap();

    match run.drain() {
        Err(EngineError::Fault(fault)) => assert_eq!(fault.at_sequence, 10),
        other => panic!("expected a fault, got {other:?}"),
    }
    assert_eq!(run.events().len(), 10);
    assert!(matches!(run.state(), RunState::Faulted(_)));
    check_sequences(run.events());
}

#[test]
fn parameters_change_the_run_but_not_the_answer() {
    let input = Input::Numbers(vec![4, 8, 1, 9, 3, 7]);
    let mut timelines = Vec::new();
    for pivot in ["first", "middle", "last"] {
        let params = Params::new().with("pivot", algotrace_engine::ParamValue::Text(pivot.into()));
        let events = start("quick-sort", input.clone(), &params).unwrap().drain().unwrap();
        let (outcome, _) = result_of(&events).unwrap();
        assert_eq!(
            *outcome,
            algotrace_protocol::Outcome::String("1, 3, 4, 7, 8, 9".into())
        );
        timelines.push(events);
    }
    assert_ne!(timelines[0], timelines[2]);
}

#[test]
fn samples_cover_every_shape() {
    for d in registry().list_all() {
        assert_eq!(sample_input(d).shape(), d.input, "{}", d.id);
    }
}

proptest! {
    #[test]
    fn array_runs_are_deterministic_and_ordered(
        values in proptest::collection::vec(-99i64..=99, 1..=12),
        id in prop_oneof![
            Just("bubble-sort"),
            Just("insertion-sort"),
            Just("quick-sort"),
            Just("linear-search"),
            Just("sliding-window"),
            Just("circular-queue"),
        ],
    ) {
        let first = start(id, Input::Numbers(values.clone()), &Params::new()).unwrap().drain().unwrap();
        let second = start(id, Input::Numbers(values), &Params::new()).unwrap().drain().unwrap();
        prop_assert_eq!(&first, &second);
        for (i, event) in first.iter().enumerate() {
            prop_assert_eq!(event.sequence, i as u64);
        }
        prop_assert!(first.last().is_some_and(Event::is_result));
    }
}

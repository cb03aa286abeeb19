//! Per-run event emitter handed to a procedure.
//!
//! Every emission validates its payload, parks it in the run's outbox and
//! suspends the procedure exactly once. The engine takes the parked payload,
//! stamps it with the next sequence number and hands it to the caller.
//!
//! ```text
//! procedure ──tx.compare(..).await──▶ outbox ──step()──▶ Event { sequence, .. }
//! ```

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use algotrace_protocol::{
    AuxSnapshot, Cursor, MarkType, Outcome, Payload, ProtocolViolation, Relation, Scalar, Severity,
    Watch,
};

type Emit = Result<(), ProtocolViolation>;

#[derive(Debug, Default)]
struct TracerState {
    outbox: RefCell<Option<Payload>>,
    bounds: Cell<Option<usize>>,
    pseudocode_lines: usize,
    concluded: Cell<bool>,
    next_node_id: Cell<u32>,
}

/// Emitter for one run. Cheap to clone; clones share the run's state.
#[derive(Debug, Clone)]
pub struct Tracer {
    state: Rc<TracerState>,
}

impl Tracer {
    pub(crate) fn new(pseudocode_lines: usize) -> Self {
        Self {
            state: Rc::new(TracerState {
                pseudocode_lines,
                ..TracerState::default()
            }),
        }
    }

    /// Take the payload parked by the last suspension.
    pub(crate) fn take_parked(&self) -> Option<Payload> {
        self.state.outbox.borrow_mut().take()
    }

    /// Declare the length of the array that `set`, `compare`, `mark` and
    /// `unmark` indices refer to.
    pub fn track(&self, len: usize) {
        self.state.bounds.set(Some(len));
    }

    /// Next id from the run's monotonic counter, for recursion-tree calls and
    /// any other structure needing run-stable identities.
    pub fn next_node_id(&self) -> u32 {
        let id = self.state.next_node_id.get();
        self.state.next_node_id.set(id + 1);
        id
    }

    /// Whether the terminal result has been emitted.
    pub fn is_concluded(&self) -> bool {
        self.state.concluded.get()
    }

    /// Validate `payload` against the run and suspend with it.
    pub(crate) async fn emit(&self, payload: Payload) -> Emit {
        self.admit(&payload)?;
        if matches!(payload, Payload::Result { .. }) {
            self.state.concluded.set(true);
        }
        Suspend {
            state: Rc::clone(&self.state),
            parked: Some(payload),
        }
        .await;
        Ok(())
    }

    fn admit(&self, payload: &Payload) -> Emit {
        if self.state.concluded.get() {
            return Err(ProtocolViolation::AfterResult {
                kind: payload.kind().as_str(),
            });
        }
        payload.check()?;
        if let Some(len) = self.state.bounds.get() {
            if let Some(&index) = payload.indices().iter().find(|&&i| i >= len) {
                return Err(ProtocolViolation::IndexOutOfBounds {
                    kind: payload.kind().as_str(),
                    index,
                    len,
                });
            }
        }
        if let Payload::Highlight { lines } = payload {
            let available = self.state.pseudocode_lines;
            if let Some(&line) = lines.iter().find(|&&l| l > available) {
                return Err(ProtocolViolation::InvalidLine { line, available });
            }
        }
        Ok(())
    }

    pub async fn set(&self, index: usize, value: i64) -> Emit {
        self.emit(Payload::set(index, value)).await
    }

    pub async fn compare(&self, i: usize, j: usize, relation: Relation) -> Emit {
        self.emit(Payload::compare(&[i, j], relation)?).await
    }

    pub async fn mark(&self, indices: &[usize], mark: MarkType) -> Emit {
        self.emit(Payload::mark(indices, mark)?).await
    }

    pub async fn unmark(&self, indices: &[usize]) -> Emit {
        self.emit(Payload::unmark(indices)?).await
    }

    pub async fn push(&self, value: impl Into<Scalar>, target: &str) -> Emit {
        self.emit(Payload::push(value, target)?).await
    }

    pub async fn pop(&self, value: impl Into<Scalar>, target: &str) -> Emit {
        self.emit(Payload::pop(value, target)?).await
    }

    pub async fn pointer(&self, pointers: Pointers) -> Emit {
        self.emit(pointers.into_payload()).await
    }

    pub async fn highlight(&self, lines: &[usize]) -> Emit {
        self.emit(Payload::highlight(lines)?).await
    }

    pub async fn message(&self, text: impl Into<String>, severity: Severity, delay_ms: Option<u32>) -> Emit {
        self.emit(Payload::message(text, severity, delay_ms)?).await
    }

    pub async fn info(&self, text: impl Into<String>) -> Emit {
        self.message(text, Severity::Info, None).await
    }

    pub async fn note(&self, text: impl Into<String>) -> Emit {
        self.message(text, Severity::Step, None).await
    }

    pub async fn explain(&self, text: impl Into<String>) -> Emit {
        self.message(text, Severity::Explanation, None).await
    }

    pub async fn auxiliary(&self, snapshot: AuxSnapshot) -> Emit {
        self.emit(Payload::auxiliary(snapshot)?).await
    }

    /// Terminal answer; nothing may be emitted afterwards.
    pub async fn result(&self, outcome: Outcome, caption: impl Into<String>) -> Emit {
        self.emit(Payload::result(outcome, caption)).await
    }
}

/// Builder for a `pointer` event: the full watch panel.
#[derive(Debug, Clone, Default)]
pub struct Pointers {
    cursors: Vec<Cursor>,
    values: Vec<Watch>,
    caption: Option<String>,
}

impl Pointers {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn at(mut self, name: &str, index: i64) -> Self {
        self.cursors.push(Cursor {
            name: name.to_string(),
            index,
        });
        self
    }

    #[must_use]
    pub fn value(mut self, name: &str, value: impl Into<Scalar>) -> Self {
        self.values.push(Watch {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    fn into_payload(self) -> Payload {
        Payload::pointer(self.cursors, self.values, self.caption)
    }
}

/// One-shot suspension: parks the payload on first poll, completes on the
/// second.
struct Suspend {
    state: Rc<TracerState>,
    parked: Option<Payload>,
}

impl Future for Suspend {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        match self.parked.take() {
            Some(payload) => {
                *self.state.outbox.borrow_mut() = Some(payload);
                Poll::Pending
            }
            None => Poll::Ready(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algotrace_protocol::QueueSnapshot;
    use futures::task::noop_waker_ref;

    fn poll_once<F: Future + Unpin>(fut: &mut F) -> Poll<F::Output> {
        let mut cx = Context::from_waker(noop_waker_ref());
        Pin::new(fut).poll(&mut cx)
    }

    #[test]
    fn emission_suspends_exactly_once() {
        let tx = Tracer::new(0);
        let mut fut = Box::pin(tx.set(0, 5));

        assert!(poll_once(&mut fut).is_pending());
        assert_eq!(tx.take_parked(), Some(Payload::set(0, 5)));
        assert!(matches!(poll_once(&mut fut), Poll::Ready(Ok(()))));
        assert_eq!(tx.take_parked(), None);
    }

    #[test]
    fn out_of_bounds_fails_without_suspending() {
        let tx = Tracer::new(0);
        tx.track(3);
        let mut fut = Box::pin(tx.mark(&[1, 3], MarkType::Sorted));
        match poll_once(&mut fut) {
            Poll::Ready(Err(ProtocolViolation::IndexOutOfBounds { index, len, .. })) => {
                assert_eq!((index, len), (3, 3));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(tx.take_parked().is_none());
    }

    #[test]
    fn highlight_checked_against_listing() {
        let tx = Tracer::new(4);
        let mut ok = Box::pin(tx.highlight(&[4]));
        assert!(poll_once(&mut ok).is_pending());
        let mut bad = Box::pin(tx.highlight(&[5]));
        assert!(matches!(
            poll_once(&mut bad),
            Poll::Ready(Err(ProtocolViolation::InvalidLine { line: 5, available: 4 }))
        ));
    }

    #[test]
    fn nothing_after_result() {
        let tx = Tracer::new(0);
        let mut done = Box::pin(tx.result(Outcome::Boolean(true), "done"));
        assert!(poll_once(&mut done).is_pending());
        assert!(tx.is_concluded());

        let mut late = Box::pin(tx.info("late"));
        assert!(matches!(
            poll_once(&mut late),
            Poll::Ready(Err(ProtocolViolation::AfterResult { kind: "message" }))
        ));
    }

    fn rejected(tx: &Tracer, payload: Payload) -> ProtocolViolation {
        let mut fut = Box::pin(tx.emit(payload));
        match poll_once(&mut fut) {
            Poll::Ready(Err(violation)) => {
                assert!(tx.take_parked().is_none());
                violation
            }
            other => panic!("payload was admitted: {other:?}"),
        }
    }

    #[test]
    fn hand_built_payloads_are_checked() {
        let tx = Tracer::new(4);
        tx.track(8);

        let empty_mark = Payload::Mark {
            indices: vec![],
            mark: MarkType::Found,
        };
        assert_eq!(
            rejected(&tx, empty_mark),
            ProtocolViolation::EmptyIndices { kind: "mark" }
        );
        assert_eq!(
            rejected(&tx, Payload::Highlight { lines: vec![] }),
            ProtocolViolation::EmptyIndices { kind: "highlight" }
        );

        let broken_queue = AuxSnapshot::Queue(QueueSnapshot {
            label: "queue".into(),
            slots: vec![],
            capacity: 0,
            front: 5,
            rear: 9,
            size: 3,
            animating: None,
            animating_value: None,
        });
        assert!(matches!(
            rejected(&tx, Payload::Auxiliary { snapshot: broken_queue }),
            ProtocolViolation::MalformedSnapshot { kind: "queue", .. }
        ));
        assert!(!tx.is_concluded());
    }

    #[test]
    fn node_ids_are_monotonic_per_run() {
        let a = Tracer::new(0);
        let b = Tracer::new(0);
        assert_eq!((a.next_node_id(), a.next_node_id()), (0, 1));
        assert_eq!(b.next_node_id(), 0);
        assert_eq!(a.clone().next_node_id(), 2);
    }
}

//! Cooperative run driver.
//!
//! A [`RunHandle`] owns one procedure and polls it with a no-op waker. Each
//! poll either parks exactly one payload (one [`Event`]), completes the
//! procedure, or fails it. The handle keeps every event it produced so the run
//! can be replayed or turned into a [`Timeline`] afterwards.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::task::{Context, Poll};

use algotrace_protocol::{Event, ProtocolViolation};
use futures::task::noop_waker_ref;
use tracing::{debug, info, trace, warn};

use crate::contract::{Algorithm, Procedure};
use crate::error::{AlgorithmError, EngineError, Result, RunFault};
use crate::input::Input;
use crate::params::Params;
use crate::registry::Registry;
use crate::timeline::Timeline;
use crate::tracer::Tracer;

/// Run-driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fault the run once it tries to emit more than this many events.
    pub event_limit: Option<u64>,
    /// Turn a panicking procedure into a [`RunFault`] instead of unwinding
    /// through the caller.
    pub catch_panics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_limit: None,
            catch_panics: true,
        }
    }
}

impl EngineConfig {
    /// Default configuration with an event limit.
    #[must_use]
    pub fn bounded(limit: u64) -> Self {
        Self {
            event_limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Running,
    Finished,
    Cancelled,
    Faulted(RunFault),
    Violated(ProtocolViolation),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunState::Running)
    }
}

/// Outcome of a single [`RunHandle::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Event(Event),
    Done,
}

impl Step {
    pub fn into_event(self) -> Option<Event> {
        match self {
            Step::Event(event) => Some(event),
            Step::Done => None,
        }
    }
}

/// Starts runs with a shared configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate `input`, resolve parameter defaults and build the procedure.
    ///
    /// Nothing is emitted when validation fails. An input of the wrong shape
    /// is rejected before the validator sees it.
    pub fn start(&self, algorithm: &dyn Algorithm, input: Input, params: &Params) -> Result<RunHandle> {
        let descriptor = algorithm.descriptor();
        if input.shape() != descriptor.input {
            return Err(EngineError::Validation(format!(
                "{} expects {}",
                descriptor.name, descriptor.input
            )));
        }
        algorithm
            .validate(&input)
            .into_result()
            .map_err(EngineError::Validation)?;

        let params = Params::resolve(&descriptor.parameters, params);
        debug!(algorithm = descriptor.id, ?params, "starting run");

        let tx = Tracer::new(descriptor.pseudocode.len());
        let initial = input.numbers().map(<[i64]>::to_vec).unwrap_or_default();
        let procedure = algorithm.run(input, params, tx.clone());

        Ok(RunHandle {
            algorithm: descriptor.id,
            pseudocode: descriptor.pseudocode,
            initial,
            procedure: Some(procedure),
            tx,
            events: Vec::new(),
            state: RunState::Running,
            config: self.config,
        })
    }

    /// [`Engine::start`] for an algorithm looked up by id.
    pub fn start_by_id(&self, registry: &Registry, id: &str, input: Input, params: &Params) -> Result<RunHandle> {
        let algorithm = registry
            .get(id)
            .ok_or_else(|| EngineError::UnknownAlgorithm(id.to_string()))?;
        self.start(algorithm.as_ref(), input, params)
    }

    pub fn step(&self, handle: &mut RunHandle) -> Result<Step> {
        handle.step()
    }

    pub fn drain(&self, handle: &mut RunHandle) -> Result<Vec<Event>> {
        handle.drain()
    }

    pub fn cancel(&self, handle: &mut RunHandle) {
        handle.cancel();
    }

    /// Start, drain and materialize a run in one call.
    pub fn run_to_end(&self, algorithm: &dyn Algorithm, input: Input, params: &Params) -> Result<Timeline> {
        let mut handle = self.start(algorithm, input, params)?;
        handle.drain()?;
        Ok(handle.into_timeline())
    }
}

/// One live run. Dropping it drops the procedure.
pub struct RunHandle {
    algorithm: &'static str,
    pseudocode: &'static [&'static str],
    initial: Vec<i64>,
    procedure: Option<Procedure>,
    tx: Tracer,
    events: Vec<Event>,
    state: RunState,
    config: EngineConfig,
}

impl std::fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle")
            .field("algorithm", &self.algorithm)
            .field("events", &self.events.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl RunHandle {
    pub fn algorithm(&self) -> &'static str {
        self.algorithm
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Every event emitted so far, in sequence order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Resume the procedure until it emits its next event or finishes.
    pub fn step(&mut self) -> Result<Step> {
        match &self.state {
            RunState::Running => {}
            RunState::Finished => return Ok(Step::Done),
            RunState::Cancelled => return Err(EngineError::Cancelled),
            RunState::Faulted(fault) => return Err(fault.clone().into()),
            RunState::Violated(violation) => return Err(violation.clone().into()),
        }

        let Some(procedure) = self.procedure.as_mut() else {
            return Ok(self.finish());
        };

        let mut cx = Context::from_waker(noop_waker_ref());
        let polled = if self.config.catch_panics {
            catch_unwind(AssertUnwindSafe(|| procedure.as_mut().poll(&mut cx))).map_err(panic_message)
        } else {
            Ok(procedure.as_mut().poll(&mut cx))
        };

        match polled {
            Err(message) => Err(self.fault(format!("procedure panicked: {message}"))),
            Ok(Poll::Ready(Ok(()))) => Ok(self.finish()),
            Ok(Poll::Ready(Err(AlgorithmError::Protocol(violation)))) => Err(self.violate(violation)),
            Ok(Poll::Ready(Err(AlgorithmError::Fault(message)))) => Err(self.fault(message)),
            Ok(Poll::Pending) => self.accept(),
        }
    }

    /// Step until the run finishes; returns the full timeline so far.
    pub fn drain(&mut self) -> Result<Vec<Event>> {
        while let Step::Event(_) = self.step()? {}
        Ok(self.events.clone())
    }

    /// Drop the procedure. Emitted events stay valid; later steps fail with
    /// [`EngineError::Cancelled`]. Has no effect on a run that already ended.
    pub fn cancel(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.procedure = None;
        self.state = RunState::Cancelled;
        warn!(
            algorithm = self.algorithm,
            events = self.events.len(),
            "run cancelled"
        );
    }

    /// Materialize the emitted events for scrubbing.
    pub fn into_timeline(self) -> Timeline {
        Timeline::new(self.algorithm, self.pseudocode, self.initial, self.events)
    }

    fn next_sequence(&self) -> u64 {
        self.events.len() as u64
    }

    fn accept(&mut self) -> Result<Step> {
        let Some(payload) = self.tx.take_parked() else {
            return Err(self.fault("procedure suspended without emitting an event"));
        };

        let sequence = self.next_sequence();
        if let Some(limit) = self.config.event_limit {
            if sequence >= limit {
                return Err(self.fault(format!("event limit of {limit} exceeded")));
            }
        }

        let event = Event { sequence, payload };
        trace!(algorithm = self.algorithm, sequence, kind = %event.kind(), "event");
        self.events.push(event.clone());
        Ok(Step::Event(event))
    }

    fn finish(&mut self) -> Step {
        self.procedure = None;
        self.state = RunState::Finished;
        info!(
            algorithm = self.algorithm,
            events = self.events.len(),
            "run finished"
        );
        Step::Done
    }

    fn fault(&mut self, message: impl Into<String>) -> EngineError {
        let fault = RunFault {
            at_sequence: self.next_sequence(),
            message: message.into(),
        };
        warn!(algorithm = self.algorithm, %fault, "run faulted");
        self.procedure = None;
        self.state = RunState::Faulted(fault.clone());
        fault.into()
    }

    fn violate(&mut self, violation: ProtocolViolation) -> EngineError {
        warn!(algorithm = self.algorithm, %violation, "protocol violation");
        self.procedure = None;
        self.state = RunState::Violated(violation.clone());
        violation.into()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

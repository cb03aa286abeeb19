//! Algotrace Execution Engine
//!
//! Drives instrumented algorithms one event at a time.
//!
//! # Architecture
//!
//! - **Contract**: an [`Algorithm`] is a [`Descriptor`], a pure validator and
//!   a suspendable [`Procedure`]
//! - **Tracer**: the per-run emitter; every `.await` on it hands one event to
//!   the engine
//! - **Engine**: `start` / `step` / `drain` / `cancel` over a [`RunHandle`]
//! - **Timeline**: scrub a finished run and rebuild any step as a [`Frame`]
//! - **Registry**: id-to-algorithm lookup
//!
//! # Usage
//!
//! ```ignore
//! let engine = Engine::default();
//! let mut run = engine.start(&bubble_sort, Input::Numbers(vec![3, 1, 2]), &Params::new())?;
//! while let Step::Event(event) = run.step()? {
//!     render(&event);
//! }
//! ```
//!
//! Procedures are `async` bodies, but nothing here is asynchronous in the I/O
//! sense: the engine polls them with a no-op waker on the caller's thread.

mod contract;
mod engine;
mod error;
mod input;
mod params;
mod registry;
mod timeline;
mod tracer;

pub use contract::{
    Algorithm, AlgorithmDef, Category, Descriptor, Difficulty, Procedure, RunFn, TimeComplexity,
    ValidateFn, Validation,
};
pub use engine::{Engine, EngineConfig, RunHandle, RunState, Step};
pub use error::{AlgorithmError, EngineError, Result, RunFault, RunResult};
pub use input::{Input, InputShape};
pub use params::{Condition, ParamKind, ParamSpec, ParamValue, Params, SelectOption};
pub use registry::Registry;
pub use timeline::{Frame, PlaybackSpeed, PlaybackState, PlaybackStatus, Timeline};
pub use tracer::{Pointers, Tracer};

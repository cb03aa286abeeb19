//! Algotrace Event Protocol
//!
//! The closed vocabulary an instrumented algorithm speaks to a renderer.
//!
//! # Events
//!
//! A run is an append-only, totally ordered list of [`Event`]s. Each event
//! carries an engine-assigned `sequence` plus a [`Payload`]:
//!
//! ```text
//! set | compare | mark | unmark | push | pop | pointer | highlight
//!     | message | auxiliary | result
//! ```
//!
//! Payloads are built through constructors that validate their shape, so an
//! algorithm with a bug fails at construction time with a
//! [`ProtocolViolation`] instead of emitting something a renderer cannot draw.
//!
//! # Auxiliary snapshots
//!
//! Secondary structures (stacks, queues, linked lists, recursion trees,
//! backtracking grids, Hanoi pegs, DP tables, string alignments, rolling
//! hashes) travel as [`AuxSnapshot`] values: deep copies tagged by a `type`
//! discriminator and self-describing enough to draw in isolation.

mod auxiliary;
mod error;
mod event;
mod scalar;

pub use auxiliary::{
    AuxSnapshot, CallNodeView, CallStatus, CellRef, CellStatus, CharCell, CharTag, DiskMove,
    DpTableSnapshot, GridCell, GridSnapshot, HanoiSnapshot, LinkedListSnapshot, ListNodeView,
    NodeHighlight, NodePointer, Peg, QueueSnapshot, RecursionTreeSnapshot, RollingHashSnapshot,
    StackSnapshot, StringMatchSnapshot, Transition,
};
pub use error::{ProtocolViolation, Result};
pub use event::{
    Cursor, Event, EventKind, MarkType, Outcome, Payload, Relation, ResultKind, Severity, Watch,
};
pub use scalar::Scalar;

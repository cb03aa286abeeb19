//! Auxiliary Snapshot Builders
//!
//! Live, mutable working structures for instrumented algorithms, each with a
//! copy-out boundary that produces an immutable [`AuxSnapshot`].
//!
//! # Isolation
//!
//! A snapshot owns copies of every element and node it mentions. Later
//! mutation of the live structure (relinking a node, popping a stack,
//! completing a call) never reaches an already-emitted snapshot, which is what
//! lets a renderer rebuild step N from the event prefix alone.
//!
//! | Structure | Live type | Builder |
//! |-----------|-----------|---------|
//! | stack | `Vec<T>` | [`StackBuilder`] |
//! | circular queue | [`RingBuffer`] | [`QueueBuilder`] |
//! | linked list | [`ListArena`] | [`ListView`] |
//! | recursion tree | [`CallTree`] | [`CallTree::snapshot`] |
//! | backtracking grid | [`Board`] | [`Board::snapshot`] |
//! | Hanoi pegs | [`Pegs`] | [`Pegs::snapshot`] |
//! | DP table | [`DpTable`] | [`DpTable::snapshot`] |
//! | string alignment | `&[char]` | [`Alignment`] |
//! | rolling hash | [`RollingHash`] | [`RollingHash::snapshot`] |
//!
//! [`AuxSnapshot`]: algotrace_protocol::AuxSnapshot

mod dp;
mod grid;
mod hanoi;
mod list;
mod stack;
mod text;
mod tree;

pub use dp::DpTable;
pub use grid::Board;
pub use hanoi::Pegs;
pub use list::{walk, ArenaNode, ListArena, ListView, NodeId};
pub use stack::{QueueBuilder, RingBuffer, RingError, StackBuilder};
pub use text::{Alignment, Probe, RollingHash};
pub use tree::{CallId, CallTree};

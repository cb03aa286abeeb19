//! Events that make up an algorithm's visualization timeline.
//!
//! Payloads are only built through the constructors on [`Payload`]; each
//! checks the invariants a renderer relies on and returns a
//! [`ProtocolViolation`] instead of a malformed event.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::auxiliary::AuxSnapshot;
use crate::error::{ProtocolViolation, Result};
use crate::scalar::Scalar;

/// One sequence-numbered unit of the timeline.
///
/// The sequence is assigned by the engine, never by the algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub sequence: u64,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    pub fn is_result(&self) -> bool {
        matches!(self.payload, Payload::Result { .. })
    }
}

/// Discriminant of a [`Payload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Set,
    Compare,
    Mark,
    Unmark,
    Push,
    Pop,
    Pointer,
    Highlight,
    Message,
    Auxiliary,
    Result,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Set => "set",
            EventKind::Compare => "compare",
            EventKind::Mark => "mark",
            EventKind::Unmark => "unmark",
            EventKind::Push => "push",
            EventKind::Pop => "pop",
            EventKind::Pointer => "pointer",
            EventKind::Highlight => "highlight",
            EventKind::Message => "message",
            EventKind::Auxiliary => "auxiliary",
            EventKind::Result => "result",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a comparison between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Eq,
    Lt,
    Gt,
}

impl Relation {
    /// Relation of `a` to `b`.
    pub fn of<T: Ord + ?Sized>(a: &T, b: &T) -> Self {
        match a.cmp(b) {
            Ordering::Less => Relation::Lt,
            Ordering::Equal => Relation::Eq,
            Ordering::Greater => Relation::Gt,
        }
    }
}

/// Semantic tag attached to array positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkType {
    Sorted,
    Pivot,
    Window,
    Current,
    Found,
    Visited,
    Min,
    Max,
    Active,
    Swap,
}

impl MarkType {
    pub const ALL: [MarkType; 10] = [
        MarkType::Sorted,
        MarkType::Pivot,
        MarkType::Window,
        MarkType::Current,
        MarkType::Found,
        MarkType::Visited,
        MarkType::Min,
        MarkType::Max,
        MarkType::Active,
        MarkType::Swap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkType::Sorted => "sorted",
            MarkType::Pivot => "pivot",
            MarkType::Window => "window",
            MarkType::Current => "current",
            MarkType::Found => "found",
            MarkType::Visited => "visited",
            MarkType::Min => "min",
            MarkType::Max => "max",
            MarkType::Active => "active",
            MarkType::Swap => "swap",
        }
    }
}

impl FromStr for MarkType {
    type Err = ProtocolViolation;

    fn from_str(s: &str) -> Result<Self> {
        MarkType::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ProtocolViolation::UnknownMark(s.to_string()))
    }
}

/// Narration weight of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Step,
    Explanation,
}

/// A named cursor into the tracked array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub name: String,
    /// May sit one past either end (e.g. `high = -1` when a search exhausts).
    pub index: i64,
}

/// A named scalar in the variable-watch panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watch {
    pub name: String,
    pub value: Scalar,
}

/// Semantic kind of a final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    String,
    Boolean,
    Search,
    Indices,
}

/// Final answer of a run, typed by its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    String(String),
    Boolean(bool),
    /// Position found, or `None` when absent.
    Search(Option<usize>),
    Indices(Vec<usize>),
}

impl Outcome {
    pub fn kind(&self) -> ResultKind {
        match self {
            Outcome::String(_) => ResultKind::String,
            Outcome::Boolean(_) => ResultKind::Boolean,
            Outcome::Search(_) => ResultKind::Search,
            Outcome::Indices(_) => ResultKind::Indices,
        }
    }
}

/// Kind-specific event content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    Set {
        index: usize,
        value: i64,
    },
    Compare {
        indices: [usize; 2],
        relation: Relation,
    },
    Mark {
        indices: Vec<usize>,
        mark: MarkType,
    },
    Unmark {
        indices: Vec<usize>,
    },
    Push {
        value: Scalar,
        target: String,
    },
    Pop {
        value: Scalar,
        target: String,
    },
    /// Replaces the whole watch panel; not incremental.
    Pointer {
        pointers: Vec<Cursor>,
        values: Vec<Watch>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    /// 1-based lines of the descriptor's pseudocode.
    Highlight {
        lines: Vec<usize>,
    },
    Message {
        text: String,
        severity: Severity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delay_ms: Option<u32>,
    },
    Auxiliary {
        snapshot: AuxSnapshot,
    },
    Result {
        outcome: Outcome,
        caption: String,
    },
}

impl Payload {
    pub fn kind(&self) -> EventKind {
        match self {
            Payload::Set { .. } => EventKind::Set,
            Payload::Compare { .. } => EventKind::Compare,
            Payload::Mark { .. } => EventKind::Mark,
            Payload::Unmark { .. } => EventKind::Unmark,
            Payload::Push { .. } => EventKind::Push,
            Payload::Pop { .. } => EventKind::Pop,
            Payload::Pointer { .. } => EventKind::Pointer,
            Payload::Highlight { .. } => EventKind::Highlight,
            Payload::Message { .. } => EventKind::Message,
            Payload::Auxiliary { .. } => EventKind::Auxiliary,
            Payload::Result { .. } => EventKind::Result,
        }
    }

    pub fn set(index: usize, value: i64) -> Self {
        Payload::Set { index, value }
    }

    pub fn compare(indices: &[usize], relation: Relation) -> Result<Self> {
        match *indices {
            [a, b] => Ok(Payload::Compare {
                indices: [a, b],
                relation,
            }),
            _ => Err(ProtocolViolation::CompareArity(indices.len())),
        }
    }

    pub fn mark(indices: &[usize], mark: MarkType) -> Result<Self> {
        non_empty("mark", indices)?;
        Ok(Payload::Mark {
            indices: indices.to_vec(),
            mark,
        })
    }

    pub fn unmark(indices: &[usize]) -> Result<Self> {
        non_empty("unmark", indices)?;
        Ok(Payload::Unmark {
            indices: indices.to_vec(),
        })
    }

    pub fn push(value: impl Into<Scalar>, target: &str) -> Result<Self> {
        non_blank("push", "target", target)?;
        Ok(Payload::Push {
            value: value.into(),
            target: target.to_string(),
        })
    }

    pub fn pop(value: impl Into<Scalar>, target: &str) -> Result<Self> {
        non_blank("pop", "target", target)?;
        Ok(Payload::Pop {
            value: value.into(),
            target: target.to_string(),
        })
    }

    pub fn pointer(pointers: Vec<Cursor>, values: Vec<Watch>, caption: Option<String>) -> Self {
        Payload::Pointer {
            pointers,
            values,
            caption,
        }
    }

    pub fn highlight(lines: &[usize]) -> Result<Self> {
        non_empty("highlight", lines)?;
        if let Some(&line) = lines.iter().find(|&&l| l == 0) {
            return Err(ProtocolViolation::InvalidLine { line, available: 0 });
        }
        Ok(Payload::Highlight {
            lines: lines.to_vec(),
        })
    }

    pub fn message(text: impl Into<String>, severity: Severity, delay_ms: Option<u32>) -> Result<Self> {
        let text = text.into();
        non_blank("message", "text", &text)?;
        Ok(Payload::Message {
            text,
            severity,
            delay_ms,
        })
    }

    /// Wraps a snapshot after checking it is self-consistent.
    pub fn auxiliary(snapshot: AuxSnapshot) -> Result<Self> {
        snapshot.validate()?;
        Ok(Payload::Auxiliary { snapshot })
    }

    pub fn result(outcome: Outcome, caption: impl Into<String>) -> Self {
        Payload::Result {
            outcome,
            caption: caption.into(),
        }
    }

    /// Re-run the constructor rules on a payload that may have been built
    /// by hand or decoded from the wire.
    pub fn check(&self) -> Result<()> {
        match self {
            Payload::Set { .. } | Payload::Compare { .. } | Payload::Pointer { .. } => Ok(()),
            Payload::Mark { indices, .. } => non_empty("mark", indices),
            Payload::Unmark { indices } => non_empty("unmark", indices),
            Payload::Push { target, .. } => non_blank("push", "target", target),
            Payload::Pop { target, .. } => non_blank("pop", "target", target),
            Payload::Highlight { lines } => {
                non_empty("highlight", lines)?;
                match lines.iter().find(|&&l| l == 0) {
                    Some(&line) => Err(ProtocolViolation::InvalidLine { line, available: 0 }),
                    None => Ok(()),
                }
            }
            Payload::Message { text, .. } => non_blank("message", "text", text),
            Payload::Auxiliary { snapshot } => snapshot.validate(),
            Payload::Result { .. } => Ok(()),
        }
    }

    /// Array positions this payload refers to, for bounds checking.
    pub fn indices(&self) -> &[usize] {
        match self {
            Payload::Set { index, .. } => std::slice::from_ref(index),
            Payload::Compare { indices, .. } => indices,
            Payload::Mark { indices, .. } | Payload::Unmark { indices } => indices,
            _ => &[],
        }
    }
}

fn non_empty<T>(kind: &'static str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(ProtocolViolation::EmptyIndices { kind });
    }
    Ok(())
}

fn non_blank(kind: &'static str, field: &'static str, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ProtocolViolation::EmptyField { kind, field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_requires_two_indices() {
        assert_eq!(
            Payload::compare(&[3], Relation::Lt),
            Err(ProtocolViolation::CompareArity(1))
        );
        assert_eq!(
            Payload::compare(&[1, 2, 3], Relation::Lt),
            Err(ProtocolViolation::CompareArity(3))
        );
        assert!(Payload::compare(&[0, 1], Relation::Gt).is_ok());
    }

    #[test]
    fn check_catches_hand_built_payloads() {
        let empty_mark = Payload::Mark {
            indices: vec![],
            mark: MarkType::Found,
        };
        assert_eq!(
            empty_mark.check(),
            Err(ProtocolViolation::EmptyIndices { kind: "mark" })
        );
        assert!(Payload::Highlight { lines: vec![] }.check().is_err());
        assert!(Payload::Highlight { lines: vec![0, 2] }.check().is_err());
        let blank = Payload::Push {
            value: Scalar::Int(1),
            target: " ".into(),
        };
        assert!(blank.check().is_err());

        assert!(Payload::mark(&[1], MarkType::Found).unwrap().check().is_ok());
        assert!(Payload::highlight(&[1, 2]).unwrap().check().is_ok());
        assert!(Payload::result(Outcome::Boolean(true), "ok").check().is_ok());
    }

    #[test]
    fn mark_rejects_empty_indices() {
        assert!(matches!(
            Payload::mark(&[], MarkType::Sorted),
            Err(ProtocolViolation::EmptyIndices { kind: "mark" })
        ));
        assert!(Payload::unmark(&[]).is_err());
    }

    #[test]
    fn mark_type_parsing() {
        assert_eq!("pivot".parse::<MarkType>(), Ok(MarkType::Pivot));
        assert_eq!(
            "shiny".parse::<MarkType>(),
            Err(ProtocolViolation::UnknownMark("shiny".into()))
        );
        for mark in MarkType::ALL {
            assert_eq!(mark.as_str().parse::<MarkType>(), Ok(mark));
        }
    }

    #[test]
    fn highlight_lines_are_one_based() {
        assert!(Payload::highlight(&[0]).is_err());
        assert!(Payload::highlight(&[]).is_err());
        assert!(Payload::highlight(&[1, 2]).is_ok());
    }

    #[test]
    fn blank_fields_rejected() {
        assert!(Payload::message("  ", Severity::Info, None).is_err());
        assert!(Payload::push(1, "").is_err());
        assert!(Payload::pop('(', "stack").is_ok());
    }

    #[test]
    fn relation_of_ordering() {
        assert_eq!(Relation::of(&1, &2), Relation::Lt);
        assert_eq!(Relation::of(&2, &2), Relation::Eq);
        assert_eq!(Relation::of("b", "a"), Relation::Gt);
    }

    #[test]
    fn event_wire_format() {
        let event = Event {
            sequence: 4,
            payload: Payload::compare(&[0, 1], Relation::Lt).unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["sequence"], 4);
        assert_eq!(json["kind"], "compare");
        assert_eq!(json["relation"], "lt");

        let parsed: Event = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn result_outcome_carries_its_kind() {
        let payload = Payload::result(Outcome::Search(None), "not found");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "result");
        assert_eq!(json["outcome"]["kind"], "search");
        assert!(json["outcome"]["value"].is_null());
        assert_eq!(Outcome::Indices(vec![1]).kind(), ResultKind::Indices);
    }
}

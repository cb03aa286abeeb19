//! Auxiliary snapshot wire types.
//!
//! Each variant is a full, self-contained copy of a secondary structure at one
//! step. A renderer dispatches on the `type` discriminator and must be able to
//! draw a snapshot without consulting any other event.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolViolation, Result};
use crate::scalar::Scalar;

/// Closed set of auxiliary structures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuxSnapshot {
    Stack(StackSnapshot),
    Queue(QueueSnapshot),
    LinkedList(LinkedListSnapshot),
    RecursionTree(RecursionTreeSnapshot),
    Grid(GridSnapshot),
    Hanoi(HanoiSnapshot),
    DpTable(DpTableSnapshot),
    StringMatch(StringMatchSnapshot),
    RollingHash(RollingHashSnapshot),
}

impl AuxSnapshot {
    /// Every `type` discriminator a renderer may see.
    pub const TYPES: [&'static str; 9] = [
        "stack",
        "queue",
        "linked_list",
        "recursion_tree",
        "grid",
        "hanoi",
        "dp_table",
        "string_match",
        "rolling_hash",
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            AuxSnapshot::Stack(_) => "stack",
            AuxSnapshot::Queue(_) => "queue",
            AuxSnapshot::LinkedList(_) => "linked_list",
            AuxSnapshot::RecursionTree(_) => "recursion_tree",
            AuxSnapshot::Grid(_) => "grid",
            AuxSnapshot::Hanoi(_) => "hanoi",
            AuxSnapshot::DpTable(_) => "dp_table",
            AuxSnapshot::StringMatch(_) => "string_match",
            AuxSnapshot::RollingHash(_) => "rolling_hash",
        }
    }

    /// Decode a snapshot received from outside the process.
    ///
    /// An unrecognized discriminator is reported as
    /// [`ProtocolViolation::UnknownAuxiliary`] rather than a generic decode
    /// failure.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let ty = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| ProtocolViolation::Decode("missing `type` discriminator".into()))?;
        if !Self::TYPES.contains(&ty) {
            return Err(ProtocolViolation::UnknownAuxiliary(ty.to_string()));
        }
        let snapshot: AuxSnapshot = serde_json::from_value(value.clone())
            .map_err(|e| ProtocolViolation::Decode(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        match self {
            AuxSnapshot::Stack(s) => s.validate(),
            AuxSnapshot::Queue(s) => s.validate(),
            AuxSnapshot::LinkedList(s) => s.validate(),
            AuxSnapshot::RecursionTree(s) => s.validate(),
            AuxSnapshot::Grid(s) => s.validate(),
            AuxSnapshot::Hanoi(s) => s.validate(),
            AuxSnapshot::DpTable(s) => s.validate(),
            AuxSnapshot::StringMatch(s) => s.validate(),
            AuxSnapshot::RollingHash(s) => s.validate(),
        }
    }
}

/// Transition being animated by the step that produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Push,
    Pop,
}

// ---------------------------------------------------------------------------
// Stack / queue
// ---------------------------------------------------------------------------

/// Stack contents, bottom first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSnapshot {
    pub label: String,
    pub items: Vec<Scalar>,
    pub capacity: Option<usize>,
    pub animating: Option<Transition>,
    pub animating_value: Option<Scalar>,
}

impl StackSnapshot {
    pub fn depth(&self) -> usize {
        self.items.len()
    }

    fn validate(&self) -> Result<()> {
        if let Some(cap) = self.capacity {
            if self.items.len() > cap {
                return Err(ProtocolViolation::malformed(
                    "stack",
                    format!("{} items exceed capacity {}", self.items.len(), cap),
                ));
            }
        }
        if self.animating.is_none() && self.animating_value.is_some() {
            return Err(ProtocolViolation::malformed("stack", "animating value without transition"));
        }
        Ok(())
    }
}

/// Fixed-capacity circular queue.
///
/// `front` is the slot of the next dequeue, `rear` the slot of the next
/// enqueue; `size` disambiguates full from empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub label: String,
    pub slots: Vec<Scalar>,
    pub capacity: usize,
    pub front: usize,
    pub rear: usize,
    pub size: usize,
    pub animating: Option<Transition>,
    pub animating_value: Option<Scalar>,
}

impl QueueSnapshot {
    /// Logical contents, front first.
    pub fn items(&self) -> Vec<Scalar> {
        (0..self.size)
            .filter_map(|i| {
                let slot = (self.front + i).checked_rem(self.capacity)?;
                self.slots.get(slot).cloned()
            })
            .collect()
    }

    fn validate(&self) -> Result<()> {
        let bad = |reason: String| Err(ProtocolViolation::malformed("queue", reason));
        if self.capacity == 0 {
            return bad("capacity must be positive".into());
        }
        if self.slots.len() != self.capacity {
            return bad(format!("{} slots for capacity {}", self.slots.len(), self.capacity));
        }
        if self.front >= self.capacity || self.rear >= self.capacity {
            return bad(format!("front {} / rear {} outside capacity {}", self.front, self.rear, self.capacity));
        }
        if self.size > self.capacity {
            return bad(format!("size {} exceeds capacity {}", self.size, self.capacity));
        }
        if (self.front + self.size) % self.capacity != self.rear {
            return bad(format!("rear {} inconsistent with front {} and size {}", self.rear, self.front, self.size));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Linked list
// ---------------------------------------------------------------------------

/// Emphasis on a list node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeHighlight {
    Current,
    Previous,
    Next,
    Visited,
    Slow,
    Fast,
    Meeting,
    Done,
}

/// A list node; links are small integer ids, never addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNodeView {
    pub id: u32,
    pub value: i64,
    pub next_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_id: Option<u32>,
    pub is_head: bool,
    pub is_tail: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<NodeHighlight>,
}

/// A labelled reference to a node (`prev`, `curr`, `slow`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePointer {
    pub name: String,
    pub node_id: Option<u32>,
}

/// One or more lists sharing a node id space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedListSnapshot {
    pub nodes: Vec<ListNodeView>,
    pub head_id: Option<u32>,
    pub tail_id: Option<u32>,
    pub cycle_start_id: Option<u32>,
    pub pointers: Vec<NodePointer>,
}

impl LinkedListSnapshot {
    pub fn node(&self, id: u32) -> Option<&ListNodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Values reached by following `next_id` from the head, stopping at a
    /// repeat so cyclic lists terminate.
    pub fn head_values(&self) -> Vec<i64> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut cursor = self.head_id;
        while let Some(id) = cursor {
            if !seen.insert(id) {
                break;
            }
            match self.node(id) {
                Some(node) => {
                    out.push(node.value);
                    cursor = node.next_id;
                }
                None => break,
            }
        }
        out
    }

    fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for node in &self.nodes {
            if !ids.insert(node.id) {
                return Err(ProtocolViolation::malformed("linked_list", format!("duplicate node id {}", node.id)));
            }
        }
        let check = |what: &str, id: Option<u32>| match id {
            Some(id) if !ids.contains(&id) => Err(ProtocolViolation::malformed(
                "linked_list",
                format!("{what} references missing node {id}"),
            )),
            _ => Ok(()),
        };
        check("head", self.head_id)?;
        check("tail", self.tail_id)?;
        check("cycle start", self.cycle_start_id)?;
        for node in &self.nodes {
            check("next", node.next_id)?;
            check("prev", node.prev_id)?;
        }
        for pointer in &self.pointers {
            check(pointer.name.as_str(), pointer.node_id)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Recursion tree
// ---------------------------------------------------------------------------

/// Where a call sits relative to the active path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    /// Currently executing.
    Active,
    /// Waiting on a sub-call to return.
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallNodeView {
    pub id: u32,
    pub label: String,
    pub args: String,
    pub status: CallStatus,
    pub depth: usize,
    pub parent_id: Option<u32>,
    pub children: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Scalar>,
}

/// Append-only call tree; doubles as the run's call history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursionTreeSnapshot {
    pub nodes: Vec<CallNodeView>,
    pub active_id: Option<u32>,
}

impl RecursionTreeSnapshot {
    pub fn node(&self, id: u32) -> Option<&CallNodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn validate(&self) -> Result<()> {
        let ids: HashSet<u32> = self.nodes.iter().map(|n| n.id).collect();
        if ids.len() != self.nodes.len() {
            return Err(ProtocolViolation::malformed("recursion_tree", "duplicate call id"));
        }
        let missing = |id: u32| !ids.contains(&id);
        for node in &self.nodes {
            if node.parent_id.is_some_and(missing) {
                return Err(ProtocolViolation::malformed(
                    "recursion_tree",
                    format!("call {} has missing parent", node.id),
                ));
            }
            if let Some(&child) = node.children.iter().find(|&&c| missing(c)) {
                return Err(ProtocolViolation::malformed(
                    "recursion_tree",
                    format!("call {} lists missing child {child}", node.id),
                ));
            }
        }
        if self.active_id.is_some_and(missing) {
            return Err(ProtocolViolation::malformed("recursion_tree", "active call not in tree"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Backtracking grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    Empty,
    Tentative,
    Placed,
    Conflict,
    Visited,
    Solution,
    Blocked,
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub value: Scalar,
    pub status: CellStatus,
}

/// Row-major cell grid for constraint search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<GridCell>,
}

impl GridSnapshot {
    pub fn cell(&self, row: usize, col: usize) -> Option<&GridCell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn count(&self, status: CellStatus) -> usize {
        self.cells.iter().filter(|c| c.status == status).count()
    }

    fn validate(&self) -> Result<()> {
        if self.cells.len() != self.rows * self.cols {
            return Err(ProtocolViolation::malformed(
                "grid",
                format!("{} cells for {}x{}", self.cells.len(), self.rows, self.cols),
            ));
        }
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.row != i / self.cols || cell.col != i % self.cols {
                return Err(ProtocolViolation::malformed(
                    "grid",
                    format!("cell ({}, {}) out of row-major order", cell.row, cell.col),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Hanoi
// ---------------------------------------------------------------------------

/// A peg; disks bottom first, larger number = larger disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peg {
    pub name: String,
    pub disks: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskMove {
    pub disk: u32,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HanoiSnapshot {
    pub pegs: Vec<Peg>,
    pub disk_count: u32,
    pub moves: u32,
    pub moving: Option<DiskMove>,
}

impl HanoiSnapshot {
    fn validate(&self) -> Result<()> {
        let bad = |reason: String| Err(ProtocolViolation::malformed("hanoi", reason));
        if self.pegs.len() < 3 {
            return bad(format!("{} pegs", self.pegs.len()));
        }
        let total: usize = self.pegs.iter().map(|p| p.disks.len()).sum();
        if total != self.disk_count as usize {
            return bad(format!("{total} disks on pegs, expected {}", self.disk_count));
        }
        for peg in &self.pegs {
            if peg.disks.windows(2).any(|w| w[0] <= w[1]) {
                return bad(format!("larger disk on smaller one on peg {}", peg.name));
            }
        }
        if let Some(m) = self.moving {
            if m.from >= self.pegs.len() || m.to >= self.pegs.len() {
                return bad(format!("move {} -> {} references missing peg", m.from, m.to));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DP table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpTableSnapshot {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `None` for cells not yet computed.
    pub cells: Vec<Vec<Option<i64>>>,
    pub current: Option<CellRef>,
    pub best: Option<CellRef>,
}

impl DpTableSnapshot {
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    fn validate(&self) -> Result<()> {
        let bad = |reason: String| Err(ProtocolViolation::malformed("dp_table", reason));
        if self.cells.len() != self.row_labels.len() {
            return bad(format!("{} rows, {} row labels", self.cells.len(), self.row_labels.len()));
        }
        let cols = self.col_labels.len();
        if let Some(row) = self.cells.iter().position(|r| r.len() != cols) {
            return bad(format!("row {row} is not {cols} wide"));
        }
        for cell in [self.current, self.best].into_iter().flatten() {
            if cell.row >= self.cells.len() || cell.col >= cols {
                return bad(format!("cell ({}, {}) outside table", cell.row, cell.col));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// String matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharTag {
    None,
    Window,
    Match,
    Mismatch,
    Found,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharCell {
    pub ch: char,
    pub tag: CharTag,
}

/// Text and pattern aligned at `offset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringMatchSnapshot {
    pub text: Vec<CharCell>,
    pub pattern: Vec<CharCell>,
    pub offset: usize,
    pub matches: Vec<usize>,
}

impl StringMatchSnapshot {
    fn validate(&self) -> Result<()> {
        let bad = |reason: String| Err(ProtocolViolation::malformed("string_match", reason));
        if self.pattern.is_empty() {
            return bad("empty pattern".into());
        }
        if self.offset + self.pattern.len() > self.text.len() {
            return bad(format!(
                "pattern of {} at offset {} overruns text of {}",
                self.pattern.len(),
                self.offset,
                self.text.len()
            ));
        }
        if let Some(m) = self.matches.iter().find(|&&m| m + self.pattern.len() > self.text.len()) {
            return bad(format!("match at {m} overruns text"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rolling hash
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingHashSnapshot {
    pub base: u64,
    pub modulus: u64,
    pub text_len: usize,
    pub window_start: usize,
    pub window_len: usize,
    pub window_hash: u64,
    pub pattern_hash: u64,
}

impl RollingHashSnapshot {
    pub fn hashes_match(&self) -> bool {
        self.window_hash == self.pattern_hash
    }

    fn validate(&self) -> Result<()> {
        let bad = |reason: String| Err(ProtocolViolation::malformed("rolling_hash", reason));
        if self.modulus < 2 {
            return bad(format!("modulus {}", self.modulus));
        }
        if self.window_hash >= self.modulus || self.pattern_hash >= self.modulus {
            return bad("hash not reduced by modulus".into());
        }
        if self.window_start + self.window_len > self.text_len {
            return bad("window overruns text".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn queue(front: usize, rear: usize, size: usize) -> QueueSnapshot {
        QueueSnapshot {
            label: "queue".into(),
            slots: vec![Scalar::Null; 4],
            capacity: 4,
            front,
            rear,
            size,
            animating: None,
            animating_value: None,
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = AuxSnapshot::from_json(&json!({"type": "heap", "items": []})).unwrap_err();
        assert_eq!(err, ProtocolViolation::UnknownAuxiliary("heap".into()));

        let err = AuxSnapshot::from_json(&json!({"items": []})).unwrap_err();
        assert!(matches!(err, ProtocolViolation::Decode(_)));
    }

    #[test]
    fn known_type_decodes() {
        let value = json!({
            "type": "stack",
            "label": "stack",
            "items": ["(", "["],
            "capacity": null,
            "animating": "push",
            "animating_value": "[",
        });
        let snapshot = AuxSnapshot::from_json(&value).unwrap();
        match snapshot {
            AuxSnapshot::Stack(s) => assert_eq!(s.depth(), 2),
            other => panic!("decoded as {}", other.type_name()),
        }
    }

    #[test]
    fn type_names_cover_discriminators() {
        let snap = AuxSnapshot::Queue(queue(0, 0, 0));
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["type"], snap.type_name());
        assert!(AuxSnapshot::TYPES.contains(&snap.type_name()));
    }

    #[test]
    fn queue_wraps_around() {
        let mut q = queue(3, 1, 2);
        q.slots[3] = Scalar::Int(10);
        q.slots[0] = Scalar::Int(20);
        assert!(q.validate().is_ok());
        assert_eq!(q.items(), vec![Scalar::Int(10), Scalar::Int(20)]);

        assert!(queue(3, 2, 2).validate().is_err());
        assert!(queue(4, 0, 0).validate().is_err());
    }

    #[test]
    fn linked_list_rejects_dangling_links() {
        let node = |id, next| ListNodeView {
            id,
            value: id as i64,
            next_id: next,
            prev_id: None,
            is_head: false,
            is_tail: next.is_none(),
            highlight: None,
        };
        let mut list = LinkedListSnapshot {
            nodes: vec![node(0, Some(1)), node(1, None)],
            head_id: Some(0),
            tail_id: Some(1),
            cycle_start_id: None,
            pointers: vec![],
        };
        assert!(list.validate().is_ok());
        assert_eq!(list.head_values(), vec![0, 1]);

        list.nodes[1].next_id = Some(7);
        assert!(list.validate().is_err());
    }

    #[test]
    fn cyclic_list_values_terminate() {
        let list = LinkedListSnapshot {
            nodes: vec![
                ListNodeView { id: 0, value: 1, next_id: Some(1), prev_id: None, is_head: true, is_tail: false, highlight: None },
                ListNodeView { id: 1, value: 2, next_id: Some(0), prev_id: None, is_head: false, is_tail: false, highlight: None },
            ],
            head_id: Some(0),
            tail_id: None,
            cycle_start_id: Some(0),
            pointers: vec![],
        };
        assert_eq!(list.head_values(), vec![1, 2]);
    }

    #[test]
    fn hanoi_rejects_inverted_stack() {
        let snap = HanoiSnapshot {
            pegs: vec![
                Peg { name: "A".into(), disks: vec![1, 2] },
                Peg { name: "B".into(), disks: vec![] },
                Peg { name: "C".into(), disks: vec![] },
            ],
            disk_count: 2,
            moves: 0,
            moving: None,
        };
        assert!(snap.validate().is_err());
    }

    #[test]
    fn grid_must_be_row_major() {
        let cell = |row, col| GridCell { row, col, value: Scalar::Null, status: CellStatus::Empty };
        let good = GridSnapshot { rows: 1, cols: 2, cells: vec![cell(0, 0), cell(0, 1)] };
        assert!(good.validate().is_ok());
        let swapped = GridSnapshot { rows: 1, cols: 2, cells: vec![cell(0, 1), cell(0, 0)] };
        assert!(swapped.validate().is_err());
    }

    #[test]
    fn string_match_window_must_fit() {
        let cells = |s: &str| s.chars().map(|ch| CharCell { ch, tag: CharTag::None }).collect();
        let snap = StringMatchSnapshot { text: cells("abc"), pattern: cells("bc"), offset: 2, matches: vec![] };
        assert!(snap.validate().is_err());
    }

    proptest! {
        #[test]
        fn from_json_rejects_unlisted_types(ty in "[a-z_]{1,16}") {
            prop_assume!(!AuxSnapshot::TYPES.contains(&ty.as_str()));
            let err = AuxSnapshot::from_json(&json!({"type": ty.clone()})).unwrap_err();
            prop_assert_eq!(err, ProtocolViolation::UnknownAuxiliary(ty));
        }

        #[test]
        fn decoded_queues_are_consistent(
            capacity in 0usize..6,
            front in 0usize..8,
            rear in 0usize..8,
            size in 0usize..8,
        ) {
            let value = json!({
                "type": "queue",
                "label": "queue",
                "slots": vec![1; capacity],
                "capacity": capacity,
                "front": front,
                "rear": rear,
                "size": size,
                "animating": null,
                "animating_value": null,
            });
            if let Ok(AuxSnapshot::Queue(queue)) = AuxSnapshot::from_json(&value) {
                prop_assert!(capacity > 0 && size <= capacity);
                prop_assert_eq!(queue.items().len(), size);
                prop_assert_eq!((front + size) % capacity, rear);
            }
        }
    }
}

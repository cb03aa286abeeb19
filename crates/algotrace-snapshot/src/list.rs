//! Arena-backed linked lists and their snapshots.
//!
//! Nodes link through small integer ids. Each arena owns a disjoint id range
//! (`base..base + len`), so several lists can share one snapshot.

use std::collections::BTreeMap;

use algotrace_protocol::{AuxSnapshot, LinkedListSnapshot, ListNodeView, NodeHighlight, NodePointer};

/// Node id within a snapshot.
pub type NodeId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaNode {
    pub value: i64,
    pub next: Option<NodeId>,
    pub prev: Option<NodeId>,
}

/// Append-only node storage for one run.
#[derive(Debug, Clone, Default)]
pub struct ListArena {
    base: NodeId,
    nodes: Vec<ArenaNode>,
}

impl ListArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena whose ids start at `base`.
    pub fn with_id_base(base: NodeId) -> Self {
        Self {
            base,
            nodes: Vec::new(),
        }
    }

    /// Build a singly linked chain from `values`, returning the head id.
    pub fn from_values(base: NodeId, values: &[i64]) -> (Self, Option<NodeId>) {
        let mut arena = Self::with_id_base(base);
        let ids: Vec<NodeId> = values.iter().map(|&v| arena.alloc(v)).collect();
        for pair in ids.windows(2) {
            arena.link(pair[0], Some(pair[1]));
        }
        (arena, ids.first().copied())
    }

    pub fn alloc(&mut self, value: i64) -> NodeId {
        let id = self.base + self.nodes.len() as NodeId;
        self.nodes.push(ArenaNode {
            value,
            next: None,
            prev: None,
        });
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id >= self.base && ((id - self.base) as usize) < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&ArenaNode> {
        if !self.contains(id) {
            return None;
        }
        self.nodes.get((id - self.base) as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut ArenaNode> {
        if !self.contains(id) {
            return None;
        }
        self.nodes.get_mut((id - self.base) as usize)
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next)
    }

    pub fn value(&self, id: NodeId) -> Option<i64> {
        self.get(id).map(|n| n.value)
    }

    /// Point `id.next` at `next`. Ids outside this arena are ignored.
    pub fn link(&mut self, id: NodeId, next: Option<NodeId>) {
        if let Some(node) = self.get_mut(id) {
            node.next = next;
        }
    }

    pub fn set_prev(&mut self, id: NodeId, prev: Option<NodeId>) {
        if let Some(node) = self.get_mut(id) {
            node.prev = prev;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(move |i| self.base + i as NodeId)
    }
}

/// Follow `next` links across any of `arenas` starting at `head`.
///
/// Stops at a repeated id so cyclic chains terminate.
pub fn walk(arenas: &[&ListArena], head: Option<NodeId>) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut cursor = head;
    while let Some(id) = cursor {
        if out.contains(&id) {
            break;
        }
        let Some(node) = arenas.iter().find_map(|a| a.get(id)) else {
            break;
        };
        out.push(id);
        cursor = node.next;
    }
    out
}

/// Context for a linked-list snapshot.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    head: Option<NodeId>,
    tail: Option<NodeId>,
    cycle_start: Option<NodeId>,
    extra_heads: Vec<NodeId>,
    highlights: BTreeMap<NodeId, NodeHighlight>,
    pointers: Vec<NodePointer>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn head(mut self, id: Option<NodeId>) -> Self {
        self.head = id;
        self
    }

    #[must_use]
    pub fn tail(mut self, id: Option<NodeId>) -> Self {
        self.tail = id;
        self
    }

    #[must_use]
    pub fn cycle_start(mut self, id: Option<NodeId>) -> Self {
        self.cycle_start = id;
        self
    }

    /// Flag the head of a secondary list (e.g. the other input of a merge).
    #[must_use]
    pub fn also_head(mut self, id: Option<NodeId>) -> Self {
        self.extra_heads.extend(id);
        self
    }

    #[must_use]
    pub fn highlight(mut self, id: Option<NodeId>, highlight: NodeHighlight) -> Self {
        if let Some(id) = id {
            self.highlights.insert(id, highlight);
        }
        self
    }

    #[must_use]
    pub fn pointer(mut self, name: &str, id: Option<NodeId>) -> Self {
        self.pointers.push(NodePointer {
            name: name.to_string(),
            node_id: id,
        });
        self
    }

    /// Deep copy of every node in `arenas`, ordered by id.
    pub fn snapshot(&self, arenas: &[&ListArena]) -> AuxSnapshot {
        let mut nodes: Vec<ListNodeView> = arenas
            .iter()
            .flat_map(|arena| arena.ids().zip(arena.nodes.iter()))
            .map(|(id, node)| ListNodeView {
                id,
                value: node.value,
                next_id: node.next,
                prev_id: node.prev,
                is_head: self.head == Some(id) || self.extra_heads.contains(&id),
                is_tail: match self.tail {
                    Some(tail) => tail == id,
                    None => node.next.is_none(),
                },
                highlight: self.highlights.get(&id).copied(),
            })
            .collect();
        nodes.sort_by_key(|n| n.id);

        AuxSnapshot::LinkedList(LinkedListSnapshot {
            nodes,
            head_id: self.head,
            tail_id: self.tail,
            cycle_start_id: self.cycle_start,
            pointers: self.pointers.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_list(snapshot: AuxSnapshot) -> LinkedListSnapshot {
        match snapshot {
            AuxSnapshot::LinkedList(list) => list,
            other => panic!("expected linked list, got {}", other.type_name()),
        }
    }

    #[test]
    fn from_values_links_in_order() {
        let (arena, head) = ListArena::from_values(0, &[1, 2, 3]);
        assert_eq!(head, Some(0));
        assert_eq!(walk(&[&arena], head), vec![0, 1, 2]);
        assert_eq!(arena.next(2), None);
    }

    #[test]
    fn snapshot_is_isolated_from_relinking() {
        let (mut arena, head) = ListArena::from_values(0, &[1, 2, 3]);
        let snapshot = ListView::new()
            .head(head)
            .highlight(head, NodeHighlight::Current)
            .pointer("curr", head)
            .snapshot(&[&arena]);
        let before = snapshot.clone();

        arena.link(0, None);
        arena.link(1, Some(0));

        assert_eq!(snapshot, before);
        let list = as_list(snapshot);
        assert_eq!(list.head_values(), vec![1, 2, 3]);
        assert_eq!(list.node(0).unwrap().highlight, Some(NodeHighlight::Current));
        assert!(list.node(2).unwrap().is_tail);
    }

    #[test]
    fn disjoint_arenas_share_a_snapshot() {
        let (a, head_a) = ListArena::from_values(0, &[1, 4]);
        let (b, head_b) = ListArena::from_values(100, &[2, 3]);
        let snapshot = ListView::new().head(head_a).also_head(head_b).snapshot(&[&b, &a]);
        assert!(snapshot.validate().is_ok());

        let list = as_list(snapshot);
        let ids: Vec<_> = list.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1, 100, 101]);
        assert!(list.node(100).unwrap().is_head);
    }

    #[test]
    fn overlapping_arenas_fail_validation() {
        let (a, head) = ListArena::from_values(0, &[1]);
        let (b, _) = ListArena::from_values(0, &[2]);
        let snapshot = ListView::new().head(head).snapshot(&[&a, &b]);
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn walk_stops_on_cycle() {
        let (mut arena, head) = ListArena::from_values(0, &[1, 2, 3]);
        arena.link(2, Some(1));
        assert_eq!(walk(&[&arena], head), vec![0, 1, 2]);
    }
}

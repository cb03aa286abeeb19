//! Recursion call trees.
//!
//! The tree is append-only: calls are never removed, only their status and
//! result change, so the final snapshot is a full call history. Ids are handed
//! in by the caller (the run's monotonic counter) rather than generated here.

use std::collections::HashMap;

use algotrace_protocol::{AuxSnapshot, CallNodeView, CallStatus, RecursionTreeSnapshot, Scalar};

pub type CallId = u32;

#[derive(Debug, Clone, Default)]
pub struct CallTree {
    nodes: Vec<CallNodeView>,
    positions: HashMap<CallId, usize>,
    active: Option<CallId>,
}

impl CallTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new call under `parent` and make it the active one.
    ///
    /// The parent moves to `pending` while the child runs.
    pub fn enter(
        &mut self,
        id: CallId,
        label: impl Into<String>,
        args: impl Into<String>,
        parent: Option<CallId>,
    ) -> CallId {
        let depth = match parent.and_then(|p| self.node_mut(p)) {
            Some(p) => {
                p.children.push(id);
                p.status = CallStatus::Pending;
                p.depth + 1
            }
            None => 0,
        };
        self.positions.insert(id, self.nodes.len());
        self.nodes.push(CallNodeView {
            id,
            label: label.into(),
            args: args.into(),
            status: CallStatus::Active,
            depth,
            parent_id: parent,
            children: Vec::new(),
            result: None,
        });
        self.active = Some(id);
        id
    }

    /// Mark `id` completed with `result`; control returns to its parent.
    pub fn complete(&mut self, id: CallId, result: impl Into<Scalar>) {
        let parent = match self.node_mut(id) {
            Some(node) => {
                node.status = CallStatus::Completed;
                node.result = Some(result.into());
                node.parent_id
            }
            None => return,
        };
        if let Some(p) = parent.and_then(|p| self.node_mut(p)) {
            p.status = CallStatus::Active;
        }
        self.active = parent;
    }

    pub fn get(&self, id: CallId) -> Option<&CallNodeView> {
        self.positions.get(&id).map(|&i| &self.nodes[i])
    }

    fn node_mut(&mut self, id: CallId) -> Option<&mut CallNodeView> {
        let index = *self.positions.get(&id)?;
        self.nodes.get_mut(index)
    }

    pub fn active(&self) -> Option<CallId> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn snapshot(&self) -> AuxSnapshot {
        AuxSnapshot::RecursionTree(RecursionTreeSnapshot {
            nodes: self.nodes.clone(),
            active_id: self.active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_active_path() {
        let mut tree = CallTree::new();
        let root = tree.enter(0, "fib", "n=2", None);
        let left = tree.enter(1, "fib", "n=1", Some(root));

        assert_eq!(tree.get(root).unwrap().status, CallStatus::Pending);
        assert_eq!(tree.get(left).unwrap().status, CallStatus::Active);
        assert_eq!(tree.get(left).unwrap().depth, 1);

        tree.complete(left, 1i64);
        assert_eq!(tree.get(root).unwrap().status, CallStatus::Active);
        assert_eq!(tree.active(), Some(root));

        tree.complete(root, 1i64);
        assert_eq!(tree.active(), None);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn snapshot_survives_later_mutation() {
        let mut tree = CallTree::new();
        let root = tree.enter(0, "f", "n=1", None);
        let snapshot = tree.snapshot();

        tree.enter(1, "f", "n=0", Some(root));
        tree.complete(root, 0i64);

        match snapshot {
            AuxSnapshot::RecursionTree(t) => {
                assert_eq!(t.nodes.len(), 1);
                assert_eq!(t.nodes[0].status, CallStatus::Active);
                assert!(t.nodes[0].children.is_empty());
                assert!(t.nodes[0].result.is_none());
            }
            _ => panic!("expected recursion tree"),
        }
    }

    #[test]
    fn orphan_call_fails_validation() {
        let mut tree = CallTree::new();
        tree.enter(5, "f", "", Some(99));
        assert!(tree.snapshot().validate().is_err());
    }
}

//! Stack and circular-queue snapshots.

use algotrace_protocol::{AuxSnapshot, QueueSnapshot, Scalar, StackSnapshot, Transition};

/// Context for stack snapshots: the channel label and an optional bound.
#[derive(Debug, Clone)]
pub struct StackBuilder {
    label: String,
    capacity: Option<usize>,
}

impl StackBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            capacity: None,
        }
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Copy of `live` (bottom first) at rest.
    pub fn snapshot<T: Clone + Into<Scalar>>(&self, live: &[T]) -> AuxSnapshot {
        self.build(live, None, None)
    }

    /// Copy of `live` annotated with the transition that produced it.
    pub fn transition<T: Clone + Into<Scalar>>(
        &self,
        live: &[T],
        transition: Transition,
        value: impl Into<Scalar>,
    ) -> AuxSnapshot {
        self.build(live, Some(transition), Some(value.into()))
    }

    fn build<T: Clone + Into<Scalar>>(
        &self,
        live: &[T],
        animating: Option<Transition>,
        animating_value: Option<Scalar>,
    ) -> AuxSnapshot {
        AuxSnapshot::Stack(StackSnapshot {
            label: self.label.clone(),
            items: live.iter().cloned().map(Into::into).collect(),
            capacity: self.capacity,
            animating,
            animating_value,
        })
    }
}

/// Queue full on enqueue, or empty on dequeue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    Full,
    Empty,
}

/// Fixed-capacity ring buffer with explicit front/rear cursors.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    front: usize,
    rear: usize,
    size: usize,
}

impl<T: Clone> RingBuffer<T> {
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be positive");
        Self {
            slots: vec![None; capacity],
            front: 0,
            rear: 0,
            size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_full(&self) -> bool {
        self.size == self.slots.len()
    }

    pub fn front(&self) -> usize {
        self.front
    }

    pub fn rear(&self) -> usize {
        self.rear
    }

    pub fn peek(&self) -> Option<&T> {
        self.slots[self.front].as_ref().filter(|_| self.size > 0)
    }

    pub fn enqueue(&mut self, value: T) -> Result<usize, RingError> {
        if self.is_full() {
            return Err(RingError::Full);
        }
        let slot = self.rear;
        self.slots[slot] = Some(value);
        self.rear = (self.rear + 1) % self.slots.len();
        self.size += 1;
        Ok(slot)
    }

    pub fn dequeue(&mut self) -> Result<T, RingError> {
        let value = self.slots[self.front].take().ok_or(RingError::Empty)?;
        self.front = (self.front + 1) % self.slots.len();
        self.size -= 1;
        Ok(value)
    }

    /// Logical contents, front first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.size).filter_map(move |i| self.slots[(self.front + i) % self.slots.len()].as_ref())
    }
}

/// Context for queue snapshots.
#[derive(Debug, Clone)]
pub struct QueueBuilder {
    label: String,
}

impl QueueBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn snapshot<T: Clone + Into<Scalar>>(&self, live: &RingBuffer<T>) -> AuxSnapshot {
        self.build(live, None, None)
    }

    pub fn transition<T: Clone + Into<Scalar>>(
        &self,
        live: &RingBuffer<T>,
        transition: Transition,
        value: impl Into<Scalar>,
    ) -> AuxSnapshot {
        self.build(live, Some(transition), Some(value.into()))
    }

    fn build<T: Clone + Into<Scalar>>(
        &self,
        live: &RingBuffer<T>,
        animating: Option<Transition>,
        animating_value: Option<Scalar>,
    ) -> AuxSnapshot {
        AuxSnapshot::Queue(QueueSnapshot {
            label: self.label.clone(),
            slots: live
                .slots
                .iter()
                .map(|slot| slot.clone().map_or(Scalar::Null, Into::into))
                .collect(),
            capacity: live.capacity(),
            front: live.front,
            rear: live.rear,
            size: live.size,
            animating,
            animating_value,
        })
    }
}

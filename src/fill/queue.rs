//! Capped FIFO work queue with an explicit backpressure policy.

use std::collections::VecDeque;

/// Upper bound on up-front allocation, whatever the capacity
const PREALLOC_LIMIT: usize = 4096;

/// Policy applied when pushing into a full queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backpressure {
    /// Reject the incoming item (breadth-limited fill)
    #[default]
    DropNewest,

    /// Evict the oldest pending item to make room
    DropOldest,
}

/// Result of a push, handing back whatever did not stay queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushResult<T> {
    Accepted,
    /// Queue full; the pushed item was rejected
    Dropped(T),
    /// Queue full; the pushed item was queued and this older one removed
    Evicted(T),
}

/// FIFO queue that never grows past its capacity
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
    policy: Backpressure,
    dropped: usize,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue holding at most `capacity` items
    pub fn new(capacity: usize, policy: Backpressure) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.min(PREALLOC_LIMIT)),
            capacity,
            policy,
            dropped: 0,
        }
    }

    /// Push to the back, applying the backpressure policy when full
    pub fn push(&mut self, item: T) -> PushResult<T> {
        if self.items.len() < self.capacity {
            self.items.push_back(item);
            return PushResult::Accepted;
        }

        self.dropped += 1;
        match self.policy {
            Backpressure::DropNewest => PushResult::Dropped(item),
            Backpressure::DropOldest => match self.items.pop_front() {
                Some(oldest) => {
                    self.items.push_back(item);
                    PushResult::Evicted(oldest)
                }
                // Zero capacity: nothing to evict, nothing fits
                None => PushResult::Dropped(item),
            },
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> Backpressure {
        self.policy
    }

    /// Items rejected or evicted since creation
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

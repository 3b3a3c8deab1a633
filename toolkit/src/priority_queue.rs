use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ViskitError;
use crate::settings::{QueueSettings, DEFAULT_SIZE};

/// Priority reported by callers that need a plain value for ids that are not queued
pub const LARGE_PRIORITY: f64 = f64::MAX;

/// Marks an id that has no slot in the heap
const NO_LOCATION: usize = usize::MAX;

/// One queue entry: an externally meaningful id (e.g. a point or cell id) and its priority
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityItem {
    pub priority: f64,
    pub id: usize,
}

/// Min-priority queue of ids that supports removing any id, not just the minimum.
///
/// Entries live in a binary heap packed into a flat array. A second array maps every id to
/// its current heap slot, so lookups and removals by id cost O(1) and O(log n) respectively.
/// Ids are used directly as indices into that second array, so they should be dense.
#[derive(Debug)]
pub struct IndexedPriorityQueue {
    heap: Vec<PriorityItem>,
    positions: Vec<usize>,
    extend: usize,
}

/// Get the left child index of `index`
fn get_left(index: usize) -> usize {
    2 * index + 1
}

/// Get the right child index of `index`
fn get_right(index: usize) -> usize {
    2 * index + 2
}

/// Get the parent index of `index`
fn get_parent(index: usize) -> usize {
    if index > 0 {
        (index - 1) / 2
    } else {
        0
    }
}

impl Default for IndexedPriorityQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

impl IndexedPriorityQueue {
    /// Create a new `IndexedPriorityQueue` from validated `settings`
    pub fn new(settings: &QueueSettings) -> Result<Self, ViskitError> {
        settings.validate()?;
        Ok(Self::with_capacity(settings.initial_size, settings.extend))
    }

    /// Create a new `IndexedPriorityQueue` with room for `size` entries that grows by
    /// `extend` entries whenever it is full. An `extend` of 0 is treated as 1.
    pub fn with_capacity(size: usize, extend: usize) -> Self {
        Self {
            heap: Vec::with_capacity(size),
            positions: vec![NO_LOCATION; size],
            extend: extend.max(1),
        }
    }

    /// Reserve room for at least `size` entries and set the growth step to `extend`.
    /// Queued entries are kept; the storage never shrinks.
    pub fn allocate(&mut self, size: usize, extend: usize) {
        self.extend = extend.max(1);
        if size > self.heap.capacity() {
            self.heap.reserve_exact(size - self.heap.len());
        }
        if size > self.positions.len() {
            self.positions.resize(size, NO_LOCATION);
        }

        log::debug!("Allocated priority queue. capacity={}, extend={}.",
                    self.heap.capacity(), self.extend);
    }

    /// Put `item` at heap slot `index` and record the slot for its id
    fn set_item_and_pos(&mut self, item: PriorityItem, index: usize) {
        self.heap[index] = item;
        self.positions[item.id] = index;
    }

    /// Swap the entries at `parent` and `child`.
    /// Every reordering of the heap goes through here so the id index never falls behind.
    fn swap(&mut self, parent: usize, child: usize) {
        let p_item = self.heap[parent];
        let ch_item = self.heap[child];

        self.set_item_and_pos(p_item, child);
        self.set_item_and_pos(ch_item, parent);
    }

    /// Move the entry at `index` towards the root while its parent has a greater priority.
    /// Returns the slot the entry ends up in.
    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = get_parent(index);
            if self.heap[parent].priority <= self.heap[index].priority {
                break;
            }
            self.swap(parent, index);
            index = parent;
        }
        index
    }

    /// Fixes the heap structure below `index`
    fn reheap(&mut self, index: usize) {
        let len = self.heap.len();
        let left = get_left(index);
        let right = get_right(index);

        let mut smallest;
        if left < len && self.heap[left].priority < self.heap[index].priority {
            smallest = left;
        } else {
            smallest = index;
        }
        if right < len && self.heap[right].priority < self.heap[smallest].priority {
            smallest = right;
        }

        if smallest != index {
            self.swap(index, smallest);
            self.reheap(smallest);
        }
    }

    /// Restore the heap order around an entry whose slot or priority just changed
    fn restore(&mut self, index: usize) {
        if self.sift_up(index) == index {
            self.reheap(index);
        }
    }

    /// Make sure the heap has a free slot and the id index covers `id`
    fn grow_for(&mut self, id: usize) {
        if self.heap.len() == self.heap.capacity() {
            self.heap.reserve_exact(self.extend);
            log::debug!("Extended priority queue storage to {} entries", self.heap.capacity());
        }
        if id >= self.positions.len() {
            let len = (id + 1).max(self.positions.len() + self.extend);
            self.positions.resize(len, NO_LOCATION);
        }
    }

    /// Insert `id` with the given `priority`.
    /// Returns an error and leaves the queue untouched if `id` is already queued.
    pub fn insert(&mut self, priority: f64, id: usize) -> Result<(), ViskitError> {
        if self.contains(id) {
            log::warn!("Rejected insert of id {}: already queued", id);
            return Err(ViskitError::DuplicateId { id });
        }

        self.grow_for(id);
        self.heap.push(PriorityItem { priority, id });
        let index = self.heap.len() - 1;
        self.positions[id] = index;
        self.sift_up(index);

        Ok(())
    }

    /// Remove the entry at heap slot `location`, where slot 0 holds the minimum.
    /// Returns `None` if there is no such slot, e.g. because the queue is empty.
    pub fn pop_at(&mut self, location: usize) -> Option<PriorityItem> {
        if location >= self.heap.len() {
            return None;
        }

        let item = self.heap[location];
        self.positions[item.id] = NO_LOCATION;

        let tail = self.heap.pop()?;
        if location < self.heap.len() {
            self.set_item_and_pos(tail, location);
            self.restore(location);
        }

        Some(item)
    }

    /// Pop the id with the minimum priority
    pub fn pop(&mut self) -> Option<usize> {
        self.pop_at(0).map(|item| item.id)
    }

    /// Get the entry at heap slot `location` without removing it
    pub fn peek_at(&self, location: usize) -> Option<PriorityItem> {
        self.heap.get(location).copied()
    }

    /// Get the id with the minimum priority without removing it
    pub fn peek(&self) -> Option<usize> {
        self.peek_at(0).map(|item| item.id)
    }

    /// Get the heap slot currently holding `id`
    pub fn location(&self, id: usize) -> Option<usize> {
        self.positions.get(id)
            .copied()
            .filter(|&location| location != NO_LOCATION)
    }

    /// Returns `true` if `id` is queued
    pub fn contains(&self, id: usize) -> bool {
        self.location(id).is_some()
    }

    /// Remove `id` from the queue.
    /// Returns the priority it had, or `None` if it was not queued.
    pub fn delete_id(&mut self, id: usize) -> Option<f64> {
        let location = self.location(id)?;
        self.pop_at(location).map(|item| item.priority)
    }

    /// Get the priority of `id`, or `None` if it is not queued
    pub fn priority(&self, id: usize) -> Option<f64> {
        self.location(id).map(|location| self.heap[location].priority)
    }

    /// Change the priority of a queued `id` in place.
    /// Returns the previous priority, or `None` if `id` is not queued.
    pub fn set_priority(&mut self, priority: f64, id: usize) -> Option<f64> {
        let location = self.location(id)?;
        let old = self.heap[location].priority;
        self.heap[location].priority = priority;
        self.restore(location);
        Some(old)
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of entries the queue can hold before it has to grow
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    /// Queued entries in heap order
    pub fn items(&self) -> &[PriorityItem] {
        &self.heap
    }

    /// Empty the queue but keep its storage for reuse
    pub fn reset(&mut self) {
        for item in &self.heap {
            self.positions[item.id] = NO_LOCATION;
        }
        self.heap.clear();

        log::debug!("Reset priority queue. capacity={}.", self.heap.capacity());
    }
}

impl Display for IndexedPriorityQueue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Number Of Items: {}", self.len())?;
        writeln!(f, "Extend: {}", self.extend)?;
        for item in &self.heap {
            writeln!(f, "  {}: {}", item.id, item.priority)?;
        }
        Ok(())
    }
}

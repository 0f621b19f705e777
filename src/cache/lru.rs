//! LRU List Module
//!
//! Arena-backed doubly linked list ordering values by recency.

// == Slot ==
#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
/// Orders values from least recently used to most recently used.
///
/// Nodes live in a `Vec` and link to each other by index, so a handle
/// returned from [`LruList::push_back`] stays valid until that node is
/// removed. Freed slots are reused by later inserts.
/// - Front (head) = Least recently used
/// - Back (tail) = Most recently used
#[derive(Debug)]
pub struct LruList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Back ==
    /// Appends a value as most recently used and returns its handle.
    pub fn push_back(&mut self, value: T) -> usize {
        let slot = Slot {
            value: Some(value),
            prev: self.tail,
            next: None,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => self.slots[tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
        idx
    }

    // == Move To Back ==
    /// Marks the node at `idx` as most recently used.
    ///
    /// Returns false if `idx` is not a live node.
    pub fn move_to_back(&mut self, idx: usize) -> bool {
        if !self.is_live(idx) {
            return false;
        }
        if self.tail == Some(idx) {
            return true;
        }

        self.unlink(idx);
        self.slots[idx].prev = self.tail;
        self.slots[idx].next = None;
        if let Some(tail) = self.tail {
            self.slots[tail].next = Some(idx);
        }
        self.tail = Some(idx);
        if self.head.is_none() {
            self.head = Some(idx);
        }
        true
    }

    // == Pop Front ==
    /// Removes and returns the least recently used value.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        self.remove(head)
    }

    // == Remove ==
    /// Removes the node at `idx`, freeing its slot.
    pub fn remove(&mut self, idx: usize) -> Option<T> {
        if !self.is_live(idx) {
            return None;
        }

        self.unlink(idx);
        let value = self.slots[idx].value.take();
        self.free.push(idx);
        self.len -= 1;
        value
    }

    // == Peek Front ==
    /// Returns the least recently used value without removing it.
    pub fn peek_front(&self) -> Option<&T> {
        self.head.and_then(|idx| self.get(idx))
    }

    /// Returns the value at `idx`, if live.
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx).and_then(|slot| slot.value.as_ref())
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates from least to most recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn is_live(&self, idx: usize) -> bool {
        self.slots
            .get(idx)
            .map(|slot| slot.value.is_some())
            .unwrap_or(false)
    }

    // Detaches `idx` from its neighbours and fixes head/tail.
    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev;
        let next = self.slots[idx].next;

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }

        self.slots[idx].prev = None;
        self.slots[idx].next = None;
    }
}

// == Iterator ==
/// Iterator over an [`LruList`] from head to tail.
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = &self.list.slots[idx];
        self.cursor = slot.next;
        slot.value.as_ref()
    }
}

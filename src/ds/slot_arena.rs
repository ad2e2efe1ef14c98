//! Slot arena with stable handles.
//!
//! Resident pages live in a `Vec<Option<T>>`. Vacated slots are handed out
//! again before the vector grows, so a [`SlotId`] stays valid until its own
//! page is removed. The recency and frequency lists link pages by `SlotId`
//! instead of pointers.

/// Stable handle to a page stored in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    vacant: Vec<usize>,
    live: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Reserves room for `capacity` pages, the engine's resident limit.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
            live: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        self.live += 1;
        match self.vacant.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                SlotId(idx)
            },
            None => {
                self.slots.push(Some(value));
                SlotId(self.slots.len() - 1)
            },
        }
    }

    /// Frees the slot behind `id`; `None` if it was already vacant.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.vacant.push(id.0);
        self.live -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
        self.live = 0;
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

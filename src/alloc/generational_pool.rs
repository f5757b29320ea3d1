//! `GenerationalPool` - an object pool with generational indices.
//!
//! Prevents ABA problems by checking generations on access.
//! Tree nodes and hash map values both live in one of these pools, so links
//! between them are plain `Copy` indices instead of owning pointers.

use core::ops::{Index, IndexMut};

/// A generational index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationalIndex {
    index: usize,
    generation: u32,
}

impl GenerationalIndex {
    /// Position of the slot inside the pool.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Generation the slot had when this index was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

enum SlotData<T> {
    Occupied(T),
    Free { next_free: Option<usize> },
}

/// A slot with generation.
struct Slot<T> {
    generation: u32,
    data: SlotData<T>,
}

/// A generational pool allocator.
pub struct GenerationalPool<T> {
    storage: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> GenerationalPool<T> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    /// Creates an empty pool with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Stores `value` and returns the index that now owns it.
    pub fn alloc(&mut self, value: T) -> GenerationalIndex {
        self.len += 1;

        if let Some(idx) = self.free_head {
            let slot = &mut self.storage[idx];
            if let SlotData::Free { next_free } = slot.data {
                self.free_head = next_free;
            }
            slot.data = SlotData::Occupied(value);

            GenerationalIndex {
                index: idx,
                generation: slot.generation,
            }
        } else {
            let idx = self.storage.len();
            self.storage.push(Slot {
                generation: 0,
                data: SlotData::Occupied(value),
            });

            GenerationalIndex {
                index: idx,
                generation: 0,
            }
        }
    }

    /// Returns the value behind `idx`, or `None` if the index is stale.
    pub fn get(&self, idx: GenerationalIndex) -> Option<&T> {
        match self.storage.get(idx.index) {
            Some(Slot {
                generation,
                data: SlotData::Occupied(value),
            }) if *generation == idx.generation => Some(value),
            _ => None,
        }
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, idx: GenerationalIndex) -> Option<&mut T> {
        match self.storage.get_mut(idx.index) {
            Some(Slot {
                generation,
                data: SlotData::Occupied(value),
            }) if *generation == idx.generation => Some(value),
            _ => None,
        }
    }

    /// Borrows two distinct live values mutably at once.
    ///
    /// Returns `None` if the indices are equal or either one is stale.
    pub fn get_pair_mut(
        &mut self,
        a: GenerationalIndex,
        b: GenerationalIndex,
    ) -> Option<(&mut T, &mut T)> {
        if a.index == b.index || !self.contains(a) || !self.contains(b) {
            return None;
        }

        let (low, high, swapped) = if a.index < b.index {
            (a.index, b.index, false)
        } else {
            (b.index, a.index, true)
        };
        let (head, tail) = self.storage.split_at_mut(high);
        let first = match &mut head[low].data {
            SlotData::Occupied(value) => value,
            SlotData::Free { .. } => return None,
        };
        let second = match &mut tail[0].data {
            SlotData::Occupied(value) => value,
            SlotData::Free { .. } => return None,
        };

        if swapped {
            Some((second, first))
        } else {
            Some((first, second))
        }
    }

    /// Releases the slot behind `idx` and hands its value back.
    ///
    /// The slot's generation is bumped, so every copy of `idx` goes stale.
    pub fn free(&mut self, idx: GenerationalIndex) -> Option<T> {
        if !self.contains(idx) {
            return None;
        }

        let slot = &mut self.storage[idx.index];
        let data = core::mem::replace(
            &mut slot.data,
            SlotData::Free {
                next_free: self.free_head,
            },
        );
        slot.generation = slot.generation.wrapping_add(1);
        self.free_head = Some(idx.index);
        self.len -= 1;

        match data {
            SlotData::Occupied(value) => Some(value),
            SlotData::Free { .. } => None,
        }
    }

    /// Returns true if `idx` still refers to a live value.
    pub fn contains(&self, idx: GenerationalIndex) -> bool {
        self.get(idx).is_some()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no value is live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value.
    ///
    /// Slots are kept and their generations bumped, so indices issued before
    /// the clear stay stale after the slots are reused.
    pub fn clear(&mut self) {
        let mut next_free = None;
        for (idx, slot) in self.storage.iter_mut().enumerate().rev() {
            if matches!(slot.data, SlotData::Occupied(_)) {
                slot.generation = slot.generation.wrapping_add(1);
            }
            slot.data = SlotData::Free { next_free };
            next_free = Some(idx);
        }
        self.free_head = next_free;
        self.len = 0;
    }
}

impl<T> Default for GenerationalPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<GenerationalIndex> for GenerationalPool<T> {
    type Output = T;

    fn index(&self, idx: GenerationalIndex) -> &T {
        match self.get(idx) {
            Some(value) => value,
            None => panic!("stale generational index {idx:?}"),
        }
    }
}

impl<T> IndexMut<GenerationalIndex> for GenerationalPool<T> {
    fn index_mut(&mut self, idx: GenerationalIndex) -> &mut T {
        match self.get_mut(idx) {
            Some(value) => value,
            None => panic!("stale generational index {idx:?}"),
        }
    }
}

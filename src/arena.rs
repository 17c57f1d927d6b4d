//! Insertion-ordered entity storage with stable handles.
//!
//! Handles are allocated from a monotonically increasing counter and never
//! reused, so the backing vector stays sorted by id. Removal compacts the
//! vector, which keeps iteration in insertion order and lets lookups use a
//! binary search.

/// Stable handle to an entity inside one [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct Arena<T> {
    next_id: u64,
    slots: Vec<(EntityId, T)>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena {
            next_id: 0,
            slots: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.slots.push((id, value));
        id
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |(slot, _)| *slot).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.position(id).map(|i| &self.slots[i].1)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.position(id).map(move |i| &mut self.slots[i].1)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.position(id).map(|i| self.slots.remove(i).1)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(EntityId, &T) -> bool) {
        self.slots.retain(|(id, value)| keep(*id, value));
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots.iter().map(|(id, value)| (*id, value))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().map(|(_, value)| value)
    }

    /// Snapshot of the current handles, for passes that mutate while walking.
    pub fn ids(&self) -> Vec<EntityId> {
        self.slots.iter().map(|(id, _)| *id).collect()
    }
}

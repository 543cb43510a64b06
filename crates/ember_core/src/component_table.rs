use rustc_hash::FxHashMap;

use crate::ids::EntityId;

/// Sparse per-entity component storage.
///
/// Components are packed densely for iteration; an `FxHashMap` maps entities
/// to their dense slot. Removal swaps the last component into the vacated
/// slot, so iteration order is insertion order until the first removal.
#[derive(Debug, Clone)]
pub struct ComponentTable<T> {
    entities: Vec<EntityId>,
    components: Vec<T>,
    lookup: FxHashMap<EntityId, usize>,
}

impl<T> Default for ComponentTable<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            components: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }
}

impl<T> ComponentTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component. Returns `false` and leaves the existing component
    /// untouched if the entity already has one.
    pub fn insert(&mut self, entity: EntityId, component: T) -> bool {
        if self.lookup.contains_key(&entity) {
            log::debug!("{entity} already has a component; keeping the existing one");
            return false;
        }
        self.lookup.insert(entity, self.components.len());
        self.entities.push(entity);
        self.components.push(component);
        true
    }

    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        let index = self.lookup.remove(&entity)?;
        self.entities.swap_remove(index);
        let removed = self.components.swap_remove(index);
        if let Some(&moved) = self.entities.get(index) {
            self.lookup.insert(moved, index);
        }
        Some(removed)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.lookup.contains_key(&entity)
    }

    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&T> {
        let &index = self.lookup.get(&entity)?;
        self.components.get(index)
    }

    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        let &index = self.lookup.get(&entity)?;
        self.components.get_mut(index)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.entities.iter().copied().zip(self.components.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.entities.iter().copied().zip(self.components.iter_mut())
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.components.clear();
        self.lookup.clear();
    }
}

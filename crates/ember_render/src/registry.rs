use std::sync::Arc;

use ember_core::{TargetId, ViewId};
use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Views drawn into one target, in draw order.
pub type ViewList = SmallVec<[ViewId; 4]>;

#[derive(Debug, Clone)]
pub struct RenderableEntry {
    pub target: TargetId,
    pub views: ViewList,
}

/// Registry contents, ordered by first insertion.
#[derive(Debug, Default)]
pub struct Renderables {
    entries: Vec<RenderableEntry>,
    index: FxHashMap<TargetId, usize>,
}

impl Renderables {
    pub fn iter(&self) -> impl Iterator<Item = &RenderableEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Presentation targets and their view lists.
///
/// Cloning yields another handle to the same registry. Every access goes
/// through one mutex, which the dispatcher also holds for a whole render
/// pass, so mutation and dispatch never interleave.
#[derive(Debug, Clone, Default)]
pub struct RenderableRegistry {
    inner: Arc<Mutex<Renderables>>,
}

impl RenderableRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `target` or replaces its view list. A target keeps its
    /// position when updated.
    pub fn set(&self, target: TargetId, views: impl IntoIterator<Item = ViewId>) {
        let views: ViewList = views.into_iter().collect();
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        match state.index.get(&target) {
            Some(&slot) => state.entries[slot].views = views,
            None => {
                state.index.insert(target, state.entries.len());
                state.entries.push(RenderableEntry { target, views });
            }
        }
    }

    pub fn remove(&self, target: TargetId) -> bool {
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        let Some(slot) = state.index.remove(&target) else {
            return false;
        };
        state.entries.remove(slot);
        for entry in &state.entries[slot..] {
            if let Some(i) = state.index.get_mut(&entry.target) {
                *i -= 1;
            }
        }
        true
    }

    #[must_use]
    pub fn views_of(&self, target: TargetId) -> Option<ViewList> {
        let state = self.inner.lock();
        state.index.get(&target).map(|&slot| state.entries[slot].views.clone())
    }

    #[must_use]
    pub fn targets(&self) -> Vec<TargetId> {
        self.inner.lock().entries.iter().map(|e| e.target).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Locks the registry for the duration of the guard.
    pub fn lock(&self) -> MutexGuard<'_, Renderables> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_views_in_place() {
        let registry = RenderableRegistry::new();
        registry.set(TargetId(1), [ViewId(10)]);
        registry.set(TargetId(2), [ViewId(20)]);
        registry.set(TargetId(1), [ViewId(11), ViewId(12)]);

        assert_eq!(registry.targets(), vec![TargetId(1), TargetId(2)]);
        assert_eq!(
            registry.views_of(TargetId(1)).unwrap().as_slice(),
            &[ViewId(11), ViewId(12)]
        );
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let registry = RenderableRegistry::new();
        for id in 1..=3 {
            registry.set(TargetId(id), [ViewId(id)]);
        }
        assert!(registry.remove(TargetId(2)));
        assert!(!registry.remove(TargetId(2)));
        registry.set(TargetId(3), [ViewId(30)]);

        assert_eq!(registry.targets(), vec![TargetId(1), TargetId(3)]);
        assert_eq!(registry.views_of(TargetId(3)).unwrap().as_slice(), &[ViewId(30)]);
    }
}

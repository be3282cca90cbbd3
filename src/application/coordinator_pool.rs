// Ordered set of refresh coordinators, one per tracked server
use crate::application::refresh_coordinator::RefreshCoordinator;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Default)]
pub struct CoordinatorPool {
    entries: RwLock<Vec<Arc<RefreshCoordinator>>>,
}

impl CoordinatorPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coordinator, replacing any existing one with the same id.
    pub fn insert(&self, coordinator: Arc<RefreshCoordinator>) {
        let mut entries = self.write();
        let id = coordinator.id();
        match entries.iter().position(|c| c.id() == id) {
            Some(index) => entries[index] = coordinator,
            None => entries.push(coordinator),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<RefreshCoordinator>> {
        self.read().iter().find(|c| c.id() == id).cloned()
    }

    pub fn remove(&self, id: Uuid) -> Option<Arc<RefreshCoordinator>> {
        let mut entries = self.write();
        let index = entries.iter().position(|c| c.id() == id)?;
        Some(entries.remove(index))
    }

    /// Reorder to follow `ids`; coordinators not listed keep their relative
    /// order at the end.
    pub fn reorder(&self, ids: &[Uuid]) {
        let mut entries = self.write();
        entries.sort_by_key(|c| ids.iter().position(|id| *id == c.id()).unwrap_or(usize::MAX));
    }

    pub fn snapshot(&self) -> Vec<Arc<RefreshCoordinator>> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Arc<RefreshCoordinator>>> {
        match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Arc<RefreshCoordinator>>> {
        match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

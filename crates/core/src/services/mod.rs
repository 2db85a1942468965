pub mod insights_service;
pub mod position_service;
pub mod quote_service;
pub mod refresh_service;
pub mod spending_service;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::position::PositionStore;

// Every mutation of the store completes before its guard drops, so a
// poisoned lock still holds a consistent store.
pub(crate) fn read_store(store: &RwLock<PositionStore>) -> RwLockReadGuard<'_, PositionStore> {
    store.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_store(store: &RwLock<PositionStore>) -> RwLockWriteGuard<'_, PositionStore> {
    store.write().unwrap_or_else(PoisonError::into_inner)
}

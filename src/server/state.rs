use crate::dispatch::DriverRegistry;
use crate::fare::FareSchedule;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct AppState {
    pub registry: Mutex<DriverRegistry>,
    pub fares: FareSchedule,
}

impl AppState {
    pub fn new(registry: DriverRegistry, fares: FareSchedule) -> Self {
        Self {
            registry: Mutex::new(registry),
            fares,
        }
    }

    /// Registry calls never leave it half-updated, so a poisoned lock is still usable.
    pub fn registry(&self) -> MutexGuard<'_, DriverRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

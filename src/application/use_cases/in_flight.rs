use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Registration ids with a status update currently on its way to the gateway.
///
/// Clones share one set, so every dashboard built from the same handle sees
/// the same in-flight updates.
#[derive(Clone, Default)]
pub struct InFlightUpdates {
    ids: Arc<Mutex<HashSet<String>>>,
}

impl InFlightUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `registration_id` as in flight until the returned claim drops.
    ///
    /// Returns `None` if an update for it is already in flight.
    pub fn claim(&self, registration_id: &str) -> Option<UpdateClaim> {
        if !self.lock().insert(registration_id.to_string()) {
            return None;
        }
        Some(UpdateClaim {
            ids: Arc::clone(&self.ids),
            registration_id: registration_id.to_string(),
        })
    }

    pub fn contains(&self, registration_id: &str) -> bool {
        self.lock().contains(registration_id)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases its registration on drop, including when the owning request is
/// cancelled mid-update.
#[derive(Debug)]
pub struct UpdateClaim {
    ids: Arc<Mutex<HashSet<String>>>,
    registration_id: String,
}

impl Drop for UpdateClaim {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.registration_id);
    }
}

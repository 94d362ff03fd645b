//! Availability gate: armed with backends, or disabled for docs-only deployments.

use crate::backend::CacheBackend;
use crate::error::{Error, Result};
use crate::index::SearchIndex;
use crate::repository::CacheAsideRepository;
use std::sync::Arc;

/// Process-wide backend availability, fixed at construction.
///
/// A disabled gate holds no repository, so no code path can reach a backend
/// through it. Clones share the same repository.
pub enum AvailabilityGate<B: CacheBackend, I: SearchIndex> {
    Armed(Arc<CacheAsideRepository<B, I>>),
    Disabled,
}

impl<B: CacheBackend, I: SearchIndex> AvailabilityGate<B, I> {
    pub fn armed(repository: CacheAsideRepository<B, I>) -> Self {
        AvailabilityGate::Armed(Arc::new(repository))
    }

    pub fn disabled() -> Self {
        AvailabilityGate::Disabled
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, AvailabilityGate::Armed(_))
    }

    /// The repository behind an armed gate.
    ///
    /// # Errors
    /// Returns `Error::BackendDisabled` when the gate is disabled.
    pub fn repository(&self) -> Result<&CacheAsideRepository<B, I>> {
        match self {
            AvailabilityGate::Armed(repository) => Ok(repository.as_ref()),
            AvailabilityGate::Disabled => {
                debug!("Rejecting backend access: gate disabled");
                Err(Error::BackendDisabled)
            }
        }
    }
}

impl<B: CacheBackend, I: SearchIndex> Clone for AvailabilityGate<B, I> {
    fn clone(&self) -> Self {
        match self {
            AvailabilityGate::Armed(repository) => AvailabilityGate::Armed(Arc::clone(repository)),
            AvailabilityGate::Disabled => AvailabilityGate::Disabled,
        }
    }
}

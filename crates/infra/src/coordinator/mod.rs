//! Validate-then-write orchestration for relationship rows.
//!
//! A coordinator runs its existence checks in a fixed order, one round trip at
//! a time, then writes. The first failing step ends the request; nothing is
//! written before the final step, so there is nothing to compensate.
//!
//! ```text
//! request
//!   ↓
//! 1. existence check (first referenced entity)
//!   ↓
//! 2. existence check (second referenced entity)
//!   ↓
//! 3. duplicate check (relationship store)
//!   ↓
//! 4. write
//! ```

pub mod assignment;
pub mod enrollment;

use thiserror::Error;
use ums_core::EntityKind;

use crate::error::StoreError;
use crate::existence::{Existence, UnknownPolicy};

pub use assignment::AssignmentCoordinator;
pub use enrollment::EnrollmentCoordinator;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// A referenced entity does not verifiably exist.
    #[error("{0} not found")]
    NotFound(EntityKind),

    /// The owner could not answer and the policy is `Propagate`.
    #[error("{kind} existence could not be verified: {reason}")]
    Unverified { kind: EntityKind, reason: String },

    /// Reading or writing the relationship store failed.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

/// Turn an existence answer into a pass/fail for one protocol step.
pub(crate) fn require(
    kind: EntityKind,
    answer: Existence,
    policy: UnknownPolicy,
) -> Result<(), CoordinatorError> {
    match answer {
        Existence::Exists => Ok(()),
        Existence::Absent => Err(CoordinatorError::NotFound(kind)),
        Existence::Unknown(reason) => {
            tracing::warn!(entity = %kind, %reason, ?policy, "existence unknown");
            match policy {
                UnknownPolicy::TreatAsAbsent => Err(CoordinatorError::NotFound(kind)),
                UnknownPolicy::Propagate => Err(CoordinatorError::Unverified { kind, reason }),
            }
        }
    }
}

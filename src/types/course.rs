//! Course record types
//!
//! A course is created once, never removed, and mutated in place by the
//! lifecycle operations of the marketplace engine.

use super::identity::{Amount, CourseIndex, Identity, Proof};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a course
///
/// There is no "absent" state: a course that does not exist is simply not
/// present in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseState {
    /// Owned and usable; the only state from which activate/deactivate apply
    Purchased,

    /// Enabled by the platform admin
    Activated,

    /// Disabled by the platform admin; the owner may repurchase it
    Deactivated,
}

impl fmt::Display for CourseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CourseState::Purchased => "purchased",
            CourseState::Activated => "activated",
            CourseState::Deactivated => "deactivated",
        };
        f.write_str(name)
    }
}

/// A purchasable course record
///
/// The course hash is the record's key in the store and is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Sequential id assigned at creation, immutable
    pub id: CourseIndex,

    /// Price required to purchase the course
    pub price: Amount,

    /// Commitment checked against the buyer-supplied proof
    pub proof: Proof,

    /// Current holder of the course
    pub owner: Identity,

    /// Lifecycle state
    pub state: CourseState,
}

impl Course {
    /// Create a freshly registered course owned by its creator
    pub fn new(id: CourseIndex, price: Amount, proof: Proof, owner: Identity) -> Self {
        Course {
            id,
            price,
            proof,
            owner,
            state: CourseState::Purchased,
        }
    }
}

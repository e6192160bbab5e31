//! Operation types for the marketplace engine
//!
//! This module defines the operations a caller can submit, and the parsed
//! operation record that the processing pipelines feed into the engine.

use super::identity::{Amount, CourseHash, CourseId, CourseIndex, Identity, Proof};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations supported by the marketplace engine
///
/// The first five drive the course lifecycle; the rest are administrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Register a new course owned by the caller
    Create,

    /// Buy a course from its current owner, forwarding the payment to them
    Purchase,

    /// Re-price and reopen a deactivated course owned by the caller
    Repurchase,

    /// Admin: enable a purchased course
    Activate,

    /// Admin: disable a purchased course and zero its price
    Deactivate,

    /// Admin: pay out part of the treasury to the admin
    Withdraw,

    /// Admin, paused only: pay out the whole treasury to the admin
    EmergencyWithdraw,

    /// Admin, paused only: pay out the treasury and shut the system down
    SelfDestruct,

    /// Admin: pause the course lifecycle operations
    Stop,

    /// Admin: lift the pause
    Resume,

    /// Admin: hand the admin role to another identity
    TransferOwnership,
}

impl OperationKind {
    /// Parse an operation name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        let kind = match name.trim().to_lowercase().as_str() {
            "create" => OperationKind::Create,
            "purchase" => OperationKind::Purchase,
            "repurchase" => OperationKind::Repurchase,
            "activate" => OperationKind::Activate,
            "deactivate" => OperationKind::Deactivate,
            "withdraw" => OperationKind::Withdraw,
            "emergency_withdraw" => OperationKind::EmergencyWithdraw,
            "self_destruct" => OperationKind::SelfDestruct,
            "stop" => OperationKind::Stop,
            "resume" => OperationKind::Resume,
            "transfer_ownership" => OperationKind::TransferOwnership,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Purchase => "purchase",
            OperationKind::Repurchase => "repurchase",
            OperationKind::Activate => "activate",
            OperationKind::Deactivate => "deactivate",
            OperationKind::Withdraw => "withdraw",
            OperationKind::EmergencyWithdraw => "emergency_withdraw",
            OperationKind::SelfDestruct => "self_destruct",
            OperationKind::Stop => "stop",
            OperationKind::Resume => "resume",
            OperationKind::TransferOwnership => "transfer_ownership",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a course as written in an input row
///
/// Rows may address a course by its sequential index, by a 16-byte course id
/// (purchase), or by its full 32-byte hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseRef {
    Index(CourseIndex),
    Id(CourseId),
    Hash(CourseHash),
}

impl fmt::Display for CourseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseRef::Index(index) => write!(f, "#{}", index),
            CourseRef::Id(id) => write!(f, "{}", id),
            CourseRef::Hash(hash) => write!(f, "{}", hash),
        }
    }
}

/// Parsed operation record
///
/// Which optional fields are required depends on `kind`; the engine reports
/// a missing field when it dispatches the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    /// The operation to perform
    pub kind: OperationKind,

    /// Identity submitting the operation
    pub caller: Identity,

    /// Course the operation targets (lifecycle operations)
    pub course: Option<CourseRef>,

    /// Proof for create and purchase
    pub proof: Option<Proof>,

    /// Price (create), attached payment (purchase, repurchase) or withdrawal amount
    pub amount: Option<Amount>,

    /// New admin identity (transfer_ownership)
    pub target: Option<Identity>,
}

impl OperationRecord {
    /// Build a record with only the operation and caller set
    pub fn new(kind: OperationKind, caller: Identity) -> Self {
        OperationRecord {
            kind,
            caller,
            course: None,
            proof: None,
            amount: None,
            target: None,
        }
    }
}

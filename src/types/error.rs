//! Error types for the course marketplace engine
//!
//! This module defines all error types that can occur while processing
//! marketplace operations. Errors are designed to be descriptive and
//! user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **Input Errors**: Malformed CSV, unknown operations, bad hex values, missing fields
//! - **Lifecycle Errors**: Illegal transitions, unknown courses, ownership conflicts
//! - **Administrative Errors**: Wrong caller, wrong pause state
//! - **Payment Errors**: Underpayment, failed transfers, treasury shortfalls

use super::course::CourseState;
use super::identity::{Amount, CourseHash, CourseId, CourseIndex, Identity};
use thiserror::Error;

/// Failure reported by a funds-transfer capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The recipient refused the transfer
    #[error("recipient {to} rejected the transfer")]
    RecipientRejected {
        /// The refusing recipient
        to: Identity,
    },

    /// Crediting the recipient would overflow its balance
    #[error("balance overflow crediting {to}")]
    BalanceOverflow {
        /// The recipient whose balance would overflow
        to: Identity,
    },
}

/// Main error type for the marketplace engine
///
/// Every precondition violation has its own variant so callers can tell
/// them apart. Payment failures are kept distinct from validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketplaceError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Configuration file could not be parsed or is incomplete
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem
        message: String,
    },

    /// Unknown operation name in an input row
    #[error("Invalid operation '{op}'")]
    InvalidOperation {
        /// The unrecognised operation string
        op: String,
    },

    /// A field required by the operation is absent
    #[error("{operation} requires a {field}")]
    MissingField {
        /// Operation that needs the field
        operation: String,
        /// Name of the missing field
        field: String,
    },

    /// A hex value has the wrong length or alphabet
    #[error("Invalid hex value '{value}': expected {expected_len} bytes")]
    InvalidHex {
        /// The offending text
        value: String,
        /// Expected length in bytes
        expected_len: usize,
    },

    /// Amount is not a valid unsigned integer
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The offending text
        amount: String,
    },

    /// The course reference has the wrong form for the operation
    #[error("{operation} cannot address a course by '{reference}'")]
    InvalidCourseReference {
        /// Operation that received the reference
        operation: String,
        /// The reference as written
        reference: String,
    },

    /// The zero identity cannot own courses or the platform
    #[error("{operation} rejects the zero identity")]
    InvalidIdentity {
        /// Operation that received the zero identity
        operation: String,
    },

    /// A course already exists at the derived key, or the buyer already owns it
    #[error("Course {hash} already has an owner")]
    CourseHasOwner {
        /// Key of the course
        hash: CourseHash,
    },

    /// No course exists at the key
    #[error("Course {hash} is not created")]
    CourseIsNotCreated {
        /// Key that was looked up
        hash: CourseHash,
    },

    /// No course was ever registered at the sequential index
    #[error("No course registered at index {index}")]
    UnknownCourseIndex {
        /// The index that was looked up
        index: CourseIndex,
    },

    /// A course id could not be resolved to a registered course
    #[error("No course registered for course id {course_id}")]
    UnknownCourseId {
        /// The buyer-supplied id
        course_id: CourseId,
    },

    /// The transition is not legal from the course's current state
    #[error("Invalid state for {operation} on course {hash}: course is {state}")]
    InvalidState {
        /// Key of the course
        hash: CourseHash,
        /// Current state
        state: CourseState,
        /// Operation that was attempted
        operation: String,
    },

    /// Repurchase attempted by someone other than the owner
    #[error("Sender {sender} is not the owner of course {hash}")]
    SenderIsNotCourseOwner {
        /// Key of the course
        hash: CourseHash,
        /// The caller
        sender: Identity,
    },

    /// Administrative action attempted by a non-admin identity
    #[error("Only the owner can perform this action (caller {caller})")]
    OnlyOwner {
        /// The caller
        caller: Identity,
    },

    /// Operation rejected because the system is paused
    #[error("System is stopped")]
    SystemStopped,

    /// Operation requires the system to be paused
    #[error("System is not stopped")]
    SystemNotStopped,

    /// The system has been destroyed and accepts no further changes
    #[error("System has been destroyed")]
    SystemDestroyed,

    /// Attached payment is below the course price
    #[error("Insufficient payment for course {hash}: price {price}, paid {paid}")]
    InsufficientPayment {
        /// Key of the course
        hash: CourseHash,
        /// Course price
        price: Amount,
        /// Amount attached by the buyer
        paid: Amount,
    },

    /// Buyer-supplied proof does not match the course proof
    #[error("Proof mismatch for course {hash}")]
    ProofMismatch {
        /// Key of the course
        hash: CourseHash,
    },

    /// Record store already holds a record at the key
    #[error("Key collision at {hash}")]
    KeyCollision {
        /// The colliding key
        hash: CourseHash,
    },

    /// Record store was handed a record whose id is not the next id
    #[error("Course index out of sequence: expected {expected}, got {actual}")]
    IndexOutOfSequence {
        /// The next id the store would issue
        expected: CourseIndex,
        /// The id carried by the record
        actual: CourseIndex,
    },

    /// Treasury cannot cover a payout
    #[error("Insufficient balance: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// Current treasury balance
        balance: Amount,
        /// Requested payout
        requested: Amount,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// A funds transfer did not complete; the operation was rolled back
    #[error("Payment of {amount} to {to} failed: {source}")]
    PaymentFailed {
        /// Intended recipient
        to: Identity,
        /// Intended amount
        amount: Amount,
        /// Failure reported by the transfer capability
        #[source]
        source: TransferError,
    },
}

// Conversion from io::Error to MarketplaceError
impl From<std::io::Error> for MarketplaceError {
    fn from(error: std::io::Error) -> Self {
        MarketplaceError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to MarketplaceError
impl From<csv::Error> for MarketplaceError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        MarketplaceError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for MarketplaceError {
    fn from(error: toml::de::Error) -> Self {
        MarketplaceError::InvalidConfig {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl MarketplaceError {
    /// Create an InvalidHex error
    pub fn invalid_hex(value: &str, expected_len: usize) -> Self {
        MarketplaceError::InvalidHex {
            value: value.to_string(),
            expected_len,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        MarketplaceError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an InvalidOperation error
    pub fn invalid_operation(op: &str) -> Self {
        MarketplaceError::InvalidOperation { op: op.to_string() }
    }

    /// Create a MissingField error
    pub fn missing_field(operation: &str, field: &str) -> Self {
        MarketplaceError::MissingField {
            operation: operation.to_string(),
            field: field.to_string(),
        }
    }

    /// Create an InvalidCourseReference error
    pub fn invalid_course_reference(operation: &str, reference: &str) -> Self {
        MarketplaceError::InvalidCourseReference {
            operation: operation.to_string(),
            reference: reference.to_string(),
        }
    }

    /// Create an InvalidIdentity error
    pub fn invalid_identity(operation: &str) -> Self {
        MarketplaceError::InvalidIdentity {
            operation: operation.to_string(),
        }
    }

    /// Create an InvalidState error
    pub fn invalid_state(hash: CourseHash, state: CourseState, operation: &str) -> Self {
        MarketplaceError::InvalidState {
            hash,
            state,
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        MarketplaceError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create a PaymentFailed error
    pub fn payment_failed(to: Identity, amount: Amount, source: TransferError) -> Self {
        MarketplaceError::PaymentFailed { to, amount, source }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        MarketplaceError::InvalidConfig {
            message: message.into(),
        }
    }
}

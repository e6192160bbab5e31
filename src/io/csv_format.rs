//! CSV format handling for operation records and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Course and account report serialization
//!
//! All functions are pure (no I/O beyond the supplied writer) for easy testing.

use crate::types::{
    Account, Amount, Course, CourseHash, CourseId, CourseRef, Identity, MarketplaceError,
    OperationKind, OperationRecord, Proof,
};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: op, caller, course, proof, amount, target.
/// Every column after `caller` is optional because most operations only use a
/// few of them; trailing columns may be left out entirely.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    pub op: String,
    pub caller: String,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub proof: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Convert a CsvRecord to an OperationRecord
///
/// This function:
/// - Parses the operation name into an OperationKind
/// - Parses identities, course references and proofs from hex
/// - Parses the amount as an unsigned integer
///
/// Whether the fields a given operation needs are present is checked when the
/// engine dispatches the record, not here.
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(OperationRecord) - Successfully converted record
/// - Err(MarketplaceError) - The first field that failed to parse
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<OperationRecord, MarketplaceError> {
    let kind = OperationKind::parse(&csv_record.op)
        .ok_or_else(|| MarketplaceError::invalid_operation(&csv_record.op))?;

    let caller: Identity = csv_record.caller.trim().parse()?;

    let course = non_empty(csv_record.course)
        .map(|value| parse_course_ref(kind, &value))
        .transpose()?;

    let proof = non_empty(csv_record.proof)
        .map(|value| value.parse::<Proof>())
        .transpose()?;

    let amount = non_empty(csv_record.amount)
        .map(|value| parse_amount(&value))
        .transpose()?;

    let target = non_empty(csv_record.target)
        .map(|value| value.parse::<Identity>())
        .transpose()?;

    Ok(OperationRecord {
        kind,
        caller,
        course,
        proof,
        amount,
        target,
    })
}

/// Parse the `course` column
///
/// Hex input is a course id when it holds 16 bytes and a course hash when it
/// holds 32, with or without the `0x` prefix. Any other run of decimal digits
/// is a sequential index.
pub fn parse_course_ref(kind: OperationKind, value: &str) -> Result<CourseRef, MarketplaceError> {
    let value = value.trim();

    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    match digits.len() {
        len if len == CourseId::LEN * 2 => value.parse().map(CourseRef::Id),
        len if len == CourseHash::LEN * 2 => value.parse().map(CourseRef::Hash),
        _ if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
            value
                .parse()
                .map(CourseRef::Index)
                .map_err(|_| MarketplaceError::invalid_course_reference(kind.as_str(), value))
        }
        _ => Err(MarketplaceError::invalid_course_reference(
            kind.as_str(),
            value,
        )),
    }
}

fn parse_amount(value: &str) -> Result<Amount, MarketplaceError> {
    value
        .parse::<Amount>()
        .map_err(|_| MarketplaceError::invalid_amount(value))
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Write course records to CSV format
///
/// Writes courses with columns: index, hash, owner, price, state.
/// Courses are written in the order given, which callers keep as id order.
///
/// # Arguments
///
/// * `courses` - Course keys paired with their records
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Errors
///
/// Returns `IoError` if a write error occurred.
pub fn write_courses_csv(
    courses: &[(CourseHash, &Course)],
    output: &mut dyn Write,
) -> Result<(), MarketplaceError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["index", "hash", "owner", "price", "state"])?;

    for (hash, course) in courses {
        writer.write_record(&[
            course.id.to_string(),
            hash.to_string(),
            course.owner.to_string(),
            course.price.to_string(),
            course.state.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write account balances to CSV format
///
/// Writes accounts with columns: identity, balance.
/// Accounts are sorted by identity for deterministic output.
///
/// # Errors
///
/// Returns `IoError` if a write error occurred.
pub fn write_accounts_csv(
    accounts: &[&Account],
    output: &mut dyn Write,
) -> Result<(), MarketplaceError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["identity", "balance"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.identity);

    for account in sorted_accounts {
        writer.write_record(&[account.identity.to_string(), account.balance.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

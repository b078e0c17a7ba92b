//! Row structs and write DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` struct matching the database row, with enum columns kept
//!   as text
//! - A `TryFrom` conversion into the `editoria_core` domain type
//! - `Deserialize` DTOs for the writes the API exposes
//!
//! Conversions fail with [`CoreError::Internal`] when a stored value does
//! not parse: bad rows are a data problem, not a caller problem.

use std::str::FromStr;

use editoria_core::error::CoreError;
use editoria_core::types::DbId;

pub mod calendar;
pub mod content;
pub mod media;
pub mod rule;
pub mod theme;

/// Parse a required text column into a closed enum.
pub(crate) fn parse_column<T>(table: &str, id: DbId, value: &str) -> Result<T, CoreError>
where
    T: FromStr<Err = CoreError>,
{
    value
        .parse()
        .map_err(|e| CoreError::Internal(format!("{table} row {id}: {e}")))
}

/// Parse a nullable text column into a closed enum.
pub(crate) fn parse_optional<T>(
    table: &str,
    id: DbId,
    value: Option<&str>,
) -> Result<Option<T>, CoreError>
where
    T: FromStr<Err = CoreError>,
{
    value.map(|v| parse_column(table, id, v)).transpose()
}

/// Convert a batch of rows, failing on the first bad one.
pub fn into_domain<R, T>(rows: Vec<R>) -> Result<Vec<T>, CoreError>
where
    T: TryFrom<R, Error = CoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

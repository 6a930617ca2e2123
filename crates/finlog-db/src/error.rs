//! sqlx error conversion and column codecs

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use finlog_core::Error;

/// Map a driver error onto the shared taxonomy.
///
/// Unique-constraint violations become conflicts; everything else is a
/// database error whose detail stays server side.
pub fn database_error(err: sqlx::Error) -> Error {
	match &err {
		sqlx::Error::RowNotFound => Error::NotFound("Record not found".to_string()),
		sqlx::Error::Database(db) if db.is_unique_violation() => {
			Error::Conflict("A record with the same unique value already exists".to_string())
		}
		_ => Error::Database(err.to_string()),
	}
}

pub(crate) fn now() -> DateTime<Utc> {
	Utc::now()
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
	ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, Error> {
	DateTime::parse_from_rfc3339(raw)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| Error::Database(format!("invalid timestamp in {column}: {e}")))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
	date.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(column: &str, raw: &str) -> Result<NaiveDate, Error> {
	NaiveDate::parse_from_str(raw, "%Y-%m-%d")
		.map_err(|e| Error::Database(format!("invalid date in {column}: {e}")))
}

/// Parse an enum column, treating unknown values as corrupt data
pub(crate) fn parse_column<T: std::str::FromStr>(column: &str, raw: &str) -> Result<T, Error> {
	raw.parse::<T>()
		.map_err(|_| Error::Database(format!("unexpected value in {column}: {raw}")))
}

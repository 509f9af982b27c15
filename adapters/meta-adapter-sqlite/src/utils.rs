//! Shared utilities for SQLite adapter
//!
//! Helper functions, macros, and error mapping used across all domain modules.

use credvault_types::prelude::*;
use credvault_types::types::ItemSearch;
use sqlx::sqlite::SqliteRow;

/// Applies a Patch field to an UPDATE query.
/// Returns true if the field was added (for tracking has_updates)
macro_rules! push_patch {
	($query:expr, $has_updates:expr, $field:literal, $patch:expr) => {{
		match $patch {
			Patch::Undefined => $has_updates,
			Patch::Null => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=NULL"));
				true
			}
			Patch::Value(v) => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=")).push_bind(&**v);
				true
			}
		}
	}};
}

pub(crate) use push_patch;

/// Build an IN clause with parameterized ids
pub(crate) fn push_in(query: &mut sqlx::QueryBuilder<'_, sqlx::Sqlite>, ids: &[ItemId]) {
	query.push("(");
	let mut separated = query.separated(", ");
	for id in ids {
		separated.push_bind(*id);
	}
	separated.push_unseparated(")");
}

/// Appends LIMIT/OFFSET of a search. A zero count means no limit.
pub(crate) fn push_limit(query: &mut sqlx::QueryBuilder<'_, sqlx::Sqlite>, search: &ItemSearch) {
	let count = if search.limit_count == 0 { -1 } else { i64::from(search.limit_count) };
	query.push(" LIMIT ").push_bind(count);
	query.push(" OFFSET ").push_bind(i64::from(search.limit_start));
}

/// `%term%` pattern for `LIKE ... ESCAPE '\'`
pub(crate) fn like_pattern(term: &str) -> String {
	let mut res = String::with_capacity(term.len() + 2);
	res.push('%');
	for c in term.chars() {
		if matches!(c, '%' | '_' | '\\') {
			res.push('\\');
		}
		res.push(c);
	}
	res.push('%');
	res
}

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Translates a failed write, unique constraint violations become conflicts
pub(crate) fn write_err(err: sqlx::Error) -> Error {
	if err.as_database_error().is_some_and(sqlx::error::DatabaseError::is_unique_violation) {
		return Error::Conflict("name already exists".into());
	}
	inspect(&err);
	Error::DbError
}

/// Map a single-row query result, translating SQL errors to ClResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Collect an iterator of query results, translating errors
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>>,
) -> ClResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Decodes a JSON column
pub(crate) fn json_col<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, sqlx::Error> {
	serde_json::from_str(value).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_like_pattern() {
		assert_eq!(like_pattern("adm"), "%adm%");
		assert_eq!(like_pattern("50%_x"), "%50\\%\\_x%");
	}
}

// vim: ts=4

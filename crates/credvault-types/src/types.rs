//! Common types used throughout credvault.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Database row identifier
pub type ItemId = i64;

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(res.as_secs() as i64)
	}

	pub fn add_seconds(&self, seconds: i64) -> Timestamp {
		Timestamp(self.0 + seconds)
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

// Patch //
//*******//
/// Field of a partial update: absent, explicitly cleared, or set
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
	T: Deserialize<'de>,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(match Option::<T>::deserialize(deserializer)? {
			Some(v) => Patch::Value(v),
			None => Patch::Null,
		})
	}
}

// Search //
//********//
/// Paged free-text search over a list of items
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSearch {
	#[serde(default, alias = "q")]
	pub search: String,
	#[serde(default, alias = "offset")]
	pub limit_start: u32,
	#[serde(default, alias = "limit")]
	pub limit_count: u32,
}

impl ItemSearch {
	pub fn new(search: impl Into<String>, limit_start: u32, limit_count: u32) -> Self {
		Self { search: search.into(), limit_start, limit_count }
	}

	/// Search term with surrounding whitespace removed, `None` if empty
	pub fn term(&self) -> Option<&str> {
		let term = self.search.trim();
		if term.is_empty() { None } else { Some(term) }
	}
}

/// A page of rows plus the number of rows matching without paging
#[derive(Clone, Debug, Serialize)]
pub struct QueryResult<T> {
	pub items: Vec<T>,
	pub total: u64,
}

impl<T> QueryResult<T> {
	pub fn new(items: Vec<T>, total: u64) -> Self {
		Self { items, total }
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

// API response //
//**************//
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	pub offset: usize,
	pub limit: usize,
	pub total: u64,
}

/// Envelope of every successful API response
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pagination: Option<Pagination>,
	pub time: Timestamp,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, pagination: None, time: Timestamp::now() }
	}

	pub fn with_pagination(data: T, offset: usize, limit: usize, total: u64) -> Self {
		Self { data, pagination: Some(Pagination { offset, limit, total }), time: Timestamp::now() }
	}
}


// vim: ts=4

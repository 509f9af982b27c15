//! Data grid view model
//!
//! The front end renders management tables from this structure: column
//! headers, rows projected from the item records, the per-row and bulk
//! actions, and the pager.

use serde::Serialize;
use serde_json::Value;
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;

use crate::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Icon {
	pub name: Box<str>,
	pub title: Box<str>,
	pub class: Option<Box<str>>,
}

impl Icon {
	pub fn new(name: &str, title: &str) -> Self {
		Self { name: name.into(), title: title.into(), class: None }
	}

	pub fn add() -> Self {
		Self::new("add", "Add")
	}

	pub fn view() -> Self {
		Self::new("visibility", "View")
	}

	pub fn edit() -> Self {
		Self::new("mode_edit", "Edit")
	}

	pub fn delete() -> Self {
		Icon { class: Some("btn-delete".into()), ..Self::new("delete", "Delete") }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DataGridActionType {
	MenubarItem,
	SearchItem,
	ViewItem,
	EditItem,
	DeleteItem,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGridAction {
	pub id: Box<str>,
	#[serde(rename = "type")]
	pub typ: DataGridActionType,
	pub name: Box<str>,
	pub title: Box<str>,
	pub icon: Option<Icon>,
	/// Not rendered on rows, only in the menu bar
	pub skip: bool,
	pub on_click: Option<Box<str>>,
	pub data: BTreeMap<Box<str>, Box<str>>,
}

impl DataGridAction {
	pub fn new(id: &str, typ: DataGridActionType, name: &str) -> Self {
		Self {
			id: id.into(),
			typ,
			name: name.into(),
			title: name.into(),
			icon: None,
			skip: false,
			on_click: None,
			data: BTreeMap::new(),
		}
	}

	pub fn with_title(mut self, title: &str) -> Self {
		self.title = title.into();
		self
	}

	pub fn with_icon(mut self, icon: Icon) -> Self {
		self.icon = Some(icon);
		self
	}

	pub fn with_skip(mut self, skip: bool) -> Self {
		self.skip = skip;
		self
	}

	pub fn with_on_click(mut self, func: &str) -> Self {
		self.on_click = Some(func.into());
		self
	}

	pub fn with_data(mut self, key: &str, value: &str) -> Self {
		self.data.insert(key.into(), value.into());
		self
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGridActionSearch {
	#[serde(flatten)]
	pub action: DataGridAction,
	pub on_submit: Box<str>,
}

impl DataGridActionSearch {
	pub fn new(id: &str, name: &str, title: &str, on_submit: &str) -> Self {
		Self {
			action: DataGridAction::new(id, DataGridActionType::SearchItem, name).with_title(title),
			on_submit: on_submit.into(),
		}
	}
}

/// Ordered column titles
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DataGridHeader(pub Vec<Box<str>>);

impl DataGridHeader {
	pub fn add_header(&mut self, title: &str) -> &mut Self {
		self.0.push(title.into());
		self
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataGridRow {
	pub id: Value,
	pub cells: Vec<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGridData {
	pub row_source_id: Box<str>,
	pub row_sources: Vec<Box<str>>,
	pub rows: Vec<DataGridRow>,
}

impl DataGridData {
	pub fn new(row_source_id: &str) -> Self {
		Self { row_source_id: row_source_id.into(), ..Self::default() }
	}

	pub fn add_row_source(&mut self, field: &str) -> &mut Self {
		self.row_sources.push(field.into());
		self
	}

	/// Projects the items into rows, one cell per row source. Missing fields
	/// become `null` cells.
	pub fn set_data<T: Serialize>(&mut self, items: &[T]) -> ClResult<()> {
		let mut rows = Vec::with_capacity(items.len());
		for item in items {
			let value = serde_json::to_value(item)?;
			let Value::Object(obj) = value else {
				return Err(Error::Internal("grid rows must be objects".into()));
			};
			let field = |name: &str| obj.get(name).cloned().unwrap_or(Value::Null);
			rows.push(DataGridRow {
				id: field(&self.row_source_id),
				cells: self.row_sources.iter().map(|name| field(name)).collect(),
			});
		}
		self.rows = rows;
		Ok(())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGridPager {
	pub sort_key: u32,
	pub limit_start: u32,
	pub limit_count: u32,
	pub total: u64,
	pub on_click: Box<str>,
	/// Id of the search action whose form holds the filter
	pub source_action: Box<str>,
	pub filter_on: bool,
}

impl DataGridPager {
	pub fn last_page(&self) -> u32 {
		if self.limit_count == 0 || self.total == 0 {
			return 0;
		}
		((self.total - 1) / u64::from(self.limit_count)) as u32
	}

	pub fn current_page(&self) -> u32 {
		if self.limit_count == 0 { 0 } else { self.limit_start / self.limit_count }
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGridTab {
	pub id: Box<str>,
	pub title: Box<str>,
	pub row_template: Box<str>,
	pub pager_template: Box<str>,
	pub header: DataGridHeader,
	pub data: DataGridData,
	pub actions: Vec<DataGridAction>,
	pub actions_selected: Vec<DataGridAction>,
	pub search: Option<DataGridActionSearch>,
	pub pager: Option<DataGridPager>,
	/// Seconds spent building the grid
	pub time: f64,
}

impl DataGridTab {
	pub fn new(id: &str, title: &str) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			row_template: "datagrid-rows".into(),
			pager_template: "datagrid-nav-full".into(),
			header: DataGridHeader::default(),
			data: DataGridData::default(),
			actions: Vec::new(),
			actions_selected: Vec::new(),
			search: None,
			pager: None,
			time: 0.0,
		}
	}

	/// Adds a row/menu action, or a bulk action applied to the selected rows
	pub fn add_action(&mut self, action: DataGridAction, on_selection: bool) -> &mut Self {
		if on_selection {
			self.actions_selected.push(action);
		} else {
			self.actions.push(action);
		}
		self
	}

	pub fn set_time(&mut self, seconds: f64) -> &mut Self {
		self.time = (seconds * 100_000.0).round() / 100_000.0;
		self
	}
}


// vim: ts=4

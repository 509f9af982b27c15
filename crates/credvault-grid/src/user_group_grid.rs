//! Grid of the user group management page

use std::time::Instant;

use credvault_types::meta_adapter::UserGroup;
use credvault_types::types::{ItemSearch, QueryResult};

use crate::data_grid::*;
use crate::prelude::*;

pub const ACTION_SEARCH: &str = "userGroup/search";
pub const ACTION_CREATE: &str = "userGroup/create";
pub const ACTION_VIEW: &str = "userGroup/view";
pub const ACTION_EDIT: &str = "userGroup/edit";
pub const ACTION_DELETE: &str = "userGroup/delete";

const ROUTE: &str = "action-route";

#[derive(Debug)]
pub struct UserGroupGrid {
	query_time_start: Instant,
}

impl UserGroupGrid {
	/// `query_time_start` is when the request began, the grid reports the
	/// time elapsed since then
	pub fn new(query_time_start: Instant) -> Self {
		Self { query_time_start }
	}

	pub fn get_grid(
		&self,
		query_result: &QueryResult<UserGroup>,
		search: &ItemSearch,
	) -> ClResult<DataGridTab> {
		let mut grid = DataGridTab::new("tblGroups", "Groups");
		grid.header.add_header("Name").add_header("Description");

		let mut data = DataGridData::new("id");
		data.add_row_source("name").add_row_source("description");
		data.set_data(&query_result.items)?;
		grid.data = data;

		let search_action = Self::search_action();
		grid.pager = Some(DataGridPager {
			sort_key: 0,
			limit_start: search.limit_start,
			limit_count: search.limit_count,
			total: query_result.total,
			on_click: "appMgmt/nav".into(),
			source_action: search_action.action.id.clone(),
			filter_on: search.term().is_some(),
		});
		grid.search = Some(search_action);

		grid.add_action(Self::create_action(), false)
			.add_action(Self::view_action(), false)
			.add_action(Self::edit_action(), false)
			.add_action(Self::delete_action(), false)
			.add_action(Self::delete_action().with_title("Delete Selected"), true);

		grid.set_time(self.query_time_start.elapsed().as_secs_f64());
		Ok(grid)
	}

	fn search_action() -> DataGridActionSearch {
		let mut search =
			DataGridActionSearch::new(ACTION_SEARCH, "frmSearchGroup", "Search Group", "appMgmt/search");
		search.action.data.insert(ROUTE.into(), ACTION_SEARCH.into());
		search
	}

	fn create_action() -> DataGridAction {
		DataGridAction::new(ACTION_CREATE, DataGridActionType::MenubarItem, "New Group")
			.with_icon(Icon::add())
			.with_skip(true)
			.with_on_click("appMgmt/show")
			.with_data(ROUTE, ACTION_CREATE)
	}

	fn view_action() -> DataGridAction {
		DataGridAction::new(ACTION_VIEW, DataGridActionType::ViewItem, "View Group")
			.with_icon(Icon::view())
			.with_on_click("appMgmt/show")
			.with_data(ROUTE, ACTION_VIEW)
	}

	fn edit_action() -> DataGridAction {
		DataGridAction::new(ACTION_EDIT, DataGridActionType::EditItem, "Edit Group")
			.with_icon(Icon::edit())
			.with_on_click("appMgmt/show")
			.with_data(ROUTE, ACTION_EDIT)
	}

	fn delete_action() -> DataGridAction {
		DataGridAction::new(ACTION_DELETE, DataGridActionType::DeleteItem, "Delete Group")
			.with_icon(Icon::delete())
			.with_on_click("appMgmt/delete")
			.with_data(ROUTE, ACTION_DELETE)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn groups() -> QueryResult<UserGroup> {
		QueryResult::new(
			vec![
				UserGroup { id: 1, name: "Admins".into(), description: Some("IT staff".into()) },
				UserGroup { id: 2, name: "Support".into(), description: None },
			],
			12,
		)
	}

	#[test]
	fn test_grid_layout() {
		let grid = UserGroupGrid::new(Instant::now())
			.get_grid(&groups(), &ItemSearch::new("", 0, 2))
			.unwrap();

		assert_eq!(grid.id.as_ref(), "tblGroups");
		assert_eq!(grid.title.as_ref(), "Groups");
		let header: Vec<Box<str>> = vec!["Name".into(), "Description".into()];
		assert_eq!(grid.header.0, header);
		assert_eq!(grid.data.rows.len(), 2);
		assert_eq!(grid.data.rows[0].id, json!(1));
		assert_eq!(grid.data.rows[0].cells, vec![json!("Admins"), json!("IT staff")]);
		assert_eq!(grid.data.rows[1].cells[1], serde_json::Value::Null);
		assert!(grid.time >= 0.0);
	}

	#[test]
	fn test_grid_actions() {
		let grid = UserGroupGrid::new(Instant::now())
			.get_grid(&groups(), &ItemSearch::new("", 0, 2))
			.unwrap();

		let ids: Vec<&str> = grid.actions.iter().map(|a| a.id.as_ref()).collect();
		assert_eq!(ids, vec![ACTION_CREATE, ACTION_VIEW, ACTION_EDIT, ACTION_DELETE]);
		assert!(grid.actions[0].skip);
		assert_eq!(grid.actions[3].on_click.as_deref(), Some("appMgmt/delete"));

		assert_eq!(grid.actions_selected.len(), 1);
		assert_eq!(grid.actions_selected[0].title.as_ref(), "Delete Selected");
		assert_eq!(grid.actions_selected[0].typ, DataGridActionType::DeleteItem);

		let search = grid.search.unwrap();
		assert_eq!(search.action.name.as_ref(), "frmSearchGroup");
		assert_eq!(search.on_submit.as_ref(), "appMgmt/search");
	}

	#[test]
	fn test_grid_pager() {
		let grid = UserGroupGrid::new(Instant::now())
			.get_grid(&groups(), &ItemSearch::new("adm", 10, 2))
			.unwrap();

		let pager = grid.pager.unwrap();
		assert_eq!(pager.total, 12);
		assert_eq!(pager.limit_start, 10);
		assert_eq!(pager.on_click.as_ref(), "appMgmt/nav");
		assert_eq!(pager.source_action.as_ref(), ACTION_SEARCH);
		assert!(pager.filter_on);
		assert_eq!(pager.last_page(), 5);
	}
}

// vim: ts=4

//! Name search across every page and folder.

use crate::item::AppInfo;
use crate::pages::PageStore;

/// Apps whose name contains `query`, case-insensitively, in display order.
///
/// Folder members are searched too.  A blank query matches nothing: the
/// grid, not the result list, is shown when the search field is empty.
pub fn filter_apps<'a>(store: &'a PageStore, query: &str) -> Vec<&'a AppInfo> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    store
        .all_apps()
        .filter(|app| app.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{AppInfo, Folder, Item, ItemId};

    fn app(id: u64, name: &str) -> Item {
        Item::App(AppInfo {
            id: ItemId(id),
            name: name.into(),
            icon: String::new(),
            path: format!("/apps/{id}").into(),
            page_index: 0,
        })
    }

    fn sample() -> PageStore {
        let folder = Item::Folder(Folder {
            id: ItemId(10),
            name: "Office".into(),
            page_index: 0,
            apps: vec![
                app(3, "LibreOffice Writer").as_app().cloned().unwrap(),
                app(4, "Calculator").as_app().cloned().unwrap(),
            ],
        });
        PageStore::from_items(vec![app(1, "Firefox"), folder, app(2, "Files")], 2)
    }

    fn names(apps: Vec<&AppInfo>) -> Vec<&str> {
        apps.into_iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn case_insensitive_substring() {
        let store = sample();
        assert_eq!(names(filter_apps(&store, "FI")), vec!["Firefox", "Files"]);
    }

    #[test]
    fn searches_inside_folders() {
        let store = sample();
        assert_eq!(names(filter_apps(&store, "calc")), vec!["Calculator"]);
    }

    #[test]
    fn folder_names_are_not_results() {
        let store = sample();
        assert_eq!(names(filter_apps(&store, "office")), vec!["LibreOffice Writer"]);
    }

    #[test]
    fn blank_query_matches_nothing() {
        let store = sample();
        assert!(filter_apps(&store, "").is_empty());
        assert!(filter_apps(&store, "   ").is_empty());
    }
}

//! Table construction options.
//!
//! [`TableOptions`] enumerates every recognised option, callbacks included.
//! [`TableConfig`] is its plain-data subset, loadable from JSON.

use crate::bulk::BulkActionError;
use crate::error::Result;
use crate::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Bulk-delete callback: receives the selected records, reports completion.
pub type BulkDeleteFn<R> = Arc<dyn Fn(Vec<R>) -> std::result::Result<(), BulkActionError> + Send + Sync>;

/// Called with the selected records after every selection change.
pub type SelectionChangeFn<R> = Box<dyn FnMut(&[&R])>;

/// Called with the requested page in server-driven pagination.
pub type PageChangeFn = Box<dyn FnMut(usize)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Disabled,
    Multi,
}

/// Paging driven by the caller. Pages are zero-based.
pub struct ServerPagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub on_page_change: PageChangeFn,
}

impl ServerPagination {
    pub fn new<F>(current_page: usize, total_pages: usize, total_items: usize, page_size: usize, on_page_change: F) -> Self
    where
        F: FnMut(usize) + 'static,
    {
        Self {
            current_page,
            total_pages,
            total_items,
            page_size,
            on_page_change: Box::new(on_page_change),
        }
    }
}

impl fmt::Debug for ServerPagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerPagination")
            .field("current_page", &self.current_page)
            .field("total_pages", &self.total_pages)
            .field("total_items", &self.total_items)
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[derive(Debug)]
pub enum Pagination {
    /// The table slices the filtered rows itself.
    Client { page_size: usize },
    /// The data is one page; page changes go to the caller.
    Server(ServerPagination),
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::Client {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn is_server(&self) -> bool {
        matches!(self, Pagination::Server(_))
    }

    pub fn page_size(&self) -> usize {
        match self {
            Pagination::Client { page_size } => (*page_size).max(1),
            Pagination::Server(server) => server.page_size.max(1),
        }
    }
}

pub struct TableOptions<R> {
    /// Column the toolbar search filters on
    pub search_column: String,
    pub search_placeholder: String,
    pub empty_title: String,
    pub empty_message: String,
    pub selection: SelectionMode,
    /// Enables the bulk-action bar's delete control
    pub on_bulk_delete: Option<BulkDeleteFn<R>>,
    pub on_selection_change: Option<SelectionChangeFn<R>>,
    pub pagination: Pagination,
}

impl<R> Default for TableOptions<R> {
    fn default() -> Self {
        let config = TableConfig::default();
        Self {
            search_column: config.search_column,
            search_placeholder: config.search_placeholder,
            empty_title: config.empty_title,
            empty_message: config.empty_message,
            selection: config.selection,
            on_bulk_delete: None,
            on_selection_change: None,
            pagination: Pagination::Client {
                page_size: config.page_size,
            },
        }
    }
}

impl<R> TableOptions<R> {
    pub fn with_search_column(mut self, column: impl Into<String>) -> Self {
        self.search_column = column.into();
        self
    }

    pub fn with_search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    pub fn with_empty_state(mut self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.empty_title = title.into();
        self.empty_message = message.into();
        self
    }

    pub fn with_selection(mut self, mode: SelectionMode) -> Self {
        self.selection = mode;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pagination = Pagination::Client { page_size };
        self
    }

    pub fn with_server_pagination(mut self, server: ServerPagination) -> Self {
        self.pagination = Pagination::Server(server);
        self
    }

    pub fn on_bulk_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<R>) -> std::result::Result<(), BulkActionError> + Send + Sync + 'static,
    {
        self.on_bulk_delete = Some(Arc::new(f));
        self
    }

    pub fn on_selection_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[&R]) + 'static,
    {
        self.on_selection_change = Some(Box::new(f));
        self
    }
}

impl<R> fmt::Debug for TableOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("search_column", &self.search_column)
            .field("search_placeholder", &self.search_placeholder)
            .field("empty_title", &self.empty_title)
            .field("empty_message", &self.empty_message)
            .field("selection", &self.selection)
            .field("on_bulk_delete", &self.on_bulk_delete.is_some())
            .field("on_selection_change", &self.on_selection_change.is_some())
            .field("pagination", &self.pagination)
            .finish()
    }
}

/// Serializable table settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub search_column: String,
    pub search_placeholder: String,
    pub empty_title: String,
    pub empty_message: String,
    pub page_size: usize,
    pub selection: SelectionMode,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            search_column: "name".to_string(),
            search_placeholder: "Search...".to_string(),
            empty_title: "No results".to_string(),
            empty_message: "No rows match the current view.".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            selection: SelectionMode::Disabled,
        }
    }
}

impl TableConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Options carrying these settings, with no callbacks and client paging.
    pub fn into_options<R>(self) -> TableOptions<R> {
        TableOptions {
            search_column: self.search_column,
            search_placeholder: self.search_placeholder,
            empty_title: self.empty_title,
            empty_message: self.empty_message,
            selection: self.selection,
            on_bulk_delete: None,
            on_selection_change: None,
            pagination: Pagination::Client {
                page_size: self.page_size,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_search_the_name_column() {
        let options: TableOptions<()> = TableOptions::default();
        assert_eq!(options.search_column, "name");
        assert_eq!(options.pagination.page_size(), DEFAULT_PAGE_SIZE);
        assert!(options.on_bulk_delete.is_none());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: TableConfig =
            serde_json::from_str(r#"{ "page_size": 25, "selection": "multi" }"#).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.selection, SelectionMode::Multi);
        assert_eq!(config.search_column, "name");
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(Pagination::Client { page_size: 0 }.page_size(), 1);
    }
}

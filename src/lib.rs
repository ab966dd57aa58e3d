//! Dashtable - headless data-table engine for dashboard grids
//!
//! Renders a collection of caller-owned records as a searchable, sortable,
//! paginated grid with an optional multi-row selection workflow and a
//! confirmed bulk-delete action. The engine owns only ephemeral view state;
//! drawing is left to whichever front end consumes a [`TableFrame`].
//!
//! # Features
//!
//! - **Free-text search**: case-insensitive substring filter on one column
//! - **Sorting**: stable multi-key sort, toggled per column
//! - **Pagination**: local slicing, or delegation to a server-driven pager
//! - **Bulk selection**: select-all-filtered, deselect-all, confirmed delete
//! - **Terminal UI**: a ratatui front end driving the same engine
//!
//! # Example
//!
//! ```
//! use dashtable::{CellValue, ColumnDef, SelectionMode, TableOptions, TableView};
//!
//! #[derive(Clone)]
//! struct Station { id: i64, name: String }
//!
//! fn main() -> dashtable::Result<()> {
//!     let columns = vec![
//!         ColumnDef::new("id", "ID").accessor(|s: &Station| CellValue::Int(s.id)),
//!         ColumnDef::new("name", "Name").text(|s: &Station| s.name.clone()),
//!     ];
//!     let data = vec![
//!         Station { id: 1, name: "Harbour Point".into() },
//!         Station { id: 2, name: "Ridgeway".into() },
//!     ];
//!
//!     let mut view = TableView::new(
//!         columns,
//!         data,
//!         TableOptions::default().with_selection(SelectionMode::Multi),
//!     )?;
//!
//!     view.set_search("ridge");
//!     view.select_all_filtered();
//!     assert_eq!(view.selected_rows().len(), 1);
//!     println!("{}", view.frame().footer.summary());
//!     Ok(())
//! }
//! ```

pub mod bulk;
pub mod cell;
pub mod column;
pub mod dataset;
pub mod error;
pub mod frame;
pub mod logging;
pub mod options;
pub mod pipeline;
pub mod state;
pub mod tui;
pub mod view;

// Re-export main types
pub use bulk::{BulkActionError, BulkDeleteJob, BulkDeleteOutcome, BulkDeleteState, JobId};
pub use cell::CellValue;
pub use column::ColumnDef;
pub use error::{DashtableError, Result};
pub use frame::{
    Body, BulkBar, ColumnToggle, ConfirmPrompt, Footer, FrameRow, HeaderCell, SelectAll, TableFrame,
    Toolbar,
};
pub use options::{
    BulkDeleteFn, Pagination, SelectionChangeFn, SelectionMode, ServerPagination, TableConfig,
    TableOptions,
};
pub use state::{RowId, SortDirection, SortKey};
pub use view::TableView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rows per page when the caller does not pick a size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Terminal application configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Table options applied to whichever dataset is shown
    pub table: TableConfig,
    /// Log file path; `None` logs next to the executable
    pub log_file: Option<std::path::PathBuf>,
    /// Artificial latency added to each bulk delete, in milliseconds
    pub delete_latency_ms: u64,
    /// Event loop tick in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table: TableConfig {
                selection: SelectionMode::Multi,
                ..TableConfig::default()
            },
            log_file: None,
            delete_latency_ms: 400,
            tick_rate_ms: 50,
        }
    }
}

impl AppConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

//! Render model produced by [`TableView::frame`](crate::TableView::frame).
//!
//! Plain data, independent of any drawing library.

use crate::state::{RowId, SortDirection};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableFrame {
    pub toolbar: Toolbar,
    /// Whether rows carry a selection checkbox
    pub selectable: bool,
    pub select_all: SelectAll,
    pub header: Vec<HeaderCell>,
    pub body: Body,
    pub footer: Footer,
    /// Present exactly while the selection is non-empty
    pub bulk_bar: Option<BulkBar>,
    pub dialog: Option<ConfirmPrompt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toolbar {
    pub search_text: String,
    pub placeholder: String,
    /// False when no column could back the search input
    pub search_enabled: bool,
    pub columns: Vec<ColumnToggle>,
}

/// One entry of the column-visibility menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnToggle {
    pub id: String,
    pub header: String,
    pub visible: bool,
    pub hideable: bool,
}

/// Header checkbox state over the filtered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectAll {
    None,
    Some,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub column: String,
    pub label: String,
    pub sortable: bool,
    /// Direction and zero-based priority when sorted
    pub sort: Option<(SortDirection, usize)>,
    pub width: Option<u16>,
}

impl HeaderCell {
    /// Label with the sort arrow appended.
    pub fn title(&self) -> String {
        match self.sort {
            Some((direction, _)) => format!("{}{}", self.label, direction.indicator()),
            None => self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRow {
    pub id: RowId,
    pub selected: bool,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Rows(Vec<FrameRow>),
    Empty { title: String, message: String },
}

impl Body {
    pub fn rows(&self) -> &[FrameRow] {
        match self {
            Body::Rows(rows) => rows,
            Body::Empty { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footer {
    /// Rows on this page
    pub showing: usize,
    /// Filtered rows, or the server's item count
    pub total: usize,
    /// Zero-based
    pub page: usize,
    pub page_count: usize,
    pub can_prev: bool,
    pub can_next: bool,
    /// Selected rows, when selection is enabled
    pub selected: Option<usize>,
}

impl Footer {
    pub fn summary(&self) -> String {
        format!("Showing {} of {} rows", self.showing, self.total)
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page + 1, self.page_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkBar {
    pub selected: usize,
    pub delete_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfirmPrompt {
    pub count: usize,
    pub busy: bool,
}

impl ConfirmPrompt {
    pub fn message(&self) -> String {
        let noun = if self.count == 1 { "row" } else { "rows" };
        format!("Delete {} selected {}? This cannot be undone.", self.count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_text() {
        let footer = Footer {
            showing: 10,
            total: 42,
            page: 0,
            page_count: 5,
            can_prev: false,
            can_next: true,
            selected: None,
        };
        assert_eq!(footer.summary(), "Showing 10 of 42 rows");
        assert_eq!(footer.page_label(), "Page 1 of 5");
    }

    #[test]
    fn header_title_carries_arrow() {
        let cell = HeaderCell {
            column: "name".into(),
            label: "Name".into(),
            sortable: true,
            sort: Some((SortDirection::Descending, 0)),
            width: None,
        };
        assert_eq!(cell.title(), "Name \u{25BC}");
    }

    #[test]
    fn prompt_pluralises() {
        assert!(ConfirmPrompt { count: 1, busy: false }.message().contains("1 selected row?"));
        assert!(ConfirmPrompt { count: 3, busy: true }.message().contains("3 selected rows?"));
    }
}

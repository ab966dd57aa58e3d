//! Column descriptions.

use crate::cell::CellValue;
use std::fmt;
use std::sync::Arc;

/// Extracts the value of one column from a record.
pub type Accessor<R> = Arc<dyn Fn(&R) -> CellValue + Send + Sync>;

/// Renders a cell's display text, overriding the accessor's value.
pub type CellRenderer<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// How one field of a record is labelled, extracted and rendered.
///
/// A column without an accessor is presentational (checkbox, actions): it
/// cannot be searched, filtered or sorted.
pub struct ColumnDef<R> {
    id: String,
    header: String,
    accessor: Option<Accessor<R>>,
    cell: Option<CellRenderer<R>>,
    sortable: bool,
    hideable: bool,
    visible: bool,
    width: Option<u16>,
}

impl<R> ColumnDef<R> {
    /// A data column. Bind it with [`accessor`](Self::accessor) or
    /// [`text`](Self::text).
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: None,
            cell: None,
            sortable: true,
            hideable: true,
            visible: true,
            width: None,
        }
    }

    /// A presentational column, never hidden and never sorted.
    pub fn display(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            sortable: false,
            hideable: false,
            ..Self::new(id, header)
        }
    }

    pub fn accessor<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> CellValue + Send + Sync + 'static,
    {
        self.accessor = Some(Arc::new(f));
        self
    }

    /// Shortcut for a text-valued accessor.
    pub fn text<F>(self, f: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        self.accessor(move |r| CellValue::Text(f(r)))
    }

    pub fn cell<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(f));
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn hideable(mut self, hideable: bool) -> Self {
        self.hideable = hideable;
        self
    }

    /// Start hidden. Has no effect on non-hideable columns.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn width_hint(&self) -> Option<u16> {
        self.width
    }

    pub fn is_hideable(&self) -> bool {
        self.hideable
    }

    pub fn initially_visible(&self) -> bool {
        self.visible || !self.hideable
    }

    /// Bound to a record field rather than purely presentational.
    pub fn is_data_bound(&self) -> bool {
        self.accessor.is_some()
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable && self.accessor.is_some()
    }

    pub fn value(&self, record: &R) -> CellValue {
        self.accessor
            .as_ref()
            .map(|f| f(record))
            .unwrap_or_default()
    }

    /// Display text: the custom renderer if any, else the accessor's value.
    pub fn render(&self, record: &R) -> String {
        match &self.cell {
            Some(render) => render(record),
            None => self.value(record).to_string(),
        }
    }

    /// Text the search and column filters match against. Ignores the custom
    /// renderer so that decoration does not change what matches.
    pub fn search_text(&self, record: &R) -> Option<String> {
        self.accessor.as_ref().map(|f| f(record).to_string())
    }
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            cell: self.cell.clone(),
            sortable: self.sortable,
            hideable: self.hideable,
            visible: self.visible,
            width: self.width,
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("data_bound", &self.accessor.is_some())
            .field("custom_cell", &self.cell.is_some())
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .field("visible", &self.visible)
            .finish()
    }
}

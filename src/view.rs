//! The table engine.
//!
//! [`TableView`] owns the records handed to it plus all view state. Every
//! operation is synchronous; the only deferred work is a confirmed bulk
//! delete, which is handed back to the caller as a [`BulkDeleteJob`].

use crate::bulk::{BulkDeleteJob, BulkDeleteOutcome, BulkDeleteState, JobId};
use crate::column::ColumnDef;
use crate::error::{DashtableError, Result};
use crate::frame::{
    Body, BulkBar, ColumnToggle, ConfirmPrompt, Footer, FrameRow, HeaderCell, SelectAll,
    TableFrame, Toolbar,
};
use crate::options::{BulkDeleteFn, Pagination, SelectionChangeFn, SelectionMode, TableOptions};
use crate::pipeline::{apply_filter, apply_pagination, apply_sort, page_count};
use crate::state::{FilterState, RowId, SelectionState, SortKey, SortState, VisibilityState};
use std::collections::HashSet;
use std::fmt;

/// Pick the column backing the toolbar search.
///
/// The configured id wins if it names a data-bound column; otherwise the
/// first data-bound column; otherwise search is disabled.
pub fn resolve_search_column<R>(columns: &[ColumnDef<R>], configured: &str) -> Option<usize> {
    if let Some(i) = columns
        .iter()
        .position(|c| c.id() == configured && c.is_data_bound())
    {
        return Some(i);
    }

    match columns.iter().position(ColumnDef::is_data_bound) {
        Some(i) => {
            log::warn!(
                "search column '{}' not found, falling back to '{}'",
                configured,
                columns[i].id()
            );
            Some(i)
        }
        None => {
            log::warn!(
                "search column '{}' not found and no data-bound column exists; search disabled",
                configured
            );
            None
        }
    }
}

/// A searchable, sortable, paginated view over owned records, with
/// multi-row selection and a confirmed bulk delete.
pub struct TableView<R> {
    columns: Vec<ColumnDef<R>>,
    data: Vec<R>,

    // Options
    search_column: Option<usize>,
    search_placeholder: String,
    empty_title: String,
    empty_message: String,
    selection_mode: SelectionMode,
    on_bulk_delete: Option<BulkDeleteFn<R>>,
    on_selection_change: Option<SelectionChangeFn<R>>,
    pagination: Pagination,

    // View state
    search_text: String,
    sort: SortState,
    filters: FilterState,
    visibility: VisibilityState,
    selection: SelectionState,
    page: usize,
    bulk: BulkDeleteState,
    pending_count: usize,
    next_job: u64,

    /// Filtered then sorted, all pages
    rows: Vec<RowId>,
}

impl<R> TableView<R> {
    /// Fails on an empty column list or a repeated column id.
    pub fn new(columns: Vec<ColumnDef<R>>, data: Vec<R>, options: TableOptions<R>) -> Result<Self> {
        if columns.is_empty() {
            return Err(DashtableError::NoColumns);
        }
        {
            let mut seen = HashSet::new();
            for column in &columns {
                if !seen.insert(column.id()) {
                    return Err(DashtableError::DuplicateColumn(column.id().to_string()));
                }
            }
        }

        let mut visibility = VisibilityState::default();
        for column in &columns {
            visibility.set(column.id(), column.initially_visible());
        }

        let search_column = resolve_search_column(&columns, &options.search_column);

        let mut view = Self {
            columns,
            data,
            search_column,
            search_placeholder: options.search_placeholder,
            empty_title: options.empty_title,
            empty_message: options.empty_message,
            selection_mode: options.selection,
            on_bulk_delete: options.on_bulk_delete,
            on_selection_change: options.on_selection_change,
            pagination: options.pagination,
            search_text: String::new(),
            sort: SortState::default(),
            filters: FilterState::default(),
            visibility,
            selection: SelectionState::default(),
            page: 0,
            bulk: BulkDeleteState::Closed,
            pending_count: 0,
            next_job: 0,
            rows: Vec::new(),
        };
        view.refresh();
        Ok(view)
    }

    // --- Accessors ---

    /// Every column, visible or not, in definition order.
    pub fn columns(&self) -> &[ColumnDef<R>] {
        &self.columns
    }

    /// Records in data order; a `RowId` indexes this slice.
    pub fn data(&self) -> &[R] {
        &self.data
    }

    /// Record behind a row id, if the id is in range.
    pub fn record(&self, id: RowId) -> Option<&R> {
        self.data.get(id.0)
    }

    /// Every row passing the filters, sorted, across all pages.
    pub fn filtered_ids(&self) -> &[RowId] {
        &self.rows
    }

    /// Rows on the current page.
    pub fn page_ids(&self) -> &[RowId] {
        match &self.pagination {
            Pagination::Server(_) => &self.rows,
            Pagination::Client { .. } => {
                apply_pagination(&self.rows, self.page, self.pagination.page_size())
            }
        }
    }

    /// Records on the current page, in display order.
    pub fn page_records(&self) -> Vec<&R> {
        self.page_ids()
            .iter()
            .filter_map(|id| self.data.get(id.0))
            .collect()
    }

    /// True when the caller owns paging and delivers one page of data at a time.
    pub fn is_server_paginated(&self) -> bool {
        self.pagination.is_server()
    }

    fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id() == id)
    }

    // --- Data ---

    /// Replace every record. Row ids are reassigned, so the selection is
    /// cleared. A running bulk-delete job keeps the records it captured.
    pub fn set_data(&mut self, data: Vec<R>) {
        self.data = data;
        let had_selection = self.selection.clear();
        self.refresh();
        if had_selection {
            self.selection_changed();
        }
    }

    /// Recompute the filtered, sorted row list and restore the invariants
    /// that depend on it.
    fn refresh(&mut self) {
        self.rows = if self.pagination.is_server() {
            (0..self.data.len()).map(RowId).collect()
        } else {
            let mut rows = apply_filter(&self.data, &self.columns, &self.filters);
            apply_sort(&self.data, &self.columns, &mut rows, &self.sort);
            rows
        };

        let count = self.page_count();
        if self.page >= count {
            self.page = count - 1;
        }

        let mut passing = vec![false; self.data.len()];
        for id in &self.rows {
            passing[id.0] = true;
        }
        if self
            .selection
            .retain(|id| passing.get(id.0).copied().unwrap_or(false))
        {
            self.selection_changed();
        }
    }

    // --- Search & filters ---

    /// Column the search input filters, after fallback.
    pub fn search_column(&self) -> Option<&str> {
        self.search_column.map(|i| self.columns[i].id())
    }

    /// False when no column could back the search input.
    pub fn search_enabled(&self) -> bool {
        self.search_column.is_some()
    }

    /// Text typed into the search input.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Filter on the search column. Matching is a case-insensitive
    /// substring test; empty text shows every row again.
    pub fn set_search(&mut self, text: &str) {
        self.search_text = text.to_string();

        let Some(index) = self.search_column else {
            log::debug!("search ignored: no search column");
            return;
        };
        if self.pagination.is_server() {
            return;
        }

        let column = self.columns[index].id().to_string();
        if self.filters.set(&column, text) {
            self.page = 0;
            self.refresh();
        }
    }

    /// Filter any data-bound column. Returns false if the column cannot be
    /// filtered here.
    pub fn set_column_filter(&mut self, column: &str, text: &str) -> bool {
        if self.pagination.is_server() {
            return false;
        }
        match self.column_index(column) {
            Some(i) if self.columns[i].is_data_bound() => {}
            _ => {
                log::debug!("filter on '{}' ignored", column);
                return false;
            }
        }

        if Some(column) == self.search_column() {
            self.search_text = text.to_string();
        }
        if self.filters.set(column, text) {
            self.page = 0;
            self.refresh();
        }
        true
    }

    /// Filter text on one column, if any.
    pub fn column_filter(&self, column: &str) -> Option<&str> {
        self.filters.get(column)
    }

    /// Drop the search text and every column filter.
    pub fn clear_filters(&mut self) {
        self.search_text.clear();
        if self.filters.clear() {
            self.page = 0;
            self.refresh();
        }
    }

    // --- Sorting ---

    /// Active sort keys, primary first.
    pub fn sort_keys(&self) -> &[SortKey] {
        self.sort.keys()
    }

    fn can_sort(&self, column: &str) -> bool {
        if self.pagination.is_server() {
            return false;
        }
        let sortable = self
            .column_index(column)
            .is_some_and(|i| self.columns[i].is_sortable());
        if !sortable {
            log::debug!("sort on '{}' ignored", column);
        }
        sortable
    }

    /// Cycle none -> ascending -> descending on one column, replacing any
    /// other sort key.
    pub fn toggle_sort(&mut self, column: &str) -> bool {
        if !self.can_sort(column) {
            return false;
        }
        self.sort.toggle(column);
        self.refresh();
        true
    }

    /// Like [`toggle_sort`](Self::toggle_sort) but keeps the other keys.
    pub fn toggle_sort_multi(&mut self, column: &str) -> bool {
        if !self.can_sort(column) {
            return false;
        }
        self.sort.toggle_multi(column);
        self.refresh();
        true
    }

    /// Replace the sort keys; keys on unsortable columns are dropped.
    pub fn set_sort(&mut self, keys: Vec<SortKey>) {
        if self.pagination.is_server() {
            return;
        }
        let keys = keys
            .into_iter()
            .filter(|k| self.can_sort(&k.column))
            .collect();
        self.sort.set(keys);
        self.refresh();
    }

    /// Back to data order.
    pub fn clear_sort(&mut self) {
        if !self.sort.is_empty() {
            self.sort.clear();
            self.refresh();
        }
    }

    // --- Column visibility ---

    /// Unknown columns count as visible.
    pub fn is_column_visible(&self, column: &str) -> bool {
        self.visibility.is_visible(column)
    }

    /// Returns false for unknown columns and for hiding a fixed column.
    pub fn set_column_visible(&mut self, column: &str, visible: bool) -> bool {
        let Some(i) = self.column_index(column) else {
            return false;
        };
        if !visible && !self.columns[i].is_hideable() {
            log::debug!("column '{}' cannot be hidden", column);
            return false;
        }
        self.visibility.set(column, visible);
        true
    }

    /// Flip one column's visibility.
    pub fn toggle_column_visible(&mut self, column: &str) -> bool {
        let visible = self.is_column_visible(column);
        self.set_column_visible(column, !visible)
    }

    /// Visible columns in definition order.
    pub fn visible_columns(&self) -> Vec<&ColumnDef<R>> {
        self.columns
            .iter()
            .filter(|c| self.visibility.is_visible(c.id()))
            .collect()
    }

    // --- Selection ---

    /// True in multi-selection mode.
    pub fn selection_enabled(&self) -> bool {
        self.selection_mode == SelectionMode::Multi
    }

    /// Whether one row is selected.
    pub fn is_selected(&self, id: RowId) -> bool {
        self.selection.contains(id)
    }

    /// Selected row ids in ascending order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selection.iter().collect()
    }

    /// Selected records in data order.
    pub fn selected_rows(&self) -> Vec<&R> {
        self.selection
            .iter()
            .filter_map(|id| self.data.get(id.0))
            .collect()
    }

    fn selection_changed(&mut self) {
        if self.selection.is_empty() && self.bulk == BulkDeleteState::Confirming {
            self.bulk = BulkDeleteState::Closed;
        }
        if let Some(callback) = self.on_selection_change.as_mut() {
            let records: Vec<&R> = self
                .selection
                .iter()
                .filter_map(|id| self.data.get(id.0))
                .collect();
            callback(&records);
        }
    }

    /// Toggle one row. Rows outside the filtered set are ignored.
    pub fn toggle_row(&mut self, id: RowId) -> bool {
        if !self.selection_enabled() || !self.rows.contains(&id) {
            return false;
        }
        self.selection.toggle(id);
        self.selection_changed();
        true
    }

    /// Select every row passing the filters, on every page.
    pub fn select_all_filtered(&mut self) -> bool {
        if !self.selection_enabled() {
            return false;
        }
        if self.selection.replace(self.rows.iter().copied()) {
            self.selection_changed();
        }
        true
    }

    /// Select all filtered rows, or clear if they already are.
    pub fn toggle_all_filtered(&mut self) -> bool {
        if !self.rows.is_empty() && self.selection.len() == self.rows.len() {
            self.deselect_all()
        } else {
            self.select_all_filtered()
        }
    }

    /// Clear the selection. Returns false when selection is disabled.
    pub fn deselect_all(&mut self) -> bool {
        if !self.selection_enabled() {
            return false;
        }
        if self.selection.clear() {
            self.selection_changed();
        }
        true
    }

    // --- Pagination ---

    /// Zero-based current page.
    pub fn page(&self) -> usize {
        match &self.pagination {
            Pagination::Server(server) => server.current_page,
            Pagination::Client { .. } => self.page,
        }
    }

    /// Number of pages, never less than one.
    pub fn page_count(&self) -> usize {
        match &self.pagination {
            Pagination::Server(server) => server.total_pages.max(1),
            Pagination::Client { page_size } => page_count(self.rows.len(), *page_size),
        }
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.pagination.page_size()
    }

    /// A page before the current one exists.
    pub fn can_prev_page(&self) -> bool {
        self.page() > 0
    }

    /// A page after the current one exists.
    pub fn can_next_page(&self) -> bool {
        self.page() + 1 < self.page_count()
    }

    /// Client mode moves the local slice; server mode asks the caller for
    /// the page and leaves the rows alone.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page >= self.page_count() || page == self.page() {
            return false;
        }
        match &mut self.pagination {
            Pagination::Server(server) => (server.on_page_change)(page),
            Pagination::Client { .. } => self.page = page,
        }
        true
    }

    /// Move forward one page, if there is one.
    pub fn next_page(&mut self) -> bool {
        self.can_next_page() && self.set_page(self.page() + 1)
    }

    /// Move back one page, if there is one.
    pub fn prev_page(&mut self) -> bool {
        self.can_prev_page() && self.set_page(self.page() - 1)
    }

    /// Record the page the server delivered. Ignored in client mode.
    pub fn set_server_page(&mut self, current_page: usize, total_pages: usize, total_items: usize) -> bool {
        match &mut self.pagination {
            Pagination::Server(server) => {
                server.current_page = current_page;
                server.total_pages = total_pages;
                server.total_items = total_items;
                true
            }
            Pagination::Client { .. } => false,
        }
    }

    // --- Bulk delete ---

    /// Where the bulk-delete dialog is in its lifecycle.
    pub fn bulk_state(&self) -> BulkDeleteState {
        self.bulk
    }

    /// A delete callback exists, something is selected and no delete is
    /// running.
    pub fn bulk_delete_enabled(&self) -> bool {
        self.on_bulk_delete.is_some() && !self.selection.is_empty() && !self.bulk.is_busy()
    }

    /// Open the confirmation step.
    pub fn open_bulk_delete(&mut self) -> bool {
        if self.bulk != BulkDeleteState::Closed || !self.bulk_delete_enabled() {
            return false;
        }
        self.bulk = BulkDeleteState::Confirming;
        true
    }

    /// Close the confirmation step. A running delete cannot be cancelled.
    pub fn cancel_bulk_delete(&mut self) -> bool {
        if self.bulk != BulkDeleteState::Confirming {
            return false;
        }
        self.bulk = BulkDeleteState::Closed;
        true
    }

    /// Record that a job finished. Clears the selection and closes the
    /// dialog whether the delete succeeded or not; failures are only logged.
    pub fn finish_bulk_delete(&mut self, outcome: &BulkDeleteOutcome) -> bool {
        if self.bulk != BulkDeleteState::Busy(outcome.job) {
            log::debug!("ignoring outcome of stale bulk delete {:?}", outcome.job);
            return false;
        }
        if let Err(e) = &outcome.result {
            log::warn!("bulk delete of {} rows failed: {}", outcome.requested, e);
        } else {
            log::info!("bulk delete of {} rows finished", outcome.requested);
        }

        self.bulk = BulkDeleteState::Closed;
        self.pending_count = 0;
        if self.selection.clear() {
            self.selection_changed();
        }
        true
    }

    // --- Render model ---

    /// Snapshot of everything a front end needs to draw the table.
    pub fn frame(&self) -> TableFrame {
        let server = self.pagination.is_server();
        let visible = self.visible_columns();

        let header = visible
            .iter()
            .map(|c| HeaderCell {
                column: c.id().to_string(),
                label: c.header().to_string(),
                sortable: c.is_sortable() && !server,
                sort: if server { None } else { self.sort.direction_of(c.id()) },
                width: c.width_hint(),
            })
            .collect();

        let page_ids = self.page_ids();
        let body = if page_ids.is_empty() {
            Body::Empty {
                title: self.empty_title.clone(),
                message: self.empty_message.clone(),
            }
        } else {
            Body::Rows(
                page_ids
                    .iter()
                    .filter_map(|&id| {
                        self.data.get(id.0).map(|record| FrameRow {
                            id,
                            selected: self.selection.contains(id),
                            cells: visible.iter().map(|c| c.render(record)).collect(),
                        })
                    })
                    .collect(),
            )
        };

        let total = match &self.pagination {
            Pagination::Server(s) => s.total_items,
            Pagination::Client { .. } => self.rows.len(),
        };

        let footer = Footer {
            showing: page_ids.len(),
            total,
            page: self.page(),
            page_count: self.page_count(),
            can_prev: self.can_prev_page(),
            can_next: self.can_next_page(),
            selected: self.selection_enabled().then(|| self.selection.len()),
        };

        let select_all = if self.selection.is_empty() {
            SelectAll::None
        } else if self.selection.len() == self.rows.len() {
            SelectAll::All
        } else {
            SelectAll::Some
        };

        let toolbar = Toolbar {
            search_text: self.search_text.clone(),
            placeholder: self.search_placeholder.clone(),
            search_enabled: self.search_enabled(),
            columns: self
                .columns
                .iter()
                .map(|c| ColumnToggle {
                    id: c.id().to_string(),
                    header: c.header().to_string(),
                    visible: self.visibility.is_visible(c.id()),
                    hideable: c.is_hideable(),
                })
                .collect(),
        };

        let bulk_bar = (!self.selection.is_empty()).then(|| BulkBar {
            selected: self.selection.len(),
            delete_enabled: self.bulk_delete_enabled(),
        });

        let dialog = match self.bulk {
            BulkDeleteState::Closed => None,
            BulkDeleteState::Confirming => Some(ConfirmPrompt {
                count: self.selection.len(),
                busy: false,
            }),
            BulkDeleteState::Busy(_) => Some(ConfirmPrompt {
                count: self.pending_count,
                busy: true,
            }),
        };

        TableFrame {
            toolbar,
            selectable: self.selection_enabled(),
            select_all,
            header,
            body,
            footer,
            bulk_bar,
            dialog,
        }
    }
}

impl<R: Clone> TableView<R> {
    /// Confirm the pending delete. Captures the selected records now and
    /// returns the job to run; `None` unless the dialog is confirming, so a
    /// second confirm while busy does nothing.
    pub fn confirm_bulk_delete(&mut self) -> Option<BulkDeleteJob<R>> {
        if self.bulk != BulkDeleteState::Confirming {
            return None;
        }
        let Some(action) = self.on_bulk_delete.clone() else {
            self.bulk = BulkDeleteState::Closed;
            return None;
        };

        let records: Vec<R> = self.selected_rows().into_iter().cloned().collect();
        let id = JobId(self.next_job);
        self.next_job += 1;
        self.pending_count = records.len();
        self.bulk = BulkDeleteState::Busy(id);
        Some(BulkDeleteJob::new(id, records, action))
    }

    /// Confirm, run and finish on the calling thread.
    pub fn run_bulk_delete_blocking(&mut self) -> Option<BulkDeleteOutcome> {
        let job = self.confirm_bulk_delete()?;
        let outcome = job.run();
        self.finish_bulk_delete(&outcome);
        Some(outcome)
    }
}

impl<R> fmt::Debug for TableView<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableView")
            .field("columns", &self.columns)
            .field("records", &self.data.len())
            .field("filtered", &self.rows.len())
            .field("search_column", &self.search_column())
            .field("sort", &self.sort)
            .field("filters", &self.filters)
            .field("selected", &self.selection.len())
            .field("page", &self.page())
            .field("bulk", &self.bulk)
            .finish()
    }
}

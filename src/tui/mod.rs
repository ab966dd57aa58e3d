//! Terminal front end over [`TableView`].

pub mod app;
pub mod colors;
pub mod menu;
pub mod search;
pub mod table;
pub mod ui;

use crate::column::ColumnDef;
use crate::dataset::{RecordStore, StoreRecord};
use crate::{AppConfig, Result, TableView};
use app::App;
use std::time::Duration;

/// Show `records` in the terminal until the user quits.
///
/// Bulk deletes go to a [`RecordStore`] seeded with `records`; the table
/// reloads from it after each successful delete.
pub fn launch<R: StoreRecord>(
    title: &str,
    columns: Vec<ColumnDef<R>>,
    records: Vec<R>,
    config: &AppConfig,
) -> Result<()> {
    let store = RecordStore::new(records)
        .with_latency(Duration::from_millis(config.delete_latency_ms));

    let mut options = config
        .table
        .clone()
        .into_options()
        .on_selection_change(|rows: &[&R]| log::debug!("{} rows selected", rows.len()));
    options.on_bulk_delete = Some(store.bulk_delete_fn());

    let view = TableView::new(columns, store.snapshot(), options)?;
    log::info!("showing {} {} records", view.data().len(), title);

    let mut app = App::new(title, view, store, Duration::from_millis(config.tick_rate_ms.max(1)));
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

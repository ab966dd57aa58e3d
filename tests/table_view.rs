use dashtable::{
    BulkActionError, BulkDeleteState, CellValue, ColumnDef, RowId, SelectionMode, ServerPagination,
    TableOptions, TableView,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: i64,
    name: String,
}

fn item(id: i64, name: &str) -> Item {
    Item {
        id,
        name: name.to_string(),
    }
}

fn letters() -> Vec<Item> {
    ["A", "B", "C", "D", "E"]
        .iter()
        .enumerate()
        .map(|(i, name)| item(i as i64 + 1, name))
        .collect()
}

fn mixed() -> Vec<Item> {
    vec![
        item(1, "Harbour Point"),
        item(2, "harbour view"),
        item(3, "Ridgeway"),
        item(4, "Old Harbour Road"),
        item(5, "Airport"),
        item(6, ""),
        item(7, "Ridge"),
    ]
}

fn columns() -> Vec<ColumnDef<Item>> {
    vec![
        ColumnDef::new("id", "ID").accessor(|i: &Item| CellValue::Int(i.id)),
        ColumnDef::new("name", "Name").text(|i: &Item| i.name.clone()),
        ColumnDef::display("actions", "").cell(|_: &Item| "...".to_string()),
    ]
}

fn selectable(data: Vec<Item>) -> TableView<Item> {
    let options = TableOptions::default()
        .with_selection(SelectionMode::Multi)
        .with_page_size(100);
    TableView::new(columns(), data, options).unwrap()
}

fn shown(view: &TableView<Item>) -> Vec<i64> {
    view.filtered_ids()
        .iter()
        .map(|&id| view.record(id).unwrap().id)
        .collect()
}

type Calls = Arc<Mutex<Vec<Vec<Item>>>>;

fn with_recorder(data: Vec<Item>, fail: bool) -> (TableView<Item>, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&calls);
    let options = TableOptions::default()
        .with_selection(SelectionMode::Multi)
        .on_bulk_delete(move |records: Vec<Item>| -> Result<(), BulkActionError> {
            recorder.lock().push(records);
            if fail {
                Err(BulkActionError::new("backend refused"))
            } else {
                Ok(())
            }
        });
    (TableView::new(columns(), data, options).unwrap(), calls)
}

#[test]
fn filter_matches_substring_of_search_column() {
    let data = mixed();
    let mut view = selectable(data.clone());

    for text in ["harbour", "HARBOUR", "ridge", "o", "zzz", " "] {
        view.set_search(text);
        let expected: Vec<i64> = data
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&text.to_lowercase()))
            .map(|i| i.id)
            .collect();
        assert_eq!(shown(&view), expected, "search {:?}", text);
    }

    view.set_search("");
    assert_eq!(shown(&view), vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn select_all_filtered_yields_exactly_filtered_rows() {
    let mut view = selectable(mixed());
    view.toggle_row(RowId(4));
    view.toggle_row(RowId(6));

    view.set_search("harbour");
    view.select_all_filtered();
    assert_eq!(view.selected_ids(), view.filtered_ids().to_vec());

    view.set_search("");
    view.select_all_filtered();
    assert_eq!(view.selected_ids().len(), 7);

    view.deselect_all();
    assert!(view.selected_ids().is_empty());
    assert!(view.frame().bulk_bar.is_none());
}

#[test]
fn select_all_spans_every_page() {
    let options = TableOptions::default()
        .with_selection(SelectionMode::Multi)
        .with_page_size(2);
    let mut view = TableView::new(columns(), mixed(), options).unwrap();
    view.select_all_filtered();
    assert_eq!(view.page_ids().len(), 2);
    assert_eq!(view.selected_ids().len(), 7);
}

#[test]
fn replacing_data_collapses_selection() {
    let mut view = selectable(letters());
    view.select_all_filtered();
    assert!(view.frame().bulk_bar.is_some());

    view.set_data(vec![item(10, "X"), item(11, "Y")]);
    assert!(view.selected_ids().is_empty());
    assert!(view.frame().bulk_bar.is_none());
}

#[test]
fn server_next_page_asks_caller_and_keeps_data() {
    let requested = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&requested);
    let server = ServerPagination::new(0, 3, 15, 5, move |page| sink.borrow_mut().push(page));
    let options = TableOptions::default().with_server_pagination(server);
    let mut view = TableView::new(columns(), letters(), options).unwrap();

    let before = view.frame();
    assert!(view.next_page());
    assert_eq!(*requested.borrow(), vec![1]);
    assert_eq!(view.page(), 0);
    assert_eq!(view.frame(), before);

    // The caller delivers page 1.
    view.set_data(vec![item(6, "F"), item(7, "G")]);
    view.set_server_page(1, 3, 15);
    assert_eq!(view.page(), 1);
    assert_eq!(shown(&view), vec![6, 7]);
}

#[test]
fn server_mode_shows_data_verbatim() {
    let server = ServerPagination::new(0, 2, 10, 5, |_| {});
    let options = TableOptions::default().with_server_pagination(server);
    let mut view = TableView::new(columns(), letters(), options).unwrap();

    view.set_search("C");
    assert!(!view.toggle_sort("name"));
    assert_eq!(shown(&view), vec![1, 2, 3, 4, 5]);
    assert_eq!(view.frame().footer.total, 10);
}

#[test]
fn client_next_page_moves_slice() {
    let options = TableOptions::default().with_page_size(2);
    let mut view = TableView::new(columns(), letters(), options).unwrap();
    assert_eq!(view.page_ids(), &[RowId(0), RowId(1)]);
    assert!(view.next_page());
    assert_eq!(view.page_ids(), &[RowId(2), RowId(3)]);
    assert!(view.next_page());
    assert_eq!(view.page_ids(), &[RowId(4)]);
    assert!(!view.next_page());
}

#[test]
fn bulk_delete_calls_once_with_selected_records() {
    let (mut view, calls) = with_recorder(letters(), false);
    view.toggle_row(RowId(1));
    view.toggle_row(RowId(3));
    assert!(view.open_bulk_delete());

    let outcome = view.run_bulk_delete_blocking().unwrap();
    assert!(outcome.is_success());
    assert_eq!(*calls.lock(), vec![vec![item(2, "B"), item(4, "D")]]);
    assert_eq!(view.bulk_state(), BulkDeleteState::Closed);
    assert!(view.selected_ids().is_empty());

    // Nothing pending: a second confirm does nothing.
    assert!(view.run_bulk_delete_blocking().is_none());
    assert_eq!(calls.lock().len(), 1);
}

#[test]
fn rejected_bulk_delete_still_closes() {
    let (mut view, calls) = with_recorder(letters(), true);
    view.select_all_filtered();
    view.open_bulk_delete();

    let outcome = view.run_bulk_delete_blocking().unwrap();
    assert!(!outcome.is_success());
    assert_eq!(calls.lock().len(), 1);
    assert_eq!(view.bulk_state(), BulkDeleteState::Closed);
    assert!(view.selected_ids().is_empty());
    assert!(view.frame().dialog.is_none());
}

#[test]
fn job_keeps_records_captured_at_confirmation() {
    let (mut view, calls) = with_recorder(letters(), false);
    view.toggle_row(RowId(0));
    view.open_bulk_delete();
    let job = view.confirm_bulk_delete().unwrap();

    // Busy: further confirms are ignored, other interaction continues.
    assert!(view.confirm_bulk_delete().is_none());
    view.toggle_row(RowId(4));
    view.set_search("E");

    let outcome = std::thread::spawn(move || job.run()).join().unwrap();
    assert!(view.finish_bulk_delete(&outcome));
    assert_eq!(*calls.lock(), vec![vec![item(1, "A")]]);
    assert!(view.selected_ids().is_empty());
}

#[test]
fn unknown_search_column_falls_back_to_first_data_column() {
    let options = TableOptions::default().with_search_column("nope");
    let mut view = TableView::new(columns(), letters(), options).unwrap();
    assert_eq!(view.search_column(), Some("id"));
    view.set_search("3");
    assert_eq!(shown(&view), vec![3]);
}

#[test]
fn no_data_columns_disables_search() {
    let columns = vec![
        ColumnDef::display("select", ""),
        ColumnDef::display("actions", "").cell(|_: &Item| "...".to_string()),
    ];
    let mut view = TableView::new(columns, letters(), TableOptions::default()).unwrap();
    assert!(!view.search_enabled());
    assert!(!view.frame().toolbar.search_enabled);

    view.set_search("A");
    assert_eq!(view.filtered_ids().len(), 5);
}

#[test]
fn empty_data_renders_empty_state() {
    let view = TableView::new(
        columns(),
        Vec::new(),
        TableOptions::default().with_empty_state("No stations", "Add one to get started."),
    )
    .unwrap();
    let frame = view.frame();
    assert_eq!(
        frame.body,
        dashtable::Body::Empty {
            title: "No stations".into(),
            message: "Add one to get started.".into(),
        }
    );
    assert_eq!(frame.footer.summary(), "Showing 0 of 0 rows");
    assert_eq!(frame.footer.page_label(), "Page 1 of 1");
}

#[test]
fn search_select_delete_scenario() {
    let (mut view, calls) = with_recorder(letters(), false);

    view.set_search("C");
    assert_eq!(shown(&view), vec![3]);

    view.select_all_filtered();
    assert_eq!(view.selected_ids(), vec![RowId(2)]);
    assert_eq!(view.frame().bulk_bar.map(|b| b.selected), Some(1));

    assert!(view.open_bulk_delete());
    assert_eq!(view.frame().dialog.map(|d| d.count), Some(1));
    view.run_bulk_delete_blocking();

    assert_eq!(*calls.lock(), vec![vec![item(3, "C")]]);
    assert!(view.selected_ids().is_empty());
    assert!(view.frame().bulk_bar.is_none());
}

#[test]
fn selection_callback_sees_selected_records_in_data_order() {
    let seen: Rc<RefCell<Vec<Vec<Item>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let options = TableOptions::default()
        .with_selection(SelectionMode::Multi)
        .on_bulk_delete(|_: Vec<Item>| -> Result<(), BulkActionError> { Ok(()) })
        .on_selection_change(move |rows: &[&Item]| {
            sink.borrow_mut().push(rows.iter().map(|&r| r.clone()).collect());
        });
    let mut view = TableView::new(columns(), letters(), options).unwrap();

    view.toggle_row(RowId(3));
    view.toggle_row(RowId(1));
    view.deselect_all();
    // Already empty: no notification.
    view.deselect_all();
    view.toggle_row(RowId(0));
    view.toggle_row(RowId(4));
    view.set_data(letters());
    view.toggle_row(RowId(2));
    view.open_bulk_delete();
    view.run_bulk_delete_blocking();

    assert_eq!(
        *seen.borrow(),
        vec![
            vec![item(4, "D")],
            vec![item(2, "B"), item(4, "D")],
            vec![],
            vec![item(1, "A")],
            vec![item(1, "A"), item(5, "E")],
            vec![],
            vec![item(3, "C")],
            vec![],
        ]
    );
}

#[test]
fn presentational_search_column_falls_back_to_first_data_column() {
    let options = TableOptions::default().with_search_column("actions");
    let mut view = TableView::new(columns(), letters(), options).unwrap();
    assert_eq!(view.search_column(), Some("id"));
    assert!(view.search_enabled());
    view.set_search("5");
    assert_eq!(shown(&view), vec![5]);
}

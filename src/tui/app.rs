use crate::bulk::BulkDeleteOutcome;
use crate::dataset::{RecordStore, StoreRecord};
use crate::tui::menu::{ActiveMenu, ColumnMenu, ConfirmChoice};
use crate::tui::search::SearchInput;
use crate::tui::table::CursorState;
use crate::tui::ui;
use crate::TableView;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::thread;
use std::time::{Duration, Instant};

/// Messages from background threads
pub enum BgMessage {
    BulkDeleteFinished(BulkDeleteOutcome),
}

pub struct App<R> {
    pub title: String,
    pub view: TableView<R>,
    store: RecordStore<R>,

    // Sub-states
    pub search: SearchInput,
    pub cursor: CursorState,
    pub active_menu: ActiveMenu,

    pub status_message: String,

    // Channel
    bg_receiver: Receiver<BgMessage>,
    bg_sender: Sender<BgMessage>,

    tick_rate: Duration,
    pub should_quit: bool,
}

impl<R: StoreRecord> App<R> {
    pub fn new(title: impl Into<String>, view: TableView<R>, store: RecordStore<R>, tick_rate: Duration) -> Self {
        let (bg_sender, bg_receiver) = unbounded();
        let mut app = Self {
            title: title.into(),
            view,
            store,
            search: SearchInput::default(),
            cursor: CursorState::default(),
            active_menu: ActiveMenu::None,
            status_message: "Ready".to_string(),
            bg_receiver,
            bg_sender,
            tick_rate,
            should_quit: false,
        };
        app.sync_cursor();
        app
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> crate::Result<()> {
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = self.tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if last_tick.elapsed() >= self.tick_rate {
                self.process_messages();
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    pub fn process_messages(&mut self) {
        while let Ok(msg) = self.bg_receiver.try_recv() {
            match msg {
                BgMessage::BulkDeleteFinished(outcome) => self.on_bulk_delete_finished(outcome),
            }
        }
    }

    fn on_bulk_delete_finished(&mut self, outcome: BulkDeleteOutcome) {
        if !self.view.finish_bulk_delete(&outcome) {
            return;
        }
        match &outcome.result {
            Ok(()) => {
                self.view.set_data(self.store.snapshot());
                self.status_message = format!("Deleted {} rows", outcome.requested);
            }
            Err(e) => {
                self.status_message = format!("Delete failed: {}", e);
            }
        }
        if matches!(self.active_menu, ActiveMenu::Confirm(_)) {
            self.active_menu = ActiveMenu::None;
        }
        self.sync_cursor();
    }

    fn page_len(&self) -> usize {
        self.view.page_ids().len()
    }

    fn sync_cursor(&mut self) {
        let len = self.page_len();
        self.cursor.clamp(len);
    }

    fn apply_search(&mut self) {
        self.view.set_search(&self.search.query);
        let len = self.page_len();
        self.cursor.reset(len);
    }

    /// Hand the confirmed delete to a worker thread. The dialog closes so the
    /// table stays usable while the job runs.
    fn start_bulk_delete(&mut self) {
        self.active_menu = ActiveMenu::None;
        let Some(job) = self.view.confirm_bulk_delete() else {
            return;
        };
        self.status_message = format!("Deleting {} rows...", job.records().len());

        let tx = self.bg_sender.clone();
        thread::spawn(move || {
            let outcome = job.run();
            let _ = tx.send(BgMessage::BulkDeleteFinished(outcome));
        });
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        if !matches!(self.active_menu, ActiveMenu::None) {
            self.handle_menu_key(key);
        } else if key.code == KeyCode::Esc {
            self.handle_escape();
        } else if self.search.focused {
            self.handle_search_key(key);
        } else {
            self.handle_table_key(key);
        }
        self.sync_cursor();
    }

    fn handle_escape(&mut self) {
        if self.search.focused && self.search.clear() {
            self.apply_search();
        } else if self.search.focused {
            self.search.focused = false;
        } else if !self.view.selected_ids().is_empty() {
            self.view.deselect_all();
        } else {
            self.should_quit = true;
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.search.insert(c);
                self.apply_search();
            }
            KeyCode::Backspace => {
                if self.search.backspace() {
                    self.apply_search();
                }
            }
            KeyCode::Delete => {
                if self.search.delete() {
                    self.apply_search();
                }
            }
            KeyCode::Left => self.search.left(),
            KeyCode::Right => self.search.right(),
            KeyCode::Home => self.search.home(),
            KeyCode::End => self.search.end(),
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                self.search.focused = false;
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        let total = self.page_len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor.prev(total),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.next(total),
            KeyCode::PageUp => self.cursor.page_up(total),
            KeyCode::PageDown => self.cursor.page_down(total),
            KeyCode::Home => self.cursor.first(total),
            KeyCode::End => self.cursor.last(total),

            KeyCode::Tab | KeyCode::Char('/') => {
                self.search.focused = true;
            }

            // Pages
            KeyCode::Left | KeyCode::Char('[') => {
                if self.view.prev_page() {
                    let len = self.page_len();
                    self.cursor.reset(len);
                }
            }
            KeyCode::Right | KeyCode::Char(']') => {
                if self.view.next_page() {
                    let len = self.page_len();
                    self.cursor.reset(len);
                }
            }

            // Selection
            KeyCode::Char(' ') => {
                let id = self
                    .cursor
                    .cursor
                    .and_then(|i| self.view.page_ids().get(i).copied());
                if let Some(id) = id {
                    self.view.toggle_row(id);
                    self.cursor.next(total);
                }
            }
            KeyCode::Char('a') => {
                self.view.toggle_all_filtered();
            }
            KeyCode::Char('x') => {
                self.view.deselect_all();
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.view.open_bulk_delete() {
                    self.active_menu = ActiveMenu::Confirm(ConfirmChoice::default());
                } else if self.view.bulk_state().is_busy() {
                    self.status_message = "Delete in progress".to_string();
                } else if self.view.selected_ids().is_empty() {
                    self.status_message = "Select rows to delete first".to_string();
                } else {
                    self.status_message = "Bulk delete is not available here".to_string();
                }
            }

            // Sort on the nth visible column
            KeyCode::Char(c @ '1'..='9') => {
                let n = c as usize - '1' as usize;
                let column = self
                    .view
                    .visible_columns()
                    .get(n)
                    .map(|col| col.id().to_string());
                if let Some(column) = column {
                    let sorted = if key.modifiers.contains(KeyModifiers::ALT) {
                        self.view.toggle_sort_multi(&column)
                    } else {
                        self.view.toggle_sort(&column)
                    };
                    if !sorted {
                        self.status_message = format!("'{}' cannot be sorted", column);
                    }
                }
            }

            KeyCode::Char('c') => {
                self.active_menu = ActiveMenu::Columns(ColumnMenu::new());
            }
            KeyCode::Char('r') => {
                self.view.set_data(self.store.snapshot());
                self.status_message = format!("Reloaded {} rows", self.store.len());
            }
            KeyCode::Char('?') => {
                self.active_menu = ActiveMenu::Help;
            }
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match &mut self.active_menu {
            ActiveMenu::None => {}
            ActiveMenu::Help => {
                self.active_menu = ActiveMenu::None;
            }
            ActiveMenu::Columns(menu) => {
                let entries = self.view.frame().toolbar.columns;
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => menu.move_up(),
                    KeyCode::Down | KeyCode::Char('j') => menu.move_down(entries.len()),
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        if let Some(id) = menu.target(&entries) {
                            self.view.toggle_column_visible(id);
                        }
                    }
                    KeyCode::Esc | KeyCode::Char('c') => {
                        self.active_menu = ActiveMenu::None;
                    }
                    _ => {}
                }
            }
            ActiveMenu::Confirm(choice) => {
                match key.code {
                    KeyCode::Left | KeyCode::Right | KeyCode::Tab => *choice = choice.toggle(),
                    KeyCode::Char('y') => self.start_bulk_delete(),
                    KeyCode::Enter if *choice == ConfirmChoice::Yes => self.start_bulk_delete(),
                    KeyCode::Enter | KeyCode::Esc | KeyCode::Char('n') => {
                        self.view.cancel_bulk_delete();
                        self.active_menu = ActiveMenu::None;
                    }
                    _ => {}
                }
            }
        }
    }
}

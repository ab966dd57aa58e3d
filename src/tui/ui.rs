use crate::frame::{Body, BulkBar, ConfirmPrompt, Footer, TableFrame, Toolbar};
use crate::tui::app::App;
use crate::tui::colors;
use crate::tui::menu::{ActiveMenu, ColumnMenu, ConfirmChoice};
use crate::tui::search::SearchInput;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use unicode_width::UnicodeWidthStr;

const HELP_LINES: &[(&str, &str)] = &[
    ("/ or Tab", "Focus search"),
    ("Esc", "Clear search / selection, quit"),
    ("\u{2191}\u{2193} PgUp PgDn", "Move cursor"),
    ("\u{2190}\u{2192} [ ]", "Previous / next page"),
    ("Space", "Select row"),
    ("a", "Select all filtered rows"),
    ("x", "Deselect all"),
    ("d", "Delete selected rows"),
    ("1-9", "Sort by column (Alt: add key)"),
    ("c", "Show / hide columns"),
    ("r", "Reload data"),
    ("Ctrl+Q", "Quit"),
];

pub fn draw<R>(frame: &mut Frame, app: &mut App<R>) {
    let area = frame.area();
    let table = app.view.frame();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title strip
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Table
            Constraint::Length(if table.bulk_bar.is_some() { 1 } else { 0 }),
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_strip(frame, &app.title, app.view.data().len(), chunks[0]);
    draw_search_bar(frame, &table.toolbar, &app.search, chunks[1]);
    draw_table(frame, app, &table, chunks[2]);
    if let Some(bar) = &table.bulk_bar {
        let deleting = table.dialog.as_ref().filter(|d| d.busy).map(|d| d.count);
        draw_bulk_bar(frame, bar, deleting, chunks[3]);
    }
    draw_status_bar(frame, &table.footer, &app.status_message, chunks[4]);

    match &app.active_menu {
        ActiveMenu::None => {}
        ActiveMenu::Columns(menu) => draw_column_menu(frame, menu, &table.toolbar, area),
        ActiveMenu::Confirm(choice) => {
            if let Some(prompt) = table.dialog.as_ref().filter(|d| !d.busy) {
                draw_confirm_dialog(frame, prompt, *choice, area);
            }
        }
        ActiveMenu::Help => draw_help(frame, area),
    }

    // Show cursor in search bar when focused (and no menu is active)
    if matches!(app.active_menu, ActiveMenu::None) && app.search.focused {
        // border (1) + leading space (1)
        let cursor_x = chunks[1].x + 2 + app.search.cursor_column() as u16;
        let cursor_y = chunks[1].y + 1;
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_title_strip(frame: &mut Frame, title: &str, records: usize, area: Rect) {
    let left = format!(" {} ", title);
    let right = format!(" {} records  ?:Help ", records);
    let padding = (area.width as usize).saturating_sub(left.width() + right.width());

    let line = Line::from(vec![
        Span::styled(
            left,
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(padding), Style::default().bg(colors::BAR_BG)),
        Span::styled(right, Style::default().fg(Color::White).bg(colors::BAR_BG)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_search_bar(frame: &mut Frame, toolbar: &Toolbar, search: &SearchInput, area: Rect) {
    let border_style = if !toolbar.search_enabled {
        Style::default().fg(Color::Rgb(70, 70, 70))
    } else if search.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let (text, style) = if !toolbar.search_enabled {
        (
            " search unavailable".to_string(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )
    } else if search.query.is_empty() && !search.focused {
        (
            format!(" {}", toolbar.placeholder),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )
    } else {
        (format!(" {}", search.query), Style::default().fg(Color::White))
    };

    frame.render_widget(Paragraph::new(text).block(block).style(style), area);
}

fn draw_table<R>(frame: &mut Frame, app: &mut App<R>, table: &TableFrame, area: Rect) {
    // Area height minus the header row
    let visible_rows = area.height.saturating_sub(1) as usize;
    app.cursor.visible_rows = visible_rows;

    let multi_sort = app.view.sort_keys().len() > 1;
    let header_style = Style::default()
        .fg(Color::White)
        .bg(colors::HEADER_BG)
        .add_modifier(Modifier::BOLD);

    let mut header_cells = Vec::with_capacity(table.header.len() + 1);
    if table.selectable {
        header_cells.push(Cell::from(colors::select_all_box(table.select_all)).style(header_style));
    }
    header_cells.extend(table.header.iter().map(|h| {
        let text = match h.sort {
            Some((_, priority)) if multi_sort => format!("{}{}", h.title(), priority + 1),
            _ => h.title(),
        };
        Cell::from(text).style(header_style)
    }));
    let header = Row::new(header_cells).height(1);

    let mut widths: Vec<Constraint> = Vec::with_capacity(table.header.len() + 1);
    if table.selectable {
        widths.push(Constraint::Length(3));
    }
    widths.extend(table.header.iter().map(|h| match h.width {
        Some(w) => Constraint::Length(w),
        None => Constraint::Fill(1),
    }));

    let rows = match &table.body {
        Body::Rows(rows) => rows,
        Body::Empty { title, message } => {
            frame.render_widget(Table::new(Vec::<Row>::new(), widths).header(header), area);
            let body = Rect::new(area.x, area.y + 1, area.width, area.height.saturating_sub(1));
            draw_empty_state(frame, title, message, body);
            return;
        }
    };

    let start = app.cursor.scroll_offset.min(rows.len());
    let end = (start + visible_rows).min(rows.len());

    let visible: Vec<Row> = rows[start..end]
        .iter()
        .enumerate()
        .map(|(visual_idx, row)| {
            let is_cursor = app.cursor.cursor == Some(start + visual_idx);

            // Alternating row background
            let bg = if is_cursor {
                colors::CURSOR_BG
            } else if row.selected {
                colors::SELECTED_BG
            } else if visual_idx % 2 == 1 {
                colors::ALT_ROW_BG
            } else {
                Color::Reset
            };
            let modifier = if is_cursor {
                Modifier::BOLD
            } else {
                Modifier::empty()
            };

            let mut cells = Vec::with_capacity(row.cells.len() + 1);
            if table.selectable {
                cells.push(
                    Cell::from(colors::checkbox(row.selected))
                        .style(Style::default().fg(Color::Cyan).bg(bg)),
                );
            }
            cells.extend(row.cells.iter().map(|text| {
                Cell::from(text.as_str()).style(
                    Style::default()
                        .fg(colors::color_for_cell(text))
                        .bg(bg)
                        .add_modifier(modifier),
                )
            }));
            Row::new(cells)
        })
        .collect();

    let widget = Table::new(visible, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE));

    frame.render_widget(widget, area);
}

fn draw_empty_state(frame: &mut Frame, title: &str, message: &str, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Gray))),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

/// `deleting` is the row count of a running delete job.
fn draw_bulk_bar(frame: &mut Frame, bar: &BulkBar, deleting: Option<usize>, area: Rect) {
    let delete = match deleting {
        Some(count) => Span::styled(
            format!(" Deleting {} rows... ", count),
            Style::default().fg(Color::Yellow).bg(colors::BAR_BG).add_modifier(Modifier::BOLD),
        ),
        None if bar.delete_enabled => Span::styled(
            " d:Delete ",
            Style::default().fg(Color::Black).bg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(" d:Delete ", Style::default().fg(Color::DarkGray).bg(colors::BAR_BG)),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} selected ", bar.selected),
            Style::default().fg(Color::White).bg(colors::BAR_BG).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        delete,
        Span::raw(" "),
        Span::styled(" x:Clear ", Style::default().fg(Color::White).bg(colors::BAR_BG)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_status_bar(frame: &mut Frame, footer: &Footer, status: &str, area: Rect) {
    let mut left_text = format!(" {} | {}", footer.summary(), footer.page_label());
    if let Some(selected) = footer.selected {
        left_text.push_str(&format!(" | {} selected", selected));
    }
    left_text.push_str(&format!(" | {}", status));

    let prev = if footer.can_prev { "\u{2190}" } else { " " };
    let next = if footer.can_next { "\u{2192}" } else { " " };
    let right_text = format!(" {}{}:Page  /:Search  Space:Select  d:Delete  c:Columns  Ctrl+Q:Quit ", prev, next);

    // Build the status line: left-aligned text + padding + right-aligned text
    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        // Not enough space, just show left text
        format!("{:width$}", left_text, width = available_width)
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::HEADER_BG));

    frame.render_widget(status, area);
}

/// Helper to create a centered popup area
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn draw_confirm_dialog(frame: &mut Frame, prompt: &ConfirmPrompt, choice: ConfirmChoice, area: Rect) {
    let message = prompt.message();
    let width = (message.width() as u16 + 4).max(30).min(area.width.saturating_sub(4));
    let height = 5;
    let popup_area = centered_rect(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Confirm ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    // Message
    let msg_area = Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(2), 1);
    frame.render_widget(
        Paragraph::new(message).style(Style::default().fg(Color::White)),
        msg_area,
    );

    // Buttons
    let btn_y = inner.y + 2;
    let yes_style = if choice == ConfirmChoice::Yes {
        Style::default().fg(Color::Black).bg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let no_style = if choice == ConfirmChoice::No {
        Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let btn_x = (inner.x + inner.width / 2).saturating_sub(8);
    frame.render_widget(
        Paragraph::new(" [Yes] ").style(yes_style),
        Rect::new(btn_x, btn_y, 7, 1),
    );
    frame.render_widget(
        Paragraph::new(" [No] ").style(no_style),
        Rect::new(btn_x + 9, btn_y, 6, 1),
    );
}

fn draw_column_menu(frame: &mut Frame, menu: &ColumnMenu, toolbar: &Toolbar, area: Rect) {
    let label_width = toolbar
        .columns
        .iter()
        .map(|c| display_header(&c.header, &c.id).width())
        .max()
        .unwrap_or(10);
    let width = (label_width as u16 + 10).max(24);
    let height = toolbar.columns.len() as u16 + 2;
    let popup_area = centered_rect(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Columns ")
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    for (i, column) in toolbar.columns.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }

        let style = if i == menu.selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if !column.hideable {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };

        let item_area = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        let text = format!(
            " {} {} ",
            colors::checkbox(column.visible),
            display_header(&column.header, &column.id)
        );
        frame.render_widget(Paragraph::new(text).style(style), item_area);
    }
}

/// Headerless columns are listed by id.
fn display_header<'a>(header: &'a str, id: &'a str) -> &'a str {
    if header.is_empty() {
        id
    } else {
        header
    }
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let key_width = HELP_LINES.iter().map(|(k, _)| k.width()).max().unwrap_or(8);
    let max_line_len = HELP_LINES
        .iter()
        .map(|(k, d)| key_width + 2 + d.width())
        .max()
        .unwrap_or(20);
    let width = ((max_line_len + 4) as u16).max(30).min(area.width.saturating_sub(4));
    let height = ((HELP_LINES.len() + 2) as u16).min(area.height.saturating_sub(2));
    let popup_area = centered_rect(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Keys ")
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    for (i, (key, description)) in HELP_LINES.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let pad = key_width.saturating_sub(key.width());
        let line = Line::from(vec![
            Span::styled(format!("{}{}", key, " ".repeat(pad)), Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(*description, Style::default().fg(Color::White)),
        ]);
        let line_area = Rect::new(inner.x + 1, inner.y + i as u16, inner.width.saturating_sub(2), 1);
        frame.render_widget(Paragraph::new(line), line_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{sample_stations, station_columns, RecordStore};
    use crate::{SelectionMode, TableOptions, TableView};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn render(app: &mut App<crate::dataset::Station>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app(data: Vec<crate::dataset::Station>) -> App<crate::dataset::Station> {
        let store = RecordStore::new(data);
        let options = TableOptions::default().with_selection(SelectionMode::Multi);
        let view = TableView::new(station_columns(), store.snapshot(), options).unwrap();
        App::new("Stations", view, store, Duration::from_millis(10))
    }

    #[test]
    fn draws_rows_and_footer() {
        let mut app = app(sample_stations());
        let screen = render(&mut app);
        assert!(screen.contains("Harbour Point"));
        assert!(screen.contains("Showing 10 of 22 rows"));
        assert!(screen.contains("Page 1 of 3"));
    }

    #[test]
    fn empty_data_shows_empty_state() {
        let mut app = app(Vec::new());
        let screen = render(&mut app);
        assert!(screen.contains("No results"));
    }

    #[test]
    fn bulk_bar_appears_with_selection() {
        let mut app = app(sample_stations());
        app.view.select_all_filtered();
        let screen = render(&mut app);
        assert!(screen.contains("22 selected"));
    }

    #[test]
    fn running_delete_shows_in_bulk_bar() {
        let store = RecordStore::new(sample_stations());
        let mut options = TableOptions::default().with_selection(SelectionMode::Multi);
        options.on_bulk_delete = Some(store.bulk_delete_fn());
        let view = TableView::new(station_columns(), store.snapshot(), options).unwrap();
        let mut app = App::new("Stations", view, store, Duration::from_millis(10));

        app.view.toggle_row(crate::RowId(0));
        app.view.toggle_row(crate::RowId(1));
        app.view.open_bulk_delete();
        let _job = app.view.confirm_bulk_delete().unwrap();

        let screen = render(&mut app);
        assert!(screen.contains("Deleting 2 rows..."));
        assert!(!screen.contains(" Confirm "));
    }

    #[test]
    fn headerless_columns_listed_by_id() {
        assert_eq!(display_header("", "actions"), "actions");
        assert_eq!(display_header("City", "city"), "City");
    }
}

use ratatui::style::Color;

pub const BAR_BG: Color = Color::Rgb(40, 40, 50);
pub const HEADER_BG: Color = Color::Rgb(0, 95, 135);
pub const ALT_ROW_BG: Color = Color::Rgb(25, 25, 35);
pub const CURSOR_BG: Color = Color::Rgb(60, 60, 80);
pub const SELECTED_BG: Color = Color::Rgb(30, 55, 45);

/// Foreground for a rendered cell. Recognises charging status words; other
/// text is white.
pub fn color_for_cell(text: &str) -> Color {
    match text {
        "Available" => Color::Green,
        "Charging" => Color::Yellow,
        "Offline" => Color::Red,
        "Maintenance" => Color::Magenta,
        "AC" => Color::LightBlue,
        "DC" => Color::LightRed,
        _ => Color::White,
    }
}

pub fn checkbox(selected: bool) -> &'static str {
    if selected {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn select_all_box(state: crate::frame::SelectAll) -> &'static str {
    match state {
        crate::frame::SelectAll::None => "[ ]",
        crate::frame::SelectAll::Some => "[-]",
        crate::frame::SelectAll::All => "[x]",
    }
}

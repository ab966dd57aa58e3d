use crate::frame::ColumnToggle;

/// Column-visibility popup state
pub struct ColumnMenu {
    pub selected: usize,
}

impl ColumnMenu {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Column id under the cursor, if it can be toggled.
    pub fn target<'a>(&self, entries: &'a [ColumnToggle]) -> Option<&'a str> {
        entries
            .get(self.selected)
            .filter(|e| e.hideable)
            .map(|e| e.id.as_str())
    }
}

impl Default for ColumnMenu {
    fn default() -> Self {
        Self::new()
    }
}

/// Which button of the bulk-delete confirmation has focus. Defaults to No.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmChoice {
    Yes,
    #[default]
    No,
}

impl ConfirmChoice {
    pub fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

/// Overlay currently capturing keys
pub enum ActiveMenu {
    None,
    Columns(ColumnMenu),
    Confirm(ConfirmChoice),
    Help,
}

/// Keyboard cursor over the rows of the current page.
///
/// Separate from the table's selection: the cursor marks where Space acts,
/// the selection is what a bulk action receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorState {
    pub cursor: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            cursor: None,
            scroll_offset: 0,
            visible_rows: 20,
        }
    }
}

impl CursorState {
    pub fn next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.cursor {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.move_to(i);
    }

    pub fn prev(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = self.cursor.map_or(0, |i| i.saturating_sub(1));
        self.move_to(i);
    }

    pub fn page_down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.saturating_sub(1).max(1);
        let i = self.cursor.map_or(jump, |i| i + jump).min(total - 1);
        self.move_to(i);
    }

    pub fn page_up(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.saturating_sub(1).max(1);
        let i = self.cursor.map_or(0, |i| i.saturating_sub(jump));
        self.move_to(i);
    }

    pub fn first(&mut self, total: usize) {
        if total > 0 {
            self.move_to(0);
        }
    }

    pub fn last(&mut self, total: usize) {
        if total > 0 {
            self.move_to(total - 1);
        }
    }

    /// Keep the cursor inside `total` rows after the page contents changed.
    pub fn clamp(&mut self, total: usize) {
        match self.cursor {
            _ if total == 0 => {
                self.cursor = None;
                self.scroll_offset = 0;
            }
            Some(i) if i >= total => self.move_to(total - 1),
            None => self.move_to(0),
            Some(i) => self.move_to(i),
        }
    }

    /// Back to the top, e.g. after the page changed.
    pub fn reset(&mut self, total: usize) {
        self.cursor = (total > 0).then_some(0);
        self.scroll_offset = 0;
    }

    fn move_to(&mut self, index: usize) {
        self.cursor = Some(index);
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}

/// Search box editing state. Cursor positions are byte offsets on char
/// boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub query: String,
    pub cursor_pos: usize,
    pub focused: bool,
}

impl SearchInput {
    pub fn insert(&mut self, c: char) {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    /// Returns true if the query changed.
    pub fn backspace(&mut self) -> bool {
        match self.prev_boundary() {
            Some(prev) => {
                self.query.remove(prev);
                self.cursor_pos = prev;
                true
            }
            None => false,
        }
    }

    /// Returns true if the query changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor_pos < self.query.len() {
            self.query.remove(self.cursor_pos);
            true
        } else {
            false
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor_pos = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(c) = self.query[self.cursor_pos..].chars().next() {
            self.cursor_pos += c.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn end(&mut self) {
        self.cursor_pos = self.query.len();
    }

    /// Returns true if there was anything to clear.
    pub fn clear(&mut self) -> bool {
        let had = !self.query.is_empty();
        self.query.clear();
        self.cursor_pos = 0;
        had
    }

    /// Display columns before the cursor.
    pub fn cursor_column(&self) -> usize {
        unicode_width::UnicodeWidthStr::width(&self.query[..self.cursor_pos])
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.query[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
    }
}

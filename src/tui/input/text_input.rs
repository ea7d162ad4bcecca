//! Text input field handling.

use unicode_width::UnicodeWidthStr;

/// State for a single-line text input field.
#[derive(Clone, Debug, Default)]
pub struct TextInput {
    /// The current text content.
    content: String,
    /// Cursor position as a character index.
    cursor: usize,
    /// Accept only digits and a decimal point.
    numeric: bool,
}

impl TextInput {
    /// Creates a new empty text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an input that only accepts numeric characters.
    pub fn numeric() -> Self {
        Self {
            numeric: true,
            ..Self::default()
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Inserts a character at the cursor position.
    ///
    /// Returns `false` if the character was rejected.
    pub fn insert(&mut self, c: char) -> bool {
        if c.is_control() || (self.numeric && !(c.is_ascii_digit() || c == '.')) {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Deletes the character at the cursor position (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Replaces the content and moves the cursor to the end.
    pub fn set(&mut self, value: impl Into<String>) {
        self.content = value.into();
        self.cursor = self.char_count();
    }

    /// Clears the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Cursor position in terminal columns from the start of the field.
    pub fn cursor_column(&self) -> u16 {
        let before = &self.content[..self.byte_index(self.cursor)];
        u16::try_from(before.width()).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut input = TextInput::new();
        for c in "ETH".chars() {
            input.insert(c);
        }
        input.move_left();
        input.backspace();
        assert_eq!(input.as_str(), "EH");
        input.move_home();
        input.delete();
        assert_eq!(input.as_str(), "H");
        input.move_end();
        input.insert('!');
        assert_eq!(input.as_str(), "H!");
    }

    #[test]
    fn multibyte_characters_are_handled() {
        let mut input = TextInput::new();
        input.set("né");
        input.backspace();
        assert_eq!(input.as_str(), "n");

        input.set("日本");
        assert_eq!(input.cursor_column(), 4);
        input.move_left();
        assert_eq!(input.cursor_column(), 2);
    }

    #[test]
    fn numeric_input_rejects_letters() {
        let mut input = TextInput::numeric();
        assert!(input.insert('4'));
        assert!(!input.insert('x'));
        assert!(input.insert('.'));
        assert!(input.insert('5'));
        assert_eq!(input.as_str(), "4.5");
    }
}

/// Single-line editable text with a character-indexed cursor.
#[derive(Debug, Default, Clone)]
pub struct TextField {
    content: String,
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = self.cursor_byte_position();
        self.content.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.remove_at_cursor();
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.remove_at_cursor();
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Replace the content and put the cursor at the end.
    pub fn set(&mut self, value: &str) {
        self.content = value.to_string();
        self.cursor = self.len();
    }

    /// Content split around the cursor, for drawing a caret.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.content.split_at(self.cursor_byte_position())
    }

    fn remove_at_cursor(&mut self) {
        let byte_pos = self.cursor_byte_position();
        let next_byte_pos = self.content[byte_pos..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| byte_pos + i)
            .unwrap_or(self.content.len());
        self.content.drain(byte_pos..next_byte_pos);
    }

    fn cursor_byte_position(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut field = TextField::new();
        field.set("/opt/stardew");
        field.move_left();
        field.move_left();
        field.insert('X');
        assert_eq!(field.content(), "/opt/stardXew");

        field.delete_back();
        field.delete_forward();
        assert_eq!(field.content(), "/opt/stardw");
        assert_eq!(field.split_at_cursor(), ("/opt/stard", "w"));
    }

    #[test]
    fn handles_multibyte_paths() {
        let mut field = TextField::new();
        field.set("Jeux/Vallée");
        assert_eq!(field.len(), 11);
        field.move_left();
        assert!(field.delete_back());
        assert_eq!(field.content(), "Jeux/Valle");
        field.insert('è');
        assert_eq!(field.content(), "Jeux/Vallèe");
        assert_eq!(field.cursor(), 10);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut field = TextField::new();
        field.move_left();
        assert!(!field.delete_back());
        assert!(!field.delete_forward());
        field.insert('a');
        field.move_right();
        assert_eq!(field.cursor(), 1);
        field.move_start();
        assert_eq!(field.cursor(), 0);
        field.clear();
        assert!(field.is_empty());
    }
}

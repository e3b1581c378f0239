/// Character-level view over the source text with line/column tracking.
///
/// `'\0'` doubles as the end-of-input marker, so reading past the end is
/// always safe and yields the marker indefinitely.
pub struct CharStream {
    data: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

pub const EOF_CHAR: char = '\0';

impl CharStream {
    pub fn new(src: &str) -> Self {
        CharStream {
            data: src.chars().collect(),
            pos: 0,
            line: 1,
            col: 0,
        }
    }

    /// Look at the next character without advancing.
    pub fn peek(&self) -> char {
        self.data.get(self.pos).copied().unwrap_or(EOF_CHAR)
    }

    /// Consume and return the next character, updating line/column.
    pub fn next(&mut self) -> char {
        let ch = self.peek();
        if self.pos < self.data.len() {
            self.pos += 1;
        }

        if ch == '\n' {
            self.line += 1;
            self.col = 0;
        } else if ch != EOF_CHAR {
            self.col += 1;
        }

        ch
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    StringLiteral,
    IntegerLiteral,
    DecimalLiteral,
    NullLiteral,
    BooleanLiteral,
    Separator,
    Operator,
    Eof,
}

/// An atomic lexical unit. Tokens are immutable once produced; the text of a
/// string literal excludes the surrounding quotes, and the Eof token carries
/// an empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn eof() -> Self {
        Token {
            kind: TokenKind::Eof,
            text: String::new(),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Shorthand for kind + text comparison against a separator or keyword
    /// spelling, used all over the parser.
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
}

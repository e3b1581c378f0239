use std::collections::VecDeque;

use phf::{phf_set, Set};

use crate::error::Error;
use crate::report::Reporter;
use crate::stream::CharStream;
use crate::token::{Token, TokenKind};

/// On-demand tokenizer over a `CharStream` with unbounded lookahead.
///
/// Tokens are produced lazily; `peek`/`peek_at` fill an internal FIFO buffer
/// that `next` drains first. Scanning never halts on bad input: every lexical
/// problem is reported through the `Reporter` and the scanner moves on to the
/// next recognizable token. Once the end of input is reached the Eof token is
/// returned indefinitely.
pub struct Scanner {
    stream: CharStream,
    buffer: VecDeque<Token>,
    reporter: Reporter,
    consumed: usize,
}

// The reserved word list of the source language. Most of these are reserved
// without being used by any grammar rule.
static KEYWORDS: Set<&'static str> = phf_set! {
    "function", "class", "break", "delete", "return",
    "case", "do", "if", "switch", "var",
    "catch", "else", "in", "this", "void",
    "continue", "false", "instanceof", "throw", "while",
    "debugger", "finally", "new", "true", "with",
    "default", "for", "null", "try", "typeof",
    "implements", "let", "private", "public", "yield",
    "interface", "package", "protected", "static",
};

impl Scanner {
    pub fn new(src: &str, reporter: Reporter) -> Self {
        Scanner {
            stream: CharStream::new(src),
            buffer: VecDeque::new(),
            reporter,
            consumed: 0,
        }
    }

    /// Return the current token and move past it.
    pub fn next(&mut self) -> Token {
        self.consumed += 1;
        match self.buffer.pop_front() {
            Some(token) => token,
            None => self.scan_token(),
        }
    }

    /// Look at the current token without consuming it.
    pub fn peek(&mut self) -> &Token {
        self.peek_at(0)
    }

    /// Look `n` tokens past the current one. `peek_at(0)` == `peek()`. The
    /// grammar needs at most `peek_at(1)`, but the buffer is unbounded.
    pub fn peek_at(&mut self, n: usize) -> &Token {
        while self.buffer.len() <= n {
            let token = self.scan_token();
            self.buffer.push_back(token);
        }
        &self.buffer[n]
    }

    /// Number of tokens handed out so far. The parser compares this across a
    /// failed sub-parse to guarantee the statement-list loop makes progress.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();
        if self.stream.eof() {
            return Token::eof();
        }

        let ch = self.stream.peek();
        if ch.is_ascii_alphabetic() || ch == '_' {
            self.identifier()
        } else if ch == '"' {
            self.string()
        } else if ch.is_ascii_digit() {
            self.number()
        } else if matches!(
            ch,
            '(' | ')' | '{' | '}' | '[' | ']' | ',' | ';' | ':' | '?' | '@'
        ) {
            self.stream.next();
            Token::new(TokenKind::Separator, ch.to_string())
        } else if ch == '.' {
            self.dot()
        } else {
            self.operator(ch)
        }
    }

    /// Maximal run of letters/digits/underscore, then keyword and literal
    /// reclassification. `null`/`true`/`false` sit in the keyword set but are
    /// surfaced as literal tokens.
    fn identifier(&mut self) -> Token {
        let mut text = String::new();
        text.push(self.stream.next());
        while !self.stream.eof() && is_ident_char(self.stream.peek()) {
            text.push(self.stream.next());
        }

        let kind = if text == "null" {
            TokenKind::NullLiteral
        } else if text == "true" || text == "false" {
            TokenKind::BooleanLiteral
        } else if KEYWORDS.contains(text.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        Token::new(kind, text)
    }

    /// Raw characters up to the closing quote, no escape processing. A
    /// missing terminator is reported but the collected text still becomes a
    /// token.
    fn string(&mut self) -> Token {
        self.stream.next();

        let mut text = String::new();
        while !self.stream.eof() && self.stream.peek() != '"' {
            text.push(self.stream.next());
        }

        if self.stream.peek() == '"' {
            self.stream.next();
        } else {
            self.reporter.report(Error::UnterminatedString {
                line: self.stream.line(),
                col: self.stream.col(),
            });
        }

        Token::new(TokenKind::StringLiteral, text)
    }

    /// Decimal numbers only. A leading zero must stand alone; `01` is
    /// rejected, the digit run skipped, and the next real token returned.
    fn number(&mut self) -> Token {
        let first = self.stream.next();
        let mut text = String::new();

        if first == '0' {
            if self.stream.peek().is_ascii_digit() {
                self.reporter.report(Error::LeadingZero {
                    line: self.stream.line(),
                    col: self.stream.col(),
                });
                while self.stream.peek().is_ascii_digit() {
                    self.stream.next();
                }
                return self.scan_token();
            }
            text.push('0');
        } else {
            text.push(first);
            while self.stream.peek().is_ascii_digit() {
                text.push(self.stream.next());
            }
        }

        if self.stream.peek() == '.' {
            text.push(self.stream.next());
            while self.stream.peek().is_ascii_digit() {
                text.push(self.stream.next());
            }
            Token::new(TokenKind::DecimalLiteral, text)
        } else {
            Token::new(TokenKind::IntegerLiteral, text)
        }
    }

    /// A dot starts a fractional literal (`.5`), the `...` separator, or a
    /// bare `.` separator.
    fn dot(&mut self) -> Token {
        self.stream.next();

        if self.stream.peek().is_ascii_digit() {
            let mut text = String::from(".");
            while self.stream.peek().is_ascii_digit() {
                text.push(self.stream.next());
            }
            Token::new(TokenKind::DecimalLiteral, text)
        } else if self.stream.peek() == '.' {
            self.stream.next();
            if self.stream.peek() == '.' {
                self.stream.next();
                Token::new(TokenKind::Separator, "...")
            } else {
                self.reporter.report(Error::IncompleteEllipsis {
                    line: self.stream.line(),
                    col: self.stream.col(),
                });
                self.scan_token()
            }
        } else {
            Token::new(TokenKind::Separator, ".")
        }
    }

    /// Greedy longest-match over the fixed operator spellings. `/` also owns
    /// comment handling; comments never produce a token.
    fn operator(&mut self, ch: char) -> Token {
        match ch {
            '/' => {
                self.stream.next();
                match self.stream.peek() {
                    '*' => {
                        self.skip_block_comment();
                        self.scan_token()
                    }
                    '/' => {
                        self.skip_line_comment();
                        self.scan_token()
                    }
                    '=' => self.op2("/="),
                    _ => self.op1("/"),
                }
            }
            '+' => {
                self.stream.next();
                match self.stream.peek() {
                    '+' => self.op2("++"),
                    '=' => self.op2("+="),
                    _ => self.op1("+"),
                }
            }
            '-' => {
                self.stream.next();
                match self.stream.peek() {
                    '-' => self.op2("--"),
                    '=' => self.op2("-="),
                    _ => self.op1("-"),
                }
            }
            '*' => {
                self.stream.next();
                match self.stream.peek() {
                    '*' => self.op2("**"),
                    '=' => self.op2("*="),
                    _ => self.op1("*"),
                }
            }
            '%' => {
                self.stream.next();
                match self.stream.peek() {
                    '=' => self.op2("%="),
                    _ => self.op1("%"),
                }
            }
            '>' => {
                self.stream.next();
                match self.stream.peek() {
                    '=' => self.op2(">="),
                    '>' => {
                        self.stream.next();
                        match self.stream.peek() {
                            '>' => {
                                self.stream.next();
                                match self.stream.peek() {
                                    '=' => self.op2(">>>="),
                                    _ => self.op1(">>>"),
                                }
                            }
                            '=' => self.op2(">>="),
                            _ => self.op1(">>"),
                        }
                    }
                    _ => self.op1(">"),
                }
            }
            '<' => {
                self.stream.next();
                match self.stream.peek() {
                    '=' => self.op2("<="),
                    '<' => {
                        self.stream.next();
                        match self.stream.peek() {
                            '=' => self.op2("<<="),
                            _ => self.op1("<<"),
                        }
                    }
                    _ => self.op1("<"),
                }
            }
            '=' => {
                self.stream.next();
                match self.stream.peek() {
                    '=' => {
                        self.stream.next();
                        match self.stream.peek() {
                            '=' => self.op2("==="),
                            _ => self.op1("=="),
                        }
                    }
                    '>' => self.op2("=>"),
                    _ => self.op1("="),
                }
            }
            '!' => {
                self.stream.next();
                match self.stream.peek() {
                    '=' => {
                        self.stream.next();
                        match self.stream.peek() {
                            '=' => self.op2("!=="),
                            _ => self.op1("!="),
                        }
                    }
                    _ => self.op1("!"),
                }
            }
            '|' => {
                self.stream.next();
                match self.stream.peek() {
                    '|' => self.op2("||"),
                    '=' => self.op2("|="),
                    _ => self.op1("|"),
                }
            }
            '&' => {
                self.stream.next();
                match self.stream.peek() {
                    '&' => self.op2("&&"),
                    '=' => self.op2("&="),
                    _ => self.op1("&"),
                }
            }
            '^' => {
                self.stream.next();
                match self.stream.peek() {
                    '=' => self.op2("^="),
                    _ => self.op1("^"),
                }
            }
            '~' => {
                self.stream.next();
                match self.stream.peek() {
                    '=' => self.op2("~="),
                    _ => self.op1("~"),
                }
            }
            _ => {
                self.reporter.report(Error::UnrecognizedCharacter {
                    ch,
                    line: self.stream.line(),
                    col: self.stream.col(),
                });
                self.stream.next();
                self.scan_token()
            }
        }
    }

    // The last character of a two-or-more spelling is still pending on the
    // stream when these are called; op1 consumes nothing.
    fn op1(&mut self, text: &str) -> Token {
        Token::new(TokenKind::Operator, text)
    }

    fn op2(&mut self, text: &str) -> Token {
        self.stream.next();
        Token::new(TokenKind::Operator, text)
    }

    fn skip_line_comment(&mut self) {
        self.stream.next();
        while !self.stream.eof() && self.stream.peek() != '\n' {
            self.stream.next();
        }
    }

    fn skip_block_comment(&mut self) {
        self.stream.next();
        let mut prev = self.stream.next();
        while !self.stream.eof() {
            let cur = self.stream.next();
            if prev == '*' && cur == '/' {
                return;
            }
            prev = cur;
        }

        self.reporter.report(Error::UnterminatedBlockComment {
            line: self.stream.line(),
            col: self.stream.col(),
        });
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.stream.peek(), ' ' | '\t' | '\n' | '\r') {
            self.stream.next();
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::report::Reporter;
    use crate::scanner::Scanner;
    use crate::token::{Token, TokenKind};

    fn scan_all(src: &str) -> (Vec<Token>, String) {
        let out: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        let mut scanner = Scanner::new(src, Reporter::new(out.clone()));

        let mut tokens = Vec::new();
        loop {
            let token = scanner.next();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }

        let diags = String::from_utf8(out.borrow().clone()).unwrap();
        (tokens, diags)
    }

    macro_rules! token {
        ($kind:ident, $text:literal) => {
            Token::new(TokenKind::$kind, $text)
        };
    }

    #[test]
    fn test_basic_scanning() {
        let source = "function hello() { println(\"world\"); }";
        let (tokens, diags) = scan_all(source);

        assert_eq!(
            tokens,
            vec![
                token!(Keyword, "function"),
                token!(Identifier, "hello"),
                token!(Separator, "("),
                token!(Separator, ")"),
                token!(Separator, "{"),
                token!(Identifier, "println"),
                token!(Separator, "("),
                token!(StringLiteral, "world"),
                token!(Separator, ")"),
                token!(Separator, ";"),
                token!(Separator, "}"),
                Token::eof(),
            ]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_literals_and_keywords() {
        let source = "let x: number = 3.14; null true false .5 12.";
        let (tokens, _) = scan_all(source);

        assert_eq!(
            tokens,
            vec![
                token!(Keyword, "let"),
                token!(Identifier, "x"),
                token!(Separator, ":"),
                token!(Identifier, "number"),
                token!(Operator, "="),
                token!(DecimalLiteral, "3.14"),
                token!(Separator, ";"),
                token!(NullLiteral, "null"),
                token!(BooleanLiteral, "true"),
                token!(BooleanLiteral, "false"),
                token!(DecimalLiteral, ".5"),
                token!(DecimalLiteral, "12."),
                Token::eof(),
            ]
        );
    }

    #[test]
    fn test_operator_longest_match() {
        let source = "a >>>= b === c && d <<= e !== f ** g";
        let (tokens, _) = scan_all(source);
        let ops: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.text.as_str())
            .collect();

        assert_eq!(ops, vec![">>>=", "===", "&&", "<<=", "!==", "**"]);
    }

    #[test]
    fn test_comments_produce_no_tokens() {
        let source = "1 // trailing comment\n/* block\ncomment */ 2";
        let (tokens, diags) = scan_all(source);

        assert_eq!(
            tokens,
            vec![
                token!(IntegerLiteral, "1"),
                token!(IntegerLiteral, "2"),
                Token::eof(),
            ]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (tokens, diags) = scan_all("1 /* never closed");
        assert_eq!(tokens, vec![token!(IntegerLiteral, "1"), Token::eof()]);
        assert!(diags.contains("failed to find matching */"));
    }

    #[test]
    fn test_unterminated_string_still_yields_token() {
        let (tokens, diags) = scan_all("\"hello");
        assert_eq!(tokens, vec![token!(StringLiteral, "hello"), Token::eof()]);
        assert!(diags.contains("terminate the string literal"));
    }

    #[test]
    fn test_zero_is_a_valid_literal() {
        let (tokens, diags) = scan_all("0");
        assert_eq!(tokens, vec![token!(IntegerLiteral, "0"), Token::eof()]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_leading_zero_is_rejected() {
        let (tokens, diags) = scan_all("01;");
        assert_eq!(tokens, vec![token!(Separator, ";"), Token::eof()]);
        assert!(diags.contains("'0' cannot be followed"));
    }

    #[test]
    fn test_unrecognized_character_is_skipped() {
        let (tokens, diags) = scan_all("1 # 2");
        assert_eq!(
            tokens,
            vec![
                token!(IntegerLiteral, "1"),
                token!(IntegerLiteral, "2"),
                Token::eof(),
            ]
        );
        assert!(diags.contains("unrecognized character '#'"));
    }

    #[test]
    fn test_eof_is_terminal() {
        let out: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        let mut scanner = Scanner::new("", Reporter::new(out));
        assert!(scanner.next().is_eof());
        assert!(scanner.next().is_eof());
        assert!(scanner.peek().is_eof());
    }

    #[test]
    fn test_lookahead_buffer() {
        let out: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        let mut scanner = Scanner::new("foo ( )", Reporter::new(out));

        assert_eq!(scanner.peek_at(1).text, "(");
        assert_eq!(scanner.peek().text, "foo");
        assert_eq!(scanner.next().text, "foo");
        assert_eq!(scanner.next().text, "(");
        assert_eq!(scanner.next().text, ")");
    }

    #[test]
    fn test_token_text_round_trip() {
        // Re-concatenating token texts reproduces the token-significant
        // content of the source.
        let source = "let x = 1 + 2;\nfunction f() { x = x * 3; } // done";
        let (tokens, _) = scan_all(source);

        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        let significant: String = source
            .split("//")
            .next()
            .unwrap()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        assert_eq!(joined, significant);
    }
}

use thiserror::Error;

/// Lexical diagnostics. None of these abort scanning; the scanner reports
/// them through the shared sink and keeps going.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error("[{line}:{col}] unrecognized character '{ch}'")]
    UnrecognizedCharacter { ch: char, line: usize, col: usize },

    #[error("[{line}:{col}] expecting '\"' to terminate the string literal")]
    UnterminatedString { line: usize, col: usize },

    #[error("[{line}:{col}] failed to find matching */ for block comment")]
    UnterminatedBlockComment { line: usize, col: usize },

    #[error("[{line}:{col}] '0' cannot be followed by another digit")]
    LeadingZero { line: usize, col: usize },

    #[error("[{line}:{col}] unrecognized pattern '..', missed a '.'?")]
    IncompleteEllipsis { line: usize, col: usize },
}

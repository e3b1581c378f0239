pub mod ast;
pub mod dump;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod symbol;
pub mod value;

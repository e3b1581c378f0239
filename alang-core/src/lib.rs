mod error;
mod report;
mod scanner;
mod stream;
mod token;

pub use error::*;
pub use report::*;
pub use scanner::*;
pub use stream::*;
pub use token::*;

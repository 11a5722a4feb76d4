//! HTML tokenization.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)

mod entities;
mod machine;
mod token;

pub use machine::{State, Tokenizer};
pub use token::{Attribute, Token};

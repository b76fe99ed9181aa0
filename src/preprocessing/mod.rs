pub mod tokenizer;

pub use tokenizer::{Tokenizer, build_vocabulary};

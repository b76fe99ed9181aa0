pub mod parser;

pub use parser::{Catalog, Item, Rating};

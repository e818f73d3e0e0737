//! The text wire format shared by bridge messages and theme files.
//!
//! A [`DataObject`] is `tag { key = value, ... }` where a value is text,
//! a nested object, or an array `[ ... ]`.

pub mod object;
pub mod parser;
pub mod tokenizer;
pub mod writer;

pub use object::{DataNode, DataObject, DataValue};
pub use parser::{parse_data_objects, parse_data_text};
pub use writer::write_text;

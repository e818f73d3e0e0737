//! Serialise [`DataObject`]s back to the data text format.

use std::fmt::{self, Write};

use super::object::{DataObject, DataValue};

/// Whether `text` can be written without quotes and read back unchanged.
fn is_bare(text: &str) -> bool {
    let mut depth = 0i32;
    let mut chars = text.chars();
    match chars.next() {
        None | Some('/') => return false,
        Some(first) => {
            if matches!(first, '(' | ')') {
                return false;
            }
        }
    }
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            '{' | '}' | '[' | ']' | '=' | '"' | '\'' | '`' | '\\' => return false,
            ',' if depth == 0 => return false,
            c if c.is_whitespace() && depth == 0 => return false,
            _ => {}
        }
    }
    depth == 0 && !text.contains("//") && !text.contains("/*")
}

/// Write `text`, quoting and escaping it when needed.
pub fn write_text(out: &mut impl Write, text: &str) -> fmt::Result {
    if is_bare(text) {
        return out.write_str(text);
    }
    out.write_char('"')?;
    for ch in text.chars() {
        match ch {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\r' => out.write_str("\\r")?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Text(text) => write_text(f, text),
            DataValue::Object(object) => object.fmt(f),
            DataValue::Array(items) => {
                f.write_char('[')?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_char(']')
            }
        }
    }
}

impl fmt::Display for DataObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(f, self.tag())?;
        if self.is_empty() {
            return f.write_str(" {}");
        }
        f.write_str(" { ")?;
        for (index, node) in self.nodes().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write_text(f, &node.tag)?;
            f.write_str(" = ")?;
            node.value.fmt(f)?;
        }
        f.write_str(" }")
    }
}

//! Recursive descent parser for the data text format.
//!
//! ```text
//! object := TEXT '{' [node (',' node)* [',']] '}'
//! node   := TEXT '=' value | object
//! value  := TEXT | object | array
//! array  := '[' [value (',' value)* [',']] ']'
//! ```
//!
//! A node written as a bare object (`styles { ... }` inside another object)
//! is stored under the object's tag.

use logos::Logos;

use super::object::{DataNode, DataObject, DataValue};
use super::tokenizer::Token;
use crate::error::{Error, Result};

/// A positioned token with the source line for error reporting.
#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    line: usize,
}

fn tokenize_with_lines(input: &str) -> Result<Vec<PToken>> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut counted = 0;

    for (result, span) in Token::lexer(input).spanned() {
        line += input[counted..span.start].matches('\n').count();
        counted = span.start;
        match result {
            Ok(token) => tokens.push(PToken { token, line }),
            Err(()) => {
                return Err(Error::Syntax {
                    line,
                    message: format!("unexpected text \"{}\"", &input[span]),
                })
            }
        }
    }

    Ok(tokens)
}

/// Parse a data text holding one object.
pub fn parse_data_text(input: &str) -> Result<DataObject> {
    let tokens = tokenize_with_lines(input)?;
    let mut parser = Parser { tokens, cursor: 0 };
    let object = parser.parse_object()?;
    if let Some(tok) = parser.peek() {
        return Err(parser.error_at(tok.line, "unexpected text after the object"));
    }
    Ok(object)
}

/// Parse a data text holding a sequence of objects.
pub fn parse_data_objects(input: &str) -> Result<Vec<DataObject>> {
    let tokens = tokenize_with_lines(input)?;
    let mut parser = Parser { tokens, cursor: 0 };
    let mut objects = Vec::new();
    while !parser.is_eof() {
        objects.push(parser.parse_object()?);
        parser.eat(&Token::Comma);
    }
    Ok(objects)
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<PToken>,
    cursor: usize,
}

impl Parser {
    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn peek_token(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + offset).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek_token(0) == Some(expected) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn last_line(&self) -> usize {
        self.tokens.last().map(|t| t.line).unwrap_or(1)
    }

    fn error_at(&self, line: usize, message: impl Into<String>) -> Error {
        Error::Syntax {
            line,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.advance() {
            Some(tok) if &tok.token == expected => Ok(()),
            Some(tok) => Err(self.error_at(
                tok.line,
                format!("expected {expected:?}, got {:?}", tok.token),
            )),
            None => Err(self.error_at(
                self.last_line(),
                format!("expected {expected:?}, got end of text"),
            )),
        }
    }

    fn expect_text(&mut self, what: &str) -> Result<String> {
        match self.advance() {
            Some(PToken { token, line }) => match token {
                Token::Quoted(text) | Token::Raw(text) | Token::Text(text) => Ok(text),
                other => Err(self.error_at(line, format!("expected {what}, got {other:?}"))),
            },
            None => Err(self.error_at(self.last_line(), format!("expected {what}, got end of text"))),
        }
    }

    /// `tag { nodes }`
    fn parse_object(&mut self) -> Result<DataObject> {
        let tag = self.expect_text("an object tag")?;
        self.expect(&Token::BraceOpen)?;

        let mut object = DataObject::new(tag);
        loop {
            if self.eat(&Token::BraceClose) {
                break;
            }
            let node = self.parse_node()?;
            object.set(node.tag, node.value);

            if !self.eat(&Token::Comma) {
                self.expect(&Token::BraceClose)?;
                break;
            }
        }
        Ok(object)
    }

    fn parse_node(&mut self) -> Result<DataNode> {
        // `tag { ... }` without a key
        if self.peek_token(0).and_then(Token::text).is_some()
            && self.peek_token(1) == Some(&Token::BraceOpen)
        {
            let object = self.parse_object()?;
            return Ok(DataNode {
                tag: object.tag().to_owned(),
                value: DataValue::Object(object),
            });
        }

        let tag = self.expect_text("a key")?;
        self.expect(&Token::Equals)?;
        let value = self.parse_value()?;
        Ok(DataNode { tag, value })
    }

    fn parse_value(&mut self) -> Result<DataValue> {
        match self.peek_token(0) {
            Some(Token::BracketOpen) => self.parse_array(),
            Some(token) if token.text().is_some() => {
                if self.peek_token(1) == Some(&Token::BraceOpen) {
                    self.parse_object().map(DataValue::Object)
                } else {
                    self.expect_text("a value").map(DataValue::Text)
                }
            }
            Some(other) => {
                let message = format!("expected a value, got {other:?}");
                let line = self.peek().map(|t| t.line).unwrap_or(1);
                Err(self.error_at(line, message))
            }
            None => Err(self.error_at(self.last_line(), "expected a value, got end of text")),
        }
    }

    /// `[ value, ... ]`
    fn parse_array(&mut self) -> Result<DataValue> {
        self.expect(&Token::BracketOpen)?;
        let mut items = Vec::new();
        loop {
            if self.eat(&Token::BracketClose) {
                break;
            }
            items.push(self.parse_value()?);
            if !self.eat(&Token::Comma) {
                self.expect(&Token::BracketClose)?;
                break;
            }
        }
        Ok(DataValue::Array(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Objects ──────────────────────────────────────────────────────

    #[test]
    fn test_flat_object() {
        let object = parse_data_text("event { id = id3, tag = click, x = 10 }").unwrap();
        assert_eq!(object.tag(), "event");
        assert_eq!(object.property_value("id"), Some("id3"));
        assert_eq!(object.property_value("tag"), Some("click"));
        assert_eq!(object.property_int("x"), Some(10));
    }

    #[test]
    fn test_nested_and_keyless_objects() {
        let object = parse_data_text(
            r#"theme {
                name = "my theme",
                constants { a1 = 20mm, a2 = @a1 },
                point = pt { x = 1, y = 2 },
            }"#,
        )
        .unwrap();
        assert_eq!(object.property_value("name"), Some("my theme"));
        let constants = object.property_object("constants").unwrap();
        assert_eq!(constants.property_value("a2"), Some("@a1"));
        let point = object.property_object("point").unwrap();
        assert_eq!(point.tag(), "pt");
        assert_eq!(point.property_value("y"), Some("2"));
    }

    #[test]
    fn test_arrays() {
        let object = parse_data_text("list { items = [one, \"two three\", obj { k = v }, [x]] }").unwrap();
        let items = object.property_array("items").unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].as_text(), Some("one"));
        assert_eq!(items[1].as_text(), Some("two three"));
        assert_eq!(items[2].as_object().map(|o| o.tag()), Some("obj"));
        assert_eq!(items[3].as_array().map(|a| a.len()), Some(1));
    }

    #[test]
    fn test_empty_object_and_array() {
        let object = parse_data_text("o { a = [], b = e {} }").unwrap();
        assert_eq!(object.property_array("a").map(|a| a.len()), Some(0));
        assert!(object.property_object("b").unwrap().is_empty());
    }

    #[test]
    fn test_expression_values() {
        let object = parse_data_text("v { width = sub(100%, @a1), color = rgba(0, 0, 0, 0.5) }").unwrap();
        assert_eq!(object.property_value("width"), Some("sub(100%, @a1)"));
        assert_eq!(object.property_value("color"), Some("rgba(0, 0, 0, 0.5)"));
    }

    #[test]
    fn test_comments() {
        let object = parse_data_text("o { // note\n a = 1, /* skip */ b = 2 }").unwrap();
        assert_eq!(object.property_count(), 2);
    }

    #[test]
    fn test_sequence() {
        let objects = parse_data_objects("a { x = 1 } b { y = 2 }").unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1].tag(), "b");
    }

    // ── Errors ───────────────────────────────────────────────────────

    #[test]
    fn test_missing_equals() {
        let err = parse_data_text("o {\n a 1 }").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_unterminated() {
        assert!(parse_data_text("o { a = 1").is_err());
        assert!(parse_data_text("o { a = [1, 2 }").is_err());
    }

    #[test]
    fn test_trailing_garbage() {
        assert!(parse_data_text("o { } x").is_err());
    }
}

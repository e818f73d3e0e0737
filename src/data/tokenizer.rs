//! logos-based tokenizer for the data text format.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (a `//` comment beats nothing, `"..."` is one token)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Bare text may carry balanced parentheses with spaces and commas inside
//! (`min(100%, sum(10px, 2em))`); the [`bare_text`] callback extends the
//! match until the brackets balance.

use logos::{FilterResult, Lexer, Logos};

/// Data text token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // ── Punctuation ──────────────────────────────────────────────────

    /// `{`
    #[token("{")]
    BraceOpen,

    /// `}`
    #[token("}")]
    BraceClose,

    /// `[`
    #[token("[")]
    BracketOpen,

    /// `]`
    #[token("]")]
    BracketClose,

    /// `=`
    #[token("=")]
    Equals,

    /// `,`
    #[token(",")]
    Comma,

    /// `/* ... */`, never emitted: the callback skips it or reports it unterminated.
    #[token("/*", block_comment)]
    BlockComment,

    // ── Text ─────────────────────────────────────────────────────────

    /// Double- or single-quoted text with backslash escapes, already unescaped.
    #[regex(r#""([^"\\]|\\.)*""#, quoted)]
    #[regex(r"'([^'\\]|\\.)*'", quoted)]
    Quoted(String),

    /// Back-quoted raw text, taken verbatim.
    #[regex(r"`[^`]*`", |lex| { let s = lex.slice(); s[1..s.len() - 1].to_owned() })]
    Raw(String),

    /// Unquoted text: identifiers, numbers, sizes, colors, `@constants`, ...
    #[regex(r#"[^\s{}\[\]=,"'`/][^\s{}\[\]=,"'`]*"#, bare_text)]
    Text(String),
}

impl Token {
    /// The text payload, if this is a text token of any kind.
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Quoted(text) | Token::Raw(text) | Token::Text(text) => Some(text),
            _ => None,
        }
    }
}

fn quoted(lex: &mut Lexer<Token>) -> String {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

/// Resolve `\n`, `\t`, `\r`, `\"`, `\'`, `\\` and `` \` ``; other escapes are kept as written.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(c @ ('"' | '\'' | '\\' | '`')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn block_comment(lex: &mut Lexer<Token>) -> FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(())
        }
    }
}

/// Extend a bare word over any parentheses it opened.
fn bare_text(lex: &mut Lexer<Token>) -> Option<String> {
    let mut depth: i32 = lex.slice().chars().fold(0, |depth, ch| match ch {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    });

    if depth > 0 {
        let mut consumed = None;
        for (index, ch) in lex.remainder().char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        consumed = Some(index + 1);
                        break;
                    }
                }
                _ => {}
            }
        }
        lex.bump(consumed?);
    }

    Some(lex.slice().to_owned())
}

/// Tokenize a data text into a vector of tokens, dropping lexer errors.
pub fn tokenize(input: &str) -> Vec<Token> {
    Token::lexer(input).filter_map(Result::ok).collect()
}

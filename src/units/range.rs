//! Inclusive integer intervals, used for grid cell placement.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An inclusive interval `first..=last`. Text form: `"n"` or `"a:b"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub first: i32,
    pub last: i32,
}

impl Range {
    pub fn new(first: i32, last: i32) -> Self {
        Self { first, last }
    }

    /// A range covering a single index.
    pub fn single(index: i32) -> Self {
        Self::new(index, index)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let number = |s: &str| {
            s.trim()
                .parse::<i32>()
                .map_err(|_| Error::invalid("range", text))
        };
        match text.split_once(':') {
            Some((first, last)) => Ok(Self::new(number(first)?, number(last)?)),
            None => number(text).map(Self::single),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}:{}", self.first, self.last)
        }
    }
}

impl FromStr for Range {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<i32> for Range {
    fn from(index: i32) -> Self {
        Self::single(index)
    }
}

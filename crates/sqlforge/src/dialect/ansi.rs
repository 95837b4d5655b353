//! ANSI SQL dialect.

use regex::Regex;

use super::Dialect;

/// Standard SQL quoting: double-quoted identifiers, single-quoted values.
#[derive(Debug)]
pub struct AnsiDialect {
    boundary: Regex,
}

impl AnsiDialect {
    /// Creates the dialect.
    #[must_use]
    pub fn new() -> Self {
        Self {
            boundary: Regex::new(r"[^0-9a-zA-Z$_:]").expect("valid boundary pattern"),
        }
    }
}

impl Default for AnsiDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for AnsiDialect {
    fn name(&self) -> &'static str {
        "ANSI"
    }

    fn fragment_boundary(&self) -> &Regex {
        &self.boundary
    }
}

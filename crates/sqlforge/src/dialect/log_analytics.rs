//! Dialect for log-analytics query engines.

use regex::Regex;

use crate::value::SqlValue;

use super::{quote_escaped_text, Dialect};

/// Quoting rules for log-analytics engines.
///
/// These engines reject quoted table names and free-form fragments with
/// quoting applied, so fragment quoting is disabled entirely and table names
/// pass through bare. Booleans render as `1` / `0`.
#[derive(Debug)]
pub struct LogAnalyticsDialect {
    boundary: Regex,
}

impl LogAnalyticsDialect {
    /// Creates the dialect.
    #[must_use]
    pub fn new() -> Self {
        Self {
            boundary: Regex::new(r"[^0-9a-zA-Z$_\-:]").expect("valid boundary pattern"),
        }
    }
}

impl Default for LogAnalyticsDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for LogAnalyticsDialect {
    fn name(&self) -> &'static str {
        "LogAnalytics"
    }

    fn identifier_quote_replacement(&self) -> &'static str {
        "\\\""
    }

    fn quotes_table_names(&self) -> bool {
        false
    }

    fn fragment_boundary(&self) -> &Regex {
        &self.boundary
    }

    fn quote_identifier_in_fragment(&self, fragment: &str, _safe_words: &[&str]) -> String {
        String::from(fragment)
    }

    fn quote_value(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Text(text) => quote_escaped_text(text),
            SqlValue::Bool(b) => String::from(if *b { "1" } else { "0" }),
            other => super::render_plain_value(other),
        }
    }

    fn quote_trusted_value(&self, value: &SqlValue) -> String {
        self.quote_value(value)
    }
}

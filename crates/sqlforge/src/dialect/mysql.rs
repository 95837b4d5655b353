//! MySQL dialect.

use regex::Regex;

use crate::value::SqlValue;

use super::{render_plain_value, Dialect, ValueEscaper};

/// MySQL quoting: backtick identifiers, driver-delegated value escaping.
///
/// Without a bound [`ValueEscaper`] the dialect falls back to best-effort
/// escaping and warns, since it has no certified escaping path.
#[derive(Debug)]
pub struct MysqlDialect {
    boundary: Regex,
    escaper: Option<Box<dyn ValueEscaper>>,
}

impl MysqlDialect {
    /// Creates the dialect without a driver escaper.
    #[must_use]
    pub fn new() -> Self {
        Self {
            // Dashes count as identifier characters here.
            boundary: Regex::new(r"[^0-9a-zA-Z$_\-:]").expect("valid boundary pattern"),
            escaper: None,
        }
    }

    /// Creates the dialect with a driver-backed escaper.
    #[must_use]
    pub fn with_escaper(escaper: Box<dyn ValueEscaper>) -> Self {
        Self {
            escaper: Some(escaper),
            ..Self::new()
        }
    }

    fn escape_with_driver(&self, value: &SqlValue) -> Option<String> {
        let escaper = self.escaper.as_ref()?;
        match value {
            SqlValue::Text(text) => Some(format!("'{}'", escaper.escape(text))),
            _ => None,
        }
    }
}

impl Default for MysqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn identifier_quote(&self) -> &'static str {
        "`"
    }

    fn identifier_quote_replacement(&self) -> &'static str {
        "``"
    }

    fn fragment_boundary(&self) -> &Regex {
        &self.boundary
    }

    fn quote_value(&self, value: &SqlValue) -> String {
        if let Some(quoted) = self.escape_with_driver(value) {
            return quoted;
        }
        if let SqlValue::Text(text) = value {
            tracing::warn!(
                dialect = self.name(),
                "quoting a value without driver support can introduce security vulnerabilities"
            );
            return super::quote_escaped_text(text);
        }
        render_plain_value(value)
    }

    fn quote_trusted_value(&self, value: &SqlValue) -> String {
        if let Some(quoted) = self.escape_with_driver(value) {
            return quoted;
        }
        render_plain_value(value)
    }
}

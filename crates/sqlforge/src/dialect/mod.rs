//! SQL dialect support.
//!
//! Different databases quote identifiers and values differently. This module
//! provides the [`Dialect`] trait along with concrete dialects; adding a
//! target database means implementing the trait, with no compiler changes.

mod ansi;
mod log_analytics;
mod mysql;

pub use ansi::AnsiDialect;
pub use log_analytics::LogAnalyticsDialect;
pub use mysql::MysqlDialect;

use std::fmt;

use regex::Regex;

use crate::value::SqlValue;

/// Driver-backed value escaping.
///
/// A dialect bound to a live driver delegates literal escaping to it; the
/// driver's escaping is considered certified and skips the warning path.
pub trait ValueEscaper: fmt::Debug {
    /// Escapes raw text for embedding inside a single-quoted literal.
    fn escape(&self, raw: &str) -> String;
}

/// Quoting and escaping rules for one SQL dialect.
///
/// All methods are pure functions of the input and the dialect's
/// configuration; no state is shared between calls.
pub trait Dialect: fmt::Debug {
    /// The dialect's name.
    fn name(&self) -> &'static str;

    /// The identifier quote symbol.
    fn identifier_quote(&self) -> &'static str {
        "\""
    }

    /// What an embedded quote symbol becomes inside a quoted identifier.
    fn identifier_quote_replacement(&self) -> &'static str {
        "'"
    }

    /// Whether this dialect quotes identifiers at all.
    fn quotes_identifiers(&self) -> bool {
        true
    }

    /// Whether table names get identifier quoting.
    ///
    /// Some engines require bare table names even though column identifiers
    /// are quoted.
    fn quotes_table_names(&self) -> bool {
        true
    }

    /// The separator between chained identifiers.
    fn identifier_separator(&self) -> &'static str {
        "."
    }

    /// Boundary pattern splitting a free-form fragment into tokens.
    ///
    /// Matches single non-identifier characters; matched characters survive
    /// as their own tokens.
    fn fragment_boundary(&self) -> &Regex;

    /// Quotes a single identifier.
    fn quote_identifier(&self, identifier: &str) -> String {
        if !self.quotes_identifiers() {
            return String::from(identifier);
        }
        let quote = self.identifier_quote();
        format!(
            "{quote}{}{quote}",
            identifier.replace(quote, self.identifier_quote_replacement())
        )
    }

    /// Quotes a schema-qualified identifier chain.
    fn quote_identifier_chain(&self, chain: &[&str]) -> String {
        chain
            .iter()
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(self.identifier_separator())
    }

    /// Quotes bare identifiers inside a free-form fragment.
    ///
    /// The fragment is tokenized on [`Dialect::fragment_boundary`]; every
    /// token is quoted except the built-in safe set (`*`, space, `.`, `as`,
    /// case-insensitive) and the caller's `safe_words`. Used for fragments
    /// like JOIN conditions where operators and keywords must pass through.
    fn quote_identifier_in_fragment(&self, fragment: &str, safe_words: &[&str]) -> String {
        if !self.quotes_identifiers() {
            return String::from(fragment);
        }
        let mut out = String::with_capacity(fragment.len() + 8);
        for token in split_with_delimiters(self.fragment_boundary(), fragment) {
            if is_safe_word(token, safe_words) {
                out.push_str(token);
            } else {
                out.push_str(&self.quote_identifier(token));
            }
        }
        out
    }

    /// Escapes and quotes a value as a SQL literal.
    ///
    /// The default implementation has no certified escaping path, so quoting
    /// text raises an operational warning while still producing a
    /// best-effort escaped literal. Only text warns: null, boolean, numeric
    /// and blob values have a single fixed rendering that no driver would
    /// change, so their path is silent.
    fn quote_value(&self, value: &SqlValue) -> String {
        if let SqlValue::Text(text) = value {
            tracing::warn!(
                dialect = self.name(),
                "quoting a value without driver support can introduce security vulnerabilities"
            );
            return quote_escaped_text(text);
        }
        render_plain_value(value)
    }

    /// Quotes a value the caller has already certified as safe.
    ///
    /// Same output as [`Dialect::quote_value`], never warns.
    fn quote_trusted_value(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Text(text) => quote_escaped_text(text),
            other => render_plain_value(other),
        }
    }

    /// Quotes a list of values, comma separated.
    fn quote_value_list(&self, values: &[SqlValue]) -> String {
        values
            .iter()
            .map(|v| self.quote_value(v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Splits `text` on `pattern`, keeping matched delimiters as tokens.
pub(crate) fn split_with_delimiters<'a>(pattern: &Regex, text: &'a str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            parts.push(&text[last..found.start()]);
        }
        parts.push(found.as_str());
        last = found.end();
    }
    if last < text.len() {
        parts.push(&text[last..]);
    }
    parts
}

fn is_safe_word(token: &str, additional: &[&str]) -> bool {
    matches!(token, "*" | " " | ".")
        || token.eq_ignore_ascii_case("as")
        || additional.iter().any(|w| w.eq_ignore_ascii_case(token))
}

/// Backslash-escapes the characters that break out of a quoted literal.
pub(crate) fn quote_escaped_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\u{1a}' => out.push_str("\\Z"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Non-text scalars render the same across dialects.
pub(crate) fn render_plain_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => String::from("NULL"),
        SqlValue::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
        SqlValue::Int(n) => n.to_string(),
        SqlValue::Float(f) => f.to_string(),
        SqlValue::Blob(bytes) => crate::value::hex_literal(bytes),
        SqlValue::Text(text) => quote_escaped_text(text),
    }
}

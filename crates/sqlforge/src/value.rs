//! Scalar SQL values.
//!
//! Every scalar that ends up inside a statement is carried as a [`SqlValue`]
//! so that dialects can decide how to render and escape it.

/// A scalar value destined for a SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL.
    Null,
    /// Boolean, rendered as `TRUE` / `FALSE`.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text, escaped and quoted by the dialect.
    Text(String),
    /// Binary data, rendered as a hex literal.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the value as unquoted text.
    ///
    /// Text comes back verbatim; other scalars use their SQL rendering.
    /// Dialects use this for the identifier side of an argument, where the
    /// raw characters are what gets tokenized and quoted.
    #[must_use]
    pub fn as_plain_text(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::Blob(b) => hex_literal(b),
        }
    }

    /// True if this is `SqlValue::Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

pub(crate) fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("X'");
    for byte in bytes {
        out.push_str(&format!("{byte:02X}"));
    }
    out.push('\'');
    out
}

/// Conversion into a [`SqlValue`].
pub trait ToSqlValue {
    /// Converts the value.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

macro_rules! int_to_sql_value {
    ($($ty:ty),+) => {
        $(impl ToSqlValue for $ty {
            fn to_sql_value(self) -> SqlValue {
                SqlValue::Int(i64::from(self))
            }
        })+
    };
}

int_to_sql_value!(i64, i32, i16, i8, u32, u16, u8);

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_rendering() {
        assert_eq!(SqlValue::Null.as_plain_text(), "NULL");
        assert_eq!(SqlValue::Bool(true).as_plain_text(), "TRUE");
        assert_eq!(SqlValue::Int(-7).as_plain_text(), "-7");
        assert_eq!(SqlValue::Text(String::from("age")).as_plain_text(), "age");
        assert_eq!(SqlValue::Blob(vec![0xAB, 0x01]).as_plain_text(), "X'AB01'");
    }

    #[test]
    fn conversions() {
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!("x".to_sql_value(), SqlValue::Text(String::from("x")));
        assert_eq!(None::<i64>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(1.5_f64).to_sql_value(), SqlValue::Float(1.5));
    }
}

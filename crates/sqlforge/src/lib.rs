//! # sqlforge
//!
//! An in-memory SQL abstract-syntax compiler: expression and predicate
//! trees render to a single finished SQL string through dialect-specific
//! quoting and positional template substitution.
//!
//! This crate provides:
//! - Expression nodes (`Literal`, `Expression`, the predicate family) that
//!   describe themselves as ordered template fragments
//! - A compiler that walks fragment sequences, recursing into nested
//!   expressions and sub-queries
//! - Pluggable dialects (`AnsiDialect`, `MysqlDialect`,
//!   `LogAnalyticsDialect`) for identifier and value quoting
//! - Statement facades (`Select`, `Update`, `Delete`) assembled from
//!   arity-dispatching clause specifications
//!
//! ## Building a predicate
//!
//! ```rust
//! use sqlforge::{AnsiDialect, Select, SqlStatement};
//!
//! let query = Select::new()
//!     .from("users")
//!     .where_clause(|w| {
//!         w.nest()
//!             .greater_than_or_equal_to("age", 18)
//!             .less_than_or_equal_to("age", 65)
//!             .unnest()
//!             .unwrap()
//!             .or()
//!             .equal_to("status", sqlforge::ExprArg::value("vip"));
//!     });
//!
//! let sql = query.sql_string(&AnsiDialect::new()).unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM \"users\" WHERE (\"age\" >= 18 AND \"age\" <= 65) OR \"status\" = 'vip'"
//! );
//! ```
//!
//! The output is always a complete string with every value inlined through
//! the dialect's escaping rules; there is no bind-parameter mode.

pub mod compiler;
pub mod dialect;
pub mod error;
pub mod expr;
mod interpolate;
pub mod predicate;
pub mod specification;
pub mod statement;
pub mod value;

pub use compiler::{compile_expression, CompileContext, SqlStatement};
pub use dialect::{AnsiDialect, Dialect, LogAnalyticsDialect, MysqlDialect, ValueEscaper};
pub use error::{Result, SqlError};
pub use expr::{
    normalize_argument, Argument, ExprArg, Expression, ExpressionNode, Fragment, Literal, Operand,
    ValueKind, PLACEHOLDER,
};
pub use predicate::{
    Between, Combinator, ComparisonOp, Conditional, Exists, Having, In, IsNull, Like, Operator,
    PairValue, Predicate, PredicateSource, Where,
};
pub use specification::{ParamValue, PositionSpec, Specification, TemplateVariant};
pub use statement::{
    ColumnMap, Delete, Join, JoinType, OrderDirection, Projection, Select, TableIdentifier,
    TableSource, Update,
};
pub use value::{SqlValue, ToSqlValue};

//! Positional template substitution.
//!
//! Templates use a small printf-style subset: `%s` consumes the next value in
//! order, `%1$s` references a value by 1-based position (and may repeat), and
//! `%%` is a literal percent sign.

use crate::error::{Result, SqlError};

/// Number of values a template requires.
///
/// Sequential `%s` markers each claim one position; indexed `%N$s` markers
/// claim positions up to `N`. The requirement is the larger of the two.
#[must_use]
pub(crate) fn placeholder_count(template: &str) -> usize {
    let mut sequential = 0;
    let mut max_indexed = 0;
    scan(template, |piece| match piece {
        Piece::Sequential => sequential += 1,
        Piece::Indexed(n) => max_indexed = max_indexed.max(n),
        Piece::Literal(_) | Piece::Percent => {}
    });
    sequential.max(max_indexed)
}

/// Substitutes `values` into `template`.
///
/// The supplied value count must match [`placeholder_count`] exactly.
pub(crate) fn interpolate(template: &str, values: &[String]) -> Result<String> {
    let expected = placeholder_count(template);
    if expected != values.len() {
        return Err(SqlError::ArityMismatch {
            expected,
            found: values.len(),
        });
    }

    let mut out = String::with_capacity(template.len());
    let mut next = 0;
    scan(template, |piece| match piece {
        Piece::Literal(s) => out.push_str(s),
        Piece::Percent => out.push('%'),
        Piece::Sequential => {
            // In range: sequential markers are bounded by the arity check.
            out.push_str(&values[next]);
            next += 1;
        }
        Piece::Indexed(n) => out.push_str(&values[n - 1]),
    });
    Ok(out)
}

enum Piece<'a> {
    Literal(&'a str),
    Percent,
    Sequential,
    Indexed(usize),
}

/// Walks a template, reporting literal runs and placeholder markers in order.
///
/// A `%` not forming a recognized marker is passed through literally.
fn scan<'a>(template: &'a str, mut visit: impl FnMut(Piece<'a>)) {
    let bytes = template.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        if start < i {
            visit(Piece::Literal(&template[start..i]));
        }
        let rest = &bytes[i + 1..];
        if rest.first() == Some(&b'%') {
            visit(Piece::Percent);
            i += 2;
        } else if rest.first() == Some(&b's') {
            visit(Piece::Sequential);
            i += 2;
        } else {
            let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
            let indexed = digits > 0
                && rest.get(digits) == Some(&b'$')
                && rest.get(digits + 1) == Some(&b's');
            if indexed {
                let n: usize = template[i + 1..i + 1 + digits].parse().unwrap_or(0);
                if n > 0 {
                    visit(Piece::Indexed(n));
                    i += digits + 3;
                    start = i;
                    continue;
                }
            }
            // Bare percent with no marker following.
            visit(Piece::Literal(&template[i..=i]));
            i += 1;
        }
        start = i;
    }
    if start < bytes.len() {
        visit(Piece::Literal(&template[start..]));
    }
}

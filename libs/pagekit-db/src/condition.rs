//! Column filter -> `sea_orm::Condition` builders.
//!
//! Text matching is case-insensitive: both sides go through `LOWER`, and
//! non-text columns are cast to `TEXT` first so a substring filter on a date
//! or number behaves like it does in memory.

use pagekit::RangeFilterValues;
use sea_orm::Condition;
use sea_orm::sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr};

use crate::kind::ColumnKind;

/// Escape `LIKE` wildcards so the term is matched literally.
pub(crate) fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

fn lowered_text(expr: SimpleExpr, kind: ColumnKind) -> Expr {
    let text = if kind.is_text() {
        expr
    } else {
        Func::cast_as(expr, Alias::new("TEXT")).into()
    };
    Expr::expr(Func::lower(text))
}

/// `LOWER(col) LIKE '%term%' ESCAPE '\'`, or `None` for a blank term.
#[must_use]
pub fn contains(expr: SimpleExpr, kind: ColumnKind, term: &str) -> Option<Condition> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return None;
    }
    let pattern = format!("%{}%", like_escape(&term));
    Some(Condition::all().add(lowered_text(expr, kind).like(LikeExpr::new(pattern).escape('\\'))))
}

/// `LOWER(col) = value`. A blank value yields a condition matching no row.
#[must_use]
pub fn equals_ignore_case(expr: SimpleExpr, kind: ColumnKind, value: &str) -> Condition {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return Condition::all().add(Expr::cust("1=0"));
    }
    Condition::all().add(lowered_text(expr, kind).eq(value))
}

/// `col BETWEEN from AND to`.
#[must_use]
pub fn in_range(expr: SimpleExpr, range: RangeFilterValues) -> Condition {
    Condition::all().add(Expr::expr(expr).between(range.from, range.to))
}

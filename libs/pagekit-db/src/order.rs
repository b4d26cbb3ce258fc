use pagekit::SortDir;
use sea_orm::Order;
use sea_orm::sea_query::{Func, SimpleExpr};

/// `LOWER(expr)`, for case-insensitive ordering overrides.
#[must_use]
pub fn lower(expr: impl Into<SimpleExpr>) -> SimpleExpr {
    Func::lower(expr).into()
}

#[must_use]
pub fn sea_order(dir: SortDir) -> Order {
    match dir {
        SortDir::Asc => Order::Asc,
        SortDir::Desc => Order::Desc,
    }
}

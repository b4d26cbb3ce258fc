//! Batched count + page execution over SeaORM.
//!
//! The page statement carries an extra `COUNT(*) OVER ()` column, so the
//! rows and the filtered total come back from one statement. Window
//! functions are evaluated before `LIMIT`/`OFFSET`, which keeps the count
//! independent of the page window.
//!
//! Fallback: a page past the end returns no rows and therefore no total.
//! Only then, with a non-zero offset, a second `COUNT` statement is issued.
//!
//! The primary key is always appended as the last sort key, so rows with
//! equal sort values keep one order across separate page statements.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use pagekit::{PageBatch, PageRows, PageStore};
use sea_orm::sea_query::{Expr, Order};
use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, FromQueryResult, Iterable, PaginatorTrait, PrimaryKeyToColumn,
    QueryOrder, QueryResult, QuerySelect, Select,
};

/// Alias of the window column holding the filtered row count.
pub const TOTAL_COUNT_COLUMN: &str = "pagekit_total_count";

/// A row plus the window count selected next to it.
struct Counted<R> {
    row: R,
    total: i64,
}

impl<R: FromQueryResult> FromQueryResult for Counted<R> {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            row: R::from_query_result(res, pre)?,
            total: res.try_get(pre, TOTAL_COUNT_COLUMN)?,
        })
    }
}

/// Append the primary key columns, ascending, after any existing ordering.
fn with_tiebreaker<E: EntityTrait>(select: Select<E>) -> Select<E> {
    E::PrimaryKey::iter().fold(select, |select, key| {
        select.order_by(key.into_column(), Order::Asc)
    })
}

/// [`PageStore`] for `Select<E>` queries on any SeaORM connection.
///
/// `R` is the materialized row: the entity model, or a custom
/// `FromQueryResult` struct when includes add joined columns.
pub struct SeaPageStore<'a, E, R, C> {
    conn: &'a C,
    _marker: PhantomData<fn() -> (E, R)>,
}

impl<E, R, C> fmt::Debug for SeaPageStore<'_, E, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeaPageStore").finish_non_exhaustive()
    }
}

impl<'a, E, R, C> SeaPageStore<'a, E, R, C> {
    #[must_use]
    pub fn new(conn: &'a C) -> Self {
        Self {
            conn,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<E, R, C> PageStore for SeaPageStore<'_, E, R, C>
where
    E: EntityTrait,
    E::Model: Sync,
    R: FromQueryResult + Send + Sync,
    C: ConnectionTrait + Send + Sync,
{
    type Query = Select<E>;
    type Row = R;
    type Error = DbErr;

    async fn execute(&self, batch: PageBatch<Select<E>>) -> Result<PageRows<R>, DbErr> {
        let PageBatch {
            count,
            page,
            window,
        } = batch;
        let page = with_tiebreaker(page);

        let Some(limit) = window.limit else {
            let rows = page.into_model::<R>().all(self.conn).await?;
            let total = rows.len() as u64;
            return Ok(PageRows { rows, total });
        };

        let counted = page
            .expr_as(Expr::cust("COUNT(*) OVER ()"), TOTAL_COUNT_COLUMN)
            .offset(window.offset)
            .limit(limit)
            .into_model::<Counted<R>>()
            .all(self.conn)
            .await?;

        let total = match counted.first() {
            Some(first) => u64::try_from(first.total).unwrap_or_default(),
            None if window.offset == 0 => 0,
            None => {
                tracing::debug!(offset = window.offset, "page past the end, counting separately");
                count.count(self.conn).await?
            }
        };

        Ok(PageRows {
            rows: counted.into_iter().map(|c| c.row).collect(),
            total,
        })
    }
}

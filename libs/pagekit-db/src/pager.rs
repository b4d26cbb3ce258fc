//! Fluent entry point tying a connection, page hooks and an optional
//! cancellation token together.
//!
//! ```ignore
//! let page = Pager::new(&db, &hooks)
//!     .cancel_on(&shutdown)
//!     .fetch(product::Entity::find(), &params)
//!     .await?;
//! ```

use pagekit::{Error, PageHooks, PaginationParams, PaginationResult, paginate, paginate_until_cancelled};
use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, Select};
use tokio_util::sync::CancellationToken;

use crate::store::SeaPageStore;

#[must_use]
pub struct Pager<'a, E: EntityTrait, R, D, C> {
    conn: &'a C,
    hooks: &'a PageHooks<Select<E>, R, D>,
    cancel: Option<&'a CancellationToken>,
}

impl<'a, E, R, D, C> Pager<'a, E, R, D, C>
where
    E: EntityTrait,
    E::Model: Sync,
    R: FromQueryResult + Send + Sync,
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: &'a C, hooks: &'a PageHooks<Select<E>, R, D>) -> Self {
        Self {
            conn,
            hooks,
            cancel: None,
        }
    }

    /// Abandon the request with [`Error::Cancelled`] once `token` fires.
    pub fn cancel_on(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Compute one page of `select`.
    ///
    /// # Errors
    /// Configuration errors from the hooks, [`Error::Store`] wrapping a
    /// `DbErr`, or [`Error::Cancelled`].
    pub async fn fetch(self, select: Select<E>, params: &PaginationParams) -> Result<PaginationResult<D>, Error> {
        let store = SeaPageStore::<E, R, C>::new(self.conn);
        match self.cancel {
            Some(token) => paginate_until_cancelled(&store, select, params, self.hooks, token).await,
            None => paginate(&store, select, params, self.hooks).await,
        }
    }
}

/// One-shot form of [`Pager::fetch`] without cancellation.
///
/// # Errors
/// Same as [`Pager::fetch`].
pub async fn fetch_page<E, R, D, C>(
    conn: &C,
    select: Select<E>,
    params: &PaginationParams,
    hooks: &PageHooks<Select<E>, R, D>,
) -> Result<PaginationResult<D>, Error>
where
    E: EntityTrait,
    E::Model: Sync,
    R: FromQueryResult + Send + Sync,
    C: ConnectionTrait + Send + Sync,
{
    Pager::new(conn, hooks).fetch(select, params).await
}

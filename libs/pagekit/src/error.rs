//! Unified error type for paging operations.

/// Errors produced while resolving parameters or computing a page.
///
/// Malformed paging parameters never end up here: they fall back to defaults in
/// the resolver. What remains is either a rejected request (configuration
/// errors), a cancelled call or a failure reported by the store.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A filter names a column the entity configuration does not know.
    #[error("unsupported filter column: {0}")]
    UnknownFilterColumn(String),

    /// `orderBy` names a column the entity configuration does not know.
    #[error("unsupported orderBy column: {0}")]
    UnknownOrderColumn(String),

    /// `filteredByColumns` and `filteredByValues` do not pair up.
    #[error("filteredByColumns has {columns} entries but filteredByValues has {values}")]
    FilterArity { columns: usize, values: usize },

    /// The caller's cancellation token fired before the page was computed.
    #[error("page request cancelled")]
    Cancelled,

    /// The store failed; the original error is kept as the source.
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a store error without altering it.
    #[must_use]
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Store(Box::new(err))
    }

    /// `true` for errors that reject the request itself (unknown columns,
    /// unpaired filters) as opposed to runtime failures.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnknownFilterColumn(_) | Error::UnknownOrderColumn(_) | Error::FilterArity { .. }
        )
    }

    /// Borrow the store error, if this is one.
    #[must_use]
    pub fn as_store(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Store(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

//! Output-field name -> SQL column registry.
//!
//! A [`ColumnMap`] is the SeaORM counterpart of [`pagekit::FieldMap`]: each
//! name a client may filter or order by is bound once to a column expression,
//! its logical kind and its filter semantics. Columns of joined entities are
//! registered the same way as the root entity's own columns.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use pagekit::{ColumnFilter, Error, MatchMode, PageHooks, SortDir};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select};

use crate::condition;
use crate::kind::ColumnKind;
use crate::order::sea_order;

#[derive(Clone, Debug)]
pub struct MappedColumn {
    pub expr: SimpleExpr,
    pub kind: ColumnKind,
    pub mode: MatchMode,
}

#[must_use]
pub struct ColumnMap<E> {
    map: HashMap<String, MappedColumn>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Default for ColumnMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ColumnMap<E> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for ColumnMap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.map.keys().collect();
        names.sort();
        f.debug_struct("ColumnMap").field("columns", &names).finish()
    }
}

impl<E> ColumnMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            _entity: PhantomData,
        }
    }

    /// Register a table column. `col` may belong to a joined entity.
    pub fn insert<C: ColumnTrait>(
        self,
        name: impl Into<String>,
        col: C,
        kind: ColumnKind,
        mode: MatchMode,
    ) -> Self {
        self.insert_expr(name, Expr::col(col.as_column_ref()).into(), kind, mode)
    }

    /// Register an arbitrary expression (computed or aliased column).
    pub fn insert_expr(
        mut self,
        name: impl Into<String>,
        expr: SimpleExpr,
        kind: ColumnKind,
        mode: MatchMode,
    ) -> Self {
        self.map.insert(name.into(), MappedColumn { expr, kind, mode });
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MappedColumn> {
        self.map.get(name)
    }
}

impl<E: EntityTrait> ColumnMap<E> {
    /// Narrow `select` by one column filter.
    ///
    /// # Errors
    /// Returns [`Error::UnknownFilterColumn`] if the filter names an
    /// unregistered column.
    pub fn apply_filter(&self, select: Select<E>, filter: &ColumnFilter) -> Result<Select<E>, Error> {
        let col = self
            .get(filter.name())
            .ok_or_else(|| Error::UnknownFilterColumn(filter.name().to_owned()))?;
        let cond = match col.mode {
            MatchMode::Contains => condition::contains(col.expr.clone(), col.kind, filter.value()),
            MatchMode::Equals => Some(condition::equals_ignore_case(
                col.expr.clone(),
                col.kind,
                filter.value(),
            )),
            MatchMode::Range => Some(condition::in_range(col.expr.clone(), filter.range_values())),
        };
        Ok(match cond {
            Some(cond) => select.filter(cond),
            None => select,
        })
    }

    /// Append `ORDER BY` for `name`. On an already ordered select this is a
    /// then-by key; a blank name leaves the select untouched.
    ///
    /// # Errors
    /// Returns [`Error::UnknownOrderColumn`] if `name` is not registered.
    pub fn apply_order(&self, select: Select<E>, name: &str, dir: SortDir) -> Result<Select<E>, Error> {
        if name.trim().is_empty() {
            return Ok(select);
        }
        let col = self
            .get(name)
            .ok_or_else(|| Error::UnknownOrderColumn(name.to_owned()))?;
        Ok(select.order_by(col.expr.clone(), sea_order(dir)))
    }
}

impl<E: EntityTrait + 'static> ColumnMap<E> {
    /// Hooks whose filtration and ordering dispatch through this map.
    pub fn hooks<R, D, M>(self, mapping: M) -> PageHooks<Select<E>, R, D>
    where
        R: 'static,
        D: 'static,
        M: Fn(Vec<R>) -> Vec<D> + Send + Sync + 'static,
    {
        let columns = Arc::new(self);
        let for_order = Arc::clone(&columns);
        PageHooks::new(mapping)
            .filtration(move |select, f| columns.apply_filter(select, f))
            .ordering(move |select, name, dir| for_order.apply_order(select, name, dir))
    }
}

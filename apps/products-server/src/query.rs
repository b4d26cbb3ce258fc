//! Product listing: which columns clients may filter and order by, how the
//! vendor is joined in, and the DTO returned to clients.

use chrono::NaiveDateTime;
use pagekit::{Error, MatchMode, PageHooks, PaginationParams, PaginationResult};
use pagekit_db::{ColumnKind, ColumnMap, Pager, order};
use sea_orm::sea_query::Expr;
use sea_orm::{
    DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryOrder, QuerySelect,
    RelationTrait, Select,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::entity::{product, vendor};

pub const ID: &str = "Id";
pub const NAME: &str = "Name";
pub const EXPIRATION_DATE: &str = "ExpirationDate";
pub const COST: &str = "Cost";
pub const VENDOR_NAME: &str = "VendorName";

/// Product row with the joined vendor name.
#[derive(Clone, Debug, FromQueryResult)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub expiration_date: NaiveDateTime,
    pub cost: i32,
    pub vendor_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub expiration_date: NaiveDateTime,
    pub cost: i32,
    pub vendor_name: String,
}

impl From<ProductRow> for ProductDto {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            expiration_date: row.expiration_date,
            cost: row.cost,
            vendor_name: row.vendor_name,
        }
    }
}

pub type ProductsHooks = PageHooks<Select<product::Entity>, ProductRow, ProductDto>;

pub fn columns() -> ColumnMap<product::Entity> {
    ColumnMap::new()
        .insert(ID, product::Column::Id, ColumnKind::Integer, MatchMode::Equals)
        .insert(NAME, product::Column::Name, ColumnKind::Text, MatchMode::Contains)
        .insert(
            EXPIRATION_DATE,
            product::Column::ExpirationDate,
            ColumnKind::DateTime,
            MatchMode::Contains,
        )
        .insert(COST, product::Column::Cost, ColumnKind::Integer, MatchMode::Range)
        .insert(VENDOR_NAME, vendor::Column::Name, ColumnKind::Text, MatchMode::Contains)
}

#[must_use]
pub fn with_vendor(select: Select<product::Entity>) -> Select<product::Entity> {
    select
        .join(JoinType::InnerJoin, product::Relation::Vendor.def())
        .column_as(vendor::Column::Name, "vendor_name")
}

/// Vendor names order case-insensitively; every other column uses the
/// plain column order.
#[must_use]
pub fn hooks() -> ProductsHooks {
    let columns = columns();
    let fallback = columns.clone();
    columns
        .hooks(|rows: Vec<ProductRow>| rows.into_iter().map(ProductDto::from).collect())
        .includes(with_vendor)
        .ordering(move |select, name, dir| {
            if name == VENDOR_NAME {
                Ok(select.order_by(
                    order::lower(Expr::col((vendor::Entity, vendor::Column::Name))),
                    order::sea_order(dir),
                ))
            } else {
                fallback.apply_order(select, name, dir)
            }
        })
}

pub struct ProductsQuery {
    db: DatabaseConnection,
    hooks: ProductsHooks,
}

impl ProductsQuery {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, hooks: hooks() }
    }

    /// One page of products; gives up with [`Error::Cancelled`] once
    /// `cancel` fires.
    ///
    /// # Errors
    /// Unknown filter or order columns, store failures and cancellation.
    pub async fn get_page(
        &self,
        params: &PaginationParams,
        cancel: &CancellationToken,
    ) -> Result<PaginationResult<ProductDto>, Error> {
        Pager::new(&self.db, &self.hooks)
            .cancel_on(cancel)
            .fetch(product::Entity::find(), params)
            .await
    }
}

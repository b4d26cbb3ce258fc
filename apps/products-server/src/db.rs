//! Connection setup, schema creation and demo data.

use chrono::NaiveDateTime;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, Schema, Set,
};

use crate::config::DatabaseConfig;
use crate::entity::{product, vendor};

const VENDORS: &[(i64, &str)] = &[(1, "TestVendor1"), (2, "TestVendor2")];

/// `(id, name, expiration date, cost, vendor id)`
const PRODUCTS: &[(i64, &str, &str, i32, i64)] = &[
    (1, "First", "2022-01-10 00:00:00", 100, 1),
    (2, "Second", "2022-03-15 00:00:00", 250, 1),
    (3, "Third", "2023-07-01 00:00:00", 40, 2),
];

/// Open the pool described by `cfg`.
///
/// # Errors
/// Returns the driver error if the DSN is invalid or unreachable.
pub async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(cfg.dsn.clone());
    opts.max_connections(cfg.max_connections.max(1)).min_connections(1);
    let db = Database::connect(opts).await?;
    tracing::info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

/// Create missing tables and seed them when the vendor table is empty.
///
/// # Errors
/// Propagates any statement failure.
pub async fn prepare(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(schema.create_table_from_entity(vendor::Entity).if_not_exists()))
        .await?;
    db.execute(backend.build(schema.create_table_from_entity(product::Entity).if_not_exists()))
        .await?;

    if vendor::Entity::find().count(db).await? > 0 {
        tracing::debug!("database already seeded");
        return Ok(());
    }

    vendor::Entity::insert_many(VENDORS.iter().map(|&(id, name)| vendor::ActiveModel {
        id: Set(id),
        name: Set(name.to_owned()),
    }))
    .exec(db)
    .await?;

    let products = PRODUCTS
        .iter()
        .map(|&(id, name, expires, cost, vendor_id)| {
            Ok(product::ActiveModel {
                id: Set(id),
                name: Set(name.to_owned()),
                expiration_date: Set(parse_timestamp(expires)?),
                cost: Set(cost),
                vendor_id: Set(vendor_id),
            })
        })
        .collect::<Result<Vec<_>, DbErr>>()?;
    product::Entity::insert_many(products).exec(db).await?;

    tracing::info!(vendors = VENDORS.len(), products = PRODUCTS.len(), "seeded demo data");
    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DbErr> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| DbErr::Custom(format!("invalid seed timestamp '{raw}': {e}")))
}

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use pagekit::{MatchMode, PageHooks};
use pagekit_db::{ColumnKind, ColumnMap};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, FromQueryResult,
    JoinType, QuerySelect, RelationTrait, Schema, Select, Set,
};

pub mod author {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "author")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::book::Entity")]
        Book,
    }

    impl Related<super::book::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Book.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod book {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "book")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i32,
        pub title: String,
        pub year: i32,
        pub author_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::author::Entity",
            from = "Column::AuthorId",
            to = "super::author::Column::Id"
        )]
        Author,
    }

    impl Related<super::author::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Author.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Book joined with its author's name.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct BookRow {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub author_name: String,
}

pub const BOOKS: &[(i32, &str, i32, i32)] = &[
    (1, "Dune", 1965, 1),
    (2, "Children of Dune", 1976, 1),
    (3, "Neuromancer", 1984, 2),
    (4, "100% Pure", 2001, 3),
    (5, "Count Zero", 1986, 2),
    (6, "dune messiah", 1969, 1),
];

pub async fn connect() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(author::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(book::Entity)))
        .await
        .unwrap();

    author::Entity::insert_many([
        author::ActiveModel {
            id: Set(1),
            name: Set("Frank Herbert".to_owned()),
        },
        author::ActiveModel {
            id: Set(2),
            name: Set("william gibson".to_owned()),
        },
        author::ActiveModel {
            id: Set(3),
            name: Set("Anon_Ymous".to_owned()),
        },
    ])
    .exec(&db)
    .await
    .unwrap();

    book::Entity::insert_many(BOOKS.iter().map(|&(id, title, year, author_id)| book::ActiveModel {
        id: Set(id),
        title: Set(title.to_owned()),
        year: Set(year),
        author_id: Set(author_id),
    }))
    .exec(&db)
    .await
    .unwrap();

    db
}

pub fn columns() -> ColumnMap<book::Entity> {
    ColumnMap::new()
        .insert("Id", book::Column::Id, ColumnKind::Integer, MatchMode::Equals)
        .insert("Title", book::Column::Title, ColumnKind::Text, MatchMode::Contains)
        .insert("Year", book::Column::Year, ColumnKind::Integer, MatchMode::Range)
        .insert("Published", book::Column::Year, ColumnKind::Integer, MatchMode::Contains)
        .insert("AuthorName", author::Column::Name, ColumnKind::Text, MatchMode::Contains)
        .insert("Author", author::Column::Name, ColumnKind::Text, MatchMode::Equals)
}

pub fn with_author(select: Select<book::Entity>) -> Select<book::Entity> {
    select
        .join(JoinType::InnerJoin, book::Relation::Author.def())
        .column_as(author::Column::Name, "author_name")
}

pub fn hooks() -> PageHooks<Select<book::Entity>, BookRow, BookRow> {
    columns()
        .hooks(|rows: Vec<BookRow>| rows)
        .includes(with_author)
}

pub fn ids(rows: &[BookRow]) -> Vec<i32> {
    rows.iter().map(|r| r.id).collect()
}

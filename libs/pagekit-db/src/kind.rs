//! Logical column types, used to decide how a column is compared as text.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Bool,
    Date,
    DateTime,
    Uuid,
}

impl ColumnKind {
    /// `true` when the column can be fed to `LIKE`/`LOWER` without a cast.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, ColumnKind::Text)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Text => "text",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Bool => "bool",
            ColumnKind::Date => "date",
            ColumnKind::DateTime => "datetime",
            ColumnKind::Uuid => "uuid",
        };
        f.write_str(name)
    }
}

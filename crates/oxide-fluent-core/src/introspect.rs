//! Schema introspection trait.
//!
//! Driver crates (oxide-fluent-sqlite, etc.) implement
//! [`SchemaIntrospector`] to expose the live database schema to existence
//! checks. The core crate defines only the trait and its row types so it
//! stays driver-agnostic.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One column pair of a foreign key discovered in the live schema.
///
/// Composite keys appear as several rows sharing the same `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    /// Referencing table.
    pub foreign_table: String,
    /// Referencing column.
    pub foreign_column: String,
    /// Referenced table.
    pub primary_table: String,
    /// Referenced column.
    pub primary_column: String,
    /// Constraint name.
    pub name: String,
}

impl ForeignKeyInfo {
    /// Creates a foreign key row.
    #[must_use]
    pub fn new(
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
        primary_table: impl Into<String>,
        primary_column: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            foreign_table: foreign_table.into(),
            foreign_column: foreign_column.into(),
            primary_table: primary_table.into(),
            primary_column: primary_column.into(),
            name: name.into(),
        }
    }
}

/// A column discovered in the live schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Owning table.
    pub table_name: String,
    /// Column name.
    pub column_name: String,
    /// Declared type, as reported by the database.
    pub data_type: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
}

/// One column of an index discovered in the live schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Indexed table.
    pub table_name: String,
    /// Index name.
    pub index_name: String,
    /// Indexed column.
    pub column_name: String,
    /// Whether the index is unique.
    pub unique: bool,
}

/// Reads schema metadata from a live database.
///
/// Calls are synchronous and may block. Failures are surfaced unchanged as
/// [`FluentError::Introspection`](crate::FluentError::Introspection); no
/// retries are attempted.
pub trait SchemaIntrospector {
    /// Lists every foreign key column pair in the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    fn foreign_keys(&self) -> Result<Vec<ForeignKeyInfo>>;

    /// Lists the user tables in the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    fn tables(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Lists every column of every user table.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    fn columns(&self) -> Result<Vec<ColumnInfo>> {
        Ok(Vec::new())
    }

    /// Lists every indexed column of every user table.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    fn indexes(&self) -> Result<Vec<IndexInfo>> {
        Ok(Vec::new())
    }
}

/// Case-insensitive identifier comparison.
pub(crate) fn names_equal(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Whether an optional name filter accepts `value`. No filter accepts all.
pub(crate) fn filter_accepts(filter: Option<&str>, value: &str) -> bool {
    match filter {
        Some(wanted) => names_equal(wanted, value),
        None => true,
    }
}

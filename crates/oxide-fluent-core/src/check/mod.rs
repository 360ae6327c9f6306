//! Existence checks against the live schema.
//!
//! Checks never queue anything. They ask the context's
//! [`SchemaIntrospector`] what exists, so a migration can skip a change that
//! was already applied.

mod foreign_key;
mod schema;

pub use foreign_key::{
    CheckForeignKeyBuilder, CheckForeignKeyExpression, ColumnsChosen, ForeignKeyMatch, Settled,
    TableChosen, Unset,
};
pub use schema::{CheckColumnBuilder, CheckIndexBuilder, CheckTableBuilder};

use crate::introspect::SchemaIntrospector;

/// Entry point of every Check chain.
pub struct CheckBuilder<'a> {
    introspector: &'a dyn SchemaIntrospector,
}

impl<'a> CheckBuilder<'a> {
    pub(crate) fn new(introspector: &'a dyn SchemaIntrospector) -> Self {
        Self { introspector }
    }

    /// Checks for a foreign key, whatever its name.
    #[must_use]
    pub fn foreign_key(self) -> CheckForeignKeyBuilder<'a, Unset, Unset> {
        CheckForeignKeyBuilder::new(self.introspector, None)
    }

    /// Checks for a foreign key of the given name.
    #[must_use]
    pub fn foreign_key_named(
        self,
        foreign_key_name: impl Into<String>,
    ) -> CheckForeignKeyBuilder<'a, Unset, Unset> {
        CheckForeignKeyBuilder::new(self.introspector, Some(foreign_key_name.into()))
    }

    /// Checks for a table.
    #[must_use]
    pub fn table(self, table_name: impl Into<String>) -> CheckTableBuilder<'a> {
        CheckTableBuilder::new(self.introspector, table_name.into())
    }

    /// Checks for a column.
    #[must_use]
    pub fn column(self, column_name: impl Into<String>) -> CheckColumnBuilder<'a> {
        CheckColumnBuilder::new(self.introspector, column_name.into())
    }

    /// Checks for an index.
    #[must_use]
    pub fn index(self, index_name: impl Into<String>) -> CheckIndexBuilder<'a> {
        CheckIndexBuilder::new(self.introspector, index_name.into())
    }
}

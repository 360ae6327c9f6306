//! Entry builders.

use std::collections::BTreeSet;

use crate::provider::DatabaseProvider;
use crate::queue::ExpressionQueue;
use crate::types::ConstraintType;

use super::column::CreateColumnBuilder;
use super::constraint::{ConstraintTablePending, CreateConstraintBuilder};
use super::foreign_key::{CreateForeignKeyBuilder, FromTablePending};
use super::index::{CreateIndexBuilder, IndexTablePending};
use super::table::CreateTableBuilder;
use super::Scope;

/// Entry point of every Create chain.
///
/// Each method queues exactly one expression at the tail and returns the
/// builder that configures it. Names are passed through as given.
#[derive(Debug)]
pub struct CreateBuilder<'a> {
    scope: Scope<'a>,
}

impl<'a> CreateBuilder<'a> {
    pub(crate) fn new(
        queue: &'a mut ExpressionQueue,
        providers: BTreeSet<DatabaseProvider>,
    ) -> Self {
        Self {
            scope: Scope::new(queue, providers),
        }
    }

    /// Creates a table.
    pub fn table(self, table_name: impl Into<String>) -> CreateTableBuilder<'a> {
        CreateTableBuilder::new(self.scope, table_name.into())
    }

    /// Adds a column to an existing table.
    pub fn column(self, column_name: impl Into<String>) -> CreateColumnBuilder<'a> {
        CreateColumnBuilder::new(self.scope, column_name.into())
    }

    /// Adds a foreign key named after its tables and first referenced column.
    pub fn foreign_key(self) -> CreateForeignKeyBuilder<'a, FromTablePending> {
        CreateForeignKeyBuilder::new(self.scope, None)
    }

    /// Adds a named foreign key.
    pub fn foreign_key_named(
        self,
        foreign_key_name: impl Into<String>,
    ) -> CreateForeignKeyBuilder<'a, FromTablePending> {
        CreateForeignKeyBuilder::new(self.scope, Some(foreign_key_name.into()))
    }

    /// Creates an index named after its table and first column.
    pub fn index(self) -> CreateIndexBuilder<'a, IndexTablePending> {
        CreateIndexBuilder::new(self.scope, None)
    }

    /// Creates a named index.
    pub fn index_named(
        self,
        index_name: impl Into<String>,
    ) -> CreateIndexBuilder<'a, IndexTablePending> {
        CreateIndexBuilder::new(self.scope, Some(index_name.into()))
    }

    /// Adds a primary key constraint.
    pub fn primary_key(self) -> CreateConstraintBuilder<'a, ConstraintTablePending> {
        CreateConstraintBuilder::new(self.scope, ConstraintType::PrimaryKey, None)
    }

    /// Adds a named primary key constraint.
    pub fn primary_key_named(
        self,
        primary_key_name: impl Into<String>,
    ) -> CreateConstraintBuilder<'a, ConstraintTablePending> {
        CreateConstraintBuilder::new(
            self.scope,
            ConstraintType::PrimaryKey,
            Some(primary_key_name.into()),
        )
    }

    /// Adds a unique constraint.
    pub fn unique_constraint(self) -> CreateConstraintBuilder<'a, ConstraintTablePending> {
        CreateConstraintBuilder::new(self.scope, ConstraintType::Unique, None)
    }

    /// Adds a named unique constraint.
    pub fn unique_constraint_named(
        self,
        constraint_name: impl Into<String>,
    ) -> CreateConstraintBuilder<'a, ConstraintTablePending> {
        CreateConstraintBuilder::new(
            self.scope,
            ConstraintType::Unique,
            Some(constraint_name.into()),
        )
    }

    /// Adds a named constraint that is neither a primary key nor unique.
    pub fn constraint(
        self,
        constraint_name: impl Into<String>,
    ) -> CreateConstraintBuilder<'a, ConstraintTablePending> {
        CreateConstraintBuilder::new(
            self.scope,
            ConstraintType::NonUnique,
            Some(constraint_name.into()),
        )
    }
}

/// Entry point for expressions that only apply to some providers.
///
/// Every expression queued through [`create`](Self::create), including
/// foreign keys and indexes declared on columns, records the provider set.
#[derive(Debug)]
pub struct IfDatabaseBuilder<'a> {
    queue: &'a mut ExpressionQueue,
    providers: BTreeSet<DatabaseProvider>,
}

impl<'a> IfDatabaseBuilder<'a> {
    pub(crate) fn new(
        queue: &'a mut ExpressionQueue,
        providers: BTreeSet<DatabaseProvider>,
    ) -> Self {
        Self { queue, providers }
    }

    /// Returns the providers the gate lets through.
    #[must_use]
    pub const fn providers(&self) -> &BTreeSet<DatabaseProvider> {
        &self.providers
    }

    /// Starts a Create chain gated to the providers.
    pub fn create(self) -> CreateBuilder<'a> {
        CreateBuilder::new(self.queue, self.providers)
    }
}

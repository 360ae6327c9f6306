//! Fluent builders that declare schema changes.
//!
//! Every builder wraps one queued expression and exposes only the calls
//! legal at its stage. Moving to the next stage consumes the builder and
//! returns a differently typed view of the same expression, so an
//! out-of-order call does not compile:
//!
//! ```rust
//! use oxide_fluent_core::prelude::*;
//!
//! let mut context = MigrationContext::new(DatabaseProvider::Sqlite);
//! context
//!     .create()
//!     .table("posts")
//!     .with_column("id").as_int32().primary_key().identity()
//!     .with_column("author_id").as_int32().not_nullable()
//!     .foreign_key("users", "id").on_delete_or_update(Rule::Cascade)
//!     .with_column("title").as_string_sized(200).not_nullable();
//!
//! // CREATE TABLE, then the inline foreign key.
//! assert_eq!(context.expressions().len(), 2);
//! ```

mod column;
mod column_option;
mod column_type;
mod constraint;
mod create;
mod foreign_key;
mod index;
mod table;

use std::collections::BTreeSet;

pub use column::{
    CreateColumnBuilder, CreateColumnCascadeBuilder, CreateColumnOptionBuilder,
    CreateColumnTypeBuilder,
};
pub use column_option::{ColumnCursor, ColumnOptionSyntax, ForeignKeyCascadeSyntax};
pub use column_type::ColumnTypeSyntax;
pub use constraint::{ConstraintColumnsPending, ConstraintTablePending, CreateConstraintBuilder};
pub use create::{CreateBuilder, IfDatabaseBuilder};
pub use foreign_key::{
    CascadeOptions, CreateForeignKeyBuilder, ForeignColumnsPending, FromTablePending,
    PrimaryColumnsPending, ToTablePending,
};
pub use index::{CreateIndexBuilder, IndexColumnsPending, IndexOptions, IndexTablePending};
pub use table::{
    CreateTableBuilder, TableColumnCascadeBuilder, TableColumnOptionBuilder,
    TableColumnTypeBuilder,
};

use crate::expression::ExpressionVariant;
use crate::provider::DatabaseProvider;
use crate::queue::{ExpressionId, ExpressionQueue};

/// Write access to the queue for the duration of one fluent chain.
///
/// Carries the provider gate so that every expression appended along the
/// chain, including inline foreign keys and indexes, records it.
#[derive(Debug)]
pub(crate) struct Scope<'a> {
    queue: &'a mut ExpressionQueue,
    providers: BTreeSet<DatabaseProvider>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        queue: &'a mut ExpressionQueue,
        providers: BTreeSet<DatabaseProvider>,
    ) -> Self {
        Self { queue, providers }
    }

    pub(crate) fn append<E: ExpressionVariant>(&mut self, expression: E) -> ExpressionId<E> {
        self.queue.append(expression, &self.providers)
    }

    pub(crate) fn get_mut<E: ExpressionVariant>(&mut self, id: ExpressionId<E>) -> &mut E {
        self.queue.get_mut(id)
    }
}

//! Create Index builder.

use std::marker::PhantomData;

use crate::expression::{CreateIndexExpression, IndexColumn};
use crate::queue::ExpressionId;
use crate::types::{ConstraintType, Direction};

use super::Scope;

/// Marker: the indexed table is not set.
#[derive(Debug, Clone, Copy)]
pub struct IndexTablePending;

/// Marker: no column is indexed yet.
#[derive(Debug, Clone, Copy)]
pub struct IndexColumnsPending;

/// Marker: at least one column is indexed; options and more columns follow.
#[derive(Debug, Clone, Copy)]
pub struct IndexOptions;

/// A queued CREATE INDEX.
///
/// `ascending` and `descending` apply to the most recently added column.
///
/// ```rust
/// use oxide_fluent_core::prelude::*;
///
/// let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
/// let id = context
///     .create()
///     .index()
///     .on_table("umbracoLog")
///     .on_column("NodeId").ascending()
///     .on_column("Datestamp").descending()
///     .non_unique()
///     .id();
///
/// let index = context.expressions().get(id).unwrap();
/// assert_eq!(index.effective_name(), "IX_umbracoLog_NodeId");
/// assert_eq!(index.columns[1].direction, Direction::Descending);
/// ```
#[derive(Debug)]
pub struct CreateIndexBuilder<'a, S> {
    scope: Scope<'a>,
    index: ExpressionId<CreateIndexExpression>,
    _state: PhantomData<S>,
}

impl<'a> CreateIndexBuilder<'a, IndexTablePending> {
    pub(crate) fn new(mut scope: Scope<'a>, name: Option<String>) -> Self {
        let index = scope.append(CreateIndexExpression::new(name));
        Self {
            scope,
            index,
            _state: PhantomData,
        }
    }

    /// Sets the indexed table.
    pub fn on_table(
        self,
        table_name: impl Into<String>,
    ) -> CreateIndexBuilder<'a, IndexColumnsPending> {
        self.update(|index| index.table_name = table_name.into())
    }
}

impl<'a> CreateIndexBuilder<'a, IndexColumnsPending> {
    /// Adds an ascending column.
    pub fn on_column(self, column_name: impl Into<String>) -> CreateIndexBuilder<'a, IndexOptions> {
        self.update(|index| index.columns.push(IndexColumn::new(column_name)))
    }

    /// Adds several ascending columns.
    pub fn on_columns<I, C>(self, column_names: I) -> CreateIndexBuilder<'a, IndexOptions>
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.update(|index| index.columns.extend(column_names.into_iter().map(IndexColumn::new)))
    }
}

impl<'a> CreateIndexBuilder<'a, IndexOptions> {
    /// Adds another ascending column.
    pub fn on_column(self, column_name: impl Into<String>) -> Self {
        self.update(|index| index.columns.push(IndexColumn::new(column_name)))
    }

    /// Sorts the last added column ascending.
    pub fn ascending(self) -> Self {
        self.update(|index| set_last_direction(index, Direction::Ascending))
    }

    /// Sorts the last added column descending.
    pub fn descending(self) -> Self {
        self.update(|index| set_last_direction(index, Direction::Descending))
    }

    /// Makes the index unique.
    pub fn unique(self) -> Self {
        self.update(|index| index.constraint_type = ConstraintType::Unique)
    }

    /// Makes the index non-unique.
    pub fn non_unique(self) -> Self {
        self.update(|index| index.constraint_type = ConstraintType::NonUnique)
    }

    /// Makes the index clustered.
    pub fn clustered(self) -> Self {
        self.update(|index| index.clustered = true)
    }

    /// Makes the index non-clustered.
    pub fn non_clustered(self) -> Self {
        self.update(|index| index.clustered = false)
    }
}

impl<'a, S> CreateIndexBuilder<'a, S> {
    /// Returns the handle of the queued index.
    #[must_use]
    pub const fn id(&self) -> ExpressionId<CreateIndexExpression> {
        self.index
    }

    fn update<T>(
        mut self,
        f: impl FnOnce(&mut CreateIndexExpression),
    ) -> CreateIndexBuilder<'a, T> {
        f(self.scope.get_mut(self.index));
        CreateIndexBuilder {
            scope: self.scope,
            index: self.index,
            _state: PhantomData,
        }
    }
}

fn set_last_direction(index: &mut CreateIndexExpression, direction: Direction) {
    if let Some(column) = index.columns.last_mut() {
        column.direction = direction;
    }
}

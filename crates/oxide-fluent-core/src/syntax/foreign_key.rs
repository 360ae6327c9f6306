//! Create Foreign Key builder.

use std::marker::PhantomData;

use crate::expression::CreateForeignKeyExpression;
use crate::queue::ExpressionId;

use super::column_option::ForeignKeyCascadeSyntax;
use super::Scope;

// =============================================================================
// Typestate Markers
// =============================================================================

/// Marker: the referencing table is not set.
#[derive(Debug, Clone, Copy)]
pub struct FromTablePending;

/// Marker: the referencing columns are not set.
#[derive(Debug, Clone, Copy)]
pub struct ForeignColumnsPending;

/// Marker: the referenced table is not set.
#[derive(Debug, Clone, Copy)]
pub struct ToTablePending;

/// Marker: the referenced columns are not set.
#[derive(Debug, Clone, Copy)]
pub struct PrimaryColumnsPending;

/// Marker: the key is complete and takes cascade rules.
#[derive(Debug, Clone, Copy)]
pub struct CascadeOptions;

// =============================================================================
// CreateForeignKeyBuilder
// =============================================================================

/// A queued ADD FOREIGN KEY.
///
/// Sides are declared in order: referencing table and columns, then
/// referenced table and columns, then optional cascade rules.
///
/// # Example
///
/// ```rust
/// use oxide_fluent_core::prelude::*;
///
/// let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
/// let id = context
///     .create()
///     .foreign_key()
///     .from_table("Foo")
///     .foreign_column("BarId")
///     .to_table("Bar")
///     .primary_column("BarId")
///     .on_delete(Rule::Cascade)
///     .on_update(Rule::None);
///
/// let fk = context.expressions().get(id).unwrap();
/// assert_eq!(fk.effective_name(), "FK_Foo_Bar_BarId");
/// ```
#[derive(Debug)]
pub struct CreateForeignKeyBuilder<'a, S> {
    scope: Scope<'a>,
    foreign_key: ExpressionId<CreateForeignKeyExpression>,
    _state: PhantomData<S>,
}

impl<'a> CreateForeignKeyBuilder<'a, FromTablePending> {
    pub(crate) fn new(mut scope: Scope<'a>, name: Option<String>) -> Self {
        let foreign_key = scope.append(CreateForeignKeyExpression::new(name));
        Self {
            scope,
            foreign_key,
            _state: PhantomData,
        }
    }

    /// Sets the referencing table.
    pub fn from_table(
        self,
        table_name: impl Into<String>,
    ) -> CreateForeignKeyBuilder<'a, ForeignColumnsPending> {
        self.update(|fk| fk.foreign_table = table_name.into())
    }
}

impl<'a> CreateForeignKeyBuilder<'a, ForeignColumnsPending> {
    /// Sets the schema of the referencing table.
    pub fn in_schema(self, schema_name: impl Into<String>) -> Self {
        self.update(|fk| fk.foreign_table_schema = Some(schema_name.into()))
    }

    /// Sets a single referencing column.
    pub fn foreign_column(
        self,
        column_name: impl Into<String>,
    ) -> CreateForeignKeyBuilder<'a, ToTablePending> {
        self.update(|fk| fk.foreign_columns.push(column_name.into()))
    }

    /// Sets the referencing columns.
    pub fn foreign_columns<I, C>(
        self,
        column_names: I,
    ) -> CreateForeignKeyBuilder<'a, ToTablePending>
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.update(|fk| fk.foreign_columns.extend(column_names.into_iter().map(Into::into)))
    }
}

impl<'a> CreateForeignKeyBuilder<'a, ToTablePending> {
    /// Sets the referenced table.
    pub fn to_table(
        self,
        table_name: impl Into<String>,
    ) -> CreateForeignKeyBuilder<'a, PrimaryColumnsPending> {
        self.update(|fk| fk.primary_table = table_name.into())
    }

    /// Sets the referenced table and its schema.
    pub fn to_table_in_schema(
        self,
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
    ) -> CreateForeignKeyBuilder<'a, PrimaryColumnsPending> {
        self.update(|fk| {
            fk.primary_table_schema = Some(schema_name.into());
            fk.primary_table = table_name.into();
        })
    }
}

impl<'a> CreateForeignKeyBuilder<'a, PrimaryColumnsPending> {
    /// Sets a single referenced column.
    pub fn primary_column(
        self,
        column_name: impl Into<String>,
    ) -> CreateForeignKeyBuilder<'a, CascadeOptions> {
        self.update(|fk| fk.primary_columns.push(column_name.into()))
    }

    /// Sets the referenced columns.
    pub fn primary_columns<I, C>(
        self,
        column_names: I,
    ) -> CreateForeignKeyBuilder<'a, CascadeOptions>
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.update(|fk| fk.primary_columns.extend(column_names.into_iter().map(Into::into)))
    }
}

impl<'a, S> CreateForeignKeyBuilder<'a, S> {
    /// Returns the handle of the queued foreign key.
    #[must_use]
    pub const fn id(&self) -> ExpressionId<CreateForeignKeyExpression> {
        self.foreign_key
    }

    fn update<T>(
        mut self,
        f: impl FnOnce(&mut CreateForeignKeyExpression),
    ) -> CreateForeignKeyBuilder<'a, T> {
        f(self.scope.get_mut(self.foreign_key));
        CreateForeignKeyBuilder {
            scope: self.scope,
            foreign_key: self.foreign_key,
            _state: PhantomData,
        }
    }
}

impl ForeignKeyCascadeSyntax for CreateForeignKeyBuilder<'_, CascadeOptions> {
    type Next = ExpressionId<CreateForeignKeyExpression>;

    fn foreign_key_mut(&mut self) -> &mut CreateForeignKeyExpression {
        self.scope.get_mut(self.foreign_key)
    }

    fn leave_cascade(self) -> Self::Next {
        self.foreign_key
    }
}

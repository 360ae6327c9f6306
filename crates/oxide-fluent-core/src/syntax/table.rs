//! Create Table builders.
//!
//! A table chain alternates between three builders:
//!
//! - [`CreateTableBuilder`] waits for the first `with_column`.
//! - [`TableColumnTypeBuilder`] waits for the column type.
//! - [`TableColumnOptionBuilder`] takes options, more type calls or the
//!   next `with_column`. Foreign key options move to
//!   [`TableColumnCascadeBuilder`].

use crate::expression::{
    ColumnDefinition, CreateForeignKeyExpression, CreateTableExpression,
};
use crate::queue::ExpressionId;

use super::column_option::{ColumnCursor, ColumnOptionSyntax, ForeignKeyCascadeSyntax};
use super::column_type::ColumnTypeSyntax;
use super::Scope;

fn push_column<'a>(
    mut scope: Scope<'a>,
    table: ExpressionId<CreateTableExpression>,
    name: String,
) -> TableColumnTypeBuilder<'a> {
    let columns = &mut scope.get_mut(table).columns;
    columns.push(ColumnDefinition::new(name));
    let index = columns.len() - 1;
    TableColumnTypeBuilder {
        cursor: ColumnCursor::for_table_column(scope, table, index),
        table,
    }
}

// =============================================================================
// CreateTableBuilder
// =============================================================================

/// A queued CREATE TABLE waiting for its first column.
///
/// # Example
///
/// ```rust
/// use oxide_fluent_core::prelude::*;
///
/// let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
/// context
///     .create()
///     .table("users")
///     .with_column("id").as_int32().identity().primary_key()
///     .with_column("email").as_string_sized(255).unique_named("IX_users_email");
///
/// let Some(Expression::CreateTable(users)) = context.expressions().iter().next() else {
///     unreachable!()
/// };
/// assert_eq!(users.columns.len(), 2);
/// // The unique option queued its own index after the table.
/// assert_eq!(context.expressions().len(), 2);
/// ```
#[derive(Debug)]
pub struct CreateTableBuilder<'a> {
    scope: Scope<'a>,
    table: ExpressionId<CreateTableExpression>,
}

impl<'a> CreateTableBuilder<'a> {
    pub(crate) fn new(mut scope: Scope<'a>, table_name: String) -> Self {
        let table = scope.append(CreateTableExpression::new(table_name));
        Self { scope, table }
    }

    /// Returns the handle of the queued table.
    #[must_use]
    pub const fn id(&self) -> ExpressionId<CreateTableExpression> {
        self.table
    }

    /// Adds a column to the table.
    pub fn with_column(self, name: impl Into<String>) -> TableColumnTypeBuilder<'a> {
        push_column(self.scope, self.table, name.into())
    }
}

// =============================================================================
// TableColumnTypeBuilder
// =============================================================================

/// A table column waiting for its type.
#[derive(Debug)]
pub struct TableColumnTypeBuilder<'a> {
    cursor: ColumnCursor<'a>,
    table: ExpressionId<CreateTableExpression>,
}

impl<'a> ColumnTypeSyntax for TableColumnTypeBuilder<'a> {
    type Next = TableColumnOptionBuilder<'a>;

    fn column_definition(&mut self) -> &mut ColumnDefinition {
        self.cursor.definition()
    }

    fn into_typed(self) -> Self::Next {
        TableColumnOptionBuilder {
            cursor: self.cursor,
            table: self.table,
        }
    }
}

// =============================================================================
// TableColumnOptionBuilder
// =============================================================================

/// A typed table column taking options.
#[derive(Debug)]
pub struct TableColumnOptionBuilder<'a> {
    cursor: ColumnCursor<'a>,
    table: ExpressionId<CreateTableExpression>,
}

impl<'a> TableColumnOptionBuilder<'a> {
    /// Returns the handle of the queued table.
    #[must_use]
    pub const fn id(&self) -> ExpressionId<CreateTableExpression> {
        self.table
    }

    /// Adds another column to the table.
    pub fn with_column(self, name: impl Into<String>) -> TableColumnTypeBuilder<'a> {
        push_column(self.cursor.into_scope(), self.table, name.into())
    }
}

impl<'a> ColumnTypeSyntax for TableColumnOptionBuilder<'a> {
    type Next = Self;

    fn column_definition(&mut self) -> &mut ColumnDefinition {
        self.cursor.definition()
    }

    fn into_typed(self) -> Self {
        self
    }
}

impl<'a> ColumnOptionSyntax<'a> for TableColumnOptionBuilder<'a> {
    type Options = Self;
    type Cascade = TableColumnCascadeBuilder<'a>;

    fn cursor(&mut self) -> &mut ColumnCursor<'a> {
        &mut self.cursor
    }

    fn into_options(self) -> Self {
        self
    }

    fn into_cascade(
        self,
        foreign_key: ExpressionId<CreateForeignKeyExpression>,
    ) -> Self::Cascade {
        TableColumnCascadeBuilder {
            cursor: self.cursor,
            table: self.table,
            foreign_key,
        }
    }
}

// =============================================================================
// TableColumnCascadeBuilder
// =============================================================================

/// A table column right after a foreign key option.
///
/// Takes cascade rules for that foreign key, further column options or the
/// next `with_column`.
#[derive(Debug)]
pub struct TableColumnCascadeBuilder<'a> {
    cursor: ColumnCursor<'a>,
    table: ExpressionId<CreateTableExpression>,
    foreign_key: ExpressionId<CreateForeignKeyExpression>,
}

impl<'a> TableColumnCascadeBuilder<'a> {
    /// Returns the handle of the foreign key being configured.
    #[must_use]
    pub const fn foreign_key_id(&self) -> ExpressionId<CreateForeignKeyExpression> {
        self.foreign_key
    }

    /// Adds another column to the table.
    pub fn with_column(self, name: impl Into<String>) -> TableColumnTypeBuilder<'a> {
        push_column(self.cursor.into_scope(), self.table, name.into())
    }
}

impl<'a> ForeignKeyCascadeSyntax for TableColumnCascadeBuilder<'a> {
    type Next = TableColumnOptionBuilder<'a>;

    fn foreign_key_mut(&mut self) -> &mut CreateForeignKeyExpression {
        self.cursor.scope().get_mut(self.foreign_key)
    }

    fn leave_cascade(self) -> Self::Next {
        TableColumnOptionBuilder {
            cursor: self.cursor,
            table: self.table,
        }
    }
}

impl<'a> ColumnOptionSyntax<'a> for TableColumnCascadeBuilder<'a> {
    type Options = TableColumnOptionBuilder<'a>;
    type Cascade = Self;

    fn cursor(&mut self) -> &mut ColumnCursor<'a> {
        &mut self.cursor
    }

    fn into_options(self) -> Self::Options {
        self.leave_cascade()
    }

    fn into_cascade(
        self,
        foreign_key: ExpressionId<CreateForeignKeyExpression>,
    ) -> Self {
        Self {
            foreign_key,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn table(context: &MigrationContext, index: usize) -> &CreateTableExpression {
        match context.expressions().entries()[index].expression() {
            Expression::CreateTable(table) => table,
            other => panic!("expected a table, got {other:?}"),
        }
    }

    #[test]
    fn test_columns_keep_declaration_order() {
        let mut context = MigrationContext::new(DatabaseProvider::Sqlite);
        context
            .create()
            .table("users")
            .with_column("id")
            .as_int32()
            .identity()
            .primary_key()
            .with_column("name")
            .as_string_sized(100)
            .nullable()
            .with_column("created")
            .as_date_time()
            .with_default(SystemMethod::CurrentUtcDateTime);

        let users = table(&context, 0);
        let names: Vec<_> = users.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "created"]);

        assert!(users.columns[0].identity);
        assert!(users.columns[0].primary_key);
        assert!(!users.columns[0].nullable);
        assert_eq!(users.columns[1].size, Some(100));
        assert!(users.columns[1].nullable);
        assert_eq!(
            users.columns[2].default,
            Some(DefaultValue::Method(SystemMethod::CurrentUtcDateTime))
        );
        assert_eq!(context.expressions().len(), 1);
    }

    #[test]
    fn test_inline_foreign_key_is_queued_after_table() {
        let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
        let fk_id = context
            .create()
            .table("Foo")
            .with_column("FooId")
            .as_int32()
            .foreign_key("Bar", "BarId")
            .on_delete(Rule::Cascade)
            .on_update(Rule::SetNull)
            .with_column("Other")
            .as_int32()
            .foreign_key_named("FK_Foo_Baz", "Baz", "BazId")
            .foreign_key_id();

        assert_eq!(context.expressions().len(), 3);

        let first = context
            .expressions()
            .get(table(&context, 0).columns[0].foreign_key.unwrap())
            .unwrap();
        assert_eq!(first.foreign_table, "Foo");
        assert_eq!(first.foreign_columns, ["FooId"]);
        assert_eq!(first.primary_table, "Bar");
        assert_eq!(first.primary_columns, ["BarId"]);
        assert_eq!(first.on_delete, Some(Rule::Cascade));
        assert_eq!(first.on_update, Some(Rule::SetNull));
        assert_eq!(first.effective_name(), "FK_Foo_Bar_BarId");

        let second: &CreateForeignKeyExpression = context.expressions().get(fk_id).unwrap();
        assert_eq!(second.name.as_deref(), Some("FK_Foo_Baz"));
        assert_eq!(second.on_delete, None);
    }

    #[test]
    fn test_referenced_by_points_back_at_column() {
        let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
        context
            .create()
            .table("Bar")
            .with_column("BarId")
            .as_int32()
            .primary_key()
            .referenced_by("Foo", "BarId")
            .on_delete_or_update(Rule::Cascade);

        let Some(Expression::CreateForeignKey(fk)) = context.expressions().last() else {
            panic!("expected a foreign key");
        };
        assert_eq!(fk.foreign_table, "Foo");
        assert_eq!(fk.primary_table, "Bar");
        assert_eq!(fk.primary_columns, ["BarId"]);
        assert_eq!(fk.on_delete, Some(Rule::Cascade));
        assert_eq!(fk.on_update, Some(Rule::Cascade));
        // Only the referencing side records the key on its column.
        assert!(table(&context, 0).columns[0].foreign_key.is_none());
    }

    #[test]
    fn test_unique_and_indexed_queue_indexes() {
        let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
        context
            .create()
            .table("users")
            .with_column("email")
            .as_string()
            .unique()
            .with_column("name")
            .as_string()
            .indexed_named("IX_users_name");

        let indexes: Vec<&CreateIndexExpression> = context
            .expressions()
            .iter()
            .filter_map(|e| match e {
                Expression::CreateIndex(index) => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes[0].constraint_type, ConstraintType::Unique);
        assert_eq!(indexes[0].effective_name(), "IX_users_email");
        assert_eq!(indexes[1].constraint_type, ConstraintType::NonUnique);
        assert_eq!(indexes[1].name.as_deref(), Some("IX_users_name"));

        let users = table(&context, 0);
        assert!(users.columns[0].unique);
        assert!(users.columns[1].indexed);
    }

    #[test]
    fn test_type_after_options_overwrites() {
        let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
        context
            .create()
            .table("prices")
            .with_column("amount")
            .as_decimal_sized(10, 2)
            .nullable()
            .as_custom("MONEY");

        let amount = &table(&context, 0).columns[0];
        assert_eq!(amount.db_type, None);
        assert_eq!(amount.custom_type.as_deref(), Some("MONEY"));
        assert_eq!(amount.size, None);
        assert!(amount.nullable);
    }
}

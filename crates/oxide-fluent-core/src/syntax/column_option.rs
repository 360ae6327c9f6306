//! Column options and foreign-key cascade rules.
//!
//! Once a column has a type, [`ColumnOptionSyntax`] configures nullability,
//! identity, defaults, keys and indexes. Declaring a foreign key moves to a
//! builder that also implements [`ForeignKeyCascadeSyntax`].

use crate::expression::{
    ColumnDefinition, CreateColumnExpression, CreateForeignKeyExpression, CreateIndexExpression,
    CreateTableExpression, IndexColumn,
};
use crate::queue::ExpressionId;
use crate::types::{ConstraintType, DefaultValue, Rule, SystemMethod};

use super::Scope;

#[derive(Debug, Clone, Copy)]
enum ColumnSlot {
    Table {
        table: ExpressionId<CreateTableExpression>,
        index: usize,
    },
    Column(ExpressionId<CreateColumnExpression>),
}

/// Shared state of a column being configured: where the column lives in
/// the queue and write access to append the expressions its options
/// declare.
#[derive(Debug)]
pub struct ColumnCursor<'a> {
    scope: Scope<'a>,
    slot: ColumnSlot,
}

impl<'a> ColumnCursor<'a> {
    pub(crate) fn for_table_column(
        scope: Scope<'a>,
        table: ExpressionId<CreateTableExpression>,
        index: usize,
    ) -> Self {
        Self {
            scope,
            slot: ColumnSlot::Table { table, index },
        }
    }

    pub(crate) fn for_column(
        scope: Scope<'a>,
        column: ExpressionId<CreateColumnExpression>,
    ) -> Self {
        Self {
            scope,
            slot: ColumnSlot::Column(column),
        }
    }

    pub(crate) fn into_scope(self) -> Scope<'a> {
        self.scope
    }

    pub(crate) fn scope(&mut self) -> &mut Scope<'a> {
        &mut self.scope
    }

    pub(crate) fn definition(&mut self) -> &mut ColumnDefinition {
        match self.slot {
            ColumnSlot::Table { table, index } => &mut self.scope.get_mut(table).columns[index],
            ColumnSlot::Column(column) => &mut self.scope.get_mut(column).column,
        }
    }

    /// Table and column name as they stand right now.
    fn location(&mut self) -> (String, String) {
        match self.slot {
            ColumnSlot::Table { table, index } => {
                let table = self.scope.get_mut(table);
                (table.table_name.clone(), table.columns[index].name.clone())
            }
            ColumnSlot::Column(column) => {
                let column = self.scope.get_mut(column);
                (column.table_name.clone(), column.column.name.clone())
            }
        }
    }

    fn add_index(&mut self, name: Option<String>, constraint_type: ConstraintType) {
        let (table_name, column_name) = self.location();
        self.scope.append(CreateIndexExpression {
            name,
            table_name,
            columns: vec![IndexColumn::new(column_name)],
            constraint_type,
            clustered: false,
        });
    }

    /// Queues a foreign key from this column to `primary_table.primary_column`.
    fn add_foreign_key(
        &mut self,
        name: Option<String>,
        primary_table_schema: Option<String>,
        primary_table: String,
        primary_column: String,
    ) -> ExpressionId<CreateForeignKeyExpression> {
        let (foreign_table, foreign_column) = self.location();
        let id = self.scope.append(CreateForeignKeyExpression {
            name,
            foreign_table,
            foreign_columns: vec![foreign_column],
            primary_table,
            primary_table_schema,
            primary_columns: vec![primary_column],
            ..CreateForeignKeyExpression::default()
        });
        self.definition().foreign_key = Some(id);
        id
    }

    /// Queues a foreign key from `foreign_table.foreign_column` to this column.
    fn add_reference(
        &mut self,
        name: Option<String>,
        foreign_table_schema: Option<String>,
        foreign_table: String,
        foreign_column: String,
    ) -> ExpressionId<CreateForeignKeyExpression> {
        let (primary_table, primary_column) = self.location();
        self.scope.append(CreateForeignKeyExpression {
            name,
            foreign_table,
            foreign_table_schema,
            foreign_columns: vec![foreign_column],
            primary_table,
            primary_columns: vec![primary_column],
            ..CreateForeignKeyExpression::default()
        })
    }
}

/// Options for a typed column.
///
/// Most options return [`Options`](Self::Options), the plain option builder.
/// Foreign key declarations return [`Cascade`](Self::Cascade), which adds
/// the cascade rules of [`ForeignKeyCascadeSyntax`].
pub trait ColumnOptionSyntax<'a>: Sized {
    /// Builder returned by plain options.
    type Options;
    /// Builder returned by foreign key declarations.
    type Cascade;

    /// The column being configured.
    #[doc(hidden)]
    fn cursor(&mut self) -> &mut ColumnCursor<'a>;

    /// Moves on to the plain option builder.
    #[doc(hidden)]
    fn into_options(self) -> Self::Options;

    /// Moves on to the cascade builder for a freshly queued foreign key.
    #[doc(hidden)]
    fn into_cascade(self, foreign_key: ExpressionId<CreateForeignKeyExpression>) -> Self::Cascade;

    /// Defaults the column to a database function.
    fn with_default(mut self, method: SystemMethod) -> Self::Options {
        self.cursor().definition().default = Some(DefaultValue::Method(method));
        self.into_options()
    }

    /// Defaults the column to a constant value.
    fn with_default_value(mut self, value: impl Into<DefaultValue>) -> Self::Options {
        self.cursor().definition().default = Some(value.into());
        self.into_options()
    }

    /// Makes the column an identity (auto-increment) column.
    fn identity(mut self) -> Self::Options {
        self.cursor().definition().identity = true;
        self.into_options()
    }

    /// Queues an unnamed index on the column.
    fn indexed(mut self) -> Self::Options {
        let cursor = self.cursor();
        cursor.definition().indexed = true;
        cursor.add_index(None, ConstraintType::NonUnique);
        self.into_options()
    }

    /// Queues a named index on the column.
    fn indexed_named(mut self, index_name: impl Into<String>) -> Self::Options {
        let cursor = self.cursor();
        cursor.definition().indexed = true;
        cursor.add_index(Some(index_name.into()), ConstraintType::NonUnique);
        self.into_options()
    }

    /// Makes the column part of the primary key.
    fn primary_key(mut self) -> Self::Options {
        let column = self.cursor().definition();
        column.primary_key = true;
        column.primary_key_name = None;
        self.into_options()
    }

    /// Makes the column part of a named primary key.
    fn primary_key_named(mut self, primary_key_name: impl Into<String>) -> Self::Options {
        let column = self.cursor().definition();
        column.primary_key = true;
        column.primary_key_name = Some(primary_key_name.into());
        self.into_options()
    }

    /// Allows NULL.
    fn nullable(mut self) -> Self::Options {
        self.cursor().definition().nullable = true;
        self.into_options()
    }

    /// Forbids NULL.
    fn not_nullable(mut self) -> Self::Options {
        self.cursor().definition().nullable = false;
        self.into_options()
    }

    /// Queues an unnamed unique index on the column.
    fn unique(mut self) -> Self::Options {
        let cursor = self.cursor();
        cursor.definition().unique = true;
        cursor.add_index(None, ConstraintType::Unique);
        self.into_options()
    }

    /// Queues a named unique index on the column.
    fn unique_named(mut self, index_name: impl Into<String>) -> Self::Options {
        let cursor = self.cursor();
        cursor.definition().unique = true;
        cursor.add_index(Some(index_name.into()), ConstraintType::Unique);
        self.into_options()
    }

    /// Queues a foreign key from this column to `primary_table.primary_column`.
    fn foreign_key(
        mut self,
        primary_table: impl Into<String>,
        primary_column: impl Into<String>,
    ) -> Self::Cascade {
        let id = self.cursor().add_foreign_key(
            None,
            None,
            primary_table.into(),
            primary_column.into(),
        );
        self.into_cascade(id)
    }

    /// Queues a named foreign key from this column to
    /// `primary_table.primary_column`.
    fn foreign_key_named(
        mut self,
        foreign_key_name: impl Into<String>,
        primary_table: impl Into<String>,
        primary_column: impl Into<String>,
    ) -> Self::Cascade {
        let id = self.cursor().add_foreign_key(
            Some(foreign_key_name.into()),
            None,
            primary_table.into(),
            primary_column.into(),
        );
        self.into_cascade(id)
    }

    /// Queues a named foreign key to a table in another schema.
    fn foreign_key_in_schema(
        mut self,
        foreign_key_name: impl Into<String>,
        primary_table_schema: impl Into<String>,
        primary_table: impl Into<String>,
        primary_column: impl Into<String>,
    ) -> Self::Cascade {
        let id = self.cursor().add_foreign_key(
            Some(foreign_key_name.into()),
            Some(primary_table_schema.into()),
            primary_table.into(),
            primary_column.into(),
        );
        self.into_cascade(id)
    }

    /// Queues a foreign key from `foreign_table.foreign_column` to this
    /// column.
    fn referenced_by(
        mut self,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Self::Cascade {
        let id = self.cursor().add_reference(
            None,
            None,
            foreign_table.into(),
            foreign_column.into(),
        );
        self.into_cascade(id)
    }

    /// Queues a named foreign key from `foreign_table.foreign_column` to
    /// this column.
    fn referenced_by_named(
        mut self,
        foreign_key_name: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Self::Cascade {
        let id = self.cursor().add_reference(
            Some(foreign_key_name.into()),
            None,
            foreign_table.into(),
            foreign_column.into(),
        );
        self.into_cascade(id)
    }

    /// Queues a named foreign key from a table in another schema to this
    /// column.
    fn referenced_by_in_schema(
        mut self,
        foreign_key_name: impl Into<String>,
        foreign_table_schema: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Self::Cascade {
        let id = self.cursor().add_reference(
            Some(foreign_key_name.into()),
            Some(foreign_table_schema.into()),
            foreign_table.into(),
            foreign_column.into(),
        );
        self.into_cascade(id)
    }
}

/// ON DELETE / ON UPDATE rules of a foreign key.
pub trait ForeignKeyCascadeSyntax: Sized {
    /// Builder returned once the cascade phase is left.
    type Next;

    /// The foreign key being configured.
    #[doc(hidden)]
    fn foreign_key_mut(&mut self) -> &mut CreateForeignKeyExpression;

    /// Leaves the cascade phase.
    #[doc(hidden)]
    fn leave_cascade(self) -> Self::Next;

    /// Sets the ON DELETE rule. ON UPDATE can still follow.
    fn on_delete(mut self, rule: Rule) -> Self {
        self.foreign_key_mut().on_delete = Some(rule);
        self
    }

    /// Sets the ON UPDATE rule.
    fn on_update(mut self, rule: Rule) -> Self::Next {
        self.foreign_key_mut().on_update = Some(rule);
        self.leave_cascade()
    }

    /// Sets both the ON DELETE and the ON UPDATE rule.
    fn on_delete_or_update(mut self, rule: Rule) -> Self::Next {
        let foreign_key = self.foreign_key_mut();
        foreign_key.on_delete = Some(rule);
        foreign_key.on_update = Some(rule);
        self.leave_cascade()
    }
}

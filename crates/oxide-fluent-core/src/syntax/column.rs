//! Create Column builders.
//!
//! `column(name)` optionally takes `on_table(table)`, then a type from
//! [`ColumnTypeSyntax`], then options from [`ColumnOptionSyntax`].

use crate::expression::{ColumnDefinition, CreateColumnExpression, CreateForeignKeyExpression};
use crate::queue::ExpressionId;

use super::column_option::{ColumnCursor, ColumnOptionSyntax, ForeignKeyCascadeSyntax};
use super::column_type::ColumnTypeSyntax;
use super::Scope;

/// A queued ADD COLUMN waiting for its table or its type.
#[derive(Debug)]
pub struct CreateColumnBuilder<'a> {
    cursor: ColumnCursor<'a>,
    column: ExpressionId<CreateColumnExpression>,
}

impl<'a> CreateColumnBuilder<'a> {
    pub(crate) fn new(mut scope: Scope<'a>, column_name: String) -> Self {
        let column = scope.append(CreateColumnExpression::new(column_name));
        Self {
            cursor: ColumnCursor::for_column(scope, column),
            column,
        }
    }

    /// Returns the handle of the queued column.
    #[must_use]
    pub const fn id(&self) -> ExpressionId<CreateColumnExpression> {
        self.column
    }

    /// Sets the table the column is added to.
    pub fn on_table(mut self, table_name: impl Into<String>) -> CreateColumnTypeBuilder<'a> {
        self.cursor.scope().get_mut(self.column).table_name = table_name.into();
        CreateColumnTypeBuilder {
            cursor: self.cursor,
            column: self.column,
        }
    }
}

impl<'a> ColumnTypeSyntax for CreateColumnBuilder<'a> {
    type Next = CreateColumnOptionBuilder<'a>;

    fn column_definition(&mut self) -> &mut ColumnDefinition {
        self.cursor.definition()
    }

    fn into_typed(self) -> Self::Next {
        CreateColumnOptionBuilder {
            cursor: self.cursor,
            column: self.column,
        }
    }
}

/// A column with a table, waiting for its type.
#[derive(Debug)]
pub struct CreateColumnTypeBuilder<'a> {
    cursor: ColumnCursor<'a>,
    column: ExpressionId<CreateColumnExpression>,
}

impl<'a> ColumnTypeSyntax for CreateColumnTypeBuilder<'a> {
    type Next = CreateColumnOptionBuilder<'a>;

    fn column_definition(&mut self) -> &mut ColumnDefinition {
        self.cursor.definition()
    }

    fn into_typed(self) -> Self::Next {
        CreateColumnOptionBuilder {
            cursor: self.cursor,
            column: self.column,
        }
    }
}

/// A typed column taking options.
#[derive(Debug)]
pub struct CreateColumnOptionBuilder<'a> {
    cursor: ColumnCursor<'a>,
    column: ExpressionId<CreateColumnExpression>,
}

impl CreateColumnOptionBuilder<'_> {
    /// Returns the handle of the queued column.
    #[must_use]
    pub const fn id(&self) -> ExpressionId<CreateColumnExpression> {
        self.column
    }
}

impl<'a> ColumnTypeSyntax for CreateColumnOptionBuilder<'a> {
    type Next = Self;

    fn column_definition(&mut self) -> &mut ColumnDefinition {
        self.cursor.definition()
    }

    fn into_typed(self) -> Self {
        self
    }
}

impl<'a> ColumnOptionSyntax<'a> for CreateColumnOptionBuilder<'a> {
    type Options = Self;
    type Cascade = CreateColumnCascadeBuilder<'a>;

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
        CreateColumnCascadeBuilder {
            cursor: self.cursor,
            column: self.column,
            foreign_key,
        }
    }
}

/// A column right after a foreign key option.
#[derive(Debug)]
pub struct CreateColumnCascadeBuilder<'a> {
    cursor: ColumnCursor<'a>,
    column: ExpressionId<CreateColumnExpression>,
    foreign_key: ExpressionId<CreateForeignKeyExpression>,
}

impl CreateColumnCascadeBuilder<'_> {
    /// Returns the handle of the foreign key being configured.
    #[must_use]
    pub const fn foreign_key_id(&self) -> ExpressionId<CreateForeignKeyExpression> {
        self.foreign_key
    }
}

impl<'a> ForeignKeyCascadeSyntax for CreateColumnCascadeBuilder<'a> {
    type Next = CreateColumnOptionBuilder<'a>;

    fn foreign_key_mut(&mut self) -> &mut CreateForeignKeyExpression {
        self.cursor.scope().get_mut(self.foreign_key)
    }

    fn leave_cascade(self) -> Self::Next {
        CreateColumnOptionBuilder {
            cursor: self.cursor,
            column: self.column,
        }
    }
}

impl<'a> ColumnOptionSyntax<'a> for CreateColumnCascadeBuilder<'a> {
    type Options = CreateColumnOptionBuilder<'a>;
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

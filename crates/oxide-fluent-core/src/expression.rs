//! The expression model.
//!
//! Each expression is a plain mutable record describing one DDL intent. The
//! fluent builders create an expression, append it to the run's
//! [`ExpressionQueue`](crate::ExpressionQueue) and keep mutating it through
//! a typed [`ExpressionId`] until the chain ends.

use serde::{Deserialize, Serialize};

use crate::queue::ExpressionId;
use crate::types::{ConstraintType, DbType, DefaultValue, Direction, Rule};

// =============================================================================
// Columns
// =============================================================================

/// A column as declared by a migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Provider-agnostic type. Mutually exclusive with `custom_type`.
    pub db_type: Option<DbType>,
    /// Provider-specific type name. Mutually exclusive with `db_type`.
    pub custom_type: Option<String>,
    /// Length or total digits.
    pub size: Option<u32>,
    /// Digits after the decimal point.
    pub precision: Option<u32>,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Whether the column is an identity (auto-increment) column.
    pub identity: bool,
    /// Whether an index was declared on the column.
    pub indexed: bool,
    /// Whether the column is (part of) the primary key.
    pub primary_key: bool,
    /// Explicit primary key constraint name.
    pub primary_key_name: Option<String>,
    /// Whether a unique index was declared on the column.
    pub unique: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Foreign key declared on this column, queued next to it.
    pub foreign_key: Option<ExpressionId<CreateForeignKeyExpression>>,
}

impl ColumnDefinition {
    /// Creates an untyped, non-nullable column definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_type: None,
            custom_type: None,
            size: None,
            precision: None,
            nullable: false,
            identity: false,
            indexed: false,
            primary_key: false,
            primary_key_name: None,
            unique: false,
            default: None,
            foreign_key: None,
        }
    }

    /// Replaces the column type with a provider-agnostic one.
    ///
    /// Every type field is overwritten: a previous custom type, size or
    /// precision does not survive.
    pub fn set_type(&mut self, db_type: DbType, size: Option<u32>, precision: Option<u32>) {
        self.db_type = Some(db_type);
        self.custom_type = None;
        self.size = size;
        self.precision = precision;
    }

    /// Replaces the column type with a provider-specific type name.
    pub fn set_custom_type(&mut self, type_name: impl Into<String>) {
        self.db_type = None;
        self.custom_type = Some(type_name.into());
        self.size = None;
        self.precision = None;
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// CREATE TABLE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableExpression {
    /// Table name.
    pub table_name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDefinition>,
}

impl CreateTableExpression {
    /// Creates a table expression without columns.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// ADD COLUMN on an existing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateColumnExpression {
    /// Target table. Empty until `on_table` is called.
    pub table_name: String,
    /// The column.
    pub column: ColumnDefinition,
}

impl CreateColumnExpression {
    /// Creates a column expression with no target table.
    #[must_use]
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            table_name: String::new(),
            column: ColumnDefinition::new(column_name),
        }
    }
}

/// ADD FOREIGN KEY.
///
/// The foreign side is the referencing table, the primary side the
/// referenced one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateForeignKeyExpression {
    /// Explicit constraint name.
    pub name: Option<String>,
    /// Referencing table.
    pub foreign_table: String,
    /// Schema of the referencing table.
    pub foreign_table_schema: Option<String>,
    /// Referencing columns.
    pub foreign_columns: Vec<String>,
    /// Referenced table.
    pub primary_table: String,
    /// Schema of the referenced table.
    pub primary_table_schema: Option<String>,
    /// Referenced columns.
    pub primary_columns: Vec<String>,
    /// ON DELETE rule.
    pub on_delete: Option<Rule>,
    /// ON UPDATE rule.
    pub on_update: Option<Rule>,
}

impl CreateForeignKeyExpression {
    /// Creates an unnamed, empty foreign key expression.
    #[must_use]
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Returns the explicit name, or `FK_<foreign>_<primary>_<column>` when
    /// none was given.
    #[must_use]
    pub fn effective_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!(
                "FK_{}_{}_{}",
                self.foreign_table,
                self.primary_table,
                self.primary_columns.first().map_or("", String::as_str)
            ),
        }
    }
}

/// A column of an index with its sort direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    /// Column name.
    pub name: String,
    /// Sort direction.
    pub direction: Direction,
}

impl IndexColumn {
    /// Creates an ascending index column.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Ascending,
        }
    }
}

/// CREATE INDEX.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndexExpression {
    /// Explicit index name.
    pub name: Option<String>,
    /// Indexed table.
    pub table_name: String,
    /// Indexed columns.
    pub columns: Vec<IndexColumn>,
    /// Uniqueness of the index.
    pub constraint_type: ConstraintType,
    /// Whether the index is clustered.
    pub clustered: bool,
}

impl CreateIndexExpression {
    /// Creates an empty, non-unique index expression.
    #[must_use]
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Returns the explicit name, or `IX_<table>_<column>` when none was
    /// given.
    #[must_use]
    pub fn effective_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!(
                "IX_{}_{}",
                self.table_name,
                self.columns.first().map_or("", |c| c.name.as_str())
            ),
        }
    }
}

/// ADD CONSTRAINT (primary key, unique or plain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateConstraintExpression {
    /// Explicit constraint name.
    pub name: Option<String>,
    /// Constrained table.
    pub table_name: String,
    /// Constrained columns.
    pub columns: Vec<String>,
    /// Constraint kind, fixed when the expression is created.
    pub constraint_type: ConstraintType,
}

impl CreateConstraintExpression {
    /// Creates an empty constraint of the given kind.
    #[must_use]
    pub fn new(constraint_type: ConstraintType, name: Option<String>) -> Self {
        Self {
            name,
            table_name: String::new(),
            columns: Vec::new(),
            constraint_type,
        }
    }
}

// =============================================================================
// Expression enum
// =============================================================================

/// Any expression that can be queued for execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    /// Create a table.
    CreateTable(CreateTableExpression),
    /// Add a column.
    CreateColumn(CreateColumnExpression),
    /// Add a foreign key.
    CreateForeignKey(CreateForeignKeyExpression),
    /// Create an index.
    CreateIndex(CreateIndexExpression),
    /// Add a constraint.
    CreateConstraint(CreateConstraintExpression),
}

impl Expression {
    /// Returns a short name of the expression kind, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "create_table",
            Self::CreateColumn(_) => "create_column",
            Self::CreateForeignKey(_) => "create_foreign_key",
            Self::CreateIndex(_) => "create_index",
            Self::CreateConstraint(_) => "create_constraint",
        }
    }

    /// Returns the table the expression applies to.
    ///
    /// For foreign keys this is the referencing table.
    #[must_use]
    pub fn table_name(&self) -> &str {
        match self {
            Self::CreateTable(e) => &e.table_name,
            Self::CreateColumn(e) => &e.table_name,
            Self::CreateForeignKey(e) => &e.foreign_table,
            Self::CreateIndex(e) => &e.table_name,
            Self::CreateConstraint(e) => &e.table_name,
        }
    }
}

/// A concrete expression type that is one variant of [`Expression`].
///
/// Lets the queue hand out handles typed by the variant they point at.
pub trait ExpressionVariant: Into<Expression> {
    /// Borrows the variant out of an expression, if it matches.
    fn from_expression(expression: &Expression) -> Option<&Self>;

    /// Mutably borrows the variant out of an expression, if it matches.
    fn from_expression_mut(expression: &mut Expression) -> Option<&mut Self>;
}

macro_rules! impl_expression_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expression {
                fn from(expression: $ty) -> Self {
                    Self::$variant(expression)
                }
            }

            impl ExpressionVariant for $ty {
                fn from_expression(expression: &Expression) -> Option<&Self> {
                    match expression {
                        Expression::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_expression_mut(expression: &mut Expression) -> Option<&mut Self> {
                    match expression {
                        Expression::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_expression_variant! {
    CreateTable => CreateTableExpression,
    CreateColumn => CreateColumnExpression,
    CreateForeignKey => CreateForeignKeyExpression,
    CreateIndex => CreateIndexExpression,
    CreateConstraint => CreateConstraintExpression,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_type_overwrites_everything() {
        let mut column = ColumnDefinition::new("price");
        column.set_type(DbType::Decimal, Some(10), Some(2));
        column.set_type(DbType::Int32, None, None);

        assert_eq!(column.db_type, Some(DbType::Int32));
        assert_eq!(column.size, None);
        assert_eq!(column.precision, None);
        assert_eq!(column.custom_type, None);
    }

    #[test]
    fn test_custom_type_clears_db_type() {
        let mut column = ColumnDefinition::new("doc");
        column.set_type(DbType::String, Some(50), None);
        column.set_custom_type("JSONB");

        assert_eq!(column.db_type, None);
        assert_eq!(column.custom_type.as_deref(), Some("JSONB"));
        assert_eq!(column.size, None);

        column.set_type(DbType::Xml, None, None);
        assert_eq!(column.custom_type, None);
    }

    #[test]
    fn test_foreign_key_effective_name() {
        let mut fk = CreateForeignKeyExpression::new(None);
        fk.foreign_table = "Foo".into();
        fk.primary_table = "Bar".into();
        fk.primary_columns = vec!["BarId".into()];
        assert_eq!(fk.effective_name(), "FK_Foo_Bar_BarId");

        fk.name = Some("FK_custom".into());
        assert_eq!(fk.effective_name(), "FK_custom");
    }

    #[test]
    fn test_index_effective_name() {
        let mut index = CreateIndexExpression::new(None);
        index.table_name = "users".into();
        index.columns.push(IndexColumn::new("email"));
        assert_eq!(index.effective_name(), "IX_users_email");
    }

    #[test]
    fn test_variant_lookup() {
        let mut expression = Expression::from(CreateTableExpression::new("users"));
        assert_eq!(expression.kind(), "create_table");
        assert_eq!(expression.table_name(), "users");
        assert!(CreateTableExpression::from_expression(&expression).is_some());
        assert!(CreateIndexExpression::from_expression(&expression).is_none());

        if let Some(table) = CreateTableExpression::from_expression_mut(&mut expression) {
            table.table_name = "accounts".into();
        }
        assert_eq!(expression.table_name(), "accounts");
    }
}

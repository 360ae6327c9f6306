//! Primary key, unique and plain constraint builder.
//!
//! The constraint kind is fixed by the entry call (`primary_key`,
//! `unique_constraint` or `constraint`); the chain only names the table and
//! the columns.

use std::marker::PhantomData;

use crate::expression::CreateConstraintExpression;
use crate::queue::ExpressionId;
use crate::types::ConstraintType;

use super::Scope;

/// Marker: the constrained table is not set.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintTablePending;

/// Marker: the constrained columns are not set.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintColumnsPending;

/// A queued ADD CONSTRAINT.
#[derive(Debug)]
pub struct CreateConstraintBuilder<'a, S> {
    scope: Scope<'a>,
    constraint: ExpressionId<CreateConstraintExpression>,
    _state: PhantomData<S>,
}

impl<'a> CreateConstraintBuilder<'a, ConstraintTablePending> {
    pub(crate) fn new(
        mut scope: Scope<'a>,
        constraint_type: ConstraintType,
        name: Option<String>,
    ) -> Self {
        let constraint = scope.append(CreateConstraintExpression::new(constraint_type, name));
        Self {
            scope,
            constraint,
            _state: PhantomData,
        }
    }

    /// Sets the constrained table.
    pub fn on_table(
        mut self,
        table_name: impl Into<String>,
    ) -> CreateConstraintBuilder<'a, ConstraintColumnsPending> {
        self.scope.get_mut(self.constraint).table_name = table_name.into();
        CreateConstraintBuilder {
            scope: self.scope,
            constraint: self.constraint,
            _state: PhantomData,
        }
    }
}

impl CreateConstraintBuilder<'_, ConstraintColumnsPending> {
    /// Constrains a single column and ends the chain.
    pub fn column(
        mut self,
        column_name: impl Into<String>,
    ) -> ExpressionId<CreateConstraintExpression> {
        self.scope
            .get_mut(self.constraint)
            .columns
            .push(column_name.into());
        self.constraint
    }

    /// Constrains several columns and ends the chain.
    pub fn columns<I, C>(mut self, column_names: I) -> ExpressionId<CreateConstraintExpression>
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.scope
            .get_mut(self.constraint)
            .columns
            .extend(column_names.into_iter().map(Into::into));
        self.constraint
    }
}

impl<S> CreateConstraintBuilder<'_, S> {
    /// Returns the handle of the queued constraint.
    #[must_use]
    pub const fn id(&self) -> ExpressionId<CreateConstraintExpression> {
        self.constraint
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_entry_fixes_constraint_type() {
        let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
        let pk = context
            .create()
            .primary_key_named("PK_user2app")
            .on_table("umbracoUser2app")
            .columns(["user", "app"]);
        let unique = context
            .create()
            .unique_constraint()
            .on_table("users")
            .column("login");
        let plain = context
            .create()
            .constraint("CK_users")
            .on_table("users")
            .column("age");

        let queue = context.expressions();
        let pk = queue.get(pk).unwrap();
        assert_eq!(pk.constraint_type, ConstraintType::PrimaryKey);
        assert_eq!(pk.name.as_deref(), Some("PK_user2app"));
        assert_eq!(pk.columns, ["user", "app"]);

        let unique = queue.get(unique).unwrap();
        assert_eq!(unique.constraint_type, ConstraintType::Unique);
        assert_eq!(unique.name, None);

        let plain = queue.get(plain).unwrap();
        assert_eq!(plain.constraint_type, ConstraintType::NonUnique);
        assert_eq!(plain.table_name, "users");
    }
}

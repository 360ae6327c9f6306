//! Migration run context.
//!
//! A [`MigrationContext`] owns everything one migration run declares: the
//! active provider, the optional schema introspection collaborator and the
//! ordered [`ExpressionQueue`]. Create chains borrow it mutably, checks
//! borrow it shared, so the borrow checker keeps chains from interleaving.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{info, warn};

use crate::check::CheckBuilder;
use crate::error::{FluentError, Result};
use crate::introspect::SchemaIntrospector;
use crate::provider::DatabaseProvider;
use crate::queue::ExpressionQueue;
use crate::syntax::{CreateBuilder, IfDatabaseBuilder};

/// A schema migration authored through the fluent builders.
///
/// # Example
///
/// ```rust
/// use oxide_fluent_core::prelude::*;
///
/// struct AddUsers;
///
/// impl Migration for AddUsers {
///     const NAME: &'static str = "0001_add_users";
///
///     fn migrate(&self, context: &mut MigrationContext) -> Result<()> {
///         context
///             .create()
///             .table("users")
///             .with_column("id").as_int32().identity().primary_key();
///         Ok(())
///     }
/// }
///
/// let mut context = MigrationContext::new(DatabaseProvider::Sqlite);
/// assert_eq!(context.author(&AddUsers)?, 1);
/// # Ok::<(), FluentError>(())
/// ```
pub trait Migration {
    /// Unique migration name.
    const NAME: &'static str;

    /// Declares the migration's schema changes on the context.
    ///
    /// # Errors
    ///
    /// Returns an error if a check fails or the migration rejects the
    /// current schema.
    fn migrate(&self, context: &mut MigrationContext) -> Result<()>;
}

/// State of one migration run.
pub struct MigrationContext {
    provider: DatabaseProvider,
    introspector: Option<Box<dyn SchemaIntrospector>>,
    expressions: ExpressionQueue,
}

impl MigrationContext {
    /// Creates a context for the given provider, with an empty queue and no
    /// introspection collaborator.
    #[must_use]
    pub fn new(provider: DatabaseProvider) -> Self {
        Self {
            provider,
            introspector: None,
            expressions: ExpressionQueue::new(),
        }
    }

    /// Attaches the collaborator that existence checks query.
    #[must_use]
    pub fn with_introspector(mut self, introspector: impl SchemaIntrospector + 'static) -> Self {
        self.introspector = Some(Box::new(introspector));
        self
    }

    /// Returns the provider the run targets.
    #[must_use]
    pub const fn provider(&self) -> DatabaseProvider {
        self.provider
    }

    /// Returns the expressions declared so far.
    #[must_use]
    pub const fn expressions(&self) -> &ExpressionQueue {
        &self.expressions
    }

    /// Hands the declared expressions off, consuming the context.
    #[must_use]
    pub fn into_expressions(self) -> ExpressionQueue {
        self.expressions
    }

    /// Starts a Create chain that applies to every provider.
    pub fn create(&mut self) -> CreateBuilder<'_> {
        CreateBuilder::new(&mut self.expressions, BTreeSet::new())
    }

    /// Gates the next Create chain to the given providers.
    pub fn if_database(
        &mut self,
        providers: impl IntoIterator<Item = DatabaseProvider>,
    ) -> IfDatabaseBuilder<'_> {
        IfDatabaseBuilder::new(&mut self.expressions, providers.into_iter().collect())
    }

    /// Starts an existence check.
    ///
    /// # Errors
    ///
    /// Returns [`FluentError::MissingCollaborator`] if no introspector was
    /// attached.
    pub fn check(&self) -> Result<CheckBuilder<'_>> {
        match self.introspector.as_deref() {
            Some(introspector) => Ok(CheckBuilder::new(introspector)),
            None => Err(FluentError::MissingCollaborator("schema introspector")),
        }
    }

    /// Runs a migration body against this context and returns how many
    /// expressions it queued.
    ///
    /// # Errors
    ///
    /// Returns the migration's own error unchanged. Expressions queued
    /// before the failure stay queued.
    pub fn author<M: Migration>(&mut self, migration: &M) -> Result<usize> {
        let before = self.expressions.len();
        if let Err(e) = migration.migrate(self) {
            warn!(migration = M::NAME, error = %e, "Migration failed");
            return Err(e);
        }
        let queued = self.expressions.len() - before;
        info!(
            migration = M::NAME,
            provider = %self.provider,
            queued,
            "Authored migration"
        );
        Ok(queued)
    }
}

impl fmt::Debug for MigrationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationContext")
            .field("provider", &self.provider)
            .field("introspector", &self.introspector.is_some())
            .field("expressions", &self.expressions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    struct Failing;

    impl Migration for Failing {
        const NAME: &'static str = "0002_failing";

        fn migrate(&self, context: &mut MigrationContext) -> Result<()> {
            context.create().table("half_done");
            Err(FluentError::Migration {
                migration: Self::NAME.to_string(),
                message: "unsupported schema".to_string(),
            })
        }
    }

    struct Idempotent;

    impl Migration for Idempotent {
        const NAME: &'static str = "0003_idempotent";

        fn migrate(&self, context: &mut MigrationContext) -> Result<()> {
            let exists = context
                .check()?
                .foreign_key_named("FK_Foo_Bar")
                .exists()?;
            if !exists {
                context
                    .create()
                    .foreign_key_named("FK_Foo_Bar")
                    .from_table("Foo")
                    .foreign_column("BarId")
                    .to_table("Bar")
                    .primary_column("BarId");
            }
            Ok(())
        }
    }

    #[test]
    fn test_check_without_introspector_fails_fast() {
        let context = MigrationContext::new(DatabaseProvider::SqlServer);
        let err = context.check().err().unwrap();
        assert!(matches!(err, FluentError::MissingCollaborator(_)));
    }

    #[test]
    fn test_author_keeps_partial_work_on_failure() {
        let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
        let err = context.author(&Failing).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Migration '0002_failing' failed: unsupported schema"
        );
        assert_eq!(context.expressions().len(), 1);
    }

    #[test]
    fn test_author_skips_existing_foreign_key() {
        let mut empty = MigrationContext::new(DatabaseProvider::Sqlite)
            .with_introspector(SchemaSnapshot::new());
        assert_eq!(empty.author(&Idempotent).unwrap(), 1);

        let snapshot = SchemaSnapshot::new().with_foreign_key(ForeignKeyInfo::new(
            "Foo", "BarId", "Bar", "BarId", "fk_foo_bar",
        ));
        let mut applied =
            MigrationContext::new(DatabaseProvider::Sqlite).with_introspector(snapshot);
        assert_eq!(applied.author(&Idempotent).unwrap(), 0);
        assert!(applied.expressions().is_empty());
    }

    #[test]
    fn test_into_expressions_hands_off_queue() {
        let mut context = MigrationContext::new(DatabaseProvider::Postgres);
        context.create().table("a");
        context.create().table("b");
        assert_eq!(context.provider(), DatabaseProvider::Postgres);

        let tables: Vec<String> = context
            .into_expressions()
            .into_iter()
            .map(|entry| entry.expression().table_name().to_string())
            .collect();
        assert_eq!(tables, ["a", "b"]);
    }
}

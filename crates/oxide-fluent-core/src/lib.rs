//! Fluent schema migrations for Rust.
//!
//! `oxide-fluent-core` lets a migration declare schema changes through
//! step builders whose types only expose the calls legal at each stage:
//!
//! - **Create chains** queue table, column, foreign key, index and
//!   constraint expressions in declaration order.
//! - **Typed columns** share one type mixin across table and standalone
//!   column builders; a later type call overwrites an earlier one.
//! - **Existence checks** ask a [`SchemaIntrospector`] whether a foreign
//!   key, table, column or index already exists, so migrations can be
//!   re-run safely.
//! - **Provider gates** mark expressions that only apply to some database
//!   engines.
//!
//! The crate does not render SQL. The queued expressions are handed to an
//! execution engine through [`MigrationContext::into_expressions`].
//!
//! # Example
//!
//! ```rust
//! use oxide_fluent_core::prelude::*;
//!
//! let snapshot = SchemaSnapshot::new().with_table("users");
//! let mut context = MigrationContext::new(DatabaseProvider::Sqlite).with_introspector(snapshot);
//!
//! if !context.check()?.table("posts").exists()? {
//!     context
//!         .create()
//!         .table("posts")
//!         .with_column("id").as_int64().identity().primary_key()
//!         .with_column("user_id").as_int64()
//!         .foreign_key("users", "id").on_delete(Rule::Cascade).on_update(Rule::None)
//!         .with_column("body").as_string().nullable();
//! }
//!
//! let kinds: Vec<_> = context.expressions().iter().map(Expression::kind).collect();
//! assert_eq!(kinds, ["create_table", "create_foreign_key"]);
//! # Ok::<(), FluentError>(())
//! ```

pub mod check;
pub mod context;
pub mod error;
pub mod expression;
pub mod introspect;
pub mod provider;
pub mod queue;
pub mod snapshot;
pub mod syntax;
pub mod types;

pub use context::{Migration, MigrationContext};
pub use error::{FluentError, Result};
pub use introspect::SchemaIntrospector;
pub use queue::{ExpressionId, ExpressionQueue};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::check::{CheckForeignKeyExpression, ForeignKeyMatch};
    pub use crate::context::{Migration, MigrationContext};
    pub use crate::error::{FluentError, Result};
    pub use crate::expression::{
        ColumnDefinition, CreateColumnExpression, CreateConstraintExpression,
        CreateForeignKeyExpression, CreateIndexExpression, CreateTableExpression, Expression,
        IndexColumn,
    };
    pub use crate::introspect::{ColumnInfo, ForeignKeyInfo, IndexInfo, SchemaIntrospector};
    pub use crate::provider::DatabaseProvider;
    pub use crate::queue::{ExpressionId, ExpressionQueue, QueuedExpression};
    pub use crate::snapshot::SchemaSnapshot;
    pub use crate::syntax::{ColumnOptionSyntax, ColumnTypeSyntax, ForeignKeyCascadeSyntax};
    pub use crate::types::{
        ConstraintType, DbType, DefaultValue, Direction, Rule, SystemMethod,
    };
}

//! SQLite schema introspection for oxide-fluent migrations.
//!
//! [`SqliteIntrospector`] reads tables, columns, indexes and foreign keys
//! from a live SQLite database through `sqlx`. Queries are async; a
//! [`SchemaSnapshot`](oxide_fluent_core::snapshot::SchemaSnapshot) loaded
//! once serves the synchronous existence checks of a migration run:
//!
//! ```rust,no_run
//! use oxide_fluent_core::prelude::*;
//! use oxide_fluent_sqlite::SqliteIntrospector;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let introspector = SqliteIntrospector::connect("sqlite:app.db").await?;
//! let snapshot = introspector.snapshot().await?;
//!
//! let mut context = MigrationContext::new(DatabaseProvider::Sqlite).with_introspector(snapshot);
//! if !context.check()?.foreign_key_named("FK_posts_users_id").exists()? {
//!     context
//!         .create()
//!         .foreign_key()
//!         .from_table("posts")
//!         .foreign_column("user_id")
//!         .to_table("users")
//!         .primary_column("id");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! SQLite does not name foreign keys, so discovered keys are named
//! `FK_<table>_<referenced table>_<first referenced column>`, the same name
//! an unnamed key declared through the fluent builders gets. Keys on one
//! table that would collide get their referencing columns appended.

pub mod error;
pub mod introspect;

pub use error::{IntrospectError, Result};
pub use introspect::SqliteIntrospector;

//! In-memory schema snapshot.
//!
//! A [`SchemaSnapshot`] holds metadata read from a database once and serves
//! it through [`SchemaIntrospector`]. Async drivers load one and hand it to
//! the migration context; tests build one by hand.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::introspect::{ColumnInfo, ForeignKeyInfo, IndexInfo, SchemaIntrospector};

/// Schema metadata captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// User tables.
    pub tables: Vec<String>,
    /// Columns of every table.
    pub columns: Vec<ColumnInfo>,
    /// Foreign key column pairs.
    pub foreign_keys: Vec<ForeignKeyInfo>,
    /// Indexed columns.
    pub indexes: Vec<IndexInfo>,
}

impl SchemaSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table.
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>) -> Self {
        self.tables.push(name.into());
        self
    }

    /// Adds a nullable column of the given declared type.
    #[must_use]
    pub fn with_column(
        mut self,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        self.columns.push(ColumnInfo {
            table_name: table_name.into(),
            column_name: column_name.into(),
            data_type: data_type.into(),
            nullable: true,
        });
        self
    }

    /// Adds a foreign key column pair.
    #[must_use]
    pub fn with_foreign_key(mut self, foreign_key: ForeignKeyInfo) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    /// Adds an indexed column.
    #[must_use]
    pub fn with_index(
        mut self,
        table_name: impl Into<String>,
        index_name: impl Into<String>,
        column_name: impl Into<String>,
        unique: bool,
    ) -> Self {
        self.indexes.push(IndexInfo {
            table_name: table_name.into(),
            index_name: index_name.into(),
            column_name: column_name.into(),
            unique,
        });
        self
    }
}

impl SchemaIntrospector for SchemaSnapshot {
    fn foreign_keys(&self) -> Result<Vec<ForeignKeyInfo>> {
        Ok(self.foreign_keys.clone())
    }

    fn tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.clone())
    }

    fn columns(&self) -> Result<Vec<ColumnInfo>> {
        Ok(self.columns.clone())
    }

    fn indexes(&self) -> Result<Vec<IndexInfo>> {
        Ok(self.indexes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serves_what_it_holds() {
        let snapshot = SchemaSnapshot::new()
            .with_table("users")
            .with_column("users", "email", "TEXT")
            .with_index("users", "IX_users_email", "email", true)
            .with_foreign_key(ForeignKeyInfo::new(
                "posts", "user_id", "users", "id", "FK_posts_users_id",
            ));

        assert_eq!(snapshot.tables().unwrap(), vec!["users".to_string()]);
        assert_eq!(snapshot.columns().unwrap()[0].column_name, "email");
        assert!(snapshot.indexes().unwrap()[0].unique);
        assert_eq!(snapshot.foreign_keys().unwrap()[0].primary_table, "users");
    }
}

//! Table, column and index existence checks.

use tracing::debug;

use crate::error::Result;
use crate::introspect::{filter_accepts, names_equal, SchemaIntrospector};

/// Checks whether a table exists.
pub struct CheckTableBuilder<'a> {
    introspector: &'a dyn SchemaIntrospector,
    table_name: String,
}

impl<'a> CheckTableBuilder<'a> {
    pub(crate) fn new(introspector: &'a dyn SchemaIntrospector, table_name: String) -> Self {
        Self {
            introspector,
            table_name,
        }
    }

    /// Returns whether a table of that name exists, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator fails to list tables.
    pub fn exists(&self) -> Result<bool> {
        let exists = self
            .introspector
            .tables()?
            .iter()
            .any(|table| names_equal(table, &self.table_name));
        debug!(table = %self.table_name, exists, "Checked table");
        Ok(exists)
    }
}

/// Checks whether a column exists, optionally on a given table.
pub struct CheckColumnBuilder<'a> {
    introspector: &'a dyn SchemaIntrospector,
    column_name: String,
    table_name: Option<String>,
}

impl<'a> CheckColumnBuilder<'a> {
    pub(crate) fn new(introspector: &'a dyn SchemaIntrospector, column_name: String) -> Self {
        Self {
            introspector,
            column_name,
            table_name: None,
        }
    }

    /// Restricts the check to one table.
    #[must_use]
    pub fn on_table(self, table_name: impl Into<String>) -> Self {
        Self {
            table_name: Some(table_name.into()),
            ..self
        }
    }

    /// Returns whether the column exists, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator fails to list columns.
    pub fn exists(&self) -> Result<bool> {
        let exists = self.introspector.columns()?.iter().any(|column| {
            names_equal(&column.column_name, &self.column_name)
                && filter_accepts(self.table_name.as_deref(), &column.table_name)
        });
        debug!(
            column = %self.column_name,
            table = ?self.table_name,
            exists,
            "Checked column"
        );
        Ok(exists)
    }
}

/// Checks whether an index exists, optionally on a given table.
pub struct CheckIndexBuilder<'a> {
    introspector: &'a dyn SchemaIntrospector,
    index_name: String,
    table_name: Option<String>,
}

impl<'a> CheckIndexBuilder<'a> {
    pub(crate) fn new(introspector: &'a dyn SchemaIntrospector, index_name: String) -> Self {
        Self {
            introspector,
            index_name,
            table_name: None,
        }
    }

    /// Restricts the check to one table.
    #[must_use]
    pub fn on_table(self, table_name: impl Into<String>) -> Self {
        Self {
            table_name: Some(table_name.into()),
            ..self
        }
    }

    /// Returns whether the index exists, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator fails to list indexes.
    pub fn exists(&self) -> Result<bool> {
        let exists = self.introspector.indexes()?.iter().any(|index| {
            names_equal(&index.index_name, &self.index_name)
                && filter_accepts(self.table_name.as_deref(), &index.table_name)
        });
        debug!(
            index = %self.index_name,
            table = ?self.table_name,
            exists,
            "Checked index"
        );
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SchemaSnapshot;

    fn snapshot() -> SchemaSnapshot {
        SchemaSnapshot::new()
            .with_table("umbracoNode")
            .with_column("umbracoNode", "parentId", "INTEGER")
            .with_column("cmsContent", "nodeId", "INTEGER")
            .with_index("umbracoNode", "IX_umbracoNode_parentId", "parentId", false)
    }

    #[test]
    fn test_table_exists_ignores_case() {
        let snapshot = snapshot();
        assert!(CheckTableBuilder::new(&snapshot, "UMBRACONODE".into()).exists().unwrap());
        assert!(!CheckTableBuilder::new(&snapshot, "cmsContent".into()).exists().unwrap());
    }

    #[test]
    fn test_column_exists_on_table() {
        let snapshot = snapshot();
        let column = CheckColumnBuilder::new(&snapshot, "nodeid".into());
        assert!(column.exists().unwrap());
        assert!(column.on_table("cmsContent").exists().unwrap());
        assert!(!CheckColumnBuilder::new(&snapshot, "nodeId".into())
            .on_table("umbracoNode")
            .exists()
            .unwrap());
    }

    #[test]
    fn test_index_exists_on_table() {
        let snapshot = snapshot();
        let index = CheckIndexBuilder::new(&snapshot, "ix_umbraconode_parentid".into());
        assert!(index.exists().unwrap());
        assert!(!index.on_table("cmsContent").exists().unwrap());
    }
}

//! SQLite schema introspection.
//!
//! Metadata comes from `sqlite_master` and the `pragma_*` table-valued
//! functions, one table at a time.

use std::collections::BTreeMap;

use oxide_fluent_core::introspect::{ColumnInfo, ForeignKeyInfo, IndexInfo};
use oxide_fluent_core::snapshot::SchemaSnapshot;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::Result;

const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
     ORDER BY name";

const LIST_FOREIGN_KEYS_SQL: &str = r#"SELECT id, "table", "from", "to"
    FROM pragma_foreign_key_list(?)
    ORDER BY id, seq"#;

const LIST_PRIMARY_KEY_SQL: &str = "SELECT name FROM pragma_table_info(?) WHERE pk > 0 ORDER BY pk";

const LIST_COLUMNS_SQL: &str = r#"SELECT name, type, "notnull"
    FROM pragma_table_info(?)
    ORDER BY cid"#;

const LIST_INDEXES_SQL: &str = r#"SELECT name, "unique" FROM pragma_index_list(?) ORDER BY name"#;

const LIST_INDEX_COLUMNS_SQL: &str = "SELECT name FROM pragma_index_info(?) ORDER BY seqno";

/// Reads schema metadata from a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteIntrospector {
    pool: SqlitePool,
}

impl SqliteIntrospector {
    /// Creates an introspector over an existing pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        debug!(url, "Connected to SQLite");
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Lists user tables, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn tables(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(LIST_TABLES_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Lists every foreign key column pair of every user table.
    ///
    /// Composite keys yield one row per column pair, all sharing one name.
    /// A key that omits its referenced columns points at the referenced
    /// table's primary key.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn foreign_keys(&self) -> Result<Vec<ForeignKeyInfo>> {
        let mut foreign_keys = Vec::new();
        for table in self.tables().await? {
            foreign_keys.extend(self.table_foreign_keys(&table).await?);
        }
        Ok(foreign_keys)
    }

    /// Lists the foreign key column pairs declared on one table.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn table_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        let rows: Vec<(i64, String, String, Option<String>)> = sqlx::query_as(LIST_FOREIGN_KEYS_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        let mut keys: BTreeMap<i64, Vec<(String, String, Option<String>)>> = BTreeMap::new();
        for (id, primary_table, foreign_column, primary_column) in rows {
            keys.entry(id)
                .or_default()
                .push((primary_table, foreign_column, primary_column));
        }

        let mut resolved_keys = Vec::with_capacity(keys.len());
        for pairs in keys.into_values() {
            let primary_key = if pairs.iter().any(|(_, _, to)| to.is_none()) {
                self.primary_key(&pairs[0].0).await?
            } else {
                Vec::new()
            };

            let resolved: Vec<(String, String, String)> = pairs
                .into_iter()
                .enumerate()
                .map(|(seq, (primary_table, foreign_column, primary_column))| {
                    let primary_column = primary_column
                        .or_else(|| primary_key.get(seq).cloned())
                        .unwrap_or_default();
                    (primary_table, foreign_column, primary_column)
                })
                .collect();
            resolved_keys.push(resolved);
        }

        let names = key_names(table, &resolved_keys);
        let foreign_keys: Vec<ForeignKeyInfo> = resolved_keys
            .iter()
            .zip(&names)
            .flat_map(|(resolved, name)| {
                resolved.iter().map(move |(primary_table, foreign_column, primary_column)| {
                    ForeignKeyInfo::new(table, foreign_column, primary_table, primary_column, name)
                })
            })
            .collect();

        debug!(table, count = foreign_keys.len(), "Discovered foreign keys");
        Ok(foreign_keys)
    }

    /// Lists the columns of every user table.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn columns(&self) -> Result<Vec<ColumnInfo>> {
        let mut columns = Vec::new();
        for table in self.tables().await? {
            let rows: Vec<(String, String, i64)> = sqlx::query_as(LIST_COLUMNS_SQL)
                .bind(&table)
                .fetch_all(&self.pool)
                .await?;
            debug!(table = %table, count = rows.len(), "Discovered columns");
            columns.extend(rows.into_iter().map(|(name, data_type, not_null)| ColumnInfo {
                table_name: table.clone(),
                column_name: name,
                data_type,
                nullable: not_null == 0,
            }));
        }
        Ok(columns)
    }

    /// Lists the indexed columns of every user table, including the
    /// automatic indexes behind UNIQUE and PRIMARY KEY constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn indexes(&self) -> Result<Vec<IndexInfo>> {
        let mut indexes = Vec::new();
        for table in self.tables().await? {
            let index_rows: Vec<(String, i64)> = sqlx::query_as(LIST_INDEXES_SQL)
                .bind(&table)
                .fetch_all(&self.pool)
                .await?;
            for (index_name, unique) in index_rows {
                let column_rows: Vec<(Option<String>,)> = sqlx::query_as(LIST_INDEX_COLUMNS_SQL)
                    .bind(&index_name)
                    .fetch_all(&self.pool)
                    .await?;
                // Expression columns have no name.
                indexes.extend(column_rows.into_iter().filter_map(|(column,)| {
                    column.map(|column_name| IndexInfo {
                        table_name: table.clone(),
                        index_name: index_name.clone(),
                        column_name,
                        unique: unique != 0,
                    })
                }));
            }
        }
        Ok(indexes)
    }

    /// Loads the whole schema into a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn snapshot(&self) -> Result<SchemaSnapshot> {
        let snapshot = SchemaSnapshot {
            tables: self.tables().await?,
            columns: self.columns().await?,
            foreign_keys: self.foreign_keys().await?,
            indexes: self.indexes().await?,
        };
        info!(
            tables = snapshot.tables.len(),
            columns = snapshot.columns.len(),
            foreign_keys = snapshot.foreign_keys.len(),
            indexes = snapshot.indexes.len(),
            "Loaded schema snapshot"
        );
        Ok(snapshot)
    }

    async fn primary_key(&self, table: &str) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(LIST_PRIMARY_KEY_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}

/// Names each key `FK_<table>_<referenced table>_<first referenced column>`.
///
/// Keys that would share a name get their referencing columns appended, and
/// their position on the table if that is still not enough, so that every
/// discovered key keeps its own name.
fn key_names(table: &str, keys: &[Vec<(String, String, String)>]) -> Vec<String> {
    let base: Vec<String> = keys
        .iter()
        .map(|pairs| {
            let (primary_table, _, first_primary_column) = &pairs[0];
            format!("FK_{table}_{primary_table}_{first_primary_column}")
        })
        .collect();

    let mut names: Vec<String> = keys
        .iter()
        .zip(&base)
        .map(|(pairs, name)| {
            if base.iter().filter(|other| *other == name).count() > 1 {
                let foreign_columns: Vec<&str> =
                    pairs.iter().map(|(_, column, _)| column.as_str()).collect();
                format!("{name}_{}", foreign_columns.join("_"))
            } else {
                name.clone()
            }
        })
        .collect();

    let widened = names.clone();
    for (position, name) in names.iter_mut().enumerate() {
        if widened.iter().filter(|other| other.as_str() == name.as_str()).count() > 1 {
            name.push_str(&format!("_{position}"));
        }
    }
    names
}

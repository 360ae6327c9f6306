//! Foreign key existence check.
//!
//! A check is one [`CheckForeignKeyExpression`] built up through pure
//! transitions, then matched against the foreign keys the introspection
//! collaborator reports. [`CheckForeignKeyBuilder`] wraps the transitions
//! in a typestate so each side's table is named before its columns.
//!
//! Matching narrows the discovered rows by name and tables, then tests the
//! requested columns. In [`ForeignKeyMatch::Pooled`] mode the columns are
//! looked up among all surviving rows together, so two different keys can
//! jointly satisfy one request. [`ForeignKeyMatch::PerKey`] requires one
//! key to satisfy it alone.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::introspect::{filter_accepts, names_equal, ForeignKeyInfo, SchemaIntrospector};

// =============================================================================
// CheckForeignKeyExpression
// =============================================================================

/// Filters of a foreign key existence check. Unset filters match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckForeignKeyExpression {
    /// Constraint name.
    pub foreign_key_name: Option<String>,
    /// Referencing table.
    pub foreign_table_name: Option<String>,
    /// Referencing columns, all of which must be found.
    pub foreign_column_names: Vec<String>,
    /// Referenced table.
    pub primary_table_name: Option<String>,
    /// Referenced columns, all of which must be found.
    pub primary_column_names: Vec<String>,
}

impl CheckForeignKeyExpression {
    /// Creates a check with no filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters on the constraint name.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            foreign_key_name: Some(name.into()),
            ..self
        }
    }

    /// Filters on the referencing table.
    #[must_use]
    pub fn with_foreign_table(self, table_name: impl Into<String>) -> Self {
        Self {
            foreign_table_name: Some(table_name.into()),
            ..self
        }
    }

    /// Filters on the referenced table.
    #[must_use]
    pub fn with_primary_table(self, table_name: impl Into<String>) -> Self {
        Self {
            primary_table_name: Some(table_name.into()),
            ..self
        }
    }

    /// Requires the referencing columns.
    #[must_use]
    pub fn with_foreign_columns<I, C>(self, column_names: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            foreign_column_names: column_names.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Requires the referenced columns.
    #[must_use]
    pub fn with_primary_columns<I, C>(self, column_names: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            primary_column_names: column_names.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Decides whether the discovered foreign keys satisfy the check.
    #[must_use]
    pub fn matches(&self, foreign_keys: &[ForeignKeyInfo], mode: ForeignKeyMatch) -> bool {
        let candidates: Vec<&ForeignKeyInfo> = foreign_keys
            .iter()
            .filter(|fk| self.narrows_to(fk))
            .collect();

        match mode {
            ForeignKeyMatch::Pooled => self.columns_found(&candidates),
            ForeignKeyMatch::PerKey => {
                let mut keys: BTreeMap<(String, String, String), Vec<&ForeignKeyInfo>> =
                    BTreeMap::new();
                for fk in candidates {
                    keys.entry((
                        fk.name.to_lowercase(),
                        fk.foreign_table.to_lowercase(),
                        fk.primary_table.to_lowercase(),
                    ))
                    .or_default()
                    .push(fk);
                }
                keys.values().any(|rows| self.columns_found(rows))
            }
        }
    }

    /// Queries the collaborator and matches its foreign keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator fails to list foreign keys.
    pub fn exists_in(
        &self,
        introspector: &dyn SchemaIntrospector,
        mode: ForeignKeyMatch,
    ) -> Result<bool> {
        let foreign_keys = introspector.foreign_keys()?;
        let exists = self.matches(&foreign_keys, mode);
        debug!(
            name = ?self.foreign_key_name,
            foreign_table = ?self.foreign_table_name,
            primary_table = ?self.primary_table_name,
            discovered = foreign_keys.len(),
            ?mode,
            exists,
            "Checked foreign key"
        );
        Ok(exists)
    }

    fn narrows_to(&self, fk: &ForeignKeyInfo) -> bool {
        filter_accepts(self.foreign_key_name.as_deref(), &fk.name)
            && filter_accepts(self.foreign_table_name.as_deref(), &fk.foreign_table)
            && filter_accepts(self.primary_table_name.as_deref(), &fk.primary_table)
    }

    fn columns_found(&self, rows: &[&ForeignKeyInfo]) -> bool {
        !rows.is_empty()
            && self
                .foreign_column_names
                .iter()
                .all(|c| rows.iter().any(|fk| names_equal(&fk.foreign_column, c)))
            && self
                .primary_column_names
                .iter()
                .all(|c| rows.iter().any(|fk| names_equal(&fk.primary_column, c)))
    }
}

/// How requested columns are matched against discovered foreign keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForeignKeyMatch {
    /// Every requested column must appear somewhere among the keys that
    /// survive the name and table filters.
    #[default]
    Pooled,
    /// Every requested column must appear within one single key.
    PerKey,
}

// =============================================================================
// Typestate Markers
// =============================================================================

/// Marker: the side has not been named.
#[derive(Debug, Clone, Copy)]
pub struct Unset;

/// Marker: the side's table is named, its columns are pending.
#[derive(Debug, Clone, Copy)]
pub struct TableChosen;

/// Marker: the side's table and columns are named.
#[derive(Debug, Clone, Copy)]
pub struct ColumnsChosen;

/// A side that is not waiting for columns.
pub trait Settled {}

impl Settled for Unset {}
impl Settled for ColumnsChosen {}

// =============================================================================
// CheckForeignKeyBuilder
// =============================================================================

/// Foreign key existence check, typed by the state of the referencing (`F`)
/// and referenced (`P`) sides.
///
/// Either side may be named first. Naming a side's table requires its
/// columns next, before the other side can be started.
///
/// # Example
///
/// ```rust
/// use oxide_fluent_core::prelude::*;
///
/// let snapshot = SchemaSnapshot::new()
///     .with_foreign_key(ForeignKeyInfo::new("Foo", "BarId", "Bar", "BarId", "FK_Foo_Bar"));
/// let context = MigrationContext::new(DatabaseProvider::Sqlite).with_introspector(snapshot);
///
/// let exists = context
///     .check()?
///     .foreign_key()
///     .to_table("bar")
///     .with_column("barid")
///     .from_table("foo")
///     .with_column("BarId")
///     .exists()?;
/// assert!(exists);
/// # Ok::<(), oxide_fluent_core::FluentError>(())
/// ```
pub struct CheckForeignKeyBuilder<'a, F, P> {
    introspector: &'a dyn SchemaIntrospector,
    expression: CheckForeignKeyExpression,
    mode: ForeignKeyMatch,
    _state: PhantomData<(F, P)>,
}

impl<'a> CheckForeignKeyBuilder<'a, Unset, Unset> {
    pub(crate) fn new(introspector: &'a dyn SchemaIntrospector, name: Option<String>) -> Self {
        let expression = CheckForeignKeyExpression::new();
        Self {
            introspector,
            expression: match name {
                Some(name) => expression.with_name(name),
                None => expression,
            },
            mode: ForeignKeyMatch::default(),
            _state: PhantomData,
        }
    }
}

impl<'a, P: Settled> CheckForeignKeyBuilder<'a, Unset, P> {
    /// Names the referencing table.
    #[must_use]
    pub fn from_table(
        self,
        table_name: impl Into<String>,
    ) -> CheckForeignKeyBuilder<'a, TableChosen, P> {
        self.transition(|e| e.with_foreign_table(table_name))
    }
}

impl<'a, F: Settled> CheckForeignKeyBuilder<'a, F, Unset> {
    /// Names the referenced table.
    #[must_use]
    pub fn to_table(
        self,
        table_name: impl Into<String>,
    ) -> CheckForeignKeyBuilder<'a, F, TableChosen> {
        self.transition(|e| e.with_primary_table(table_name))
    }
}

macro_rules! column_transitions {
    ($doc:literal, $with_columns:ident: <$f:ty, $p:ty> => <$nf:ty, $np:ty>) => {
        impl<'a> CheckForeignKeyBuilder<'a, $f, $p> {
            #[doc = concat!("Requires a single ", $doc, " column.")]
            #[must_use]
            pub fn with_column(
                self,
                column_name: impl Into<String>,
            ) -> CheckForeignKeyBuilder<'a, $nf, $np> {
                self.transition(|e| e.$with_columns([column_name.into()]))
            }

            #[doc = concat!("Requires several ", $doc, " columns.")]
            #[must_use]
            pub fn with_columns<I, C>(self, column_names: I) -> CheckForeignKeyBuilder<'a, $nf, $np>
            where
                I: IntoIterator<Item = C>,
                C: Into<String>,
            {
                self.transition(|e| e.$with_columns(column_names))
            }
        }
    };
}

column_transitions!("referencing", with_foreign_columns: <TableChosen, Unset> => <ColumnsChosen, Unset>);
column_transitions!("referencing", with_foreign_columns: <TableChosen, ColumnsChosen> => <ColumnsChosen, ColumnsChosen>);
column_transitions!("referenced", with_primary_columns: <Unset, TableChosen> => <Unset, ColumnsChosen>);
column_transitions!("referenced", with_primary_columns: <ColumnsChosen, TableChosen> => <ColumnsChosen, ColumnsChosen>);

impl<'a, F, P> CheckForeignKeyBuilder<'a, F, P> {
    /// Selects how requested columns are matched. Defaults to
    /// [`ForeignKeyMatch::Pooled`].
    #[must_use]
    pub fn match_mode(mut self, mode: ForeignKeyMatch) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the check built so far.
    #[must_use]
    pub const fn expression(&self) -> &CheckForeignKeyExpression {
        &self.expression
    }

    fn transition<NF, NP>(
        self,
        f: impl FnOnce(CheckForeignKeyExpression) -> CheckForeignKeyExpression,
    ) -> CheckForeignKeyBuilder<'a, NF, NP> {
        CheckForeignKeyBuilder {
            introspector: self.introspector,
            expression: f(self.expression),
            mode: self.mode,
            _state: PhantomData,
        }
    }
}

impl<F: Settled, P: Settled> CheckForeignKeyBuilder<'_, F, P> {
    /// Decides whether a matching foreign key exists in the live schema.
    ///
    /// Filters that were never set do not narrow the search. A side whose
    /// table is named must have its columns named before the check runs:
    ///
    /// ```rust,compile_fail
    /// use oxide_fluent_core::prelude::*;
    ///
    /// let context = MigrationContext::new(DatabaseProvider::Sqlite)
    ///     .with_introspector(SchemaSnapshot::new());
    /// let _ = context.check()?.foreign_key().from_table("Foo").exists();
    /// # Ok::<(), oxide_fluent_core::FluentError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FluentError::Introspection`](crate::FluentError::Introspection)
    /// if the collaborator fails.
    pub fn exists(&self) -> Result<bool> {
        self.expression.exists_in(self.introspector, self.mode)
    }
}

impl<F, P> std::fmt::Debug for CheckForeignKeyBuilder<'_, F, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckForeignKeyBuilder")
            .field("expression", &self.expression)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovered() -> Vec<ForeignKeyInfo> {
        vec![
            ForeignKeyInfo::new("Foo", "FooId", "Bar", "BarId", "FK_Foo_Bar"),
            ForeignKeyInfo::new("Foo", "FooId", "Baz", "BazId", "FK_Foo_Baz"),
        ]
    }

    #[test]
    fn test_foreign_columns_pooled() {
        let check = CheckForeignKeyExpression::new()
            .with_foreign_table("Foo")
            .with_foreign_columns(["FooId"]);
        assert!(check.matches(&discovered(), ForeignKeyMatch::Pooled));
        assert!(check.matches(&discovered(), ForeignKeyMatch::PerKey));
    }

    #[test]
    fn test_pooled_false_positive() {
        let check = CheckForeignKeyExpression::new()
            .with_foreign_columns(["FooId"])
            .with_primary_columns(["BarId", "BazId"]);

        // No single key references both, but the pooled rows do.
        assert!(check.matches(&discovered(), ForeignKeyMatch::Pooled));
        assert!(!check.matches(&discovered(), ForeignKeyMatch::PerKey));
    }

    #[test]
    fn test_primary_column_is_not_a_foreign_column() {
        let check = CheckForeignKeyExpression::new()
            .with_foreign_table("Foo")
            .with_foreign_columns(["FooId", "BazId"]);
        assert!(!check.matches(&discovered(), ForeignKeyMatch::Pooled));
    }

    #[test]
    fn test_name_only_is_case_insensitive() {
        let check = CheckForeignKeyExpression::new().with_name("fk_foo_bar");
        assert!(check.matches(&discovered(), ForeignKeyMatch::Pooled));

        let missing = CheckForeignKeyExpression::new().with_name("FK_Foo_Qux");
        assert!(!missing.matches(&discovered(), ForeignKeyMatch::Pooled));
    }

    #[test]
    fn test_unfiltered_check_widens() {
        let check = CheckForeignKeyExpression::new();
        assert!(check.matches(&discovered(), ForeignKeyMatch::Pooled));
        assert!(!check.matches(&[], ForeignKeyMatch::Pooled));
        assert!(!check.matches(&[], ForeignKeyMatch::PerKey));
    }

    #[test]
    fn test_table_filters_narrow_before_columns() {
        let check = CheckForeignKeyExpression::new()
            .with_primary_table("Bar")
            .with_primary_columns(["BazId"]);
        assert!(!check.matches(&discovered(), ForeignKeyMatch::Pooled));
    }

    #[test]
    fn test_transitions_commute() {
        let a = CheckForeignKeyExpression::new()
            .with_foreign_table("Foo")
            .with_foreign_columns(["FooId"])
            .with_primary_table("Bar")
            .with_name("FK");
        let b = CheckForeignKeyExpression::new()
            .with_name("FK")
            .with_primary_table("Bar")
            .with_foreign_columns(["FooId"])
            .with_foreign_table("Foo");
        assert_eq!(a, b);
    }

    #[test]
    fn test_per_key_groups_composite_keys() {
        let rows = vec![
            ForeignKeyInfo::new("Line", "OrderId", "Order", "OrderId", "FK_Line_Order"),
            ForeignKeyInfo::new("Line", "LineNo", "Order", "LineNo", "FK_Line_Order"),
        ];
        let check = CheckForeignKeyExpression::new()
            .with_foreign_columns(["orderid", "lineno"])
            .with_primary_columns(["OrderId", "LineNo"]);
        assert!(check.matches(&rows, ForeignKeyMatch::PerKey));
    }

    #[test]
    fn test_exists_on_settled_sides() {
        let snapshot = crate::snapshot::SchemaSnapshot {
            foreign_keys: discovered(),
            ..Default::default()
        };
        let check = || CheckForeignKeyBuilder::new(&snapshot, None);

        assert!(check().exists().unwrap());
        assert!(check().from_table("Foo").with_column("FooId").exists().unwrap());
        assert!(check().to_table("Baz").with_column("BazId").exists().unwrap());
        assert!(!check()
            .from_table("Foo")
            .with_column("FooId")
            .to_table("Baz")
            .with_column("BarId")
            .exists()
            .unwrap());
    }
}

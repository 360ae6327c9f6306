//! The run-scoped, append-only expression queue.
//!
//! The queue is the arena that owns every expression a migration declares.
//! An expression's position in the queue is its identity: builders hold an
//! [`ExpressionId`] typed by the variant it points at, and look the
//! expression up again on every fluent call.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::expression::{Expression, ExpressionVariant};
use crate::provider::DatabaseProvider;

/// Position of a queued expression, typed by its variant.
pub struct ExpressionId<E> {
    index: usize,
    _variant: PhantomData<fn() -> E>,
}

impl<E> ExpressionId<E> {
    const fn new(index: usize) -> Self {
        Self {
            index,
            _variant: PhantomData,
        }
    }

    /// Returns the position in the queue.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl<E> Clone for ExpressionId<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ExpressionId<E> {}

impl<E> PartialEq for ExpressionId<E> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<E> Eq for ExpressionId<E> {}

impl<E> Hash for ExpressionId<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<E> fmt::Debug for ExpressionId<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExpressionId").field(&self.index).finish()
    }
}

impl<E> Serialize for ExpressionId<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.index.serialize(serializer)
    }
}

impl<'de, E> Deserialize<'de> for ExpressionId<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        usize::deserialize(deserializer).map(Self::new)
    }
}

/// A queued expression together with the providers it applies to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueuedExpression {
    expression: Expression,
    providers: BTreeSet<DatabaseProvider>,
}

impl QueuedExpression {
    /// Returns the expression.
    #[must_use]
    pub const fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Returns the providers the expression is gated to. Empty means every
    /// provider.
    #[must_use]
    pub const fn providers(&self) -> &BTreeSet<DatabaseProvider> {
        &self.providers
    }
}

/// Ordered, append-only list of the expressions a migration declared.
///
/// Execution order is declaration order. Nothing is ever reordered,
/// deduplicated or merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExpressionQueue {
    entries: Vec<QueuedExpression>,
}

impl ExpressionQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an expression at the tail and returns its handle.
    pub fn append<E: ExpressionVariant>(
        &mut self,
        expression: E,
        providers: &BTreeSet<DatabaseProvider>,
    ) -> ExpressionId<E> {
        let index = self.entries.len();
        let expression = expression.into();
        debug!(
            index,
            kind = expression.kind(),
            table = %expression.table_name(),
            providers = ?providers,
            "Queued expression"
        );
        self.entries.push(QueuedExpression {
            expression,
            providers: providers.clone(),
        });
        ExpressionId::new(index)
    }

    /// Looks up an expression by handle.
    #[must_use]
    pub fn get<E: ExpressionVariant>(&self, id: ExpressionId<E>) -> Option<&E> {
        self.entries
            .get(id.index)
            .and_then(|entry| E::from_expression(&entry.expression))
    }

    /// Mutable lookup for builders holding a handle this queue handed out.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not produced by [`append`](Self::append) on
    /// this queue. Entries are never removed, so builder handles stay valid.
    pub(crate) fn get_mut<E: ExpressionVariant>(&mut self, id: ExpressionId<E>) -> &mut E {
        self.entries
            .get_mut(id.index)
            .and_then(|entry| E::from_expression_mut(&mut entry.expression))
            .expect("builder handle points at an expression of its own variant")
    }

    /// Returns the number of queued expressions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the queued entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[QueuedExpression] {
        &self.entries
    }

    /// Iterates over the expressions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Expression> {
        self.entries.iter().map(QueuedExpression::expression)
    }

    /// Returns the last queued expression.
    #[must_use]
    pub fn last(&self) -> Option<&Expression> {
        self.entries.last().map(QueuedExpression::expression)
    }
}

impl IntoIterator for ExpressionQueue {
    type Item = QueuedExpression;
    type IntoIter = std::vec::IntoIter<QueuedExpression>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{CreateIndexExpression, CreateTableExpression};

    #[test]
    fn test_append_returns_tail_position() {
        let mut queue = ExpressionQueue::new();
        let first = queue.append(CreateTableExpression::new("a"), &BTreeSet::new());
        let second = queue.append(CreateTableExpression::new("b"), &BTreeSet::new());

        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.get(second).unwrap().table_name, "b");
    }

    #[test]
    fn test_get_with_foreign_handle_is_none() {
        let mut queue = ExpressionQueue::new();
        queue.append(CreateTableExpression::new("a"), &BTreeSet::new());

        let bogus: ExpressionId<CreateIndexExpression> = ExpressionId::new(0);
        assert!(queue.get(bogus).is_none());
        let missing: ExpressionId<CreateTableExpression> = ExpressionId::new(5);
        assert!(queue.get(missing).is_none());
    }

    #[test]
    fn test_providers_are_recorded() {
        let mut queue = ExpressionQueue::new();
        let providers = BTreeSet::from([DatabaseProvider::Sqlite]);
        queue.append(CreateTableExpression::new("a"), &providers);

        assert_eq!(queue.entries()[0].providers(), &providers);
    }

    #[test]
    fn test_serializes_as_tagged_list() {
        let mut queue = ExpressionQueue::new();
        queue.append(CreateTableExpression::new("a"), &BTreeSet::new());

        let json = serde_json::to_value(&queue).unwrap();
        assert_eq!(json[0]["expression"]["kind"], "create_table");
        assert_eq!(json[0]["expression"]["table_name"], "a");
        assert_eq!(json[0]["providers"], serde_json::json!([]));
    }
}

//! Abstract write directives against the row storage boundary.

use crate::db::row::{ColumnValue, Row, Selection, Table};

use super::size;

/// Kind of write directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Insert,
    Update,
    Delete,
}

/// A column whose value is the row id produced by an earlier operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackReference {
    pub column: String,
    /// Index of the referenced operation within the same batch.
    pub operation: usize,
}

/// One insert, update or delete directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub target: Table,
    pub values: Row,
    pub selection: Selection,
    pub back_references: Vec<BackReference>,
    size_override: Option<usize>,
}

impl Operation {
    fn new(kind: OperationKind, target: Table, values: Row, selection: Selection) -> Self {
        Self {
            kind,
            target,
            values,
            selection,
            back_references: Vec::new(),
            size_override: None,
        }
    }

    /// Inserts a new row into `target`.
    #[must_use]
    pub fn insert(target: Table, values: Row) -> Self {
        Self::new(OperationKind::Insert, target, values, Selection::All)
    }

    /// Overwrites the given columns of every row matching `selection`.
    #[must_use]
    pub fn update(target: Table, selection: Selection, values: Row) -> Self {
        Self::new(OperationKind::Update, target, values, selection)
    }

    /// Deletes every row matching `selection`.
    #[must_use]
    pub fn delete(target: Table, selection: Selection) -> Self {
        Self::new(OperationKind::Delete, target, Row::new(), selection)
    }

    /// Fills `column` with the row id produced by operation `operation` of the same batch.
    #[must_use]
    pub fn with_back_reference(mut self, column: &str, operation: usize) -> Self {
        self.back_references.push(BackReference {
            column: column.to_string(),
            operation,
        });
        self
    }

    /// Replaces the computed size estimate.
    #[must_use]
    pub const fn with_estimated_size(mut self, bytes: usize) -> Self {
        self.size_override = Some(bytes);
        self
    }

    /// Sets a column value.
    #[must_use]
    pub fn with_value(mut self, column: &str, value: impl Into<ColumnValue>) -> Self {
        self.values.insert(column.to_string(), value.into());
        self
    }

    /// Returns the number of bytes this operation occupies in a transaction.
    #[must_use]
    pub fn estimated_size(&self) -> usize {
        self.size_override
            .unwrap_or_else(|| size::estimate_operation(self))
    }
}

/// Outcome of one applied operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationResult {
    /// Id of the inserted row, for inserts.
    pub id: Option<i64>,
    /// Number of rows touched.
    pub count: usize,
}

impl OperationResult {
    #[must_use]
    pub const fn inserted(id: i64) -> Self {
        Self {
            id: Some(id),
            count: 1,
        }
    }

    #[must_use]
    pub const fn affected(count: usize) -> Self {
        Self { id: None, count }
    }
}

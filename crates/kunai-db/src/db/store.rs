//! In-memory `RowStore`.

use std::collections::BTreeMap;

use crate::db::RowStore;
use crate::db::batch::{Operation, OperationKind, OperationResult};
use crate::db::row::{ColumnValue, Row, Selection, Table};
use crate::error::StorageError;

/// Reverses one row change of an in-flight transaction.
#[derive(Debug)]
enum Undo {
    /// Drops a row inserted by the transaction.
    Remove(Table, i64),
    /// Puts back the previous contents of an updated or deleted row.
    Restore(Table, i64, Row),
}

/// Row store that keeps every table in memory.
///
/// Each `apply_batch` call writes to the live tables and records an undo entry
/// per touched row; a failing operation replays the entries in reverse.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: BTreeMap<Table, BTreeMap<i64, Row>>,
    last_id: i64,
    transaction_limit: Option<usize>,
    fail_on_attempt: Option<usize>,
    attempts: usize,
    committed: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects transactions whose summed estimated size exceeds `limit`.
    #[must_use]
    pub const fn with_transaction_limit(mut self, limit: usize) -> Self {
        self.transaction_limit = Some(limit);
        self
    }

    /// Makes the `attempt`-th transaction (counting from 1) fail as unavailable.
    #[must_use]
    pub const fn fail_on_transaction(mut self, attempt: usize) -> Self {
        self.fail_on_attempt = Some(attempt);
        self
    }

    /// Number of transactions committed so far.
    #[must_use]
    pub const fn transaction_count(&self) -> usize {
        self.committed
    }

    #[must_use]
    pub fn row_count(&self, table: Table) -> usize {
        self.tables.get(&table).map_or(0, BTreeMap::len)
    }

    fn resolve_values(
        index: usize,
        operation: &Operation,
        results: &[OperationResult],
    ) -> Result<Row, StorageError> {
        let mut values = operation.values.clone();
        for reference in &operation.back_references {
            let target = reference.operation;
            let result = results
                .get(target)
                .filter(|_| target < index)
                .ok_or(StorageError::InvalidBackReference {
                    operation: index,
                    target,
                })?;
            let id = result.id.ok_or(StorageError::MissingResultId {
                operation: index,
                target,
            })?;
            values.insert(reference.column.clone(), ColumnValue::Integer(id));
        }
        Ok(values)
    }

    fn apply_operations(
        &mut self,
        operations: &[Operation],
        undo: &mut Vec<Undo>,
    ) -> Result<Vec<OperationResult>, StorageError> {
        let mut results = Vec::with_capacity(operations.len());

        for (index, operation) in operations.iter().enumerate() {
            let values = Self::resolve_values(index, operation, &results)?;
            let target = operation.target;
            let table = self.tables.entry(target).or_default();

            let result = match operation.kind {
                OperationKind::Insert => {
                    self.last_id += 1;
                    table.insert(self.last_id, values);
                    undo.push(Undo::Remove(target, self.last_id));
                    OperationResult::inserted(self.last_id)
                }
                OperationKind::Update => {
                    let mut count = 0;
                    for (id, row) in &mut *table {
                        if operation.selection.matches(*id, row) {
                            undo.push(Undo::Restore(target, *id, row.clone()));
                            row.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
                            count += 1;
                        }
                    }
                    OperationResult::affected(count)
                }
                OperationKind::Delete => {
                    let matched: Vec<i64> = table
                        .iter()
                        .filter(|(id, row)| operation.selection.matches(**id, row))
                        .map(|(id, _)| *id)
                        .collect();
                    for id in &matched {
                        if let Some(row) = table.remove(id) {
                            undo.push(Undo::Restore(target, *id, row));
                        }
                    }
                    OperationResult::affected(matched.len())
                }
            };
            results.push(result);
        }

        Ok(results)
    }

    fn roll_back(&mut self, undo: Vec<Undo>, last_id: i64) {
        tracing::trace!(entries = undo.len(), "Rolling back transaction");
        for entry in undo.into_iter().rev() {
            match entry {
                Undo::Remove(table, id) => {
                    if let Some(rows) = self.tables.get_mut(&table) {
                        rows.remove(&id);
                    }
                }
                Undo::Restore(table, id, row) => {
                    self.tables.entry(table).or_default().insert(id, row);
                }
            }
        }
        self.last_id = last_id;
    }
}

impl RowStore for MemoryStore {
    #[tracing::instrument(skip_all, fields(operations = operations.len()))]
    fn apply_batch(&mut self, operations: &[Operation]) -> Result<Vec<OperationResult>, StorageError> {
        self.attempts += 1;
        if self.fail_on_attempt == Some(self.attempts) {
            return Err(StorageError::Unavailable(format!(
                "transaction {} rejected",
                self.attempts
            )));
        }

        if let Some(limit) = self.transaction_limit {
            let size: usize = operations.iter().map(Operation::estimated_size).sum();
            if size > limit {
                return Err(StorageError::TransactionTooLarge { size, limit });
            }
        }

        let first_id = self.last_id;
        let mut undo = Vec::new();
        match self.apply_operations(operations, &mut undo) {
            Ok(results) => {
                self.committed += 1;
                tracing::trace!("Transaction applied");
                Ok(results)
            }
            Err(e) => {
                self.roll_back(undo, first_id);
                Err(e)
            }
        }
    }

    fn query(&self, table: Table, selection: &Selection) -> Result<Vec<(i64, Row)>, StorageError> {
        Ok(self.tables.get(&table).map_or_else(Vec::new, |rows| {
            rows.iter()
                .filter(|(id, row)| selection.matches(**id, row))
                .map(|(id, row)| (*id, row.clone()))
                .collect()
        }))
    }
}

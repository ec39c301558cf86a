//! Size-budgeted batching of write operations.
//!
//! A `BatchOperation` collects the operations of one unit of work and commits
//! them as a sequence of atomic runs. Runs are packed greedily in enqueue
//! order so that each run stays within the transaction byte budget of the
//! storage boundary.

mod operation;
mod size;

use std::ops::Range;

use kunai_core::config::StorageConfig;
use kunai_core::constants::DEFAULT_TRANSACTION_BUDGET_BYTES;

use crate::db::RowStore;
use crate::db::row::ColumnValue;
use crate::error::{DbError, DbResult, StorageError};

pub use operation::{BackReference, Operation, OperationKind, OperationResult};

/// Limits applied to a single atomic run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    /// Maximum summed estimated size of the operations in one run.
    pub budget_bytes: usize,
    /// Maximum number of operations in one run.
    pub max_operations: Option<usize>,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            budget_bytes: DEFAULT_TRANSACTION_BUDGET_BYTES,
            max_operations: None,
        }
    }
}

impl From<&StorageConfig> for BatchLimits {
    fn from(config: &StorageConfig) -> Self {
        Self {
            budget_bytes: config.transaction_budget_bytes,
            max_operations: config.max_operations_per_transaction,
        }
    }
}

/// Pending operations of one unit of work.
#[derive(Debug, Default)]
pub struct BatchOperation {
    limits: BatchLimits,
    pending: Vec<Operation>,
}

impl BatchOperation {
    #[must_use]
    pub const fn new(limits: BatchLimits) -> Self {
        Self {
            limits,
            pending: Vec::new(),
        }
    }

    /// Appends an operation and returns its index for back-references.
    pub fn enqueue(&mut self, operation: Operation) -> usize {
        self.pending.push(operation);
        self.pending.len() - 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// ## Summary
    /// Commits every pending operation and returns the number of affected rows.
    ///
    /// Operations are split into runs in enqueue order; each run is applied
    /// atomically. The pending list is empty afterwards, whatever the outcome.
    ///
    /// ## Errors
    /// - `DbError::StorageQuotaExceeded` if a single operation exceeds the budget.
    ///   Nothing is applied in that case.
    /// - `DbError::StorageBoundaryError` if a run fails. Earlier runs stay
    ///   committed, later runs are not attempted.
    #[tracing::instrument(skip(self, store), fields(operations = self.pending.len()))]
    pub fn commit<S: RowStore + ?Sized>(&mut self, store: &mut S) -> DbResult<usize> {
        let operations = std::mem::take(&mut self.pending);
        if operations.is_empty() {
            return Ok(0);
        }

        let sizes: Vec<usize> = operations.iter().map(Operation::estimated_size).collect();
        if let Some((index, &size)) = sizes
            .iter()
            .enumerate()
            .find(|&(_, &size)| size > self.limits.budget_bytes)
        {
            tracing::error!(
                index,
                size,
                budget = self.limits.budget_bytes,
                "Operation exceeds transaction budget"
            );
            return Err(DbError::StorageQuotaExceeded {
                index,
                size,
                budget: self.limits.budget_bytes,
            });
        }

        let runs = plan_runs(&sizes, self.limits);
        tracing::debug!(runs = runs.len(), "Committing batch");

        let mut results = Vec::with_capacity(operations.len());
        let mut affected = 0;
        for run in runs {
            let prepared = prepare_run(&operations, run.clone(), &results)?;
            let run_results = store.apply_batch(&prepared).inspect_err(|e| {
                tracing::error!(error = %e, run_start = run.start, "Transaction run failed");
            })?;

            if run_results.len() != prepared.len() {
                return Err(StorageError::Unavailable(format!(
                    "store returned {} results for {} operations",
                    run_results.len(),
                    prepared.len()
                ))
                .into());
            }

            let run_affected: usize = run_results.iter().map(|result| result.count).sum();
            tracing::trace!(
                run_start = run.start,
                run_len = run.len(),
                run_affected,
                "Run committed"
            );
            affected += run_affected;
            results.extend(run_results);
        }

        Ok(affected)
    }
}

/// Splits operations into consecutive runs, opening a new run only when the
/// next operation would overflow the current one.
fn plan_runs(sizes: &[usize], limits: BatchLimits) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut run_size = 0;

    for (index, &size) in sizes.iter().enumerate() {
        let run_len = index - start;
        let full = run_size + size > limits.budget_bytes
            || limits.max_operations.is_some_and(|max| run_len >= max);
        if run_len > 0 && full {
            runs.push(start..index);
            start = index;
            run_size = 0;
        }
        run_size += size;
    }

    if start < sizes.len() {
        runs.push(start..sizes.len());
    }
    runs
}

/// Rebases back-references of a run onto the run's own indices, substituting
/// ids produced by earlier runs.
fn prepare_run(
    operations: &[Operation],
    run: Range<usize>,
    committed: &[OperationResult],
) -> Result<Vec<Operation>, StorageError> {
    let run_start = run.start;
    operations[run]
        .iter()
        .enumerate()
        .map(|(offset, operation)| {
            let index = run_start + offset;
            let mut prepared = operation.clone();
            let mut kept = Vec::with_capacity(operation.back_references.len());

            for reference in &operation.back_references {
                let target = reference.operation;
                if target >= index {
                    return Err(StorageError::InvalidBackReference {
                        operation: index,
                        target,
                    });
                }

                if target >= run_start {
                    kept.push(BackReference {
                        column: reference.column.clone(),
                        operation: target - run_start,
                    });
                } else {
                    let id = committed
                        .get(target)
                        .and_then(|result| result.id)
                        .ok_or(StorageError::MissingResultId {
                            operation: index,
                            target,
                        })?;
                    prepared
                        .values
                        .insert(reference.column.clone(), ColumnValue::Integer(id));
                }
            }

            prepared.back_references = kept;
            Ok(prepared)
        })
        .collect()
}

use crate::db::batch::{Operation, OperationResult};
use crate::db::row::{Row, Selection, Table};
use crate::error::StorageError;

pub mod batch;
pub mod enums;
pub mod keys;
pub mod map;
pub mod query;
pub mod row;
pub mod store;

/// The external row storage boundary.
///
/// Implementations apply every operation of one `apply_batch` call atomically:
/// either all of them take effect or none do. Back-references inside the slice
/// are indices into the same slice.
pub trait RowStore {
    /// ## Summary
    /// Applies a run of operations as one atomic transaction.
    ///
    /// ## Errors
    /// Returns a `StorageError` if the run is rejected; nothing is applied in that case.
    fn apply_batch(&mut self, operations: &[Operation]) -> Result<Vec<OperationResult>, StorageError>;

    /// ## Summary
    /// Returns the id and values of every row of `table` matching `selection`.
    ///
    /// ## Errors
    /// Returns a `StorageError` if the store cannot be read.
    fn query(&self, table: Table, selection: &Selection) -> Result<Vec<(i64, Row)>, StorageError>;
}

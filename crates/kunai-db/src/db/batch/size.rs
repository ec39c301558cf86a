//! Byte size estimates of operations as they travel to the storage boundary.
//!
//! Strings are counted as UTF-16 with a length prefix and terminator, padded
//! to four bytes. Every value carries a four byte type tag.

use crate::db::row::{ColumnValue, Row, Selection};

use super::operation::Operation;

/// Fixed cost of one operation: kind, target and flags.
const OPERATION_OVERHEAD: usize = 64;
const TYPE_TAG: usize = 4;
const INTEGER_SIZE: usize = 8;
const BOOLEAN_SIZE: usize = 4;

const fn pad4(bytes: usize) -> usize {
    (bytes + 3) & !3
}

fn string_size(s: &str) -> usize {
    4 + pad4((s.encode_utf16().count() + 1) * 2)
}

fn value_size(value: &ColumnValue) -> usize {
    TYPE_TAG
        + match value {
            ColumnValue::Null => 0,
            ColumnValue::Integer(_) => INTEGER_SIZE,
            ColumnValue::Boolean(_) => BOOLEAN_SIZE,
            ColumnValue::Text(text) => string_size(text),
        }
}

fn row_size(row: &Row) -> usize {
    4 + row
        .iter()
        .map(|(column, value)| string_size(column) + value_size(value))
        .sum::<usize>()
}

fn selection_size(selection: &Selection) -> usize {
    match selection {
        Selection::All => 0,
        Selection::Id(_) => TYPE_TAG + INTEGER_SIZE,
        Selection::Equals { column, value } => string_size(column) + value_size(value),
        Selection::In { column, values } => {
            string_size(column) + 4 + values.iter().map(value_size).sum::<usize>()
        }
        Selection::And(inner) => inner.iter().map(selection_size).sum(),
    }
}

pub(super) fn estimate_operation(operation: &Operation) -> usize {
    OPERATION_OVERHEAD
        + string_size(operation.target.as_str())
        + row_size(&operation.values)
        + selection_size(&operation.selection)
        + operation
            .back_references
            .iter()
            .map(|reference| string_size(&reference.column) + TYPE_TAG + INTEGER_SIZE)
            .sum::<usize>()
}

//! Error handling and result types for SortedTable operations.
//!
//! Every fallible table operation reports one of the variants of
//! [`SortedTableError`]. Cursor invalidation is deliberately absent: a cursor
//! that observes a structural change simply ends.

use thiserror::Error;

/// Error type for sorted table operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortedTableError {
    /// Key not found in the table.
    #[error("Key not found in table")]
    KeyNotFound,
    /// Minimum removal requested on an empty table.
    #[error("Table is empty")]
    Empty,
    /// Memory allocation failed, or the policy refused a new node.
    #[error("Allocation error: {0}")]
    AllocationError(String),
    /// A red-black or structural invariant does not hold.
    #[error("Corrupted tree: {0}")]
    CorruptedTree(String),
}

impl SortedTableError {
    /// Create an AllocationError with context
    pub fn allocation_error(resource: &str, reason: &str) -> Self {
        Self::AllocationError(format!("Failed to allocate {}: {}", resource, reason))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Check if this error is an allocation error
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationError(_))
    }
}

/// Internal result type for tree operations
pub(crate) type TreeResult<T> = Result<T, SortedTableError>;

/// Public result type for table operations that may fail
pub type TableResult<T> = Result<T, SortedTableError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, SortedTableError>;

/// Result type for table modification operations
pub type ModifyResult<T> = Result<T, SortedTableError>;

/// Result type for table construction
pub type InitResult<T> = Result<T, SortedTableError>;

/// Result extension trait for attaching context to errors
pub trait TableResultExt<T> {
    /// Convert to a TableResult with additional context
    fn with_context(self, context: &str) -> TableResult<T>;

    /// Convert to a TableResult with operation context
    fn with_operation(self, operation: &str) -> TableResult<T>;
}

impl<T> TableResultExt<T> for Result<T, SortedTableError> {
    fn with_context(self, context: &str) -> TableResult<T> {
        self.map_err(|e| match e {
            SortedTableError::KeyNotFound => SortedTableError::KeyNotFound,
            SortedTableError::Empty => SortedTableError::Empty,
            SortedTableError::AllocationError(msg) => {
                SortedTableError::AllocationError(format!("{}: {}", context, msg))
            }
            SortedTableError::CorruptedTree(msg) => SortedTableError::corrupted_tree(context, &msg),
        })
    }

    fn with_operation(self, operation: &str) -> TableResult<T> {
        self.with_context(&format!("Operation '{}'", operation))
    }
}

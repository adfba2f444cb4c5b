//! Sorted key/value table backed by a left-leaning red-black tree.
//!
//! [`SortedTable`] offers logarithmic lookup, upserting insertion, deletion of
//! an arbitrary key or of the minimum, positional queries (`rank`, `select`),
//! bulk clearing and ordered iteration in both directions. Key order, node admission and the disposal of discarded
//! keys and values are all delegated to a [`TablePolicy`] chosen when the
//! table is built.
//!
//! Two kinds of iteration are provided. The borrowing iterators ([`Iter`],
//! [`Keys`], [`Values`]) hold the table for their lifetime. A [`Cursor`] holds
//! nothing and is handed the table on every step; if the table was modified
//! in the meantime, or a different table is passed, the cursor ends.
//!
//! ```
//! use sortedtable::{Direction, SortedTable};
//!
//! let mut table = SortedTable::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     table.insert(key, key * 10).unwrap();
//! }
//! table.delete(&5).unwrap();
//! table.delete_min().unwrap();
//!
//! let mut cursor = table.cursor(Direction::Ascending).unwrap();
//! let mut keys = Vec::new();
//! while let Some((key, _)) = cursor.next(&table) {
//!     keys.push(*key);
//! }
//! assert_eq!(keys, [3, 4, 7, 8, 9]);
//! ```

mod arena;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod policy;
mod tree_structure;
mod types;
mod validation;

pub use arena::{ArenaStats, NodeId};
pub use error::{
    InitResult, KeyResult, ModifyResult, SortedTableError, TableResult, TableResultExt,
};
pub use iteration::{Cursor, Direction, Iter, Keys, Values};
pub use policy::{ComparatorPolicy, NodeLimit, OrdPolicy, TablePolicy};
pub use types::{OrdTable, SortedTable};
pub use validation::TreeStats;

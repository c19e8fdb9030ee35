//! Storage collaborators that provide the raw recorded table.
//!
//! The generator only needs a rectangular table of named numeric channels;
//! where it comes from is behind `TableSource`.

use crate::data::RawTable;
use crate::errors::DispatchError;
use crate::types::SourceId;

/// Source implementation modules.
pub mod sources;

pub use sources::delimited_source::{DelimitedSourceConfig, DelimitedTableSource};

/// Generator-facing table provider.
///
/// `load` is called once per generator construction. Any failure to locate or
/// parse the table must be reported as `DispatchError::DataUnavailable`.
pub trait TableSource: Send + Sync {
    /// Stable source identifier used in diagnostics.
    fn id(&self) -> &str;
    /// Read the full table.
    fn load(&self) -> Result<RawTable, DispatchError>;
}

/// Table source backed by an in-memory table (tests, embedding callers).
pub struct InMemoryTableSource {
    id: SourceId,
    table: RawTable,
}

impl InMemoryTableSource {
    /// Wrap a prebuilt table.
    pub fn new(id: impl Into<SourceId>, table: RawTable) -> Self {
        Self {
            id: id.into(),
            table,
        }
    }
}

impl TableSource for InMemoryTableSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<RawTable, DispatchError> {
        Ok(self.table.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_source_returns_its_table() {
        let table = RawTable::from_columns(vec![("reg".into(), vec![0.1, 0.2])]).unwrap();
        let source = InMemoryTableSource::new("in_memory", table.clone());
        assert_eq!(source.id(), "in_memory");
        assert_eq!(source.load().unwrap(), table);
    }
}

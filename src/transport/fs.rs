use std::fs;
use std::path::Path;

use crate::errors::DispatchError;

/// Read a whole table file as UTF-8 text.
///
/// Missing files and read failures both surface as `DataUnavailable`, naming the path.
pub fn read_table_text(path: &Path) -> Result<String, DispatchError> {
    if !path.is_file() {
        return Err(data_unavailable(path, "cannot locate file"));
    }
    fs::read_to_string(path).map_err(|err| data_unavailable(path, err))
}

/// True if the path has a `.csv` extension (case-insensitive).
pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Build a `DataUnavailable` error for `path`.
pub fn data_unavailable(path: &Path, reason: impl ToString) -> DispatchError {
    DispatchError::DataUnavailable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

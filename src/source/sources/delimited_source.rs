use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::dispatch::{DEFAULT_DELIMITER, DELIMITED_SOURCE_ID};
use crate::data::RawTable;
use crate::errors::DispatchError;
use crate::source::TableSource;
use crate::transport::fs::{data_unavailable, is_csv_file, read_table_text};
use crate::types::{ChannelName, Sample, SourceId};

/// Configuration for a delimited-text table on disk.
#[derive(Clone, Debug)]
pub struct DelimitedSourceConfig {
    /// Stable source identifier used in diagnostics.
    pub source_id: SourceId,
    /// Table file location.
    pub path: PathBuf,
    /// Field delimiter.
    pub delimiter: char,
    /// Whether the first column is a row index to be discarded.
    pub index_column: bool,
}

impl DelimitedSourceConfig {
    /// Comma-delimited table with a leading index column at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            source_id: DELIMITED_SOURCE_ID.to_string(),
            path: path.into(),
            delimiter: DEFAULT_DELIMITER,
            index_column: true,
        }
    }

    /// Override the field delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the first column is a row index.
    pub fn with_index_column(mut self, index_column: bool) -> Self {
        self.index_column = index_column;
        self
    }

    /// Override the source identifier.
    pub fn with_source_id(mut self, source_id: impl Into<SourceId>) -> Self {
        self.source_id = source_id.into();
        self
    }
}

/// Table source reading a header row of channel names followed by numeric rows.
pub struct DelimitedTableSource {
    config: DelimitedSourceConfig,
}

impl DelimitedTableSource {
    /// Create a source from `config`.
    pub fn new(config: DelimitedSourceConfig) -> Self {
        Self { config }
    }

    /// Comma-delimited source with a leading index column at `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(DelimitedSourceConfig::new(path))
    }

    /// Table file location.
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

impl TableSource for DelimitedTableSource {
    fn id(&self) -> &str {
        &self.config.source_id
    }

    fn load(&self) -> Result<RawTable, DispatchError> {
        let path = &self.config.path;
        if !is_csv_file(path) {
            debug!(
                source_id = %self.config.source_id,
                path = %path.display(),
                "reading table without a .csv extension"
            );
        }
        let text = read_table_text(path)?;
        let table = parse_delimited(&text, self.config.delimiter, self.config.index_column)
            .map_err(|reason| data_unavailable(path, reason))?;
        debug!(
            source_id = %self.config.source_id,
            channels = table.channels().len(),
            rows = table.row_count(),
            "loaded table"
        );
        Ok(table)
    }
}

/// Parse delimited text into a table.
///
/// The first non-blank line is the header. Blank lines are ignored. Every row
/// must have as many fields as the header and every kept field must parse as
/// a number; errors name the offending line and column.
pub fn parse_delimited(
    text: &str,
    delimiter: char,
    index_column: bool,
) -> Result<RawTable, String> {
    let skip = usize::from(index_column);
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Err("table is empty".to_string());
    };
    let header_fields: Vec<&str> = header.split(delimiter).map(clean_field).collect();
    let channels: Vec<ChannelName> = header_fields
        .iter()
        .skip(skip)
        .map(|field| field.to_string())
        .collect();
    if channels.is_empty() {
        return Err("table header names no channels".to_string());
    }

    let mut rows: Vec<Vec<Sample>> = Vec::new();
    for (line_idx, line) in lines {
        let line_no = line_idx + 1;
        let fields: Vec<&str> = line.split(delimiter).map(clean_field).collect();
        if fields.len() != header_fields.len() {
            return Err(format!(
                "line {line_no} has {} fields, header has {}",
                fields.len(),
                header_fields.len()
            ));
        }
        let row = fields
            .iter()
            .skip(skip)
            .zip(&channels)
            .map(|(field, channel)| {
                field.parse::<Sample>().map_err(|_| {
                    format!("line {line_no}, column '{channel}': '{field}' is not a number")
                })
            })
            .collect::<Result<Vec<Sample>, String>>()?;
        rows.push(row);
    }

    RawTable::from_rows(channels, rows).map_err(|err| err.to_string())
}

fn clean_field(field: &str) -> &str {
    let trimmed = field.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn index_column_is_dropped() {
        let table = parse_delimited(",reg_a,reg_b\n0,0.5,1\n1,-0.25,2\n", ',', true).unwrap();
        assert_eq!(table.channels(), ["reg_a", "reg_b"]);
        assert_eq!(table.column("reg_a"), Some(&[0.5, -0.25][..]));
        assert_eq!(table.column("reg_b"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn headers_are_trimmed_and_unquoted_and_blank_lines_skipped() {
        let table =
            parse_delimited("\n\"a\" ; b \n\n1;2\n  \n3;4\n", ';', false).unwrap();
        assert_eq!(table.channels(), ["a", "b"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn ragged_rows_and_bad_numbers_name_the_line() {
        let err = parse_delimited("i,a\n0,1\n1\n", ',', true).unwrap_err();
        assert!(err.contains("line 3"), "{err}");

        let err = parse_delimited("i,a\n0,1\n1,x\n", ',', true).unwrap_err();
        assert!(err.contains("line 3") && err.contains("'a'"), "{err}");

        assert!(parse_delimited("", ',', true).is_err());
        assert!(parse_delimited("index\n0\n", ',', true).is_err());
    }

    #[test]
    fn unreadable_table_is_data_unavailable() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.csv");
        fs::write(&path, "i,a\n0,nope\n").unwrap();
        let err = DelimitedTableSource::from_path(&path).load().unwrap_err();
        match err {
            DispatchError::DataUnavailable { path: reported, reason } => {
                assert!(reported.ends_with("bad.csv"));
                assert!(reason.contains("not a number"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loads_table_from_disk() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("data.tsv");
        fs::write(&path, "reg\n1.5\n2.5\n").unwrap();
        let source = DelimitedTableSource::new(
            DelimitedSourceConfig::new(&path)
                .with_delimiter('\t')
                .with_index_column(false)
                .with_source_id("tsv"),
        );
        assert_eq!(source.id(), "tsv");
        assert_eq!(source.path(), path.as_path());
        let table = source.load().unwrap();
        assert_eq!(table.column("reg"), Some(&[1.5, 2.5][..]));
    }
}

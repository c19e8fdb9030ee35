/// Delimited-text (CSV) table source.
pub mod delimited_source;

/// Name of a raw recorded channel (a column of the corpus table).
/// Examples: `reg_2019_01`, `RegD`
pub type ChannelName = String;
/// Unique segment identifier: channel name and hour index.
/// Example: `reg_2019_01_17`
pub type SegmentId = String;
/// Identifier for the storage collaborator that produced a table.
/// Examples: `delimited_table`, `in_memory`
pub type SourceId = String;
/// Single recorded or synthesized dispatch value.
pub type Sample = f64;
/// Warning/log message text.
/// Examples: `Mean of sequence out of range, ...`
pub type LogMessage = String;
/// File path strings used in error reports.
/// Example: `data/FrequencyRegulationData.csv`
pub type PathString = String;

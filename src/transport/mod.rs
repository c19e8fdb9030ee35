/// Filesystem transport for table files.
pub mod fs;

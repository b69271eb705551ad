//! Spreadsheet output and re-reading.
//!
//! The writer serializes a table to a single-sheet workbook with a bold
//! header row. The reader loads that sheet back into a table using the
//! same kind inference as the CSV reader.

pub mod reader;
pub mod writer;


pub use reader::read_spreadsheet;
pub use writer::write_spreadsheet;

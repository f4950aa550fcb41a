//! Output writers for converted documents and reports.
//!
//! This module handles writing data to disk:
//! - Converted TCX documents (indented, with declaration header)
//! - JSON conversion reports

pub mod report;
pub mod xml;

// Re-export main functions
pub use report::{read_report, write_report, ConversionReport};
pub use xml::{serialize_document, write_document};

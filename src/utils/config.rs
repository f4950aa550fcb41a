//! Configuration and constants for the converter.

/// Primary TCX schema namespace (TrainingCenterDatabase v2)
pub const NS_TCX: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";

/// Secondary activity-extension namespace (TPX, Speed, Watts)
pub const NS_ACTIVITY_EXT: &str = "http://www.garmin.com/xmlschemas/ActivityExtension/v2";

/// Prefix the target platform expects on sample-extension elements
pub const EXT_PREFIX: &str = "ns3";

/// Indentation used for output documents
pub const INDENT_CHAR: u8 = b' ';
pub const INDENT_SIZE: usize = 2;

/// Current conversion-report schema version
pub const REPORT_VERSION: &str = "1.0.0";

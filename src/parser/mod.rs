//! TCX parsing and document model.
//!
//! This module handles:
//! - Building the in-memory element tree from raw document text
//! - Resolving tag names into the known element kinds
//! - Extracting per-track (timestamp, distance) sample lists

pub mod document;
pub mod tcx;

// Re-export main types
pub use document::{Document, Element, ElementKind, Node};
pub use tcx::{
    document_stats, extract_track_samples, parse_document, DocumentStats, TrackSample,
    TrackSamples,
};

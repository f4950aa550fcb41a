//! tcxconv
//!
//! Converts TCX workout files exported from Peloton into the
//! variant accepted by TrainerRoad and other training platforms.
//!
//! This crate provides the core implementation for the
//! `tcxconv` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install tcxconv
//! tcxconv convert ride.tcx converted.tcx
//! ```

pub mod commands;
pub mod converter;
pub mod output;
pub mod parser;
pub mod rewriter;
pub mod speed;
pub mod utils;

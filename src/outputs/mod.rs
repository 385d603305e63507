//! Output of a collection run.
//!
//! - [`json`]: records as a JSON array, to stdout or a file

pub mod json;

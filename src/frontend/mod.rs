//! Front-end utilities shared by the future lexer and parser.
//!
//! Currently hosts the source-location layer: translation of raw UTF-8 byte
//! offsets into human-oriented line/column positions.

pub mod source_location;

pub use source_location::{LocationError, SourceLocation, SourceRegion};

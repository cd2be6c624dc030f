//! Translation of byte offsets into line/column positions.

use ember_derive::Error;
use std::fmt;

/// Errors from translating a byte offset against a source buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum LocationError {
    /// The offset points past the end of the source buffer.
    #[error("byte offset {offset} is past the end of the {length} byte source")]
    OffsetPastEnd { offset: usize, length: usize },
    /// The offset points into the middle of a multi-byte character.
    #[error("byte offset {0} is not on a character boundary")]
    NotACharacterBoundary(usize),
    /// A region's end offset precedes its start offset.
    #[error("region end offset {end} precedes start offset {start}")]
    EndBeforeStart { start: usize, end: usize },
}

/// A position in a source text.
///
/// `line` and `column` are zero-based indices; columns count characters
/// (code points), not bytes. The end of the buffer is a valid position.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    pub byte_offset: usize,
}

impl SourceLocation {
    /// Computes the line/column position of `byte_offset` within `source`.
    ///
    /// A `\n` starts a new line; a `\r\n` sequence counts as a single line
    /// break. Returns [`LocationError::OffsetPastEnd`] if the offset exceeds
    /// the buffer and [`LocationError::NotACharacterBoundary`] if it falls
    /// inside a multi-byte character.
    pub fn from_byte_offset(source: &str, byte_offset: usize) -> Result<SourceLocation, LocationError> {
        if byte_offset > source.len() {
            return Err(LocationError::OffsetPastEnd {
                offset: byte_offset,
                length: source.len(),
            });
        }
        if !source.is_char_boundary(byte_offset) {
            return Err(LocationError::NotACharacterBoundary(byte_offset));
        }

        let mut location = SourceLocation {
            byte_offset,
            ..SourceLocation::default()
        };
        let mut characters = source[..byte_offset].chars().peekable();
        while let Some(character) = characters.next() {
            match character {
                '\n' => {
                    location.line += 1;
                    location.column = 0;
                }
                '\r' if characters.peek() == Some(&'\n') => {
                    // The upcoming '\n' performs the line break for the
                    // whole CRLF sequence.
                }
                _ => location.column += 1,
            }
        }
        Ok(location)
    }

    /// Renders the location for user-facing diagnostics, with one-based line
    /// and column: `path:line:column`.
    pub fn to_user_readable_string(&self, filepath: &str) -> String {
        format!("{}:{}:{}", filepath, self.line + 1, self.column + 1)
    }

    /// Renders the location for internal debugging, zero-based and with the
    /// raw byte offset: `path:line:column(offset)`.
    pub fn to_debug_string(&self, filepath: &str) -> String {
        format!(
            "{}:{}:{}({})",
            filepath, self.line, self.column, self.byte_offset
        )
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A half-open span of source text between two locations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SourceRegion {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRegion {
    /// Builds a region from two byte offsets, `start` inclusive and `end`
    /// exclusive.
    pub fn from_byte_offsets(
        source: &str,
        start: usize,
        end: usize,
    ) -> Result<SourceRegion, LocationError> {
        if end < start {
            return Err(LocationError::EndBeforeStart { start, end });
        }
        Ok(SourceRegion {
            start: SourceLocation::from_byte_offset(source, start)?,
            end: SourceLocation::from_byte_offset(source, end)?,
        })
    }

    /// Returns the spanned text of `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.byte_offset..self.end.byte_offset]
    }
}

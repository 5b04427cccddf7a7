//! Interfaces for RDF parsers.

use crate::sink::RdfSink;
use std::error::Error;
use std::fmt;

/// A line/column coordinate in a textual input, both starting at 1.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub struct Position {
    pub line: u64,
    pub column: u64,
}

impl Position {
    pub fn new(line: u64, column: u64) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// The region of the input a token was read from.
///
/// Invariant: `start <= end` in the lexicographic (line, column) order.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// A zero-width span at a single position.
    pub fn point(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            self.start.fmt(f)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

/// Error trait allowing to get the textual position of the error.
pub trait PositionedError: Error {
    /// Returns the region of the input the error comes from, if known.
    fn span(&self) -> Option<Span>;
}

/// A parser that reads a complete document and pushes everything it finds
/// into an [`RdfSink`](../sink/trait.RdfSink.html).
///
/// `load` consumes the parser: a parser instance is tied to one input stream
/// and is not reusable. The input stream is dropped (and thereby closed) on
/// every exit path, successful or not.
pub trait RdfReader {
    type Error: PositionedError;

    /// Parses the complete document, calling the sink for every statement,
    /// namespace and base IRI encountered.
    ///
    /// The sink's `start` is called exactly once before any other sink call
    /// and `end` exactly once after all of them: `end(true)` on success or on
    /// a sink-requested stop, `end(false)` on a fatal error.
    fn load<S: RdfSink>(self, sink: &mut S) -> Result<(), Self::Error>;
}

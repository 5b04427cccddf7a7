use crate::token::TokenKind;
use oxilangtag::LanguageTagParseError;
use oxiri::IriParseError;
use std::error::Error;
use std::fmt;
use std::io;
use terrapin_api::parser::{PositionedError, Span};

/// Error that might be returned during parsing.
///
/// It might wrap an IO error or be a lexical, grammar or semantic error, and
/// carries the span of the offending token when one is available.
#[derive(Debug)]
pub struct ParseError {
    pub(crate) kind: ParseErrorKind,
    pub(crate) span: Option<Span>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            span: Some(span),
        }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

#[derive(Debug)]
pub enum ParseErrorKind {
    Io(io::Error),
    /// The input ended in the middle of a token or production.
    PrematureEof,
    /// A character no production can start with or continue on.
    UnexpectedCharacter(char),
    /// A byte sequence that is not valid UTF-8.
    InvalidUtf8,
    /// A `\u`/`\U` escape naming something that is not a Unicode scalar value,
    /// including an unpaired surrogate half.
    InvalidUnicodeCodePoint(u32),
    /// A backslash escape that is not part of the format's escape set.
    InvalidEscape(String),
    /// A well-formed token in a position the grammar does not allow.
    UnexpectedToken {
        found: TokenKind,
        expected: &'static str,
    },
    /// A construct that other syntax variants accept but the selected one
    /// forbids.
    SyntaxRestriction(&'static str),
    /// A prefixed name using a prefix no directive declared.
    UnknownPrefix(String),
    InvalidIri {
        iri: String,
        error: IriParseError,
    },
    /// An IRI rejected by the RFC 3987 validators.
    MalformedIri(String),
    /// A relative IRI in a format without base-IRI resolution.
    RelativeIri(String),
    InvalidLanguageTag {
        tag: String,
        error: LanguageTagParseError,
    },
    /// A literal carrying both a language tag and a datatype.
    ConflictingLiteralSuffixes,
    /// A second unnamed graph block in a TriG document.
    DuplicateDefaultGraph,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::Io(error) => return error.fmt(f),
            ParseErrorKind::PrematureEof => write!(f, "premature end of file"),
            ParseErrorKind::UnexpectedCharacter(c) => {
                write!(f, "unexpected character '{}'", c.escape_debug())
            }
            ParseErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8 byte sequence"),
            ParseErrorKind::InvalidUnicodeCodePoint(point) => {
                write!(f, "invalid unicode code point '{:X}'", point)
            }
            ParseErrorKind::InvalidEscape(escape) => {
                write!(f, "invalid escape sequence '{}'", escape)
            }
            ParseErrorKind::UnexpectedToken { found, expected } => {
                write!(f, "unexpected {} token, expected {}", found, expected)
            }
            ParseErrorKind::SyntaxRestriction(message) => f.write_str(message),
            ParseErrorKind::UnknownPrefix(prefix) => write!(f, "unknown prefix '{}'", prefix),
            ParseErrorKind::InvalidIri { iri, error } => {
                write!(f, "error while parsing IRI '{}': {}", iri, error)
            }
            ParseErrorKind::MalformedIri(iri) => write!(f, "'{}' is not a valid IRI", iri),
            ParseErrorKind::RelativeIri(iri) => write!(
                f,
                "'{}' is a relative IRI but only absolute IRIs are allowed here",
                iri
            ),
            ParseErrorKind::InvalidLanguageTag { tag, error } => {
                write!(f, "error while parsing language tag '{}': {}", tag, error)
            }
            ParseErrorKind::ConflictingLiteralSuffixes => write!(
                f,
                "a literal may carry a language tag or a datatype but not both"
            ),
            ParseErrorKind::DuplicateDefaultGraph => write!(
                f,
                "only one unnamed (default) graph is allowed per document"
            ),
        }?;
        if let Some(span) = self.span {
            write!(f, " at {}", span)?;
        }
        Ok(())
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Io(error) => Some(error),
            ParseErrorKind::InvalidIri { error, .. } => Some(error),
            ParseErrorKind::InvalidLanguageTag { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl PositionedError for ParseError {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl From<io::Error> for ParseError {
    fn from(error: io::Error) -> Self {
        Self {
            kind: ParseErrorKind::Io(error),
            span: None,
        }
    }
}

impl From<ParseError> for io::Error {
    fn from(error: ParseError) -> Self {
        match error.kind {
            ParseErrorKind::Io(error) => error,
            _ => io::Error::new(io::ErrorKind::InvalidData, error),
        }
    }
}

//! Control flow shared by the grammar parsers.

use crate::error::{ParseError, ParseErrorKind};
use crate::queue::TokenQueue;
use crate::token::{Token, TokenKind};
use terrapin_api::sink::RdfSink;

/// Why a recursive-descent run stopped early.
///
/// `Halt` is the cooperative stop requested by a sink returning `false`; it is
/// not a failure. `Error` is a fatal lexical/grammar/semantic error. The
/// `From<ParseError>` impl lets `?` thread both through every production.
pub(crate) enum Interrupt {
    Halt,
    Error(ParseError),
}

impl From<ParseError> for Interrupt {
    fn from(error: ParseError) -> Self {
        Interrupt::Error(error)
    }
}

pub(crate) type StepResult<T> = Result<T, Interrupt>;

/// Maps the outcome of a parse run onto the sink lifecycle: `end(true)` for
/// success and cooperative stop, `end(false)` for failure.
pub(crate) fn finish<S: RdfSink>(sink: &mut S, result: StepResult<()>) -> Result<(), ParseError> {
    match result {
        Ok(()) | Err(Interrupt::Halt) => {
            sink.end(true);
            Ok(())
        }
        Err(Interrupt::Error(error)) => {
            sink.end(false);
            Err(error)
        }
    }
}

pub(crate) type WarningCallback = Option<Box<dyn FnMut(String)>>;

/// Forwards the tokenizer warnings buffered in the queue to the caller's
/// callback; without a callback they are discarded.
pub(crate) fn flush_warnings(queue: &mut impl TokenQueue, callback: &mut WarningCallback) {
    let warnings = queue.take_warnings();
    if let Some(callback) = callback {
        for warning in warnings {
            callback(warning);
        }
    }
}

pub(crate) fn emit_warning(callback: &mut WarningCallback, message: impl Into<String>) {
    if let Some(callback) = callback {
        callback(message.into());
    }
}

/// Builds the grammar error for a token in a position the grammar does not
/// allow.
pub(crate) fn unexpected(token: &Token, expected: &'static str) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnexpectedToken {
            found: token.kind,
            expected,
        },
        token.span,
    )
}

/// Dequeues the next non-comment token.
pub(crate) fn next_significant(queue: &mut impl TokenQueue) -> Result<Token, ParseError> {
    loop {
        let token = queue.dequeue()?;
        if token.kind != TokenKind::Comment {
            return Ok(token);
        }
    }
}

/// Peeks at the kind of the next non-comment token.
pub(crate) fn peek_significant(queue: &mut impl TokenQueue) -> Result<TokenKind, ParseError> {
    loop {
        let kind = queue.peek()?.kind;
        if kind != TokenKind::Comment {
            return Ok(kind);
        }
        queue.dequeue()?;
    }
}

/// Every document starts with the BOF marker.
pub(crate) fn expect_bof(queue: &mut impl TokenQueue) -> Result<(), ParseError> {
    let token = queue.dequeue()?;
    if token.kind == TokenKind::Bof {
        Ok(())
    } else {
        Err(unexpected(&token, "the beginning of the file"))
    }
}

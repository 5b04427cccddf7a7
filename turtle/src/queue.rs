//! Buffering strategies between the tokenizer and the grammar parsers.
//!
//! All strategies produce the same token sequence for the same input; they
//! only trade memory, latency and concurrency differently:
//!
//! * [`OnDemandQueue`](struct.OnDemandQueue.html) lexes lazily with a small
//!   sliding window. Minimal memory, the default.
//! * [`BackgroundQueue`](struct.BackgroundQueue.html) runs the tokenizer on a
//!   worker thread feeding a bounded channel, so lexing and parsing overlap.
//!   The bounded capacity gives backpressure: the worker blocks once the
//!   parser falls behind by more than the capacity.
//! * [`EagerQueue`](struct.EagerQueue.html) materializes every token up
//!   front, trading memory for unlimited lookahead and easy debugging.

use crate::error::ParseError;
use crate::lexer::Tokenizer;
use crate::token::{Token, TokenKind};
use log::trace;
use std::collections::VecDeque;
use std::io::BufRead;
use std::mem;
use std::sync::mpsc::{sync_channel, Receiver};
use std::thread;
use terrapin_api::parser::Span;

/// How many tokens the on-demand strategy keeps ahead of the parser.
const DEFAULT_LOOKAHEAD: usize = 10;

/// How many tokens the background worker may produce ahead of the parser
/// before blocking.
const DEFAULT_CAPACITY: usize = 1024;

/// The buffering strategy selector used by the parser constructors.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum QueueMode {
    OnDemand,
    Background,
    Eager,
}

/// The interface the grammar parsers drive.
///
/// `peek` never advances; `dequeue` always advances; both keep returning an
/// EOF token indefinitely once the input is exhausted. A lexical error is
/// delivered exactly once, in stream order, by whichever call reaches it.
pub trait TokenQueue {
    /// Prepares the queue, sizing the lookahead window where the strategy has
    /// one. Parsers call this once before the first `peek`/`dequeue`.
    fn initialise(&mut self, lookahead: usize) -> Result<(), ParseError>;

    /// The next token, without consuming it.
    fn peek(&mut self) -> Result<&Token, ParseError>;

    /// Consumes and returns the next token.
    fn dequeue(&mut self) -> Result<Token, ParseError>;

    /// Drains the tokenizer warnings that crossed the queue since the last
    /// call.
    fn take_warnings(&mut self) -> Vec<String>;

    /// When enabled, every dequeued token is logged through `log::trace!`.
    fn set_tracing(&mut self, enabled: bool);
}

/// State and bookkeeping shared by all three strategies.
struct QueueCore {
    window: VecDeque<Token>,
    warnings: Vec<String>,
    pending_error: Option<ParseError>,
    exhausted: bool,
    last_span: Span,
    tracing: bool,
}

impl QueueCore {
    fn new() -> Self {
        Self {
            window: VecDeque::new(),
            warnings: Vec::new(),
            pending_error: None,
            exhausted: false,
            last_span: Span::default(),
            tracing: false,
        }
    }

    fn wants_more(&self) -> bool {
        !self.exhausted && self.pending_error.is_none()
    }

    fn push_token(&mut self, token: Token) {
        self.last_span = token.span;
        if token.kind == TokenKind::Eof {
            self.exhausted = true;
        }
        self.window.push_back(token);
    }

    fn fail(&mut self, error: ParseError) {
        self.pending_error = Some(error);
        self.exhausted = true;
    }

    /// Callers must have refilled the window first; an empty window here means
    /// the stream is over (or failed).
    fn front(&mut self) -> Result<&Token, ParseError> {
        if self.window.is_empty() {
            if let Some(error) = self.pending_error.take() {
                return Err(error);
            }
            // past EOF: keep serving EOF at the last known position
            let span = Span::point(self.last_span.end);
            self.window.push_back(Token::new(TokenKind::Eof, "", span));
        }
        Ok(&self.window[0])
    }

    fn pop(&mut self) -> Result<Token, ParseError> {
        self.front()?;
        let token = self.window.pop_front().unwrap();
        if self.tracing {
            trace!("dequeued {}", token);
        }
        Ok(token)
    }

    fn take_warnings(&mut self) -> Vec<String> {
        mem::replace(&mut self.warnings, Vec::new())
    }
}

/// Lexes one token at a time, keeping a small sliding lookahead window.
pub struct OnDemandQueue<R: BufRead> {
    tokenizer: Tokenizer<R>,
    core: QueueCore,
    lookahead: usize,
}

impl<R: BufRead> OnDemandQueue<R> {
    pub fn new(tokenizer: Tokenizer<R>) -> Self {
        Self {
            tokenizer,
            core: QueueCore::new(),
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }

    fn fill(&mut self) {
        while self.core.window.len() < self.lookahead && self.core.wants_more() {
            match self.tokenizer.next_token() {
                Ok(token) => self.core.push_token(token),
                Err(error) => self.core.fail(error),
            }
            self.core.warnings.extend(self.tokenizer.take_warnings());
        }
    }
}

impl<R: BufRead> TokenQueue for OnDemandQueue<R> {
    fn initialise(&mut self, lookahead: usize) -> Result<(), ParseError> {
        self.lookahead = lookahead.max(1);
        self.fill();
        Ok(())
    }

    fn peek(&mut self) -> Result<&Token, ParseError> {
        self.fill();
        self.core.front()
    }

    fn dequeue(&mut self) -> Result<Token, ParseError> {
        self.fill();
        self.core.pop()
    }

    fn take_warnings(&mut self) -> Vec<String> {
        self.core.take_warnings()
    }

    fn set_tracing(&mut self, enabled: bool) {
        self.core.tracing = enabled;
    }
}

enum LexMessage {
    Token(Token, Vec<String>),
    Error(ParseError, Vec<String>),
}

/// Runs the tokenizer to completion on a dedicated worker thread, handing
/// tokens over through a bounded channel.
pub struct BackgroundQueue {
    receiver: Receiver<LexMessage>,
    core: QueueCore,
}

impl BackgroundQueue {
    /// Spawns the lexing worker. `capacity` bounds how far it may run ahead.
    pub fn spawn<R: BufRead + Send + 'static>(
        mut tokenizer: Tokenizer<R>,
        capacity: usize,
    ) -> Self {
        let (sender, receiver) = sync_channel(capacity.max(1));
        thread::spawn(move || loop {
            match tokenizer.next_token() {
                Ok(token) => {
                    let done = token.kind == TokenKind::Eof;
                    let warnings = tokenizer.take_warnings();
                    if sender.send(LexMessage::Token(token, warnings)).is_err() {
                        // consumer went away, e.g. after a cooperative stop
                        break;
                    }
                    if done {
                        break;
                    }
                }
                Err(error) => {
                    let warnings = tokenizer.take_warnings();
                    let _ = sender.send(LexMessage::Error(error, warnings));
                    break;
                }
            }
        });
        Self {
            receiver,
            core: QueueCore::new(),
        }
    }

    fn fill(&mut self) {
        while self.core.window.is_empty() && self.core.wants_more() {
            match self.receiver.recv() {
                Ok(LexMessage::Token(token, warnings)) => {
                    self.core.warnings.extend(warnings);
                    self.core.push_token(token);
                }
                Ok(LexMessage::Error(error, warnings)) => {
                    self.core.warnings.extend(warnings);
                    self.core.fail(error);
                }
                Err(_) => self.core.exhausted = true,
            }
        }
    }
}

impl TokenQueue for BackgroundQueue {
    fn initialise(&mut self, _lookahead: usize) -> Result<(), ParseError> {
        // capacity is fixed at spawn time; just prime the first token
        self.fill();
        Ok(())
    }

    fn peek(&mut self) -> Result<&Token, ParseError> {
        self.fill();
        self.core.front()
    }

    fn dequeue(&mut self) -> Result<Token, ParseError> {
        self.fill();
        self.core.pop()
    }

    fn take_warnings(&mut self) -> Vec<String> {
        self.core.take_warnings()
    }

    fn set_tracing(&mut self, enabled: bool) {
        self.core.tracing = enabled;
    }
}

/// Materializes the whole token stream before parsing starts.
pub struct EagerQueue {
    core: QueueCore,
}

impl EagerQueue {
    pub fn new<R: BufRead>(mut tokenizer: Tokenizer<R>) -> Self {
        let mut core = QueueCore::new();
        while core.wants_more() {
            match tokenizer.next_token() {
                Ok(token) => core.push_token(token),
                Err(error) => core.fail(error),
            }
            core.warnings.extend(tokenizer.take_warnings());
        }
        Self { core }
    }
}

impl TokenQueue for EagerQueue {
    fn initialise(&mut self, _lookahead: usize) -> Result<(), ParseError> {
        Ok(())
    }

    fn peek(&mut self) -> Result<&Token, ParseError> {
        self.core.front()
    }

    fn dequeue(&mut self) -> Result<Token, ParseError> {
        self.core.pop()
    }

    fn take_warnings(&mut self) -> Vec<String> {
        self.core.take_warnings()
    }

    fn set_tracing(&mut self, enabled: bool) {
        self.core.tracing = enabled;
    }
}

/// Runtime-selected strategy wrapper used inside the parsers.
pub(crate) enum AnyQueue<R: BufRead> {
    OnDemand(OnDemandQueue<R>),
    Background(BackgroundQueue),
    Eager(EagerQueue),
}

impl<R: BufRead> AnyQueue<R> {
    pub(crate) fn on_demand(tokenizer: Tokenizer<R>) -> Self {
        AnyQueue::OnDemand(OnDemandQueue::new(tokenizer))
    }
}

impl<R: BufRead + Send + 'static> AnyQueue<R> {
    pub(crate) fn with_mode(tokenizer: Tokenizer<R>, mode: QueueMode) -> Self {
        match mode {
            QueueMode::OnDemand => AnyQueue::OnDemand(OnDemandQueue::new(tokenizer)),
            QueueMode::Background => {
                AnyQueue::Background(BackgroundQueue::spawn(tokenizer, DEFAULT_CAPACITY))
            }
            QueueMode::Eager => AnyQueue::Eager(EagerQueue::new(tokenizer)),
        }
    }
}

impl<R: BufRead> TokenQueue for AnyQueue<R> {
    fn initialise(&mut self, lookahead: usize) -> Result<(), ParseError> {
        match self {
            AnyQueue::OnDemand(q) => q.initialise(lookahead),
            AnyQueue::Background(q) => q.initialise(lookahead),
            AnyQueue::Eager(q) => q.initialise(lookahead),
        }
    }

    fn peek(&mut self) -> Result<&Token, ParseError> {
        match self {
            AnyQueue::OnDemand(q) => q.peek(),
            AnyQueue::Background(q) => q.peek(),
            AnyQueue::Eager(q) => q.peek(),
        }
    }

    fn dequeue(&mut self) -> Result<Token, ParseError> {
        match self {
            AnyQueue::OnDemand(q) => q.dequeue(),
            AnyQueue::Background(q) => q.dequeue(),
            AnyQueue::Eager(q) => q.dequeue(),
        }
    }

    fn take_warnings(&mut self) -> Vec<String> {
        match self {
            AnyQueue::OnDemand(q) => q.take_warnings(),
            AnyQueue::Background(q) => q.take_warnings(),
            AnyQueue::Eager(q) => q.take_warnings(),
        }
    }

    fn set_tracing(&mut self, enabled: bool) {
        match self {
            AnyQueue::OnDemand(q) => q.set_tracing(enabled),
            AnyQueue::Background(q) => q.set_tracing(enabled),
            AnyQueue::Eager(q) => q.set_tracing(enabled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexerOptions;
    use crate::trig::TrigSyntax;

    fn tokenizer(input: &'static str) -> Tokenizer<&'static [u8]> {
        Tokenizer::new(input.as_bytes(), LexerOptions::trig(TrigSyntax::Recommendation))
    }

    fn drain(queue: &mut impl TokenQueue) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = queue.dequeue().unwrap();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    const INPUT: &str = "@prefix ex: <urn:x#> .\nex:s ex:p \"o\"@en , 42 .\n";

    #[test]
    fn strategies_agree_token_for_token() {
        let mut on_demand = OnDemandQueue::new(tokenizer(INPUT));
        on_demand.initialise(2).unwrap();
        let mut background = BackgroundQueue::spawn(tokenizer(INPUT), 4);
        background.initialise(2).unwrap();
        let mut eager = EagerQueue::new(tokenizer(INPUT));
        eager.initialise(2).unwrap();

        let expected = drain(&mut on_demand);
        assert_eq!(expected, drain(&mut background));
        assert_eq!(expected, drain(&mut eager));
    }

    #[test]
    fn peek_does_not_advance() {
        let mut queue = OnDemandQueue::new(tokenizer(INPUT));
        queue.initialise(1).unwrap();
        let peeked = queue.peek().unwrap().clone();
        assert_eq!(peeked, queue.dequeue().unwrap());
        assert_ne!(peeked, queue.dequeue().unwrap());
    }

    #[test]
    fn eof_is_sticky() {
        let mut queue = EagerQueue::new(tokenizer("ex:s ex:p ex:o ."));
        queue.initialise(1).unwrap();
        while queue.dequeue().unwrap().kind != TokenKind::Eof {}
        assert_eq!(queue.dequeue().unwrap().kind, TokenKind::Eof);
        assert_eq!(queue.peek().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn lexical_errors_are_delivered_in_stream_order() {
        let mut queue = EagerQueue::new(tokenizer("ex:s ~"));
        queue.initialise(1).unwrap();
        assert_eq!(queue.dequeue().unwrap().kind, TokenKind::Bof);
        assert_eq!(queue.dequeue().unwrap().kind, TokenKind::PrefixedName);
        assert!(queue.dequeue().is_err());
        // after the error the queue settles on EOF
        assert_eq!(queue.dequeue().unwrap().kind, TokenKind::Eof);
    }
}

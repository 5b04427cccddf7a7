//! Implementation of [N-Triples](https://www.w3.org/TR/n-triples/),
//! [N-Quads](https://www.w3.org/TR/n-quads/) and [TriG](https://www.w3.org/TR/trig/)
//! parsers.
//!
//! All the provided parsers work in streaming from a `BufRead` implementation:
//! a character stream is tokenized, the tokens flow through one of three
//! interchangeable buffering strategies (see [`queue`](queue/index.html)) and
//! a recursive-descent grammar consumer pushes every statement into a
//! caller-supplied [`RdfSink`](../terrapin_api/sink/trait.RdfSink.html). A
//! sink returning `false` stops a parse cooperatively; a grammar violation
//! fails it with exact line/column positions.
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_qualifications
)]
#![doc(test(attr(deny(warnings))))]

pub mod chars;
mod control;
mod detect;
mod error;
pub mod iri;
mod lexer;
mod namespace;
mod ntriples;
mod queue;
mod read;
mod token;
mod trig;

pub use crate::detect::{guess_format, parse_str, TextFormat};
pub use crate::error::{ParseError, ParseErrorKind};
pub use crate::lexer::{LexerOptions, Tokenizer};
pub use crate::namespace::NamespaceMap;
pub use crate::ntriples::{NQuadsParser, NQuadsSyntax, NTriplesParser, NTriplesSyntax};
pub use crate::queue::{BackgroundQueue, EagerQueue, OnDemandQueue, QueueMode, TokenQueue};
pub use crate::token::{Token, TokenKind};
pub use crate::trig::{TriGParser, TrigSyntax};

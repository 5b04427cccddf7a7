//! Implementation of the N-Triples and N-Quads RDF syntaxes.

use crate::control::{
    expect_bof, finish, flush_warnings, next_significant, unexpected, Interrupt, StepResult,
    WarningCallback,
};
use crate::chars::{unescape_iri, unescape_literal};
use crate::error::{ParseError, ParseErrorKind};
use crate::iri;
use crate::lexer::{LexerOptions, Tokenizer};
use crate::queue::{AnyQueue, QueueMode, TokenQueue};
use crate::token::{Token, TokenKind};
use oxilangtag::LanguageTag;
use std::io::BufRead;
use terrapin_api::model::{Literal, NamedNode, NamedOrBlankNode, Quad, Term, Triple};
use terrapin_api::parser::RdfReader;
use terrapin_api::sink::RdfSink;

const LOOKAHEAD: usize = 10;

/// The two ages of the N-Triples grammar.
///
/// They differ in the required character encoding (ASCII with `\u` escapes
/// versus UTF-8), the escape set and the characters allowed in blank node
/// labels. An encoding mismatch is reported as a warning, never as an error:
/// mislabeled files are common and usually still parseable.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum NTriplesSyntax {
    /// The pre-RDF-1.1 grammar of the RDF Test Cases recommendation.
    Original,
    /// The [RDF 1.1 N-Triples](https://www.w3.org/TR/n-triples/) grammar.
    Rdf11,
}

impl Default for NTriplesSyntax {
    fn default() -> Self {
        NTriplesSyntax::Rdf11
    }
}

/// The two ages of the N-Quads grammar, mirroring
/// [`NTriplesSyntax`](enum.NTriplesSyntax.html). They additionally differ in
/// which node kinds a graph name may use, see
/// [`NQuadsParser`](struct.NQuadsParser.html).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum NQuadsSyntax {
    Original,
    Rdf11,
}

impl Default for NQuadsSyntax {
    fn default() -> Self {
        NQuadsSyntax::Rdf11
    }
}

/// A streaming [N-Triples](https://www.w3.org/TR/n-triples/) parser.
///
/// It pushes every triple into the sink as soon as the terminating dot is
/// read; no statement list is ever built.
///
/// Count the number of people:
/// ```
/// use terrapin_api::parser::RdfReader;
/// use terrapin_api::sink::CollectedDataset;
/// use terrapin_turtle::{NTriplesParser, NTriplesSyntax};
///
/// let file = b"<http://example.com/foo> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Person> .
/// <http://example.com/foo> <http://schema.org/name> \"Foo\" .
/// <http://example.com/bar> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Person> .
/// <http://example.com/bar> <http://schema.org/name> \"Bar\" .";
///
/// let mut sink = CollectedDataset::new();
/// NTriplesParser::new(file.as_ref(), NTriplesSyntax::Rdf11).load(&mut sink)?;
/// let types = sink
///     .triples()
///     .into_iter()
///     .filter(|t| t.predicate.iri == "http://www.w3.org/1999/02/22-rdf-syntax-ns#type")
///     .count();
/// assert_eq!(2, types);
/// # Ok::<_, terrapin_turtle::ParseError>(())
/// ```
pub struct NTriplesParser<R: BufRead> {
    queue: AnyQueue<R>,
    syntax: NTriplesSyntax,
    on_warning: WarningCallback,
    tracing: bool,
}

impl<R: BufRead> NTriplesParser<R> {
    pub fn new(reader: R, syntax: NTriplesSyntax) -> Self {
        let tokenizer = Tokenizer::new(reader, LexerOptions::ntriples(syntax));
        Self {
            queue: AnyQueue::on_demand(tokenizer),
            syntax,
            on_warning: None,
            tracing: false,
        }
    }

    /// Registers a callback receiving the non-fatal diagnostics (encoding
    /// mismatches, deprecated constructs).
    pub fn on_warning(mut self, callback: impl FnMut(String) + 'static) -> Self {
        self.on_warning = Some(Box::new(callback));
        self
    }

    /// Logs every dequeued token through `log::trace!`.
    pub fn trace_tokens(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }
}

impl<R: BufRead + Send + 'static> NTriplesParser<R> {
    /// Like [`new`](#method.new) but with an explicit token buffering
    /// strategy.
    pub fn with_queue_mode(reader: R, syntax: NTriplesSyntax, mode: QueueMode) -> Self {
        let tokenizer = Tokenizer::new(reader, LexerOptions::ntriples(syntax));
        Self {
            queue: AnyQueue::with_mode(tokenizer, mode),
            syntax,
            on_warning: None,
            tracing: false,
        }
    }
}

impl<R: BufRead> RdfReader for NTriplesParser<R> {
    type Error = ParseError;

    fn load<S: RdfSink>(mut self, sink: &mut S) -> Result<(), ParseError> {
        self.queue.set_tracing(self.tracing);
        sink.start();
        let rdf11 = self.syntax == NTriplesSyntax::Rdf11;
        let result = parse_triple_document(&mut self.queue, sink, rdf11, &mut self.on_warning);
        flush_warnings(&mut self.queue, &mut self.on_warning);
        finish(sink, result)
    }
}

/// A streaming [N-Quads](https://www.w3.org/TR/n-quads/) parser.
///
/// The grammar is the N-Triples one plus an optional graph name before the
/// terminating dot. Under the RDF 1.1 syntax a graph name is an IRI or a
/// blank node. Under the original syntax a graph name had to be an IRI, so
/// blank node and literal labels are mapped to deterministic synthetic IRIs
/// of the forms `nquads:bnode:<hash>` and `nquads:literal:<hash>`. The
/// mapping is stable across runs but does not preserve node identity.
///
/// ```
/// use terrapin_api::parser::RdfReader;
/// use terrapin_api::sink::CollectedDataset;
/// use terrapin_turtle::{NQuadsParser, NQuadsSyntax};
///
/// let file = b"<http://example.com/foo> <http://schema.org/name> \"Foo\" <http://example.com/g> .
/// <http://example.com/bar> <http://schema.org/name> \"Bar\" .";
///
/// let mut sink = CollectedDataset::new();
/// NQuadsParser::new(file.as_ref(), NQuadsSyntax::Rdf11).load(&mut sink)?;
/// assert_eq!(2, sink.quads.len());
/// assert!(sink.quads[0].graph_name.is_some());
/// assert!(sink.quads[1].graph_name.is_none());
/// # Ok::<_, terrapin_turtle::ParseError>(())
/// ```
pub struct NQuadsParser<R: BufRead> {
    queue: AnyQueue<R>,
    syntax: NQuadsSyntax,
    on_warning: WarningCallback,
    tracing: bool,
}

impl<R: BufRead> NQuadsParser<R> {
    pub fn new(reader: R, syntax: NQuadsSyntax) -> Self {
        let tokenizer = Tokenizer::new(reader, LexerOptions::nquads(syntax));
        Self {
            queue: AnyQueue::on_demand(tokenizer),
            syntax,
            on_warning: None,
            tracing: false,
        }
    }

    /// Registers a callback receiving the non-fatal diagnostics.
    pub fn on_warning(mut self, callback: impl FnMut(String) + 'static) -> Self {
        self.on_warning = Some(Box::new(callback));
        self
    }

    /// Logs every dequeued token through `log::trace!`.
    pub fn trace_tokens(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }
}

impl<R: BufRead + Send + 'static> NQuadsParser<R> {
    /// Like [`new`](#method.new) but with an explicit token buffering
    /// strategy.
    pub fn with_queue_mode(reader: R, syntax: NQuadsSyntax, mode: QueueMode) -> Self {
        let tokenizer = Tokenizer::new(reader, LexerOptions::nquads(syntax));
        Self {
            queue: AnyQueue::with_mode(tokenizer, mode),
            syntax,
            on_warning: None,
            tracing: false,
        }
    }
}

impl<R: BufRead> RdfReader for NQuadsParser<R> {
    type Error = ParseError;

    fn load<S: RdfSink>(mut self, sink: &mut S) -> Result<(), ParseError> {
        self.queue.set_tracing(self.tracing);
        sink.start();
        let rdf11 = self.syntax == NQuadsSyntax::Rdf11;
        let result = parse_quad_document(&mut self.queue, sink, rdf11, &mut self.on_warning);
        flush_warnings(&mut self.queue, &mut self.on_warning);
        finish(sink, result)
    }
}

fn parse_triple_document<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    rdf11: bool,
    on_warning: &mut WarningCallback,
) -> StepResult<()> {
    queue.initialise(LOOKAHEAD)?;
    expect_bof(queue)?;
    loop {
        flush_warnings(queue, on_warning);
        let token = next_significant(queue)?;
        match token.kind {
            TokenKind::Eof => return Ok(()),
            _ => {
                let triple = parse_statement(queue, sink, rdf11, token)?;
                let dot = next_significant(queue)?;
                if dot.kind != TokenKind::Dot {
                    return Err(unexpected(&dot, "a '.' terminating the statement").into());
                }
                if !sink.handle_triple(triple) {
                    return Err(Interrupt::Halt);
                }
            }
        }
    }
}

fn parse_quad_document<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    rdf11: bool,
    on_warning: &mut WarningCallback,
) -> StepResult<()> {
    queue.initialise(LOOKAHEAD)?;
    expect_bof(queue)?;
    loop {
        flush_warnings(queue, on_warning);
        let token = next_significant(queue)?;
        match token.kind {
            TokenKind::Eof => return Ok(()),
            _ => {
                let triple = parse_statement(queue, sink, rdf11, token)?;
                let graph_name = parse_graph_name(queue, sink, rdf11)?;
                let dot = next_significant(queue)?;
                if dot.kind != TokenKind::Dot {
                    return Err(unexpected(&dot, "a '.' terminating the statement").into());
                }
                let quad = Quad {
                    subject: triple.subject,
                    predicate: triple.predicate,
                    object: triple.object,
                    graph_name,
                };
                if !sink.handle_quad(quad) {
                    return Err(Interrupt::Halt);
                }
            }
        }
    }
}

/// subject predicate object, the part the two grammars share.
fn parse_statement<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    rdf11: bool,
    subject_token: Token,
) -> StepResult<Triple> {
    let subject: NamedOrBlankNode = match subject_token.kind {
        TokenKind::Iri => sink
            .create_named_node(checked_absolute_iri(&subject_token)?)
            .into(),
        TokenKind::BlankNodeLabel => sink.create_blank_node(subject_token.value).into(),
        // literals in subject position are a grammar error, not a warning
        _ => {
            return Err(unexpected(
                &subject_token,
                "an IRI or blank node as the subject of a statement",
            )
            .into())
        }
    };

    let predicate_token = next_significant(queue)?;
    let predicate = match predicate_token.kind {
        TokenKind::Iri => sink.create_named_node(checked_absolute_iri(&predicate_token)?),
        _ => {
            return Err(unexpected(
                &predicate_token,
                "an IRI as the predicate of a statement",
            )
            .into())
        }
    };

    let object_token = next_significant(queue)?;
    let object: Term = match object_token.kind {
        TokenKind::Iri => sink
            .create_named_node(checked_absolute_iri(&object_token)?)
            .into(),
        TokenKind::BlankNodeLabel => sink.create_blank_node(object_token.value).into(),
        TokenKind::Literal => {
            let literal = parse_literal(queue, rdf11, object_token)?;
            sink.create_literal(literal).into()
        }
        _ => {
            return Err(unexpected(
                &object_token,
                "an IRI, blank node or literal as the object of a statement",
            )
            .into())
        }
    };

    Ok(Triple {
        subject,
        predicate,
        object,
    })
}

/// A literal with its optional language tag or datatype. Exactly one of the
/// two may be present; seeing both is a fatal error, never a silent
/// preference.
fn parse_literal<Q: TokenQueue>(
    queue: &mut Q,
    rdf11: bool,
    literal_token: Token,
) -> Result<Literal, ParseError> {
    let value = unescape_literal(&literal_token.value, rdf11)
        .map_err(|kind| ParseError::new(kind, literal_token.span))?;
    let suffix = queue.peek()?.kind;
    match suffix {
        TokenKind::LanguageTag => {
            let tag_token = queue.dequeue()?;
            let raw_tag = tag_token.value.clone();
            let tag_span = tag_token.span;
            let language = LanguageTag::parse(tag_token.value)
                .map_err(|error| {
                    ParseError::new(
                        ParseErrorKind::InvalidLanguageTag {
                            tag: raw_tag,
                            error,
                        },
                        tag_span,
                    )
                })?
                .into_inner();
            let next = queue.peek()?;
            if next.kind == TokenKind::DatatypeMarker {
                return Err(ParseError::new(
                    ParseErrorKind::ConflictingLiteralSuffixes,
                    next.span,
                ));
            }
            Ok(Literal::LanguageTaggedString { value, language })
        }
        TokenKind::DatatypeMarker => {
            queue.dequeue()?;
            let datatype_token = next_significant(queue)?;
            if datatype_token.kind != TokenKind::Iri {
                return Err(unexpected(
                    &datatype_token,
                    "an IRI naming the datatype after '^^'",
                ));
            }
            let datatype = checked_absolute_iri(&datatype_token)?;
            Ok(Literal::Typed {
                value,
                datatype: NamedNode { iri: datatype },
            })
        }
        _ => Ok(Literal::Simple { value }),
    }
}

/// The optional fourth term of an N-Quads statement.
fn parse_graph_name<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    rdf11: bool,
) -> StepResult<Option<NamedOrBlankNode>> {
    let kind = queue.peek()?.kind;
    match kind {
        TokenKind::Dot => Ok(None),
        TokenKind::Iri => {
            let token = queue.dequeue()?;
            Ok(Some(
                sink.create_named_node(checked_absolute_iri(&token)?).into(),
            ))
        }
        TokenKind::BlankNodeLabel => {
            let token = queue.dequeue()?;
            if rdf11 {
                Ok(Some(sink.create_blank_node(token.value).into()))
            } else {
                // the original grammar requires an IRI graph name
                let iri = format!("nquads:bnode:{:016x}", fnv1a64(&token.value));
                Ok(Some(sink.create_named_node(iri).into()))
            }
        }
        TokenKind::Literal if !rdf11 => {
            let token = queue.dequeue()?;
            let literal = parse_literal(queue, rdf11, token)?;
            let iri = format!("nquads:literal:{:016x}", fnv1a64(&literal.to_string()));
            Ok(Some(sink.create_named_node(iri).into()))
        }
        _ => {
            let token = next_significant(queue)?;
            Err(unexpected(&token, "an IRI or blank node as the graph name, or '.'").into())
        }
    }
}

/// Resolves the escapes of an IRI token and checks it against the RFC 3987
/// productions. These grammars have no base IRI, so a relative reference is
/// fatal.
fn checked_absolute_iri(token: &Token) -> Result<String, ParseError> {
    let iri =
        unescape_iri(&token.value).map_err(|kind| ParseError::new(kind, token.span))?;
    if iri::is_iri(&iri) {
        Ok(iri)
    } else if iri::is_irelative_ref(&iri) {
        Err(ParseError::new(ParseErrorKind::RelativeIri(iri), token.span))
    } else {
        Err(ParseError::new(ParseErrorKind::MalformedIri(iri), token.span))
    }
}

fn fnv1a64(text: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in text.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

//! Implementation of the [TriG](https://www.w3.org/TR/trig/) RDF dataset syntax.

use crate::chars::{
    is_valid_boolean, is_valid_decimal, is_valid_double, is_valid_integer, unescape_iri,
    unescape_literal, unescape_local_name,
};
use crate::control::{
    emit_warning, expect_bof, finish, flush_warnings, next_significant, peek_significant,
    unexpected, Interrupt, StepResult, WarningCallback,
};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{LexerOptions, Tokenizer};
use crate::namespace::NamespaceMap;
use crate::queue::{AnyQueue, QueueMode, TokenQueue};
use crate::token::{Token, TokenKind};
use oxilangtag::LanguageTag;
use oxiri::Iri;
use std::io::BufRead;
use terrapin_api::model::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Quad, Term};
use terrapin_api::parser::RdfReader;
use terrapin_api::sink::RdfSink;

const LOOKAHEAD: usize = 10;

pub(crate) const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub(crate) const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub(crate) const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub(crate) const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub(crate) const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub(crate) const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub(crate) const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub(crate) const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// The three ages of the TriG grammar.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TrigSyntax {
    /// The earliest TriG draft: directives are file-scoped and only legal at
    /// the top level, `@base` does not exist, `=` may separate a graph name
    /// from its block and a block may be followed by a dot.
    Original,
    /// The W3C member submission: like `Original` plus `@base` (with a
    /// deprecation warning) and block-scoped directives.
    MemberSubmission,
    /// The [W3C recommendation](https://www.w3.org/TR/trig/): block-scoped
    /// directives, SPARQL-style `BASE`/`PREFIX`, the `GRAPH` keyword,
    /// blank-node graph labels and top-level triples.
    Recommendation,
}

impl Default for TrigSyntax {
    fn default() -> Self {
        TrigSyntax::Recommendation
    }
}

/// A streaming TriG parser.
///
/// TriG is a superset of Turtle: statements may be wrapped in named or
/// unnamed graph blocks. Under the post-original syntaxes, `@prefix` and
/// `@base` directives inside a block are scoped to that block: on entry the
/// parser snapshots the namespace map and base IRI, and on exit it restores
/// the snapshot and re-announces the restored state through the sink, so a
/// prefix declared inside one graph can never leak into a sibling.
///
/// Count the number of people:
/// ```
/// use terrapin_api::model::{NamedNode, Term};
/// use terrapin_api::parser::RdfReader;
/// use terrapin_api::sink::CollectedDataset;
/// use terrapin_turtle::{TriGParser, TrigSyntax};
///
/// let file = b"@prefix schema: <http://schema.org/> .
/// <http://example.com/> {
///     <http://example.com/foo> a schema:Person ;
///         schema:name \"Foo\" .
///     <http://example.com/bar> a schema:Person ;
///         schema:name \"Bar\" .
/// }";
///
/// let mut sink = CollectedDataset::new();
/// TriGParser::new(file.as_ref(), "", TrigSyntax::Recommendation)?.load(&mut sink)?;
/// let person: Term = NamedNode::new("http://schema.org/Person").into();
/// let count = sink.quads.iter().filter(|q| q.object == person).count();
/// assert_eq!(2, count);
/// # Ok::<_, terrapin_turtle::ParseError>(())
/// ```
pub struct TriGParser<R: BufRead> {
    queue: AnyQueue<R>,
    syntax: TrigSyntax,
    base_iri: Option<Iri<String>>,
    on_warning: WarningCallback,
    tracing: bool,
}

impl<R: BufRead> TriGParser<R> {
    /// Builds the parser from a `BufRead` implementation and a base IRI for
    /// relative IRI resolution.
    ///
    /// The base IRI might be empty to state there is no base IRI.
    pub fn new(reader: R, base_iri: &str, syntax: TrigSyntax) -> Result<Self, ParseError> {
        let tokenizer = Tokenizer::new(reader, LexerOptions::trig(syntax));
        Ok(Self {
            queue: AnyQueue::on_demand(tokenizer),
            syntax,
            base_iri: parse_base_iri(base_iri)?,
            on_warning: None,
            tracing: false,
        })
    }

    /// Registers a callback receiving the non-fatal diagnostics (deprecated
    /// directives, encoding notes).
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

impl<R: BufRead + Send + 'static> TriGParser<R> {
    /// Like [`new`](#method.new) but with an explicit token buffering
    /// strategy.
    pub fn with_queue_mode(
        reader: R,
        base_iri: &str,
        syntax: TrigSyntax,
        mode: QueueMode,
    ) -> Result<Self, ParseError> {
        let tokenizer = Tokenizer::new(reader, LexerOptions::trig(syntax));
        Ok(Self {
            queue: AnyQueue::with_mode(tokenizer, mode),
            syntax,
            base_iri: parse_base_iri(base_iri)?,
            on_warning: None,
            tracing: false,
        })
    }
}

fn parse_base_iri(base_iri: &str) -> Result<Option<Iri<String>>, ParseError> {
    if base_iri.is_empty() {
        Ok(None)
    } else {
        Iri::parse(base_iri.to_owned()).map(Some).map_err(|error| ParseError {
            kind: ParseErrorKind::InvalidIri {
                iri: base_iri.to_owned(),
                error,
            },
            span: None,
        })
    }
}

impl<R: BufRead> RdfReader for TriGParser<R> {
    type Error = ParseError;

    fn load<S: RdfSink>(mut self, sink: &mut S) -> Result<(), ParseError> {
        self.queue.set_tracing(self.tracing);
        sink.start();
        let mut context = Context {
            namespaces: NamespaceMap::new(),
            base_iri: self.base_iri.take(),
            syntax: self.syntax,
            default_graph_seen: false,
            blank_node_counter: 0,
            on_warning: self.on_warning.take(),
        };
        let result = parse_document(&mut self.queue, sink, &mut context);
        flush_warnings(&mut self.queue, &mut context.on_warning);
        finish(sink, result)
    }
}

/// The per-parse mutable state. One per `load` call, never shared.
struct Context {
    namespaces: NamespaceMap,
    base_iri: Option<Iri<String>>,
    syntax: TrigSyntax,
    default_graph_seen: bool,
    blank_node_counter: u64,
    on_warning: WarningCallback,
}

impl Context {
    /// Whether in-block directives are scoped to their block.
    fn scoped(&self) -> bool {
        self.syntax != TrigSyntax::Original
    }

    fn fresh_blank_node<S: RdfSink>(&mut self, sink: &mut S) -> BlankNode {
        self.blank_node_counter += 1;
        sink.create_blank_node(format!("tg{:08}", self.blank_node_counter))
    }

    fn warn(&mut self, message: impl Into<String>) {
        emit_warning(&mut self.on_warning, message);
    }
}

// [1g] trigDoc ::= (directive | block)*
fn parse_document<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
) -> StepResult<()> {
    queue.initialise(LOOKAHEAD)?;
    expect_bof(queue)?;
    loop {
        flush_warnings(queue, &mut context.on_warning);
        match peek_significant(queue)? {
            TokenKind::Eof => {
                queue.dequeue()?;
                return Ok(());
            }
            TokenKind::BaseDirective | TokenKind::PrefixDirective => {
                parse_directive(queue, sink, context)?
            }
            _ => parse_block(queue, sink, context)?,
        }
    }
}

// Base and prefix directives, in both the dotted '@' style and the undotted
// SPARQL style.
fn parse_directive<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
) -> StepResult<()> {
    let directive = next_significant(queue)?;
    let dotted = directive.value.starts_with('@');
    match directive.kind {
        TokenKind::BaseDirective => {
            match context.syntax {
                TrigSyntax::Original => {
                    return Err(ParseError::new(
                        ParseErrorKind::SyntaxRestriction(
                            "the base directive is not part of the original TriG syntax",
                        ),
                        directive.span,
                    )
                    .into())
                }
                TrigSyntax::MemberSubmission => context.warn(
                    "the @base directive is not supported by every TriG implementation; \
                     older tools may reject this document",
                ),
                TrigSyntax::Recommendation => (),
            }
            let iri_token = next_significant(queue)?;
            if iri_token.kind != TokenKind::Iri {
                return Err(unexpected(&iri_token, "an IRI after the base directive").into());
            }
            let base = resolve_iri_token(context, &iri_token)?;
            if !sink.handle_base_iri(Some(base.as_str())) {
                return Err(Interrupt::Halt);
            }
            context.base_iri = Some(base);
        }
        TokenKind::PrefixDirective => {
            let prefix_token = next_significant(queue)?;
            if prefix_token.kind != TokenKind::Prefix {
                return Err(
                    unexpected(&prefix_token, "a prefix name after the prefix directive").into(),
                );
            }
            // the token value keeps the trailing colon
            let prefix = prefix_token.value[..prefix_token.value.len() - 1].to_owned();
            let iri_token = next_significant(queue)?;
            if iri_token.kind != TokenKind::Iri {
                return Err(unexpected(&iri_token, "an IRI after the prefix name").into());
            }
            let namespace = resolve_iri_token(context, &iri_token)?.into_inner();
            context.namespaces.declare(prefix.clone(), namespace.clone());
            if !sink.handle_namespace(&prefix, &namespace) {
                return Err(Interrupt::Halt);
            }
        }
        _ => return Err(unexpected(&directive, "a base or prefix directive").into()),
    }
    if dotted {
        expect_dot(queue)?;
    }
    Ok(())
}

// [2g] block ::= triplesOrGraph | wrappedGraph | triples2 | "GRAPH" labelOrSubject wrappedGraph
fn parse_block<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
) -> StepResult<()> {
    let first = next_significant(queue)?;
    match first.kind {
        TokenKind::LeftBrace => {
            // at most one unnamed graph block per document
            if context.default_graph_seen {
                return Err(
                    ParseError::new(ParseErrorKind::DuplicateDefaultGraph, first.span).into(),
                );
            }
            context.default_graph_seen = true;
            parse_scoped_graph(queue, sink, context, None)
        }
        TokenKind::GraphKeyword => {
            let label_token = next_significant(queue)?;
            let label = parse_graph_label(queue, sink, context, label_token)?;
            let brace = next_significant(queue)?;
            if brace.kind != TokenKind::LeftBrace {
                return Err(unexpected(&brace, "a '{' opening the graph block").into());
            }
            parse_scoped_graph(queue, sink, context, Some(label))
        }
        TokenKind::Iri | TokenKind::PrefixedName => match peek_significant(queue)? {
            TokenKind::Equals => {
                queue.dequeue()?;
                let label = resolve_label_node(sink, context, &first)?;
                let brace = next_significant(queue)?;
                if brace.kind != TokenKind::LeftBrace {
                    return Err(unexpected(&brace, "a '{' opening the graph block").into());
                }
                parse_scoped_graph(queue, sink, context, Some(label))
            }
            TokenKind::LeftBrace => {
                queue.dequeue()?;
                let label = resolve_label_node(sink, context, &first)?;
                parse_scoped_graph(queue, sink, context, Some(label))
            }
            _ if context.syntax == TrigSyntax::Recommendation => {
                // triples outside any block belong to the default graph
                let subject: NamedOrBlankNode = sink
                    .create_named_node(resolve_term_iri(context, &first)?)
                    .into();
                parse_predicate_object_list(queue, sink, context, None, &subject, false)?;
                expect_dot(queue)?;
                Ok(())
            }
            _ => {
                let token = next_significant(queue)?;
                Err(unexpected(&token, "a '{' or '=' after the graph name").into())
            }
        },
        TokenKind::BlankNodeLabel if context.syntax == TrigSyntax::Recommendation => {
            let node = sink.create_blank_node(first.value);
            if peek_significant(queue)? == TokenKind::LeftBrace {
                queue.dequeue()?;
                parse_scoped_graph(queue, sink, context, Some(node.into()))
            } else {
                parse_predicate_object_list(queue, sink, context, None, &node.into(), false)?;
                expect_dot(queue)?;
                Ok(())
            }
        }
        TokenKind::LeftBracket if context.syntax == TrigSyntax::Recommendation => {
            if peek_significant(queue)? == TokenKind::RightBracket {
                queue.dequeue()?;
                let node = context.fresh_blank_node(sink);
                if peek_significant(queue)? == TokenKind::LeftBrace {
                    queue.dequeue()?;
                    parse_scoped_graph(queue, sink, context, Some(node.into()))
                } else {
                    parse_predicate_object_list(queue, sink, context, None, &node.into(), false)?;
                    expect_dot(queue)?;
                    Ok(())
                }
            } else {
                // [4g] triples2: a blank node property list as the subject
                let node = context.fresh_blank_node(sink);
                let subject: NamedOrBlankNode = node.into();
                parse_predicate_object_list(queue, sink, context, None, &subject, true)?;
                if peek_significant(queue)? != TokenKind::Dot {
                    parse_predicate_object_list(queue, sink, context, None, &subject, false)?;
                }
                expect_dot(queue)?;
                Ok(())
            }
        }
        TokenKind::LeftParen if context.syntax == TrigSyntax::Recommendation => {
            let subject: NamedOrBlankNode = if peek_significant(queue)? == TokenKind::RightParen {
                queue.dequeue()?;
                sink.create_named_node(RDF_NIL.to_owned()).into()
            } else {
                let head = context.fresh_blank_node(sink);
                parse_collection(queue, sink, context, None, head.clone())?;
                head.into()
            };
            parse_predicate_object_list(queue, sink, context, None, &subject, false)?;
            expect_dot(queue)?;
            Ok(())
        }
        _ => Err(unexpected(&first, "a graph block, a directive or a statement").into()),
    }
}

// [7g] labelOrSubject ::= iri | BlankNode
fn parse_graph_label<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
    token: Token,
) -> StepResult<NamedOrBlankNode> {
    match token.kind {
        TokenKind::Iri | TokenKind::PrefixedName => resolve_label_node(sink, context, &token),
        TokenKind::BlankNodeLabel if context.syntax == TrigSyntax::Recommendation => {
            Ok(sink.create_blank_node(token.value).into())
        }
        TokenKind::LeftBracket if context.syntax == TrigSyntax::Recommendation => {
            let close = next_significant(queue)?;
            if close.kind != TokenKind::RightBracket {
                return Err(unexpected(
                    &close,
                    "a ']' closing the anonymous graph label",
                )
                .into());
            }
            Ok(context.fresh_blank_node(sink).into())
        }
        _ => Err(unexpected(&token, "an IRI or blank node naming the graph").into()),
    }
}

fn resolve_label_node<S: RdfSink>(
    sink: &mut S,
    context: &mut Context,
    token: &Token,
) -> StepResult<NamedOrBlankNode> {
    Ok(sink.create_named_node(resolve_term_iri(context, token)?).into())
}

/// Parses one graph body, snapshotting the namespace map and the base IRI
/// around it in the block-scoped syntaxes. The snapshot restore is a scope
/// pop; afterwards the restored state is re-announced so the sink's view of
/// the current declarations matches the parser's.
fn parse_scoped_graph<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
    graph: Option<NamedOrBlankNode>,
) -> StepResult<()> {
    if context.scoped() {
        context.namespaces.push_scope();
        let saved_base = context.base_iri.clone();
        parse_graph_body(queue, sink, context, graph.as_ref())?;
        context.namespaces.pop_scope();
        context.base_iri = saved_base;
        if !sink.handle_base_iri(context.base_iri.as_ref().map(|iri| iri.as_str())) {
            return Err(Interrupt::Halt);
        }
        for (prefix, iri) in context.namespaces.visible() {
            if !sink.handle_namespace(prefix, iri) {
                return Err(Interrupt::Halt);
            }
        }
        Ok(())
    } else {
        parse_graph_body(queue, sink, context, graph.as_ref())
    }
}

// [5g] wrappedGraph ::= '{' triplesBlock? '}'
// The opening brace is already consumed.
fn parse_graph_body<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
    graph: Option<&NamedOrBlankNode>,
) -> StepResult<()> {
    loop {
        flush_warnings(queue, &mut context.on_warning);
        match peek_significant(queue)? {
            TokenKind::RightBrace => {
                queue.dequeue()?;
                break;
            }
            TokenKind::BaseDirective | TokenKind::PrefixDirective => {
                if !context.scoped() {
                    let token = next_significant(queue)?;
                    return Err(ParseError::new(
                        ParseErrorKind::SyntaxRestriction(
                            "directives may not occur inside a graph in the original TriG syntax",
                        ),
                        token.span,
                    )
                    .into());
                }
                parse_directive(queue, sink, context)?;
            }
            _ => {
                parse_triples(queue, sink, context, graph)?;
                match peek_significant(queue)? {
                    TokenKind::Dot => {
                        queue.dequeue()?;
                    }
                    TokenKind::RightBrace => (),
                    _ => {
                        let token = next_significant(queue)?;
                        return Err(
                            unexpected(&token, "a '.' or a '}' after the statement").into()
                        );
                    }
                }
            }
        }
    }
    // the older syntaxes allow a dot after the closing brace
    if context.syntax != TrigSyntax::Recommendation
        && peek_significant(queue)? == TokenKind::Dot
    {
        queue.dequeue()?;
    }
    Ok(())
}

// [6g] triplesBlock ::= triples ('.' triplesBlock?)?
fn parse_triples<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
    graph: Option<&NamedOrBlankNode>,
) -> StepResult<()> {
    let first = next_significant(queue)?;
    let mut property_list_subject = false;
    let subject: NamedOrBlankNode = match first.kind {
        TokenKind::Iri | TokenKind::PrefixedName => sink
            .create_named_node(resolve_term_iri(context, &first)?)
            .into(),
        TokenKind::BlankNodeLabel => sink.create_blank_node(first.value).into(),
        TokenKind::LeftBracket => {
            if peek_significant(queue)? == TokenKind::RightBracket {
                queue.dequeue()?;
                context.fresh_blank_node(sink).into()
            } else {
                let node = context.fresh_blank_node(sink);
                let subject: NamedOrBlankNode = node.into();
                parse_predicate_object_list(queue, sink, context, graph, &subject, true)?;
                property_list_subject = true;
                subject
            }
        }
        TokenKind::LeftParen => {
            if peek_significant(queue)? == TokenKind::RightParen {
                queue.dequeue()?;
                sink.create_named_node(RDF_NIL.to_owned()).into()
            } else {
                let head = context.fresh_blank_node(sink);
                parse_collection(queue, sink, context, graph, head.clone())?;
                head.into()
            }
        }
        TokenKind::Eof => {
            return Err(unexpected(&first, "a statement or a '}' closing the graph").into())
        }
        _ => {
            return Err(unexpected(
                &first,
                "an IRI, prefixed name or blank node as the subject of a statement",
            )
            .into())
        }
    };

    // a blank node property list may stand alone as a whole statement
    let done = property_list_subject
        && matches!(
            peek_significant(queue)?,
            TokenKind::Dot | TokenKind::RightBrace
        );
    if !done {
        parse_predicate_object_list(queue, sink, context, graph, &subject, false)?;
    }
    Ok(())
}

// [7] predicateObjectList ::= verb objectList (';' (verb objectList)?)*
// With `in_brackets` the list is the body of a blank node property list and
// ends at the closing ']' (which is consumed); otherwise it ends before the
// terminating '.' or '}' (which is left for the caller).
fn parse_predicate_object_list<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
    graph: Option<&NamedOrBlankNode>,
    subject: &NamedOrBlankNode,
    in_brackets: bool,
) -> StepResult<()> {
    loop {
        let predicate_token = next_significant(queue)?;
        let predicate = match predicate_token.kind {
            // [9] verb ::= predicate | 'a'
            TokenKind::KeywordA => sink.create_named_node(RDF_TYPE.to_owned()),
            TokenKind::Iri | TokenKind::PrefixedName => {
                sink.create_named_node(resolve_term_iri(context, &predicate_token)?)
            }
            _ => {
                return Err(unexpected(
                    &predicate_token,
                    "an IRI, a prefixed name or 'a' as the predicate",
                )
                .into())
            }
        };

        parse_object_list(queue, sink, context, graph, subject, &predicate)?;

        match peek_significant(queue)? {
            TokenKind::Semicolon => {
                // tolerate runs of semicolons and a trailing one
                while peek_significant(queue)? == TokenKind::Semicolon {
                    queue.dequeue()?;
                }
                match peek_significant(queue)? {
                    TokenKind::Dot | TokenKind::RightBrace if !in_brackets => return Ok(()),
                    TokenKind::RightBracket if in_brackets => {
                        queue.dequeue()?;
                        return Ok(());
                    }
                    _ => continue,
                }
            }
            TokenKind::Dot | TokenKind::RightBrace if !in_brackets => return Ok(()),
            TokenKind::RightBracket if in_brackets => {
                queue.dequeue()?;
                return Ok(());
            }
            _ => {
                let token = next_significant(queue)?;
                return Err(
                    unexpected(&token, "a ';', ',' or the end of the statement").into()
                );
            }
        }
    }
}

// [8] objectList ::= object (',' object)*
fn parse_object_list<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
    graph: Option<&NamedOrBlankNode>,
    subject: &NamedOrBlankNode,
    predicate: &NamedNode,
) -> StepResult<()> {
    loop {
        let object = parse_object(queue, sink, context, graph)?;
        emit(sink, graph, subject.clone(), predicate.clone(), object)?;
        if peek_significant(queue)? == TokenKind::Comma {
            queue.dequeue()?;
        } else {
            return Ok(());
        }
    }
}

// [12] object ::= iri | BlankNode | collection | blankNodePropertyList | literal
fn parse_object<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
    graph: Option<&NamedOrBlankNode>,
) -> StepResult<Term> {
    let token = next_significant(queue)?;
    Ok(match token.kind {
        TokenKind::Iri | TokenKind::PrefixedName => sink
            .create_named_node(resolve_term_iri(context, &token)?)
            .into(),
        TokenKind::BlankNodeLabel => sink.create_blank_node(token.value).into(),
        TokenKind::Literal | TokenKind::LongLiteral => {
            let literal = parse_literal(queue, sink, context, token)?;
            sink.create_literal(literal).into()
        }
        TokenKind::PlainLiteral => {
            let literal = typed_plain_literal(token)?;
            sink.create_literal(literal).into()
        }
        TokenKind::LeftBracket => {
            if peek_significant(queue)? == TokenKind::RightBracket {
                queue.dequeue()?;
                context.fresh_blank_node(sink).into()
            } else {
                let node = context.fresh_blank_node(sink);
                parse_predicate_object_list(
                    queue,
                    sink,
                    context,
                    graph,
                    &node.clone().into(),
                    true,
                )?;
                node.into()
            }
        }
        TokenKind::LeftParen => {
            if peek_significant(queue)? == TokenKind::RightParen {
                queue.dequeue()?;
                sink.create_named_node(RDF_NIL.to_owned()).into()
            } else {
                let head = context.fresh_blank_node(sink);
                parse_collection(queue, sink, context, graph, head.clone())?;
                head.into()
            }
        }
        _ => {
            return Err(unexpected(
                &token,
                "an IRI, blank node, literal, collection or property list as the object",
            )
            .into())
        }
    })
}

// [15] collection ::= '(' object* ')'
// Expanded into an rdf:first/rdf:rest chain ending in rdf:nil. The empty
// collection never reaches this function: it is short-circuited to a direct
// rdf:nil reference by the callers. `head` is the blank node standing for the
// first cell and the opening parenthesis is already consumed.
fn parse_collection<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
    graph: Option<&NamedOrBlankNode>,
    head: BlankNode,
) -> StepResult<()> {
    let first = sink.create_named_node(RDF_FIRST.to_owned());
    let rest = sink.create_named_node(RDF_REST.to_owned());
    let nil = sink.create_named_node(RDF_NIL.to_owned());
    let mut cell = head;
    loop {
        let item = parse_object(queue, sink, context, graph)?;
        emit(sink, graph, cell.clone().into(), first.clone(), item)?;
        if peek_significant(queue)? == TokenKind::RightParen {
            queue.dequeue()?;
            emit(sink, graph, cell.into(), rest, nil.into())?;
            return Ok(());
        }
        let next = context.fresh_blank_node(sink);
        emit(
            sink,
            graph,
            cell.into(),
            rest.clone(),
            next.clone().into(),
        )?;
        cell = next;
    }
}

// [13] literal with its optional suffix; a language tag and a datatype
// together are rejected, never silently preferred.
fn parse_literal<Q: TokenQueue, S: RdfSink>(
    queue: &mut Q,
    sink: &mut S,
    context: &mut Context,
    token: Token,
) -> StepResult<Literal> {
    let rdf11 = context.syntax == TrigSyntax::Recommendation;
    let value = unescape_literal(&token.value, rdf11)
        .map_err(|kind| ParseError::new(kind, token.span))?;
    match peek_significant(queue)? {
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
            if peek_significant(queue)? == TokenKind::DatatypeMarker {
                let marker = queue.dequeue()?;
                return Err(ParseError::new(
                    ParseErrorKind::ConflictingLiteralSuffixes,
                    marker.span,
                )
                .into());
            }
            Ok(Literal::LanguageTaggedString { value, language })
        }
        TokenKind::DatatypeMarker => {
            queue.dequeue()?;
            let datatype_token = next_significant(queue)?;
            let datatype = match datatype_token.kind {
                TokenKind::Iri | TokenKind::PrefixedName => {
                    sink.create_named_node(resolve_term_iri(context, &datatype_token)?)
                }
                _ => {
                    return Err(unexpected(
                        &datatype_token,
                        "an IRI or prefixed name naming the datatype after '^^'",
                    )
                    .into())
                }
            };
            Ok(Literal::Typed { value, datatype })
        }
        _ => Ok(Literal::Simple { value }),
    }
}

/// `true`, `false` and the numeric forms carry an inferred XSD datatype.
fn typed_plain_literal(token: Token) -> Result<Literal, ParseError> {
    let datatype = if is_valid_boolean(&token.value) {
        XSD_BOOLEAN
    } else if is_valid_integer(&token.value) {
        XSD_INTEGER
    } else if is_valid_double(&token.value) {
        XSD_DOUBLE
    } else if is_valid_decimal(&token.value) {
        XSD_DECIMAL
    } else {
        return Err(unexpected(&token, "a boolean or numeric literal"));
    };
    Ok(Literal::Typed {
        value: token.value,
        datatype: NamedNode::new(datatype),
    })
}

fn emit<S: RdfSink>(
    sink: &mut S,
    graph: Option<&NamedOrBlankNode>,
    subject: NamedOrBlankNode,
    predicate: NamedNode,
    object: Term,
) -> StepResult<()> {
    let quad = Quad {
        subject,
        predicate,
        object,
        graph_name: graph.cloned(),
    };
    if sink.handle_quad(quad) {
        Ok(())
    } else {
        Err(Interrupt::Halt)
    }
}

fn expect_dot(queue: &mut impl TokenQueue) -> Result<(), ParseError> {
    let token = next_significant(queue)?;
    if token.kind == TokenKind::Dot {
        Ok(())
    } else {
        Err(unexpected(&token, "a '.' terminating the statement"))
    }
}

/// Resolves an IRI or prefixed-name token into an absolute IRI string.
fn resolve_term_iri(context: &mut Context, token: &Token) -> Result<String, ParseError> {
    match token.kind {
        TokenKind::Iri => Ok(resolve_iri_token(context, token)?.into_inner()),
        TokenKind::PrefixedName => resolve_prefixed_name(context, token),
        _ => Err(unexpected(token, "an IRI or prefixed name")),
    }
}

/// Resolves an IRI token against the current base IRI. Without a base, the
/// reference must already be absolute.
fn resolve_iri_token(context: &Context, token: &Token) -> Result<Iri<String>, ParseError> {
    let raw = unescape_iri(&token.value).map_err(|kind| ParseError::new(kind, token.span))?;
    let result = match &context.base_iri {
        Some(base) => base.resolve(&raw),
        None => Iri::parse(raw.clone()),
    };
    result.map_err(|error| {
        ParseError::new(ParseErrorKind::InvalidIri { iri: raw, error }, token.span)
    })
}

/// Expands `prefix:local`: looks the prefix up (fatal if undeclared),
/// resolves the local-name escapes and concatenates.
fn resolve_prefixed_name(context: &Context, token: &Token) -> Result<String, ParseError> {
    let colon = match token.value.find(':') {
        Some(colon) => colon,
        None => {
            return Err(ParseError::new(
                ParseErrorKind::UnknownPrefix(token.value.clone()),
                token.span,
            ))
        }
    };
    let prefix = &token.value[..colon];
    let local = &token.value[colon + 1..];
    let namespace = context.namespaces.resolve(prefix).ok_or_else(|| {
        ParseError::new(ParseErrorKind::UnknownPrefix(prefix.to_owned()), token.span)
    })?;
    let local = unescape_local_name(local).map_err(|kind| ParseError::new(kind, token.span))?;
    Ok(format!("{}{}", namespace, local))
}

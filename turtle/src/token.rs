//! Tokens produced by the tokenizer and consumed by the grammar parsers.

use std::fmt;
use terrapin_api::parser::Span;

/// The kind of a [`Token`](struct.Token.html).
///
/// This is a closed union: every grammar branch in the parsers matches on it
/// exhaustively.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TokenKind {
    /// Beginning of file, emitted once before anything else.
    Bof,
    /// End of file, emitted indefinitely once the input is exhausted.
    Eof,
    /// A `# ...` comment. The value is the text after the `#`.
    Comment,
    /// An IRI written `<...>`. The value is the raw text between the angle
    /// brackets, `\u`/`\U` escapes unresolved.
    Iri,
    /// A prefixed name `prefix:local`. The value is the raw lexeme, local-name
    /// escapes unresolved.
    PrefixedName,
    /// The `name:` token following a prefix directive. The value includes the
    /// trailing colon.
    Prefix,
    /// A blank node label `_:name`. The value is the label without the `_:`.
    BlankNodeLabel,
    /// A quoted literal. The value is the raw text between the quotes, escapes
    /// unresolved.
    Literal,
    /// A triple-quoted literal, possibly spanning several lines. Raw value as
    /// for `Literal`.
    LongLiteral,
    /// A bare boolean or numeric literal (`true`, `42`, `4.2`, `4.2e1`).
    PlainLiteral,
    /// A language tag `@tag` following a literal. The value is the tag without
    /// the `@`.
    LanguageTag,
    /// The `^^` datatype marker.
    DatatypeMarker,
    Dot,
    Semicolon,
    Comma,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `@base` or SPARQL-style `BASE`. The value keeps the spelling so parsers
    /// can tell the two styles apart.
    BaseDirective,
    /// `@prefix` or SPARQL-style `PREFIX`, value as for `BaseDirective`.
    PrefixDirective,
    /// The TriG `GRAPH` keyword.
    GraphKeyword,
    /// The Turtle `a` shorthand for `rdf:type`.
    KeywordA,
    /// The `=` allowed between a graph name and its block in older TriG.
    Equals,
}

impl TokenKind {
    /// A short human-readable name used in error messages.
    pub fn description(self) -> &'static str {
        match self {
            TokenKind::Bof => "beginning of file",
            TokenKind::Eof => "end of file",
            TokenKind::Comment => "comment",
            TokenKind::Iri => "IRI",
            TokenKind::PrefixedName => "prefixed name",
            TokenKind::Prefix => "prefix",
            TokenKind::BlankNodeLabel => "blank node label",
            TokenKind::Literal => "literal",
            TokenKind::LongLiteral => "long literal",
            TokenKind::PlainLiteral => "plain literal",
            TokenKind::LanguageTag => "language tag",
            TokenKind::DatatypeMarker => "'^^'",
            TokenKind::Dot => "'.'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::BaseDirective => "base directive",
            TokenKind::PrefixDirective => "prefix directive",
            TokenKind::GraphKeyword => "'GRAPH'",
            TokenKind::KeywordA => "'a'",
            TokenKind::Equals => "'='",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A lexed token: kind, raw text and the input region it came from.
///
/// Tokens are produced once and consumed once; ownership moves from the
/// tokenizer through the queue to the parser. Escape sequences inside literal
/// and IRI values are kept raw and resolved only when the value is actually
/// used, so discarded tokens never pay for unescaping.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "[{}] {}", self.span, self.kind)
        } else {
            write!(f, "[{}] {} '{}'", self.span, self.kind, self.value)
        }
    }
}

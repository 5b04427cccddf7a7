//! The tokenizer turning a character stream into [`Token`](../token/struct.Token.html)s.

use crate::chars::{
    is_name_char, is_name_start_char, is_pn_chars, is_pn_chars_base, is_pn_chars_u,
    is_pn_local_esc_char,
};
use crate::error::{ParseError, ParseErrorKind};
use crate::ntriples::{NQuadsSyntax, NTriplesSyntax};
use crate::read::CharReader;
use crate::token::{Token, TokenKind};
use crate::trig::TrigSyntax;
use std::io::BufRead;
use std::mem;
use terrapin_api::parser::{Position, Span};

/// The per-variant gates of the tokenizer.
///
/// Use the [`ntriples`](#method.ntriples), [`nquads`](#method.nquads) and
/// [`trig`](#method.trig) constructors rather than filling the fields by hand.
#[derive(Debug, Clone, Copy)]
pub struct LexerOptions {
    /// Warn (once, never fail) when the input uses more than ASCII.
    pub expect_ascii: bool,
    /// RDF 1.1 escape set, blank node labels and local names.
    pub rdf11: bool,
    /// Turtle-family surface: prefixed names, directives, `a`, plain literals,
    /// square brackets and parentheses.
    pub turtle_names: bool,
    /// `"""..."""` literals.
    pub long_literals: bool,
    /// `'...'` and `'''...'''` literals.
    pub single_quotes: bool,
    /// `{` and `}`.
    pub graphs: bool,
    /// `=` between a graph name and its block.
    pub equals: bool,
    /// Bare `GRAPH`, `BASE` and `PREFIX` keywords.
    pub sparql_keywords: bool,
}

impl LexerOptions {
    pub fn ntriples(syntax: NTriplesSyntax) -> Self {
        Self {
            expect_ascii: syntax == NTriplesSyntax::Original,
            rdf11: syntax == NTriplesSyntax::Rdf11,
            turtle_names: false,
            long_literals: false,
            single_quotes: false,
            graphs: false,
            equals: false,
            sparql_keywords: false,
        }
    }

    pub fn nquads(syntax: NQuadsSyntax) -> Self {
        Self {
            expect_ascii: syntax == NQuadsSyntax::Original,
            rdf11: syntax == NQuadsSyntax::Rdf11,
            turtle_names: false,
            long_literals: false,
            single_quotes: false,
            graphs: false,
            equals: false,
            sparql_keywords: false,
        }
    }

    pub fn trig(syntax: TrigSyntax) -> Self {
        Self {
            expect_ascii: false,
            rdf11: syntax == TrigSyntax::Recommendation,
            turtle_names: true,
            long_literals: true,
            single_quotes: syntax == TrigSyntax::Recommendation,
            graphs: true,
            equals: syntax != TrigSyntax::Recommendation,
            sparql_keywords: syntax == TrigSyntax::Recommendation,
        }
    }
}

/// A tokenizer for one input stream.
///
/// One instance serves exactly one parse: it starts by emitting a BOF token,
/// ends with an EOF token and keeps re-emitting EOF afterwards. It fails only
/// by returning an error, never by producing a partial token.
pub struct Tokenizer<R: BufRead> {
    input: CharReader<R>,
    options: LexerOptions,
    started: bool,
    finished: bool,
    last_kind: TokenKind,
    warnings: Vec<String>,
    ascii_warned: bool,
    value: String,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(reader: R, options: LexerOptions) -> Self {
        Self {
            input: CharReader::new(reader),
            options,
            started: false,
            finished: false,
            last_kind: TokenKind::Bof,
            warnings: Vec::new(),
            ascii_warned: false,
            value: String::new(),
        }
    }

    /// Drains the warnings raised since the last call (encoding mismatches and
    /// other non-fatal diagnostics).
    pub fn take_warnings(&mut self) -> Vec<String> {
        mem::replace(&mut self.warnings, Vec::new())
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Returns the next token of the input.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        if !self.started {
            self.started = true;
            let span = Span::point(self.input.position());
            if self.input.peek()? == Some('\u{FEFF}') {
                self.input.next()?;
                if self.options.expect_ascii {
                    self.ascii_warned = true;
                    self.warn(
                        "input starts with a UTF-8 byte order mark but this format expects ASCII; \
                         continuing as UTF-8",
                    );
                }
            }
            return Ok(Token::new(TokenKind::Bof, "", span));
        }
        if self.finished {
            return Ok(Token::new(
                TokenKind::Eof,
                "",
                Span::point(self.input.position()),
            ));
        }

        self.skip_whitespace()?;
        let start = self.input.position();
        let c = match self.input.peek()? {
            None => {
                self.finished = true;
                return self.finish_token(TokenKind::Eof, start);
            }
            Some(c) => c,
        };

        let token = match c {
            '#' => self.lex_comment(start),
            '<' => self.lex_iri(start),
            '"' => self.lex_literal(start, '"'),
            '\'' if self.options.single_quotes => self.lex_literal(start, '\''),
            '_' => self.lex_blank_node_label(start),
            '@' => self.lex_at_word(start),
            '^' => self.lex_datatype_marker(start),
            '.' => {
                if self.options.turtle_names
                    && self.input.peek_next()?.map_or(false, |c| c.is_ascii_digit())
                {
                    self.lex_numeric(start)
                } else {
                    self.lex_single(start, TokenKind::Dot)
                }
            }
            ';' if self.options.turtle_names => self.lex_single(start, TokenKind::Semicolon),
            ',' if self.options.turtle_names => self.lex_single(start, TokenKind::Comma),
            '[' if self.options.turtle_names => self.lex_single(start, TokenKind::LeftBracket),
            ']' if self.options.turtle_names => self.lex_single(start, TokenKind::RightBracket),
            '(' if self.options.turtle_names => self.lex_single(start, TokenKind::LeftParen),
            ')' if self.options.turtle_names => self.lex_single(start, TokenKind::RightParen),
            '{' if self.options.graphs => self.lex_single(start, TokenKind::LeftBrace),
            '}' if self.options.graphs => self.lex_single(start, TokenKind::RightBrace),
            '=' if self.options.equals => self.lex_single(start, TokenKind::Equals),
            c if self.options.turtle_names && (c.is_ascii_digit() || c == '+' || c == '-') => {
                self.lex_numeric(start)
            }
            ':' if self.options.turtle_names => self.lex_word(start),
            c if self.options.turtle_names && is_pn_chars_base(c) => self.lex_word(start),
            c => Err(self.error_at(start, ParseErrorKind::UnexpectedCharacter(c))),
        }?;
        if self.options.expect_ascii && !self.ascii_warned && self.input.saw_non_ascii() {
            self.ascii_warned = true;
            self.warn(
                "non-ASCII content in an input expected to be ASCII; continuing as UTF-8",
            );
        }
        self.last_kind = token.kind;
        Ok(token)
    }

    fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.input.peek()? {
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.input.next()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn finish_token(&mut self, kind: TokenKind, start: Position) -> Result<Token, ParseError> {
        let span = Span::new(start, self.input.position());
        Ok(Token::new(kind, mem::replace(&mut self.value, String::new()), span))
    }

    fn lex_single(&mut self, start: Position, kind: TokenKind) -> Result<Token, ParseError> {
        self.input.next()?;
        self.finish_token(kind, start)
    }

    fn lex_comment(&mut self, start: Position) -> Result<Token, ParseError> {
        self.input.next()?;
        while let Some(c) = self.input.peek()? {
            if c == '\n' || c == '\r' {
                break;
            }
            self.input.next()?;
            self.value.push(c);
        }
        self.finish_token(TokenKind::Comment, start)
    }

    // [18] IRIREF ::= '<' ([^#x00-#x20<>"{}|^`\] | UCHAR)* '>'
    fn lex_iri(&mut self, start: Position) -> Result<Token, ParseError> {
        self.input.next()?;
        loop {
            match self.input.next()? {
                None => return Err(self.error_at(start, ParseErrorKind::PrematureEof)),
                Some('>') => return self.finish_token(TokenKind::Iri, start),
                Some('\\') => {
                    // only \u and \U are meaningful here; kept raw, resolved on use
                    self.value.push('\\');
                    let len = match self.input.next()? {
                        Some('u') => {
                            self.value.push('u');
                            4
                        }
                        Some('U') => {
                            self.value.push('U');
                            8
                        }
                        Some(c) => {
                            return Err(self
                                .error_here(ParseErrorKind::InvalidEscape(format!("\\{}", c))))
                        }
                        None => return Err(self.error_at(start, ParseErrorKind::PrematureEof)),
                    };
                    self.consume_hex_digits(start, len)?;
                }
                Some(c @ '\u{0}'..=' ')
                | Some(c @ '<')
                | Some(c @ '"')
                | Some(c @ '{')
                | Some(c @ '}')
                | Some(c @ '|')
                | Some(c @ '^')
                | Some(c @ '`') => {
                    return Err(self.error_here(ParseErrorKind::UnexpectedCharacter(c)))
                }
                Some(c) => self.value.push(c),
            }
        }
    }

    fn consume_hex_digits(&mut self, start: Position, count: usize) -> Result<(), ParseError> {
        for _ in 0..count {
            match self.input.next()? {
                Some(c) if c.is_ascii_hexdigit() => self.value.push(c),
                Some(c) => {
                    return Err(self.error_here(ParseErrorKind::UnexpectedCharacter(c)))
                }
                None => return Err(self.error_at(start, ParseErrorKind::PrematureEof)),
            }
        }
        Ok(())
    }

    // [22] STRING_LITERAL_QUOTE and the long-literal variants. The value keeps
    // the escape sequences raw; a backslash always swallows the following
    // character so a quoted quote cannot terminate the literal.
    fn lex_literal(&mut self, start: Position, quote: char) -> Result<Token, ParseError> {
        self.input.next()?;
        if self.options.long_literals && self.input.peek()? == Some(quote) {
            self.input.next()?;
            if self.input.peek()? == Some(quote) {
                self.input.next()?;
                return self.lex_long_literal(start, quote);
            }
            // two quotes: the empty literal
            return self.finish_token(TokenKind::Literal, start);
        }
        loop {
            match self.input.next()? {
                None => return Err(self.error_at(start, ParseErrorKind::PrematureEof)),
                Some(c) if c == quote => return self.finish_token(TokenKind::Literal, start),
                Some('\\') => {
                    self.value.push('\\');
                    match self.input.next()? {
                        Some(c) => self.value.push(c),
                        None => return Err(self.error_at(start, ParseErrorKind::PrematureEof)),
                    }
                }
                Some(c @ '\n') | Some(c @ '\r') => {
                    return Err(self.error_here(ParseErrorKind::UnexpectedCharacter(c)))
                }
                Some(c) => self.value.push(c),
            }
        }
    }

    fn lex_long_literal(&mut self, start: Position, quote: char) -> Result<Token, ParseError> {
        loop {
            match self.input.next()? {
                None => return Err(self.error_at(start, ParseErrorKind::PrematureEof)),
                Some('\\') => {
                    self.value.push('\\');
                    match self.input.next()? {
                        Some(c) => self.value.push(c),
                        None => return Err(self.error_at(start, ParseErrorKind::PrematureEof)),
                    }
                }
                Some(c) if c == quote => {
                    if self.input.peek()? == Some(quote) {
                        self.input.next()?;
                        if self.input.peek()? == Some(quote) {
                            self.input.next()?;
                            return self.finish_token(TokenKind::LongLiteral, start);
                        }
                        self.value.push(quote);
                        self.value.push(quote);
                    } else {
                        self.value.push(quote);
                    }
                }
                Some(c) => self.value.push(c),
            }
        }
    }

    // [141s] BLANK_NODE_LABEL ::= '_:' (PN_CHARS_U | [0-9]) ((PN_CHARS | '.')* PN_CHARS)?
    // The original N-Triples grammar only allowed [A-Za-z][A-Za-z0-9]*.
    fn lex_blank_node_label(&mut self, start: Position) -> Result<Token, ParseError> {
        self.input.next()?;
        match self.input.next()? {
            Some(':') => (),
            Some(c) => return Err(self.error_here(ParseErrorKind::UnexpectedCharacter(c))),
            None => return Err(self.error_at(start, ParseErrorKind::PrematureEof)),
        }
        let rdf11 = self.options.rdf11;
        let first_ok = move |c: char| {
            if rdf11 {
                is_pn_chars_u(c) || c.is_ascii_digit()
            } else {
                c.is_ascii_alphabetic()
            }
        };
        match self.input.peek()? {
            Some(c) if first_ok(c) => {
                self.input.next()?;
                self.value.push(c);
            }
            Some(c) => return Err(self.error_here(ParseErrorKind::UnexpectedCharacter(c))),
            None => return Err(self.error_at(start, ParseErrorKind::PrematureEof)),
        }
        loop {
            match self.input.peek()? {
                Some('.') if self.options.rdf11 => {
                    // a dot belongs to the label only when a name character follows
                    match self.input.peek_next()? {
                        Some(c) if is_pn_chars(c) || c == '.' => {
                            self.input.next()?;
                            self.value.push('.');
                        }
                        _ => break,
                    }
                }
                Some(c) if self.label_char(c) => {
                    self.input.next()?;
                    self.value.push(c);
                }
                _ => break,
            }
        }
        self.finish_token(TokenKind::BlankNodeLabel, start)
    }

    fn label_char(&self, c: char) -> bool {
        if self.options.rdf11 {
            is_pn_chars(c)
        } else {
            c.is_ascii_alphanumeric()
        }
    }

    // '@' starts a language tag after a literal and a directive everywhere else.
    fn lex_at_word(&mut self, start: Position) -> Result<Token, ParseError> {
        self.input.next()?;
        if self.last_kind == TokenKind::Literal || self.last_kind == TokenKind::LongLiteral {
            return self.lex_language_tag(start);
        }
        if !self.options.turtle_names {
            return Err(self.error_at(start, ParseErrorKind::UnexpectedCharacter('@')));
        }
        let mut word = String::new();
        while let Some(c) = self.input.peek()? {
            if c.is_ascii_alphabetic() {
                self.input.next()?;
                word.push(c);
            } else {
                break;
            }
        }
        match word.as_str() {
            "prefix" => {
                self.value.push_str("@prefix");
                self.finish_token(TokenKind::PrefixDirective, start)
            }
            "base" => {
                self.value.push_str("@base");
                self.finish_token(TokenKind::BaseDirective, start)
            }
            _ => Err(self.error_at(start, ParseErrorKind::UnexpectedCharacter('@'))),
        }
    }

    // [144s] LANGTAG ::= '@' [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*
    fn lex_language_tag(&mut self, start: Position) -> Result<Token, ParseError> {
        match self.input.peek()? {
            Some(c) if c.is_ascii_alphabetic() => (),
            Some(c) => return Err(self.error_here(ParseErrorKind::UnexpectedCharacter(c))),
            None => return Err(self.error_at(start, ParseErrorKind::PrematureEof)),
        }
        while let Some(c) = self.input.peek()? {
            if c.is_ascii_alphabetic() {
                self.input.next()?;
                self.value.push(c);
            } else {
                break;
            }
        }
        while self.input.peek()? == Some('-') {
            match self.input.peek_next()? {
                Some(c) if c.is_ascii_alphanumeric() => {
                    self.input.next()?;
                    self.value.push('-');
                }
                _ => break,
            }
            while let Some(c) = self.input.peek()? {
                if c.is_ascii_alphanumeric() {
                    self.input.next()?;
                    self.value.push(c);
                } else {
                    break;
                }
            }
        }
        self.finish_token(TokenKind::LanguageTag, start)
    }

    fn lex_datatype_marker(&mut self, start: Position) -> Result<Token, ParseError> {
        self.input.next()?;
        match self.input.next()? {
            Some('^') => self.finish_token(TokenKind::DatatypeMarker, start),
            Some(c) => Err(self.error_here(ParseErrorKind::UnexpectedCharacter(c))),
            None => Err(self.error_at(start, ParseErrorKind::PrematureEof)),
        }
    }

    // [19] INTEGER, [20] DECIMAL, [21] DOUBLE; the raw text is validated and
    // typed when the parser turns the token into a literal.
    fn lex_numeric(&mut self, start: Position) -> Result<Token, ParseError> {
        if let Some(c) = self.input.peek()? {
            if c == '+' || c == '-' {
                self.input.next()?;
                self.value.push(c);
            }
        }
        self.consume_digits()?;
        if self.input.peek()? == Some('.') {
            // the dot is part of the number only in decimal/double position,
            // otherwise it terminates the statement
            match self.input.peek_next()? {
                Some(c) if c.is_ascii_digit() || c == 'e' || c == 'E' => {
                    self.input.next()?;
                    self.value.push('.');
                    self.consume_digits()?;
                }
                _ => return self.finish_token(TokenKind::PlainLiteral, start),
            }
        }
        if let Some(c) = self.input.peek()? {
            if c == 'e' || c == 'E' {
                self.input.next()?;
                self.value.push(c);
                if let Some(c) = self.input.peek()? {
                    if c == '+' || c == '-' {
                        self.input.next()?;
                        self.value.push(c);
                    }
                }
                self.consume_digits()?;
            }
        }
        self.finish_token(TokenKind::PlainLiteral, start)
    }

    fn consume_digits(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.input.peek()? {
            if c.is_ascii_digit() {
                self.input.next()?;
                self.value.push(c);
            } else {
                break;
            }
        }
        Ok(())
    }

    // A bare word: a keyword, a boolean plain literal, a prefixed name or the
    // prefix declaration of a directive.
    fn lex_word(&mut self, start: Position) -> Result<Token, ParseError> {
        if self.input.peek()? != Some(':') {
            self.lex_prefix_part()?;
        }
        if self.input.peek()? == Some(':') {
            self.input.next()?;
            self.value.push(':');
            if self.last_kind == TokenKind::PrefixDirective {
                // the 'name:' of a @prefix/PREFIX declaration, local part not allowed
                return self.finish_token(TokenKind::Prefix, start);
            }
            self.lex_local_part()?;
            return self.finish_token(TokenKind::PrefixedName, start);
        }
        // no colon: a keyword or a boolean
        let word = mem::replace(&mut self.value, String::new());
        let span = Span::new(start, self.input.position());
        let sparql_keywords = self.options.sparql_keywords;
        Ok(match word.as_str() {
            "a" => Token::new(TokenKind::KeywordA, "", span),
            "true" | "false" => Token::new(TokenKind::PlainLiteral, word, span),
            w if sparql_keywords && w.eq_ignore_ascii_case("GRAPH") => {
                Token::new(TokenKind::GraphKeyword, "", span)
            }
            w if sparql_keywords && w.eq_ignore_ascii_case("BASE") => {
                Token::new(TokenKind::BaseDirective, word, span)
            }
            w if sparql_keywords && w.eq_ignore_ascii_case("PREFIX") => {
                Token::new(TokenKind::PrefixDirective, word, span)
            }
            _ => Token::new(TokenKind::PlainLiteral, word, span),
        })
    }

    // [167s] PN_PREFIX ::= PN_CHARS_BASE ((PN_CHARS | '.')* PN_CHARS)?
    // The pre-W3C variants use the name productions, which have no dots.
    fn lex_prefix_part(&mut self) -> Result<(), ParseError> {
        match self.input.peek()? {
            Some(c) if is_pn_chars_base(c) => {
                self.input.next()?;
                self.value.push(c);
            }
            _ => return Ok(()),
        }
        loop {
            match self.input.peek()? {
                Some('.') if self.options.rdf11 => match self.input.peek_next()? {
                    Some(c) if is_pn_chars(c) || c == '.' || c == ':' => {
                        self.input.next()?;
                        self.value.push('.');
                    }
                    _ => break,
                },
                Some(c) if self.name_char(c) => {
                    self.input.next()?;
                    self.value.push(c);
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn name_char(&self, c: char) -> bool {
        if self.options.rdf11 {
            is_pn_chars(c)
        } else {
            is_name_char(c)
        }
    }

    // [168s] PN_LOCAL ::= (PN_CHARS_U | ':' | [0-9] | PLX) ((PN_CHARS | '.' | ':' | PLX)* (PN_CHARS | ':' | PLX))?
    // Escapes and percent triples are kept raw. An empty local part is legal:
    // a bare `prefix:` is a valid prefixed name.
    fn lex_local_part(&mut self) -> Result<(), ParseError> {
        let mut first = true;
        loop {
            let leading_ok = first;
            first = false;
            match self.input.peek()? {
                Some('.') if !leading_ok => match self.input.peek_next()? {
                    Some(c)
                        if is_pn_chars(c) || c == '.' || c == ':' || c == '%' || c == '\\' =>
                    {
                        self.input.next()?;
                        self.value.push('.');
                    }
                    _ => break,
                },
                Some(':') if self.options.rdf11 => {
                    self.input.next()?;
                    self.value.push(':');
                }
                Some('%') if self.options.rdf11 => {
                    self.input.next()?;
                    self.value.push('%');
                    self.consume_hex_digits(self.input.position(), 2)?;
                }
                Some('\\') if self.options.rdf11 => {
                    self.input.next()?;
                    match self.input.next()? {
                        Some(c) if is_pn_local_esc_char(c) => {
                            self.value.push('\\');
                            self.value.push(c);
                        }
                        Some(c) => {
                            return Err(self
                                .error_here(ParseErrorKind::InvalidEscape(format!("\\{}", c))))
                        }
                        None => return Err(self.error_here(ParseErrorKind::PrematureEof)),
                    }
                }
                Some(c) if leading_ok && self.options.rdf11 => {
                    if is_pn_chars_u(c) || c.is_ascii_digit() {
                        self.input.next()?;
                        self.value.push(c);
                    } else {
                        break;
                    }
                }
                Some(c) if leading_ok => {
                    if is_name_start_char(c) || c.is_ascii_digit() {
                        self.input.next()?;
                        self.value.push(c);
                    } else {
                        break;
                    }
                }
                Some(c) if self.name_char(c) => {
                    self.input.next()?;
                    self.value.push(c);
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn error_at(&self, start: Position, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, Span::new(start, self.input.position()))
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, Span::point(self.input.position()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trig::TrigSyntax;

    fn kinds(input: &str, options: LexerOptions) -> Vec<TokenKind> {
        let mut tokenizer = Tokenizer::new(input.as_bytes(), options);
        let mut kinds = Vec::new();
        loop {
            let token = tokenizer.next_token().unwrap();
            let kind = token.kind;
            kinds.push(kind);
            if kind == TokenKind::Eof {
                return kinds;
            }
        }
    }

    #[test]
    fn lexes_an_ntriples_statement() {
        let input = "<urn:s> <urn:p> \"o\"@en .";
        assert_eq!(
            kinds(input, LexerOptions::ntriples(NTriplesSyntax::Rdf11)),
            vec![
                TokenKind::Bof,
                TokenKind::Iri,
                TokenKind::Iri,
                TokenKind::Literal,
                TokenKind::LanguageTag,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_trig_punctuation_and_names() {
        let input = "@prefix ex: <urn:x#> . ex:g { ex:s a ex:o , ( 1 2.5 ) ; ex:p [ ] . }";
        assert_eq!(
            kinds(input, LexerOptions::trig(TrigSyntax::Recommendation)),
            vec![
                TokenKind::Bof,
                TokenKind::PrefixDirective,
                TokenKind::Prefix,
                TokenKind::Iri,
                TokenKind::Dot,
                TokenKind::PrefixedName,
                TokenKind::LeftBrace,
                TokenKind::PrefixedName,
                TokenKind::KeywordA,
                TokenKind::PrefixedName,
                TokenKind::Comma,
                TokenKind::LeftParen,
                TokenKind::PlainLiteral,
                TokenKind::PlainLiteral,
                TokenKind::RightParen,
                TokenKind::Semicolon,
                TokenKind::PrefixedName,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Dot,
                TokenKind::RightBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn long_literals_track_lines() {
        let input = "<urn:s> <urn:p> \"\"\"a\nb\"\"\" .";
        let mut tokenizer =
            Tokenizer::new(input.as_bytes(), LexerOptions::trig(TrigSyntax::Recommendation));
        let literal = loop {
            let token = tokenizer.next_token().unwrap();
            if token.kind == TokenKind::LongLiteral {
                break token;
            }
        };
        assert_eq!(literal.value, "a\nb");
        assert_eq!(literal.span.start.line, 1);
        assert_eq!(literal.span.end.line, 2);
    }

    #[test]
    fn keeps_escapes_raw() {
        let input = r#"<urn:s> <urn:p> "a\nb" ."#;
        let mut tokenizer = Tokenizer::new(
            input.as_bytes(),
            LexerOptions::ntriples(NTriplesSyntax::Rdf11),
        );
        let literal = loop {
            let token = tokenizer.next_token().unwrap();
            if token.kind == TokenKind::Literal {
                break token;
            }
        };
        assert_eq!(literal.value, r"a\nb");
    }

    #[test]
    fn reports_lexical_errors_with_positions() {
        let input = "<urn:s> <urn:p> <urn:o> .\n<urn:s> ~";
        let mut tokenizer = Tokenizer::new(
            input.as_bytes(),
            LexerOptions::ntriples(NTriplesSyntax::Rdf11),
        );
        let error = loop {
            match tokenizer.next_token() {
                Ok(_) => (),
                Err(e) => break e,
            }
        };
        assert_eq!(
            terrapin_api::parser::PositionedError::span(&error)
                .unwrap()
                .start
                .line,
            2
        );
    }

    #[test]
    fn warns_once_about_non_ascii_in_ascii_formats() {
        let input = "<urn:é> <urn:p> \"é\" .";
        let mut tokenizer = Tokenizer::new(
            input.as_bytes(),
            LexerOptions::ntriples(NTriplesSyntax::Original),
        );
        let mut warnings = Vec::new();
        loop {
            let token = tokenizer.next_token().unwrap();
            warnings.extend(tokenizer.take_warnings());
            if token.kind == TokenKind::Eof {
                break;
            }
        }
        assert_eq!(warnings.len(), 1);
    }
}

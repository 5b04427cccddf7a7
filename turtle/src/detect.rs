//! Heuristic format detection for untyped RDF text.
//!
//! Detection is cheap and may guess wrong: a grammar error downstream means
//! "wrong guess, try the next candidate", not that the input is invalid RDF.
//! [`parse_str`](fn.parse_str.html) implements exactly that fallback chain.

use crate::error::ParseError;
use crate::ntriples::{NQuadsParser, NQuadsSyntax, NTriplesParser, NTriplesSyntax};
use crate::trig::{TriGParser, TrigSyntax};
use terrapin_api::parser::RdfReader;
use terrapin_api::sink::{CollectedDataset, RdfSink};

/// The text formats this library can parse.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TextFormat {
    NTriples,
    NQuads,
    Trig,
}

/// Guesses the format of `content` from cheap structural signals.
///
/// Returns `None` when the content looks like something this library does not
/// handle at all (XML or JSON shaped data).
pub fn guess_format(content: &str) -> Option<TextFormat> {
    let trimmed = content.trim_start();
    if trimmed.starts_with("<?xml") || trimmed.starts_with("<!--") || trimmed.starts_with("<rdf:") {
        return None;
    }
    if looks_like_json(trimmed) {
        return None;
    }
    if trimmed.contains("@prefix")
        || trimmed.contains("@base")
        || starts_with_keyword(trimmed, "PREFIX")
        || starts_with_keyword(trimmed, "BASE")
        || trimmed.contains('{')
    {
        return Some(TextFormat::Trig);
    }
    // line-based: look at the first data line and count its terms
    for line in trimmed.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // crude: terms of a N-Triples/N-Quads line contain no spaces unless
        // quoted, so a high field count hints at a graph name
        return if line.split_whitespace().count() >= 5 {
            Some(TextFormat::NQuads)
        } else {
            Some(TextFormat::NTriples)
        };
    }
    Some(TextFormat::NTriples)
}

fn starts_with_keyword(content: &str, keyword: &str) -> bool {
    content
        .get(..keyword.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(keyword))
}

fn looks_like_json(trimmed: &str) -> bool {
    // a TriG default graph also starts with '{', but is then followed by a
    // term, not by a JSON key
    let mut chars = trimmed.chars();
    match chars.next() {
        Some('{') => matches!(chars.find(|c| !c.is_whitespace()), Some('"')),
        _ => false,
    }
}

/// Parses opaque text by trying the guessed format first and the remaining
/// candidates on grammar errors.
///
/// Events reach `sink` only from the attempt that succeeds, so failed guesses
/// leave no trace; the price is that statements are buffered instead of
/// streamed, which makes this a convenience for small inputs only. Returns
/// the format that won, or the last error when everything failed.
pub fn parse_str<S: RdfSink>(content: &str, sink: &mut S) -> Result<TextFormat, ParseError> {
    let mut candidates = Vec::new();
    if let Some(format) = guess_format(content) {
        candidates.push(format);
    }
    for format in [TextFormat::Trig, TextFormat::NQuads, TextFormat::NTriples].iter() {
        if !candidates.contains(format) {
            candidates.push(*format);
        }
    }

    let mut last_error = None;
    for format in candidates {
        let mut buffer = CollectedDataset::new();
        let result = match format {
            TextFormat::NTriples => {
                NTriplesParser::new(content.as_bytes(), NTriplesSyntax::Rdf11).load(&mut buffer)
            }
            TextFormat::NQuads => {
                NQuadsParser::new(content.as_bytes(), NQuadsSyntax::Rdf11).load(&mut buffer)
            }
            TextFormat::Trig => {
                TriGParser::new(content.as_bytes(), "", TrigSyntax::Recommendation)?
                    .load(&mut buffer)
            }
        };
        match result {
            Ok(()) => {
                replay(buffer, sink);
                return Ok(format);
            }
            Err(error) => last_error = Some(error),
        }
    }
    // candidates is never empty, so an error is always recorded here
    match last_error {
        Some(error) => Err(error),
        None => unreachable!("at least one candidate format is always tried"),
    }
}

fn replay<S: RdfSink>(buffer: CollectedDataset, sink: &mut S) {
    sink.start();
    for (prefix, iri) in &buffer.namespaces {
        if !sink.handle_namespace(prefix, iri) {
            sink.end(true);
            return;
        }
    }
    for base in &buffer.base_iris {
        if !sink.handle_base_iri(base.as_deref()) {
            sink.end(true);
            return;
        }
    }
    for quad in buffer.quads {
        if !sink.handle_quad(quad) {
            sink.end(true);
            return;
        }
    }
    sink.end(true);
}

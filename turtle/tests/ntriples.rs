use terrapin_api::model::{BlankNode, Literal, NamedNode, Term};
use terrapin_api::parser::{PositionedError, RdfReader};
use terrapin_api::sink::CollectedDataset;
use terrapin_turtle::{NTriplesParser, NTriplesSyntax};

fn parse(input: &str, syntax: NTriplesSyntax) -> Result<CollectedDataset, terrapin_turtle::ParseError> {
    let mut sink = CollectedDataset::new();
    NTriplesParser::new(input.as_bytes(), syntax).load(&mut sink)?;
    Ok(sink)
}

#[test]
fn parses_triples_and_runs_the_sink_lifecycle() {
    let input = "<urn:s> <urn:p> <urn:o> .\n<urn:s> <urn:q> _:b1 .\n";
    let sink = parse(input, NTriplesSyntax::Rdf11).unwrap();
    assert!(sink.started);
    assert_eq!(sink.ended, Some(true));
    assert_eq!(sink.quads.len(), 2);
    assert_eq!(
        sink.quads[0].subject,
        NamedNode::new("urn:s").into()
    );
    assert_eq!(
        sink.quads[1].object,
        Term::BlankNode(BlankNode::new("b1"))
    );
}

#[test]
fn skips_comments_and_blank_lines() {
    let input = "# header comment\n\n<urn:s> <urn:p> \"v\" . # trailing\n";
    let sink = parse(input, NTriplesSyntax::Rdf11).unwrap();
    assert_eq!(sink.quads.len(), 1);
    assert_eq!(
        sink.quads[0].object,
        Term::Literal(Literal::Simple {
            value: "v".to_owned()
        })
    );
}

#[test]
fn parses_language_tags_and_datatypes() {
    let input = "<urn:s> <urn:p> \"hello\"@en-GB .\n<urn:s> <urn:p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n";
    let sink = parse(input, NTriplesSyntax::Rdf11).unwrap();
    assert_eq!(
        sink.quads[0].object,
        Term::Literal(Literal::LanguageTaggedString {
            value: "hello".to_owned(),
            language: "en-GB".to_owned(),
        })
    );
    assert_eq!(
        sink.quads[1].object,
        Term::Literal(Literal::Typed {
            value: "1".to_owned(),
            datatype: NamedNode::new("http://www.w3.org/2001/XMLSchema#integer"),
        })
    );
}

#[test]
fn rejects_a_literal_subject() {
    let input = "\"lit\" <urn:p> <urn:o> .";
    let mut sink = CollectedDataset::new();
    let result = NTriplesParser::new(input.as_bytes(), NTriplesSyntax::Rdf11).load(&mut sink);
    assert!(result.is_err());
    assert_eq!(sink.ended, Some(false));
    assert!(sink.quads.is_empty());
}

#[test]
fn rejects_a_literal_predicate() {
    let input = "<urn:s> \"lit\" <urn:o> .";
    assert!(parse(input, NTriplesSyntax::Rdf11).is_err());
}

#[test]
fn rejects_relative_iris() {
    // no base IRI resolution exists in this format
    let input = "<relative/path> <urn:p> <urn:o> .";
    assert!(parse(input, NTriplesSyntax::Rdf11).is_err());
}

#[test]
fn rejects_a_language_tag_combined_with_a_datatype() {
    let input = "<urn:s> <urn:p> \"x\"@en^^<urn:t> .";
    assert!(parse(input, NTriplesSyntax::Rdf11).is_err());
}

#[test]
fn anchors_errors_to_the_offending_line() {
    let input = "<urn:s> <urn:p> <urn:o> .\n<urn:s> \"bad\" <urn:o> .";
    let error = parse(input, NTriplesSyntax::Rdf11).unwrap_err();
    let span = error.span().expect("grammar errors carry a span");
    assert_eq!(span.start.line, 2);
}

#[test]
fn a_missing_dot_is_fatal() {
    let input = "<urn:s> <urn:p> <urn:o>\n<urn:s2> <urn:p2> <urn:o2> .";
    assert!(parse(input, NTriplesSyntax::Rdf11).is_err());
}

#[test]
fn sink_returning_false_stops_the_parse_successfully() {
    let input = "<urn:s> <urn:p> <urn:o> .\n<urn:s2> <urn:p2> <urn:o2> .\n<urn:s3> <urn:p3> <urn:o3> .";
    let mut sink = CollectedDataset::stopping_after(1);
    let result = NTriplesParser::new(input.as_bytes(), NTriplesSyntax::Rdf11).load(&mut sink);
    assert!(result.is_ok());
    // a cooperative stop is a successful, intentionally partial parse
    assert_eq!(sink.quads.len(), 1);
    assert_eq!(sink.ended, Some(true));
}

#[test]
fn original_syntax_restricts_blank_node_labels() {
    assert!(parse("<urn:s> <urn:p> _:ok1 .", NTriplesSyntax::Original).is_ok());
    assert!(parse("<urn:s> <urn:p> _:not_ok .", NTriplesSyntax::Original).is_err());
    assert!(parse("<urn:s> <urn:p> _:not_ok .", NTriplesSyntax::Rdf11).is_ok());
}

#[test]
fn original_syntax_rejects_rdf11_only_escapes() {
    let input = "<urn:s> <urn:p> \"a\\bb\" .";
    assert!(parse(input, NTriplesSyntax::Rdf11).is_ok());
    assert!(parse(input, NTriplesSyntax::Original).is_err());
}

#[test]
fn non_ascii_content_in_the_original_syntax_warns_but_parses() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let warnings = Rc::new(RefCell::new(Vec::new()));
    let collected = warnings.clone();
    let input = "<urn:s> <urn:p> \"héllo\" .";
    let mut sink = CollectedDataset::new();
    NTriplesParser::new(input.as_bytes(), NTriplesSyntax::Original)
        .on_warning(move |message| collected.borrow_mut().push(message))
        .load(&mut sink)
        .unwrap();
    assert_eq!(sink.quads.len(), 1);
    assert_eq!(warnings.borrow().len(), 1);
    assert_eq!(sink.ended, Some(true));
}

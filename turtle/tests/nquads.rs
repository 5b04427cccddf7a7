use terrapin_api::model::{BlankNode, NamedNode, NamedOrBlankNode};
use terrapin_api::parser::RdfReader;
use terrapin_api::sink::CollectedDataset;
use terrapin_turtle::{NQuadsParser, NQuadsSyntax};

fn parse(input: &str, syntax: NQuadsSyntax) -> Result<CollectedDataset, terrapin_turtle::ParseError> {
    let mut sink = CollectedDataset::new();
    NQuadsParser::new(input.as_bytes(), syntax).load(&mut sink)?;
    Ok(sink)
}

fn graph_iri(name: &Option<NamedOrBlankNode>) -> &str {
    match name {
        Some(NamedOrBlankNode::NamedNode(node)) => &node.iri,
        _ => panic!("expected an IRI graph name, got {:?}", name),
    }
}

#[test]
fn mixes_default_graph_and_named_graph_statements() {
    // several statements without a graph term all live in the one default
    // graph; that is not a duplicate-graph situation
    let input = "<urn:s> <urn:p> <urn:o> .\n\
                 <urn:s2> <urn:p> <urn:o> .\n\
                 <urn:s3> <urn:p> <urn:o> <urn:g> .\n";
    let sink = parse(input, NQuadsSyntax::Rdf11).unwrap();
    assert_eq!(sink.quads.len(), 3);
    assert_eq!(sink.quads[0].graph_name, None);
    assert_eq!(sink.quads[1].graph_name, None);
    assert_eq!(
        sink.quads[2].graph_name,
        Some(NamedNode::new("urn:g").into())
    );
}

#[test]
fn rdf11_keeps_blank_node_graph_names() {
    let input = "<urn:s> <urn:p> <urn:o> _:g1 .";
    let sink = parse(input, NQuadsSyntax::Rdf11).unwrap();
    assert_eq!(
        sink.quads[0].graph_name,
        Some(BlankNode::new("g1").into())
    );
}

#[test]
fn original_maps_blank_node_graph_names_to_synthetic_iris() {
    let input = "<urn:s> <urn:p> <urn:o> _:g1 .";
    let first = parse(input, NQuadsSyntax::Original).unwrap();
    let iri = graph_iri(&first.quads[0].graph_name).to_owned();
    assert!(iri.starts_with("nquads:bnode:"), "got {}", iri);

    // the encoding is deterministic across runs
    let second = parse(input, NQuadsSyntax::Original).unwrap();
    assert_eq!(graph_iri(&second.quads[0].graph_name), iri);

    // and differs for different labels
    let other = parse("<urn:s> <urn:p> <urn:o> _:g2 .", NQuadsSyntax::Original).unwrap();
    assert_ne!(graph_iri(&other.quads[0].graph_name), iri);
}

#[test]
fn original_maps_literal_graph_names_to_synthetic_iris() {
    let input = "<urn:s> <urn:p> <urn:o> \"g\" .";
    let sink = parse(input, NQuadsSyntax::Original).unwrap();
    let iri = graph_iri(&sink.quads[0].graph_name);
    assert!(iri.starts_with("nquads:literal:"), "got {}", iri);
}

#[test]
fn rdf11_rejects_literal_graph_names() {
    let input = "<urn:s> <urn:p> <urn:o> \"g\" .";
    assert!(parse(input, NQuadsSyntax::Rdf11).is_err());
}

#[test]
fn graph_names_follow_the_object_not_the_subject() {
    // a fifth term is a grammar error
    let input = "<urn:s> <urn:p> <urn:o> <urn:g> <urn:h> .";
    assert!(parse(input, NQuadsSyntax::Rdf11).is_err());
}

#[test]
fn literals_still_work_as_objects_with_a_graph_name() {
    let input = "<urn:s> <urn:p> \"v\"@en <urn:g> .";
    let sink = parse(input, NQuadsSyntax::Rdf11).unwrap();
    assert_eq!(sink.quads.len(), 1);
    assert_eq!(graph_iri(&sink.quads[0].graph_name), "urn:g");
}

#[test]
fn cooperative_stop_counts_for_quads_too() {
    let input = "<urn:s> <urn:p> <urn:o> <urn:g> .\n<urn:s2> <urn:p> <urn:o> .";
    let mut sink = CollectedDataset::stopping_after(1);
    NQuadsParser::new(input.as_bytes(), NQuadsSyntax::Rdf11)
        .load(&mut sink)
        .unwrap();
    assert_eq!(sink.quads.len(), 1);
    assert_eq!(sink.ended, Some(true));
}

use std::cell::RefCell;
use std::rc::Rc;
use terrapin_api::model::{Literal, NamedNode, NamedOrBlankNode, Term};
use terrapin_api::parser::{PositionedError, RdfReader};
use terrapin_api::sink::CollectedDataset;
use terrapin_turtle::{TriGParser, TrigSyntax};

fn parse(input: &str, syntax: TrigSyntax) -> Result<CollectedDataset, terrapin_turtle::ParseError> {
    let mut sink = CollectedDataset::new();
    TriGParser::new(input.as_bytes(), "", syntax)?.load(&mut sink)?;
    Ok(sink)
}

fn xsd(local: &str) -> NamedNode {
    NamedNode::new(format!("http://www.w3.org/2001/XMLSchema#{}", local))
}

#[test]
fn parses_named_and_default_graphs() {
    let input = "<urn:g> { <urn:s> <urn:p> <urn:o> . }\n{ <urn:s2> <urn:p> <urn:o> . }";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    assert_eq!(sink.quads.len(), 2);
    assert_eq!(
        sink.quads[0].graph_name,
        Some(NamedNode::new("urn:g").into())
    );
    assert_eq!(sink.quads[1].graph_name, None);
}

#[test]
fn supports_the_graph_keyword() {
    let input = "GRAPH <urn:g> { <urn:s> <urn:p> <urn:o> . }";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    assert_eq!(
        sink.quads[0].graph_name,
        Some(NamedNode::new("urn:g").into())
    );
}

#[test]
fn a_prefix_declared_inside_a_graph_does_not_leak_out() {
    let input = "@prefix a: <urn:a#> . { @prefix a: <urn:b#> . <urn:b#s> a:p <urn:b#o> . } <urn:a#s2> a:p <urn:a#o2> .";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    assert_eq!(sink.quads.len(), 2);
    // inside the block the inner declaration wins
    assert_eq!(sink.quads[0].predicate, NamedNode::new("urn:b#p"));
    // after the block the outer declaration is back in force
    assert_eq!(sink.quads[1].predicate, NamedNode::new("urn:a#p"));
    // leaving the block re-announced the restored binding
    let namespaces: Vec<(&str, &str)> = sink
        .namespaces
        .iter()
        .map(|(prefix, iri)| (prefix.as_str(), iri.as_str()))
        .collect();
    let inner = namespaces
        .iter()
        .position(|&(_, iri)| iri == "urn:b#")
        .expect("the inner declaration was announced");
    assert!(namespaces[inner + 1..].contains(&("a", "urn:a#")));
}

#[test]
fn a_base_declared_inside_a_graph_is_restored_on_exit() {
    let input = "@base <http://a/> . <http://g> { @base <http://b/> . <s> <p> <o> . } <s2> <p2> <o2> .";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    assert_eq!(sink.quads[0].subject, NamedNode::new("http://b/s").into());
    assert_eq!(sink.quads[1].subject, NamedNode::new("http://a/s2").into());
    // the restore was announced to the sink
    assert!(sink
        .base_iris
        .iter()
        .skip_while(|base| base.as_deref() != Some("http://b/"))
        .any(|base| base.as_deref() == Some("http://a/")));
}

#[test]
fn original_syntax_keeps_directives_file_scoped_and_top_level() {
    // directives inside a graph are an error in the original syntax
    let input = "<urn:g> { @prefix p: <urn:x#> . }";
    assert!(parse(input, TrigSyntax::Original).is_err());

    // and @base does not exist at all
    assert!(parse("@base <urn:a#> .", TrigSyntax::Original).is_err());
}

#[test]
fn member_submission_allows_equals_and_trailing_dots() {
    let input = "<urn:g> = { <urn:s> <urn:p> <urn:o> . } .";
    let sink = parse(input, TrigSyntax::MemberSubmission).unwrap();
    assert_eq!(sink.quads.len(), 1);

    // the recommendation dropped the equals sign
    assert!(parse(input, TrigSyntax::Recommendation).is_err());
}

#[test]
fn member_submission_warns_about_base() {
    let warnings = Rc::new(RefCell::new(Vec::new()));
    let collected = warnings.clone();
    let input = "@base <http://a/> . <http://g> { <s> <p> <o> . }";
    let mut sink = CollectedDataset::new();
    TriGParser::new(input.as_bytes(), "", TrigSyntax::MemberSubmission)
        .unwrap()
        .on_warning(move |message| collected.borrow_mut().push(message))
        .load(&mut sink)
        .unwrap();
    assert_eq!(sink.quads.len(), 1);
    assert_eq!(warnings.borrow().len(), 1);
}

#[test]
fn a_second_default_graph_block_is_fatal() {
    let input = "{ <urn:s> <urn:p> <urn:o> . } { <urn:s2> <urn:p> <urn:o> . }";
    let mut sink = CollectedDataset::new();
    let result = TriGParser::new(input.as_bytes(), "", TrigSyntax::Recommendation)
        .unwrap()
        .load(&mut sink);
    assert!(result.is_err());
    assert_eq!(sink.ended, Some(false));
}

#[test]
fn sparql_style_directives_have_no_dot() {
    let input = "PREFIX ex: <urn:x#>\nBASE <http://example.com/dir/>\nex:s ex:p <doc> .";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    assert_eq!(sink.quads[0].subject, NamedNode::new("urn:x#s").into());
    assert_eq!(
        sink.quads[0].object,
        Term::NamedNode(NamedNode::new("http://example.com/dir/doc"))
    );
}

#[test]
fn an_undeclared_prefix_is_fatal_with_a_position() {
    let input = "<urn:s> <urn:p> <urn:o> .\nex:s <urn:p> <urn:o> .";
    let mut sink = CollectedDataset::new();
    let error = TriGParser::new(input.as_bytes(), "", TrigSyntax::Recommendation)
        .unwrap()
        .load(&mut sink)
        .unwrap_err();
    assert_eq!(error.span().unwrap().start.line, 2);
    assert_eq!(sink.ended, Some(false));
}

#[test]
fn expands_collections_into_first_rest_chains() {
    let input = "<urn:s> <urn:p> (1 2) .";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    let first: Term = NamedNode::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#first").into();
    let rest = NamedNode::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#rest");
    let nil: Term = NamedNode::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#nil").into();

    let firsts: Vec<_> = sink
        .quads
        .iter()
        .filter(|q| Term::NamedNode(q.predicate.clone()) == first)
        .collect();
    assert_eq!(firsts.len(), 2);
    assert_eq!(
        firsts[0].object,
        Term::Literal(Literal::Typed {
            value: "1".to_owned(),
            datatype: xsd("integer"),
        })
    );

    // exactly one intermediate cell: two distinct blank cells in total
    let mut cells: Vec<_> = sink
        .quads
        .iter()
        .filter_map(|q| match &q.subject {
            NamedOrBlankNode::BlankNode(node) => Some(node.id.clone()),
            NamedOrBlankNode::NamedNode(_) => None,
        })
        .collect();
    cells.sort();
    cells.dedup();
    assert_eq!(cells.len(), 2);

    // the chain ends in rdf:nil
    assert!(sink
        .quads
        .iter()
        .any(|q| q.predicate == rest && q.object == nil));
}

#[test]
fn the_empty_collection_is_plain_rdf_nil() {
    let input = "<urn:s> <urn:p> () .";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    assert_eq!(sink.quads.len(), 1);
    assert_eq!(
        sink.quads[0].object,
        Term::NamedNode(NamedNode::new(
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil"
        ))
    );
}

#[test]
fn expands_blank_node_property_lists() {
    let input = "<urn:s> <urn:p> [ <urn:q> \"v\" ; ] .";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    assert_eq!(sink.quads.len(), 2);
    // the inner statement comes out first, its subject is the fresh node
    assert_eq!(sink.quads[0].predicate, NamedNode::new("urn:q"));
    let inner_subject = sink.quads[0].subject.clone();
    assert_eq!(sink.quads[1].object, inner_subject.into());
}

#[test]
fn empty_brackets_are_an_anonymous_blank_node() {
    let input = "[] <urn:p> [] .";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    assert_eq!(sink.quads.len(), 1);
    assert!(matches!(
        sink.quads[0].subject,
        NamedOrBlankNode::BlankNode(_)
    ));
    assert!(matches!(sink.quads[0].object, Term::BlankNode(_)));
}

#[test]
fn types_boolean_and_numeric_literals() {
    let input = "<urn:s> <urn:p> true , 42 , 4.2 , 4.2e1 .";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    let datatypes: Vec<_> = sink
        .quads
        .iter()
        .map(|q| match &q.object {
            Term::Literal(Literal::Typed { datatype, .. }) => datatype.clone(),
            other => panic!("expected a typed literal, got {}", other),
        })
        .collect();
    assert_eq!(
        datatypes,
        vec![xsd("boolean"), xsd("integer"), xsd("decimal"), xsd("double")]
    );
}

#[test]
fn predicate_object_lists_share_the_subject() {
    let input = "@prefix ex: <urn:x#> . ex:s a ex:T ; ex:p \"v\" , \"w\" .";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    assert_eq!(sink.quads.len(), 3);
    assert!(sink
        .quads
        .iter()
        .all(|q| q.subject == NamedNode::new("urn:x#s").into()));
    assert_eq!(
        sink.quads[0].predicate,
        NamedNode::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#type")
    );
}

#[test]
fn long_literals_may_span_lines() {
    let input = "<urn:s> <urn:p> \"\"\"line one\nline \"two\" end\"\"\" .";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    match &sink.quads[0].object {
        Term::Literal(Literal::Simple { value }) => {
            assert_eq!(value, "line one\nline \"two\" end");
        }
        other => panic!("expected a literal, got {}", other),
    }
}

#[test]
fn a_language_tag_and_a_datatype_together_are_rejected() {
    let input = "<urn:s> <urn:p> \"x\"@en^^<urn:t> .";
    assert!(parse(input, TrigSyntax::Recommendation).is_err());
}

#[test]
fn relative_iris_need_a_declared_or_supplied_base() {
    assert!(parse("<s> <urn:p> <urn:o> .", TrigSyntax::Recommendation).is_err());

    let mut sink = CollectedDataset::new();
    TriGParser::new(
        "<s> <urn:p> <urn:o> .".as_bytes(),
        "http://base.example/",
        TrigSyntax::Recommendation,
    )
    .unwrap()
    .load(&mut sink)
    .unwrap();
    assert_eq!(
        sink.quads[0].subject,
        NamedNode::new("http://base.example/s").into()
    );
}

#[test]
fn cooperative_stop_inside_an_object_list() {
    let input = "<urn:s> <urn:p> <urn:o> , <urn:o2> , <urn:o3> .";
    let mut sink = CollectedDataset::stopping_after(2);
    TriGParser::new(input.as_bytes(), "", TrigSyntax::Recommendation)
        .unwrap()
        .load(&mut sink)
        .unwrap();
    assert_eq!(sink.quads.len(), 2);
    assert_eq!(sink.ended, Some(true));
}

#[test]
fn blank_node_graph_labels_are_recommendation_only() {
    let input = "_:g { <urn:s> <urn:p> <urn:o> . }";
    let sink = parse(input, TrigSyntax::Recommendation).unwrap();
    assert!(matches!(
        sink.quads[0].graph_name,
        Some(NamedOrBlankNode::BlankNode(_))
    ));

    assert!(parse(input, TrigSyntax::MemberSubmission).is_err());
}

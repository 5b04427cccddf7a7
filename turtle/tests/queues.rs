use rstest::rstest;
use terrapin_api::parser::RdfReader;
use terrapin_api::sink::CollectedDataset;
use terrapin_turtle::{
    BackgroundQueue, EagerQueue, LexerOptions, NTriplesParser, NTriplesSyntax, OnDemandQueue,
    QueueMode, Token, TokenKind, TokenQueue, Tokenizer, TriGParser, TrigSyntax,
};

const NTRIPLES_DOC: &str = "\
# a comment\n\
<urn:s> <urn:p> <urn:o> .\n\
<urn:s> <urn:p> \"v\"@en .\n\
<urn:s> <urn:p> _:b1 .\n";

const TRIG_DOC: &str = "\
@prefix ex: <urn:x#> .\n\
ex:g { ex:s a ex:T ; ex:p \"long\" , ( 1 2.5 true ) ; ex:q [ ex:r ex:o ] . }\n\
{ ex:s2 ex:p \"\"\"multi\nline\"\"\" . }\n";

fn trig_tokenizer(input: &'static str) -> Tokenizer<&'static [u8]> {
    Tokenizer::new(input.as_bytes(), LexerOptions::trig(TrigSyntax::Recommendation))
}

fn ntriples_tokenizer(input: &'static str) -> Tokenizer<&'static [u8]> {
    Tokenizer::new(
        input.as_bytes(),
        LexerOptions::ntriples(NTriplesSyntax::Rdf11),
    )
}

fn drain(queue: &mut impl TokenQueue) -> Vec<Token> {
    queue.initialise(3).unwrap();
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

/// All three buffering strategies must yield the identical ordered token
/// sequence: same kinds, same raw text, same spans.
#[rstest]
#[case::ntriples(NTRIPLES_DOC, false)]
#[case::trig(TRIG_DOC, true)]
fn strategies_yield_identical_token_sequences(#[case] input: &'static str, #[case] trig: bool) {
    let tokens_of = |mode: QueueMode| -> Vec<Token> {
        if trig {
            match mode {
                QueueMode::OnDemand => drain(&mut OnDemandQueue::new(trig_tokenizer(input))),
                QueueMode::Background => {
                    drain(&mut BackgroundQueue::spawn(trig_tokenizer(input), 4))
                }
                QueueMode::Eager => drain(&mut EagerQueue::new(trig_tokenizer(input))),
            }
        } else {
            match mode {
                QueueMode::OnDemand => drain(&mut OnDemandQueue::new(ntriples_tokenizer(input))),
                QueueMode::Background => {
                    drain(&mut BackgroundQueue::spawn(ntriples_tokenizer(input), 4))
                }
                QueueMode::Eager => drain(&mut EagerQueue::new(ntriples_tokenizer(input))),
            }
        }
    };

    let on_demand = tokens_of(QueueMode::OnDemand);
    let background = tokens_of(QueueMode::Background);
    let eager = tokens_of(QueueMode::Eager);
    assert_eq!(on_demand, background);
    assert_eq!(on_demand, eager);
    // the sequence is framed by BOF and EOF
    assert_eq!(on_demand.first().map(|t| t.kind), Some(TokenKind::Bof));
    assert_eq!(on_demand.last().map(|t| t.kind), Some(TokenKind::Eof));
}

/// The strategy must not change what the parsers produce either.
#[rstest]
#[case::on_demand(QueueMode::OnDemand)]
#[case::background(QueueMode::Background)]
#[case::eager(QueueMode::Eager)]
fn ntriples_parses_identically_under_every_strategy(#[case] mode: QueueMode) {
    let mut reference = CollectedDataset::new();
    NTriplesParser::new(NTRIPLES_DOC.as_bytes(), NTriplesSyntax::Rdf11)
        .load(&mut reference)
        .unwrap();

    let mut sink = CollectedDataset::new();
    NTriplesParser::with_queue_mode(NTRIPLES_DOC.as_bytes(), NTriplesSyntax::Rdf11, mode)
        .load(&mut sink)
        .unwrap();
    assert_eq!(reference.quads, sink.quads);
}

#[rstest]
#[case::on_demand(QueueMode::OnDemand)]
#[case::background(QueueMode::Background)]
#[case::eager(QueueMode::Eager)]
fn trig_parses_identically_under_every_strategy(#[case] mode: QueueMode) {
    let mut reference = CollectedDataset::new();
    TriGParser::new(TRIG_DOC.as_bytes(), "", TrigSyntax::Recommendation)
        .unwrap()
        .load(&mut reference)
        .unwrap();

    let mut sink = CollectedDataset::new();
    TriGParser::with_queue_mode(TRIG_DOC.as_bytes(), "", TrigSyntax::Recommendation, mode)
        .unwrap()
        .load(&mut sink)
        .unwrap();
    assert_eq!(reference.quads, sink.quads);
    assert_eq!(reference.namespaces, sink.namespaces);
}

/// A tiny channel capacity forces the background worker into backpressure;
/// nothing may be lost or reordered.
#[test]
fn background_backpressure_loses_nothing() {
    let mut document = String::new();
    for i in 0..500 {
        document.push_str(&format!("<urn:s{}> <urn:p> \"{}\" .\n", i, i));
    }
    let document: &'static str = Box::leak(document.into_boxed_str());

    let tokenizer = Tokenizer::new(
        document.as_bytes(),
        LexerOptions::ntriples(NTriplesSyntax::Rdf11),
    );
    let mut queue = BackgroundQueue::spawn(tokenizer, 2);
    let tokens = drain(&mut queue);
    // BOF + 500 * (subject predicate object dot) + EOF
    assert_eq!(tokens.len(), 2 + 500 * 4);
}

/// Lexical errors surface identically through every strategy, after the
/// tokens that precede them.
#[rstest]
#[case::on_demand(QueueMode::OnDemand)]
#[case::background(QueueMode::Background)]
#[case::eager(QueueMode::Eager)]
fn lexical_errors_survive_the_queue_boundary(#[case] mode: QueueMode) {
    let input = "<urn:s> <urn:p> <urn:o> .\n<urn:s> ~ <urn:o> .";
    let mut sink = CollectedDataset::new();
    let result = NTriplesParser::with_queue_mode(input.as_bytes(), NTriplesSyntax::Rdf11, mode)
        .load(&mut sink);
    assert!(result.is_err());
    // the first statement was already delivered
    assert_eq!(sink.quads.len(), 1);
    assert_eq!(sink.ended, Some(false));
}

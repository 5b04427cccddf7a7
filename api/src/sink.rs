//! The push interface between parsers and whatever stores the parsed data.

use crate::model::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Quad, Triple};

/// A consumer of parse events.
///
/// Parsers push every statement into a sink as soon as it is read; no
/// intermediate statement list is ever built. The `handle_*` methods return a
/// `bool`: `true` to continue, `false` to ask the parser to stop. A `false`
/// return is *not* an error: the parser unwinds to its top level, calls
/// `end(true)` and returns successfully with whatever was delivered so far.
///
/// The `create_*` factory methods let a sink intern or canonicalize nodes;
/// the defaults just pass the parsed values through.
///
/// ```
/// use terrapin_api::model::Triple;
/// use terrapin_api::sink::RdfSink;
///
/// struct Counter(usize);
///
/// impl RdfSink for Counter {
///     fn handle_triple(&mut self, _triple: Triple) -> bool {
///         self.0 += 1;
///         true
///     }
/// }
/// ```
pub trait RdfSink {
    /// Called once, before anything else.
    fn start(&mut self) {}

    /// Called once, after everything else. `success` is `false` only when the
    /// parse failed with an error; a sink-requested stop still ends with
    /// `true`.
    fn end(&mut self, _success: bool) {}

    /// A namespace declaration became visible. Also re-invoked when leaving a
    /// TriG graph block restores an outer declaration.
    fn handle_namespace(&mut self, _prefix: &str, _iri: &str) -> bool {
        true
    }

    /// A base IRI became visible, under the same re-announcement rules as
    /// `handle_namespace`. `None` means no base IRI is in force.
    fn handle_base_iri(&mut self, _iri: Option<&str>) -> bool {
        true
    }

    /// A triple was read.
    fn handle_triple(&mut self, triple: Triple) -> bool;

    /// A quad was read. The default drops the graph name and delegates to
    /// [`handle_triple`](#method.handle_triple), which is the right behavior
    /// for dataset-unaware sinks; dataset-aware sinks should override it.
    fn handle_quad(&mut self, quad: Quad) -> bool {
        let (triple, _) = quad.into_parts();
        self.handle_triple(triple)
    }

    fn create_named_node(&mut self, iri: String) -> NamedNode {
        NamedNode { iri }
    }

    fn create_blank_node(&mut self, id: String) -> BlankNode {
        BlankNode { id }
    }

    fn create_literal(&mut self, literal: Literal) -> Literal {
        literal
    }
}

/// A sink collecting everything into vectors, mostly useful for tests and
/// small inputs.
///
/// Setting `stop_after` makes `handle_triple`/`handle_quad` return `false`
/// once that many statements have been collected, which exercises the
/// cooperative-stop protocol.
#[derive(Debug, Default)]
pub struct CollectedDataset {
    pub quads: Vec<Quad>,
    pub namespaces: Vec<(String, String)>,
    pub base_iris: Vec<Option<String>>,
    pub started: bool,
    pub ended: Option<bool>,
    pub stop_after: Option<usize>,
}

impl CollectedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopping_after(count: usize) -> Self {
        Self {
            stop_after: Some(count),
            ..Self::default()
        }
    }

    /// The triples of the default graph plus all named graphs merged.
    pub fn triples(&self) -> Vec<Triple> {
        self.quads
            .iter()
            .cloned()
            .map(|q| q.into_parts().0)
            .collect()
    }

    pub fn graph_names(&self) -> Vec<Option<NamedOrBlankNode>> {
        self.quads.iter().map(|q| q.graph_name.clone()).collect()
    }
}

impl RdfSink for CollectedDataset {
    fn start(&mut self) {
        self.started = true;
    }

    fn end(&mut self, success: bool) {
        self.ended = Some(success);
    }

    fn handle_namespace(&mut self, prefix: &str, iri: &str) -> bool {
        self.namespaces.push((prefix.to_owned(), iri.to_owned()));
        true
    }

    fn handle_base_iri(&mut self, iri: Option<&str>) -> bool {
        self.base_iris.push(iri.map(ToOwned::to_owned));
        true
    }

    fn handle_triple(&mut self, triple: Triple) -> bool {
        self.handle_quad(triple.into())
    }

    fn handle_quad(&mut self, quad: Quad) -> bool {
        self.quads.push(quad);
        match self.stop_after {
            Some(limit) => self.quads.len() < limit,
            None => true,
        }
    }
}

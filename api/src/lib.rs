//! This crate provides basic interfaces and data structures for building RDF parsers.
//!
//! It is used by the [`terrapin_turtle`](https://docs.rs/terrapin_turtle/) crate,
//! which implements the N-Triples, N-Quads and TriG parsers on top of it.
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_qualifications
)]
#![doc(test(attr(deny(warnings))))]

pub mod model;
pub mod parser;
pub mod sink;

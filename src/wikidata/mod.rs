//! Automatic generation of labeled test sets from a knowledge-base SPARQL
//! service (default: Wikidata).
//!
//! Categories are formed with the `instance of` property: every single-word
//! label of an entity that is an instance of the requested item becomes a
//! member word. The writer emits files in the category format consumed by
//! the evaluators.

pub mod client;
pub mod query;
pub mod testset;

pub use client::WikidataClient;
pub use query::instance_of_query;
pub use testset::{generate_test_set, testset_path};

//! RDF term and triple representation
//!
//! The types in this crate are what the context generators produce and what
//! a serializer consumes.
//!
//! # Conventions
//!
//! 1. **Expanded IRIs only** - prefixes are a presentation concern; the
//!    prefix table travels alongside in [`Graph::prefixes`].
//!
//! 2. **Explicit datatypes** - plain strings are `xsd:string`, tagged strings
//!    are `rdf:langString`; there is no untyped literal.
//!
//! 3. **Bag semantics** - [`Graph`] keeps duplicates until
//!    [`Graph::canonicalize`] is called.
//!
//! # Example
//!
//! ```
//! use ldp_graph_ir::{Graph, Term, Triple};
//!
//! let mut graph = Graph::new();
//! graph.add(Triple::iri(
//!     "http://localhost/rest/a",
//!     "http://www.w3.org/ns/ldp#contains",
//!     Term::iri("http://localhost/rest/a/b"),
//! ));
//! graph.canonicalize();
//! assert_eq!(graph.len(), 1);
//! ```

pub mod datatype;
mod graph;
mod term;
mod triple;

pub use datatype::Datatype;
pub use graph::Graph;
pub use term::{BlankId, LiteralValue, Term};
pub use triple::Triple;

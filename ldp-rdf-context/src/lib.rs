//! LDP context generators
//!
//! This crate assembles the RDF description of a repository resource from
//! independent *contexts*, each a function of the resource and an
//! [`IdentifierConverter`](ldp_kernel::IdentifierConverter) returning a lazy
//! [`RdfStream`](ldp_kernel::RdfStream):
//!
//! - **ldp**: LDP interaction model
//! - **type**, **properties**, **parent**, **children**
//! - **membership** / **is_member_of**: LDP basic, direct and indirect containers
//! - **references**: inbound references from other resources
//! - **versions**: the public version history
//! - **hash** / **blank_nodes**: embedded resources, cycle-safe
//! - **namespaces**: registered prefixes as VANN vocabulary triples
//!
//! [`describe`] concatenates the contexts a [`ContextSelection`] selects;
//! [`describe_fixity`] and [`describe_node_types`] are the other entry
//! points.
//!
//! # Example
//!
//! ```
//! use ldp_kernel::{HttpIdentifierConverter, MemoryRepository, RequestScope, Resource, Session};
//! use ldp_rdf_context::{describe, ContextSelection};
//! use std::sync::Arc;
//!
//! let repo = MemoryRepository::new();
//! let s = repo.open("default")?;
//! s.create_container("/a")?;
//! s.create_container("/a/b")?;
//!
//! let session: Arc<dyn Session> = s;
//! let converter = HttpIdentifierConverter::new("http://localhost/rest", &RequestScope::Default, session.clone());
//! let a = Resource::require(&session, "/a")?;
//!
//! let graph = describe(&a, &converter, &ContextSelection::default())?.into_graph()?;
//! assert_eq!(graph.with_predicate("http://www.w3.org/ns/ldp#contains").count(), 1);
//! # Ok::<(), ldp_kernel::Error>(())
//! ```

mod children;
mod describe;
mod embed;
mod fixity;
mod ldp;
mod membership;
mod namespaces;
mod node_types;
mod parent;
mod properties;
mod references;
mod selection;
mod types;
mod value_converter;
mod versions;

pub use children::children_context;
pub use describe::{describe, describe_fixity, describe_node_types};
pub use embed::{blank_node_context, hash_context};
pub use fixity::fixity_context;
pub use ldp::ldp_context;
pub use membership::{is_member_of_context, membership_context};
pub use namespaces::namespace_context;
pub use node_types::node_type_triples;
pub use parent::parent_context;
pub use properties::properties_context;
pub use references::references_context;
pub use selection::{is_managed_triple, Context, ContextSelection};
pub use types::type_context;
pub use value_converter::{date_time_literal, is_hidden, ValueConverter, TYPED_LITERAL_SEPARATOR};
pub use versions::versions_context;

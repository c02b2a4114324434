//! Mapping between external IRIs and internal store paths
//!
//! # Invariant
//!
//! For every IRI `u` that `to_internal` maps to a path,
//! `to_external(to_internal(u)) == u`. Outside the domain, and for in-domain
//! IRIs naming nothing addressable (internal `jcr:` segments, `fcr:metadata`
//! of a non-binary), `to_internal` answers `Ok(None)`: that is a normal
//! condition, not an error.

use crate::error::Result;
use crate::node::{child_path, Node};
use crate::resource::Resource;
use crate::scope::RequestScope;
use crate::session::Session;
use ldp_graph_ir::Term;
use ldp_vocab::internal;
use std::sync::Arc;

/// Path segment that addresses the description of a binary
pub const METADATA_SEGMENT: &str = "fcr:metadata";

/// Bidirectional IRI ↔ path mapping used for one description request
pub trait IdentifierConverter {
    /// Internal path for an IRI, or `None` when the IRI is not ours
    fn to_internal(&self, iri: &str) -> Result<Option<String>>;

    /// External IRI for an internal path
    fn to_external(&self, path: &str) -> Result<String>;

    /// Does this IRI fall under the converter's prefix?
    fn in_domain(&self, iri: &str) -> bool;

    /// IRI term for a node path
    fn term_for_path(&self, path: &str) -> Result<Term> {
        Ok(Term::iri(self.to_external(path)?))
    }

    /// IRI term naming a resource.
    ///
    /// A description is named by the binary it describes, so both halves of
    /// a binary share one subject.
    fn subject(&self, resource: &Resource) -> Result<Term> {
        self.term_for_path(resource.described_resource()?.path())
    }
}

/// Converter for the HTTP surface: `<base>[/<scope>]<path>`.
///
/// * a binary's content node `…/x/jcr:content` is addressed as `…/x`, and
///   its description node `…/x` as `…/x/fcr:metadata`;
/// * hash resources stored at `…/x/#/frag` are addressed as `…/x#frag`;
/// * a transaction or workspace scope adds a `tx:<id>` or
///   `workspace:<name>` segment after the base.
#[derive(Clone)]
pub struct HttpIdentifierConverter {
    prefix: String,
    session: Arc<dyn Session>,
}

impl std::fmt::Debug for HttpIdentifierConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentifierConverter")
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl HttpIdentifierConverter {
    pub fn new(base_url: &str, scope: &RequestScope, session: Arc<dyn Session>) -> Self {
        let mut prefix = base_url.trim_end_matches('/').to_string();
        if let Some(segment) = scope.segment() {
            prefix.push('/');
            prefix.push_str(&segment);
        }
        Self { prefix, session }
    }

    /// Everything before the path part of an in-domain IRI
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn is_description(&self, path: &str) -> Result<bool> {
        Ok(self
            .session
            .node(path)?
            .as_ref()
            .is_some_and(is_description_node))
    }
}

fn is_description_node(node: &Node) -> bool {
    node.declares_type(internal::FEDORA_NON_RDF_SOURCE_DESCRIPTION)
        || node.primary_type == internal::NT_FILE
}

const JCR_PREFIX: &str = "jcr:";

/// Segments in the internal `jcr:` namespace are never addressable
fn is_internal_segment(segment: &str) -> bool {
    segment.starts_with(JCR_PREFIX)
}

/// `/x/#/frag` → (`/x`, `frag`)
fn split_hash_path(path: &str) -> Option<(&str, &str)> {
    let marker = format!("/{}/", internal::HASH_HOLDER);
    let idx = path.find(&marker)?;
    let owner = if idx == 0 { "/" } else { &path[..idx] };
    Some((owner, &path[idx + marker.len()..]))
}

impl IdentifierConverter for HttpIdentifierConverter {
    fn in_domain(&self, iri: &str) -> bool {
        iri.strip_prefix(&self.prefix)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    fn to_internal(&self, iri: &str) -> Result<Option<String>> {
        if !self.in_domain(iri) {
            return Ok(None);
        }
        let rest = &iri[self.prefix.len()..];
        let (path_part, fragment) = match rest.split_once('#') {
            Some((p, f)) => (p, Some(f)),
            None => (rest, None),
        };

        if path_part.split('/').any(is_internal_segment) {
            tracing::trace!(iri, "internal path segment, not convertible");
            return Ok(None);
        }

        let metadata_suffix = format!("/{METADATA_SEGMENT}");
        let path = if let Some(description) = path_part.strip_suffix(&metadata_suffix) {
            if description.is_empty() || !self.is_description(description)? {
                tracing::trace!(iri, "metadata of a non-binary, not convertible");
                return Ok(None);
            }
            description.to_string()
        } else if self.is_description(path_part)? {
            child_path(path_part, internal::CONTENT)
        } else {
            path_part.to_string()
        };

        Ok(Some(match fragment {
            Some(frag) => child_path(&child_path(&path, internal::HASH_HOLDER), frag),
            None => path,
        }))
    }

    fn to_external(&self, path: &str) -> Result<String> {
        if let Some((owner, frag)) = split_hash_path(path) {
            return Ok(format!("{}#{}", self.to_external(owner)?, frag));
        }
        let content_suffix = format!("/{}", internal::CONTENT);
        if let Some(description) = path.strip_suffix(&content_suffix) {
            if !description.is_empty() {
                return Ok(format!("{}{}", self.prefix, description));
            }
        }
        if self.is_description(path)? {
            return Ok(format!("{}{}/{}", self.prefix, path, METADATA_SEGMENT));
        }
        Ok(format!("{}{}", self.prefix, path))
    }
}

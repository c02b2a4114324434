//! `rdf:type` triples for a resource's type closure

use ldp_graph_ir::{Term, Triple};
use ldp_kernel::names::rdf_iri_for_name;
use ldp_kernel::{IdentifierConverter, RdfStream, Resource, Result};
use ldp_vocab::rdf;
use rustc_hash::FxHashSet;

/// One `rdf:type` per distinct type among the declared types and all their
/// supertypes.
///
/// A type name whose prefix the session cannot resolve fails the whole
/// context: that is a corrupt type system, not a missing value.
pub fn type_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let session = resource.session();

    let mut seen = FxHashSet::default();
    let mut triples = Vec::new();
    for name in resource.types()? {
        let iri = rdf_iri_for_name(session.as_ref(), &name)?;
        if !seen.insert(iri.clone()) {
            continue;
        }
        tracing::trace!(%name, %iri, "rdf:type");
        triples.push(Triple::new(topic.clone(), Term::iri(rdf::TYPE), Term::iri(iri)));
    }
    Ok(RdfStream::from_triples(topic, triples))
}

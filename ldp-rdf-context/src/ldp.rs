//! LDP interaction-model typing

use ldp_graph_ir::{Term, Triple};
use ldp_kernel::{IdentifierConverter, RdfStream, Resource, ResourceKind, Result};
use ldp_vocab::{internal, ldp, rdf};

/// `ldp:RDFSource` or `ldp:NonRDFSource`, plus `ldp:Container` for
/// containers.
///
/// A container that is not a repository container is a basic container by
/// default.
pub fn ldp_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let typed = |class: &str| Triple::new(topic.clone(), Term::iri(rdf::TYPE), Term::iri(class));

    let triples = match resource.kind() {
        ResourceKind::Binary | ResourceKind::Description => vec![typed(ldp::NON_RDF_SOURCE)],
        ResourceKind::Container => {
            let mut triples = vec![typed(ldp::RDF_SOURCE), typed(ldp::CONTAINER)];
            if !resource.has_type(internal::FEDORA_CONTAINER)? {
                triples.push(typed(ldp::BASIC_CONTAINER));
            }
            triples
        }
        ResourceKind::Placeholder => vec![typed(ldp::RDF_SOURCE)],
    };
    Ok(RdfStream::from_triples(topic, triples))
}

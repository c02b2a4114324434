//! `ldp:contains` containment triples

use ldp_graph_ir::{Term, Triple};
use ldp_kernel::{IdentifierConverter, RdfStream, Resource, Result};
use ldp_vocab::ldp;

/// One `ldp:contains` per direct child.
///
/// A child that is a binary's description is named by the binary, so
/// containment always points at the logical resource.
pub fn children_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let subject = topic.clone();
    let triples = resource.children()?.map(move |child| -> Result<Triple> {
        let child = child?;
        tracing::trace!(child = child.path(), "contains");
        Ok(Triple::new(
            subject.clone(),
            Term::iri(ldp::CONTAINS),
            converter.subject(&child)?,
        ))
    });
    Ok(RdfStream::new(topic, triples))
}

//! The repository type system as RDFS

use ldp_graph_ir::{Term, Triple};
use ldp_kernel::names::rdf_iri_for_name;
use ldp_kernel::{NodeType, Result, Session};
use ldp_vocab::{rdf, rdfs};
use std::sync::Arc;

/// Every registered primary and mixin type as an `rdfs:Class` with its
/// name as `rdfs:label` and one `rdfs:subClassOf` per declared supertype.
///
/// Types are pulled from the session as the iterator is consumed.
pub fn node_type_triples(
    session: &Arc<dyn Session>,
) -> Result<impl Iterator<Item = Result<Triple>>> {
    let types = session.node_types()?;
    let session = session.clone();
    Ok(types.flat_map(move |node_type| -> Vec<Result<Triple>> {
        match node_type.and_then(|t| class_triples(session.as_ref(), &t)) {
            Ok(triples) => triples.into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        }
    }))
}

fn class_triples(session: &dyn Session, node_type: &NodeType) -> Result<Vec<Triple>> {
    let class = Term::iri(rdf_iri_for_name(session, &node_type.name)?);
    tracing::trace!(name = %node_type.name, %class, mixin = node_type.is_mixin, "node type");

    let mut triples = Vec::with_capacity(node_type.supertypes.len() + 2);
    for supertype in &node_type.supertypes {
        let superclass = Term::iri(rdf_iri_for_name(session, supertype)?);
        triples.push(Triple::new(class.clone(), Term::iri(rdfs::SUB_CLASS_OF), superclass));
    }
    triples.push(Triple::new(class.clone(), Term::iri(rdf::TYPE), Term::iri(rdfs::CLASS)));
    triples.push(Triple::new(class, Term::iri(rdfs::LABEL), Term::string(&node_type.name)));
    Ok(triples)
}

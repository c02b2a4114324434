//! Namespaces registered in the repository, as VANN/VOAF vocabulary triples

use ldp_graph_ir::{Term, Triple};
use ldp_kernel::{IdentifierConverter, RdfStream, Resource, Result};
use ldp_vocab::namespaces::{rdf_namespace_for, HIDDEN_PREFIXES};
use ldp_vocab::{rdf, vann, voaf};
use std::collections::BTreeMap;

/// Declares every public prefix on the stream and describes each namespace:
///
/// ```text
/// <ns> rdf:type voaf:Vocabulary ;
///      vann:preferredNamespacePrefix "prefix" ;
///      vann:preferredNamespaceUri "ns" .
/// ```
///
/// Namespaces are published under their RDF form, so the internal `jcr`
/// namespace never appears.
pub fn namespace_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let namespaces: BTreeMap<String, String> = resource
        .session()
        .namespace_prefixes()?
        .into_iter()
        .filter(|(prefix, _)| !HIDDEN_PREFIXES.contains(&prefix.as_str()))
        .map(|(prefix, uri)| {
            let uri = rdf_namespace_for(&uri).to_string();
            (prefix, uri)
        })
        .collect();

    let mut triples = Vec::with_capacity(namespaces.len() * 3);
    for (prefix, uri) in &namespaces {
        let subject = Term::iri(uri);
        triples.push(Triple::new(subject.clone(), Term::iri(rdf::TYPE), Term::iri(voaf::VOCABULARY)));
        triples.push(Triple::new(
            subject.clone(),
            Term::iri(vann::PREFERRED_NAMESPACE_PREFIX),
            Term::string(prefix),
        ));
        triples.push(Triple::new(
            subject,
            Term::iri(vann::PREFERRED_NAMESPACE_URI),
            Term::string(uri),
        ));
    }
    tracing::trace!(count = namespaces.len(), "namespaces");

    Ok(namespaces
        .into_iter()
        .fold(RdfStream::from_triples(topic, triples), |stream, (prefix, uri)| {
            stream.namespace(prefix, uri)
        }))
}

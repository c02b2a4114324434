//! Entry points: assemble a full description from the selected contexts

use crate::children::children_context;
use crate::embed::{blank_node_context, hash_context};
use crate::fixity::fixity_context;
use crate::ldp::ldp_context;
use crate::membership::{is_member_of_context, membership_context};
use crate::namespaces::namespace_context;
use crate::node_types::node_type_triples;
use crate::parent::parent_context;
use crate::properties::properties_context;
use crate::references::references_context;
use crate::selection::{is_managed_triple, Context, ContextSelection};
use crate::types::type_context;
use crate::versions::versions_context;
use ldp_kernel::{DigestAlgorithm, IdentifierConverter, RdfStream, Resource, Result, Session};
use ldp_vocab::{rdf, rdfs};
use std::sync::Arc;

type Generator = for<'a> fn(&Resource, &'a dyn IdentifierConverter) -> Result<RdfStream<'a>>;

fn generator(context: Context) -> Generator {
    match context {
        Context::Ldp => ldp_context,
        Context::Type => type_context,
        Context::Properties => properties_context,
        Context::Parent => parent_context,
        Context::Children => children_context,
        Context::Membership => membership_context,
        Context::IsMemberOf => is_member_of_context,
        Context::References => references_context,
        Context::Versions => versions_context,
        Context::Hash => hash_context,
        Context::BlankNodes => blank_node_context,
        Context::Namespaces => namespace_context,
    }
}

/// The description of `resource`: every selected context, concatenated in
/// [`Context::ORDER`].
///
/// Contexts are generated lazily as the stream is pulled, except the
/// namespace context, whose prefixes must be known before the first triple.
/// A context that fails yields its error in place.
pub fn describe<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
    selection: &ContextSelection,
) -> Result<RdfStream<'a>> {
    let span = tracing::debug_span!("describe", path = resource.path(), kind = ?resource.kind());
    let _guard = span.enter();

    let topic = converter.subject(resource)?;
    let mut stream = RdfStream::empty().with_topic(topic.clone());
    for context in selection.ordered() {
        let part = if context == Context::Namespaces {
            namespace_context(resource, converter)?
        } else {
            let generate = generator(context);
            let resource = resource.clone();
            RdfStream::lazy(topic.clone(), move || {
                let _span = tracing::trace_span!("context", name = context.name()).entered();
                generate(&resource, converter)
            })
        };
        stream = stream.concat(part);
    }

    if !selection.server_managed {
        stream = stream.filter(|t| !is_managed_triple(t));
    }
    tracing::debug!(
        contexts = selection.contexts.len(),
        server_managed = selection.server_managed,
        "description assembled"
    );
    Ok(stream)
}

/// Fixity report for a binary (or its description).
///
/// Fails for anything that is not a binary, and for a binary with no
/// recorded digest or size.
pub fn describe_fixity<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
    algorithm: DigestAlgorithm,
) -> Result<RdfStream<'a>> {
    let binary = resource.described_resource()?;
    let results = binary.fixity(algorithm)?;
    let expected_digest = binary.content_digest()?.unwrap_or_default();
    let expected_size = binary.content_size()?.unwrap_or_default();
    tracing::debug!(path = binary.path(), copies = results.len(), "fixity checked");
    fixity_context(&binary, converter, results, &expected_digest, expected_size)
}

/// The repository type system as RDFS. The stream has no topic.
pub fn describe_node_types(session: &Arc<dyn Session>) -> Result<RdfStream<'static>> {
    let triples = node_type_triples(session)?;
    Ok(RdfStream::empty()
        .namespace("rdf", rdf::NAMESPACE)
        .namespace("rdfs", rdfs::NAMESPACE)
        .with_this_context(triples))
}

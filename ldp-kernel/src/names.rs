//! Translation between prefixed store names and RDF IRIs

use crate::error::{Error, Result};
use crate::session::Session;
use ldp_vocab::internal::PREFIX_SEPARATOR;
use ldp_vocab::namespaces::rdf_namespace_for;

/// Split `prefix:local` at the first separator.
pub fn split_name(name: &str) -> Result<(&str, &str)> {
    name.split_once(PREFIX_SEPARATOR)
        .ok_or_else(|| Error::malformed_type_name(name))
}

/// RDF IRI for a prefixed type or property name.
///
/// The prefix is looked up in the session's namespace registry and the
/// resulting namespace mapped to its RDF form. An `@lang` suffix on a
/// property name is not part of the IRI.
pub fn rdf_iri_for_name(session: &dyn Session, name: &str) -> Result<String> {
    let (prefix, local) = split_name(name)?;
    let local = local.split('@').next().unwrap_or(local);
    let namespace = session
        .namespace_uri(prefix)?
        .ok_or_else(|| Error::invalid_namespace(prefix, name))?;
    Ok(format!("{}{}", rdf_namespace_for(&namespace), local))
}

/// Prefixed store name for an RDF IRI, using the longest registered
/// namespace that covers it.
///
/// Returns `None` when no registered namespace matches.
pub fn name_for_rdf_iri(session: &dyn Session, iri: &str) -> Result<Option<String>> {
    let mut best: Option<(String, &str)> = None;
    let prefixes = session.namespace_prefixes()?;
    for (prefix, uri) in &prefixes {
        let rdf_ns = rdf_namespace_for(uri);
        if rdf_ns.is_empty() {
            continue;
        }
        if let Some(local) = iri.strip_prefix(rdf_ns) {
            if local.is_empty() {
                continue;
            }
            let closer = best
                .as_ref()
                .map_or(true, |(_, best_local)| local.len() < best_local.len());
            if closer {
                best = Some((prefix.clone(), local));
            }
        }
    }
    Ok(best.map(|(prefix, local)| format!("{prefix}{PREFIX_SEPARATOR}{local}")))
}

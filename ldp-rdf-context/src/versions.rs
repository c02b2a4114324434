//! Version history listing

use crate::value_converter::date_time_literal;
use ldp_graph_ir::{Term, Triple};
use ldp_kernel::{IdentifierConverter, RdfStream, Resource, Result};
use ldp_vocab::fedora;

/// `fedora:hasVersion` for every version a client can see, with the
/// snapshot's creation date and labels.
///
/// The bootstrap root version of a history is never listed. A resource
/// without a history has no versions.
pub fn versions_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let versioned = resource.described_resource()?.description()?;
    let Some(history) = versioned.version_history()? else {
        tracing::trace!(path = versioned.path(), "no version history");
        return Ok(RdfStream::empty().with_topic(topic));
    };

    let mut triples = Vec::new();
    for version in history.public_versions() {
        let frozen = converter.term_for_path(&version.frozen_path)?;
        tracing::trace!(version = %version.name, %frozen, "version");
        triples.push(Triple::new(topic.clone(), Term::iri(fedora::HAS_VERSION), frozen.clone()));
        triples.push(Triple::new(
            frozen.clone(),
            Term::iri(fedora::CREATED),
            date_time_literal(&version.created),
        ));
        for label in &version.labels {
            triples.push(Triple::new(
                frozen.clone(),
                Term::iri(fedora::HAS_VERSION_LABEL),
                Term::string(label),
            ));
        }
    }
    Ok(RdfStream::from_triples(topic, triples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ldp_graph_ir::Datatype;
    use ldp_kernel::{HttpIdentifierConverter, MemoryRepository, RequestScope, Session};
    use ldp_vocab::internal;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_root_version_is_not_listed() {
        let s = MemoryRepository::new().open("default").unwrap();
        s.create_container("/v").unwrap();
        s.add_mixin("/v", internal::MIX_VERSIONABLE).unwrap();
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let v1 = s.checkin_at("/v", &["first"], created).unwrap();
        let v2 = s.checkin_at("/v", &[], created).unwrap();
        s.add_version_label("/v", &v2.name, "second").unwrap();
        s.add_version_label("/v", &v2.name, "latest").unwrap();

        let session: Arc<dyn Session> = s;
        let converter = HttpIdentifierConverter::new("http://h/rest", &RequestScope::Default, session.clone());
        let resource = Resource::require(&session, "/v").unwrap();
        let graph = versions_context(&resource, &converter).unwrap().into_graph().unwrap();

        let topic = Term::iri("http://h/rest/v");
        let mut versions: Vec<&Term> = graph.objects(&topic, fedora::HAS_VERSION).collect();
        versions.sort();
        let frozen1 = Term::iri(format!("http://h/rest{}", v1.frozen_path));
        let frozen2 = Term::iri(format!("http://h/rest{}", v2.frozen_path));
        assert_eq!(versions, vec![&frozen1, &frozen2]);

        assert_eq!(
            graph.objects(&frozen1, fedora::CREATED).collect::<Vec<_>>(),
            vec![&Term::typed("2024-03-01T12:00:00.000Z", Datatype::xsd_date_time())]
        );
        assert_eq!(
            graph.objects(&frozen1, fedora::HAS_VERSION_LABEL).collect::<Vec<_>>(),
            vec![&Term::string("first")]
        );
        assert_eq!(graph.objects(&frozen2, fedora::HAS_VERSION_LABEL).count(), 2);
        assert_eq!(graph.len(), 2 + 2 + 3);
    }

    #[test]
    fn test_unversioned_resource() {
        let s = MemoryRepository::new().open("default").unwrap();
        s.create_container("/plain").unwrap();
        let session: Arc<dyn Session> = s;
        let converter = HttpIdentifierConverter::new("http://h/rest", &RequestScope::Default, session.clone());
        let resource = Resource::require(&session, "/plain").unwrap();

        let stream = versions_context(&resource, &converter).unwrap();
        assert_eq!(stream.topic(), Some(&Term::iri("http://h/rest/plain")));
        assert_eq!(stream.count(), 0);
    }
}
